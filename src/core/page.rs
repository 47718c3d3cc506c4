use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::poll::{AutoRefresh, PollLoop};
use super::refresher::{RefreshOutcome, Refresher};
use super::{View, ViewerConfig};
use crate::fetchers::Fetcher;
use crate::output::Renderer;
use crate::stats::StatsTracker;
use crate::ViewResult;

/// A view wired to its fetcher and outputs, ready to be loaded.
pub struct Page<V: View> {
    refresher: Arc<Refresher<V>>,
    toggle: AutoRefresh,
    interval: Duration,
}

impl<V: View> Page<V> {
    pub fn new(
        view: V,
        fetcher: Box<dyn Fetcher>,
        renderer: Renderer,
        config: &ViewerConfig,
    ) -> ViewResult<Self> {
        config.validate()?;
        let endpoint = config.endpoint(&view.api_path())?;
        let refresher = Refresher::new(view, fetcher, renderer, endpoint)
            .with_discard_stale(config.discard_stale);

        Ok(Self {
            refresher: Arc::new(refresher),
            toggle: AutoRefresh::new(config.auto_refresh),
            interval: config.interval,
        })
    }

    pub fn auto_refresh(&self) -> AutoRefresh {
        self.toggle.clone()
    }

    /// Shows the placeholder, fires one immediate fetch, then starts polling.
    pub fn load(self) -> PageHandle {
        info!(
            "Loading {} from {}",
            self.refresher.view().name(),
            self.refresher.endpoint()
        );
        self.refresher.show_placeholder();

        let initial = {
            let refresher = Arc::clone(&self.refresher);
            tokio::spawn(async move { refresher.refresh().await })
        };

        let (shutdown, shutdown_rx) = watch::channel(false);
        let stats = self.refresher.stats();
        let poll = PollLoop::new(self.refresher, self.toggle.clone(), self.interval);
        let poll = tokio::spawn(poll.run(shutdown_rx));

        PageHandle {
            toggle: self.toggle,
            stats,
            initial: Some(initial),
            poll,
            shutdown,
        }
    }
}

/// A loaded page. Dropping it also stops the poll loop, since the loop exits
/// once its shutdown sender is gone.
pub struct PageHandle {
    toggle: AutoRefresh,
    stats: Arc<StatsTracker>,
    initial: Option<JoinHandle<RefreshOutcome>>,
    poll: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
}

impl PageHandle {
    pub fn auto_refresh(&self) -> AutoRefresh {
        self.toggle.clone()
    }

    pub fn stats(&self) -> Arc<StatsTracker> {
        Arc::clone(&self.stats)
    }

    /// Waits for the fetch fired at load time. Returns `None` if it was
    /// already awaited or its task panicked.
    pub async fn initial_refresh(&mut self) -> Option<RefreshOutcome> {
        self.initial.take()?.await.ok()
    }

    /// Stops polling and cancels any fetch still in flight, so nothing is
    /// rendered once this returns.
    pub async fn close(self) -> Arc<StatsTracker> {
        let _ = self.shutdown.send(true);
        if let Some(initial) = self.initial {
            initial.abort();
            let _ = initial.await;
        }
        if let Err(e) = self.poll.await {
            warn!("Poll loop ended abnormally: {}", e);
        }
        self.stats.finish();
        self.stats
    }
}
