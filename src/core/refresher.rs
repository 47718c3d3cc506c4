use chrono::Utc;
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use url::Url;

use super::View;
use crate::fetchers::Fetcher;
use crate::output::Renderer;
use crate::stats::StatsTracker;
use crate::ViewResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Rendered,
    /// A newer response was rendered first; this one was dropped.
    Stale,
    Failed,
}

/// Hands out increasing request ids and remembers the newest one rendered.
#[derive(Debug, Default)]
struct RequestSequence {
    issued: AtomicU64,
    last_rendered: Mutex<u64>,
}

impl RequestSequence {
    fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// One fetch, format and render cycle for a view.
pub struct Refresher<V: View> {
    view: V,
    fetcher: Box<dyn Fetcher>,
    renderer: Renderer,
    endpoint: Url,
    stats: Arc<StatsTracker>,
    sequence: RequestSequence,
    discard_stale: bool,
}

impl<V: View> Refresher<V> {
    pub fn new(view: V, fetcher: Box<dyn Fetcher>, renderer: Renderer, endpoint: Url) -> Self {
        info!("Initializing refresher for {} at {}", view.name(), endpoint);
        Self {
            view,
            fetcher,
            renderer,
            endpoint,
            stats: Arc::new(StatsTracker::new()),
            sequence: RequestSequence::default(),
            discard_stale: true,
        }
    }

    pub fn with_discard_stale(mut self, discard_stale: bool) -> Self {
        self.discard_stale = discard_stale;
        self
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn stats(&self) -> Arc<StatsTracker> {
        Arc::clone(&self.stats)
    }

    pub fn show_placeholder(&self) {
        self.renderer.render(&self.view.placeholder());
    }

    async fn fetch_record(&self) -> ViewResult<V::Record> {
        let response = self.fetcher.fetch(self.endpoint.clone()).await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Fetches the endpoint once and redraws on success. Failures are logged
    /// and leave the displayed block as it was.
    pub async fn refresh(&self) -> RefreshOutcome {
        let id = self.sequence.issue();
        self.stats.record_fetch();
        let start_time = Utc::now();

        let record = match self.fetch_record().await {
            Ok(record) => record,
            Err(e) => {
                warn!("fetch error for {} (request {}): {}", self.endpoint, id, e);
                self.stats.record_failure(e.to_string());
                return RefreshOutcome::Failed;
            }
        };

        let text = self.view.format(&record);

        // Check and render under one lock so an older response can never
        // overwrite a newer one.
        let mut last_rendered = self.sequence.last_rendered.lock();
        if self.discard_stale && id < *last_rendered {
            debug!(
                "Dropping stale response {} for {}, already showing {}",
                id,
                self.view.name(),
                *last_rendered
            );
            self.stats.record_stale();
            return RefreshOutcome::Stale;
        }
        *last_rendered = id;
        self.renderer.render(&text);
        drop(last_rendered);

        self.stats.record_render(Utc::now() - start_time);
        debug!("Rendered response {} for {}", id, self.view.name());
        RefreshOutcome::Rendered
    }
}
