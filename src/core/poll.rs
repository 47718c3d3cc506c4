use log::{debug, info, trace};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::refresher::{RefreshOutcome, Refresher};
use super::View;

/// The "auto refresh" checkbox. Clones share the same checked state.
#[derive(Debug, Clone, Default)]
pub struct AutoRefresh {
    checked: Arc<AtomicBool>,
}

impl AutoRefresh {
    pub fn new(checked: bool) -> Self {
        Self {
            checked: Arc::new(AtomicBool::new(checked)),
        }
    }

    pub fn is_checked(&self) -> bool {
        self.checked.load(Ordering::SeqCst)
    }

    pub fn set_checked(&self, checked: bool) {
        self.checked.store(checked, Ordering::SeqCst);
    }

    /// Flips the state and returns the new value.
    pub fn toggle(&self) -> bool {
        !self.checked.fetch_xor(true, Ordering::SeqCst)
    }
}

/// Fires one refresh per tick while the toggle is checked. Ticks never wait
/// for earlier fetches, so slow endpoints can have several requests in flight.
pub struct PollLoop<V: View> {
    refresher: Arc<Refresher<V>>,
    toggle: AutoRefresh,
    interval: Duration,
}

impl<V: View> PollLoop<V> {
    pub fn new(refresher: Arc<Refresher<V>>, toggle: AutoRefresh, interval: Duration) -> Self {
        Self {
            refresher,
            toggle,
            interval,
        }
    }

    pub fn tick(&self) -> Option<JoinHandle<RefreshOutcome>> {
        let active = self.toggle.is_checked();
        self.refresher.stats().record_tick(active);

        if !active {
            trace!("Auto refresh off, skipping tick for {}", self.refresher.view().name());
            return None;
        }

        let refresher = Arc::clone(&self.refresher);
        Some(tokio::spawn(async move { refresher.refresh().await }))
    }

    /// Ticks until `shutdown` flips to true or its sender is dropped. The
    /// first tick happens one interval after start. Fetches still running at
    /// shutdown are cancelled before this returns.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Starting poll loop for {} every {:?}",
            self.refresher.view().name(),
            self.interval
        );

        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut in_flight: Vec<JoinHandle<RefreshOutcome>> = Vec::new();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    in_flight.retain(|handle| !handle.is_finished());
                    in_flight.extend(self.tick());
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        debug!(
            "Poll loop for {} stopped, cancelling {} in-flight fetches",
            self.refresher.view().name(),
            in_flight.len()
        );
        for handle in in_flight {
            handle.abort();
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CommandView;
    use crate::fetchers::{MockFetcher, MockResponse};
    use crate::output::{MemorySink, Renderer};
    use url::Url;

    fn poll_loop(fetcher: &MockFetcher, toggle: &AutoRefresh) -> PollLoop<CommandView> {
        let refresher = Refresher::new(
            CommandView::new("date", "date", &[]),
            Box::new(fetcher.clone()),
            Renderer::new().register_sink(Arc::new(MemorySink::new())),
            Url::parse("http://localhost/api/commands/date").unwrap(),
        );
        PollLoop::new(Arc::new(refresher), toggle.clone(), Duration::from_secs(1))
    }

    #[test]
    fn test_toggle() {
        let toggle = AutoRefresh::new(false);
        assert!(toggle.toggle());
        assert!(toggle.is_checked());
        assert!(!toggle.toggle());
        toggle.set_checked(true);
        assert!(toggle.clone().is_checked());
    }

    #[tokio::test]
    async fn test_unchecked_never_fetches() {
        let fetcher = MockFetcher::new(vec![MockResponse::ok(r#"{"command":"date"}"#)]);
        let toggle = AutoRefresh::new(false);
        let poll = poll_loop(&fetcher, &toggle);

        for _ in 0..5 {
            assert!(poll.tick().is_none());
        }

        assert_eq!(fetcher.calls(), 0);
        let stats = poll.refresher.stats().get_stats();
        assert_eq!(stats.ticks, 5);
        assert_eq!(stats.skipped_ticks, 5);
    }

    #[tokio::test]
    async fn test_checked_fetches_once_per_tick() {
        let fetcher = MockFetcher::new(vec![MockResponse::ok(r#"{"command":"date"}"#)]);
        let toggle = AutoRefresh::new(true);
        let poll = poll_loop(&fetcher, &toggle);

        for _ in 0..4 {
            let handle = poll.tick().expect("tick should fetch while checked");
            assert_eq!(handle.await.unwrap(), RefreshOutcome::Rendered);
        }
        assert_eq!(fetcher.calls(), 4);

        toggle.set_checked(false);
        assert!(poll.tick().is_none());
        assert_eq!(fetcher.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_ticks_on_interval_until_shutdown() {
        let fetcher = MockFetcher::new(vec![MockResponse::ok(r#"{"command":"date"}"#)]);
        let toggle = AutoRefresh::new(true);
        let poll = poll_loop(&fetcher, &toggle);
        let stats = poll.refresher.stats();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(poll.run(shutdown_rx));

        tokio::time::sleep(Duration::from_millis(3500)).await;
        shutdown_tx.send(true).unwrap();
        task.await.unwrap();

        assert_eq!(stats.get_stats().ticks, 3);
        assert_eq!(fetcher.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_fetches_are_not_serialized() {
        let fetcher = MockFetcher::new(vec![
            MockResponse::ok(r#"{"command":"date"}"#).with_delay(Duration::from_secs(10)),
        ]);
        let toggle = AutoRefresh::new(true);
        let poll = poll_loop(&fetcher, &toggle);

        let first = poll.tick().unwrap();
        let second = poll.tick().unwrap();
        tokio::task::yield_now().await;
        assert_eq!(fetcher.calls(), 2);

        first.await.unwrap();
        second.await.unwrap();
    }
}
