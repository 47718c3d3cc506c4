use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct RefreshStats {
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub ticks: usize,
    pub skipped_ticks: usize,
    pub fetches: usize,
    pub rendered: usize,
    pub failed: usize,
    pub stale_discarded: usize,
    pub last_error: Option<String>,
    pub last_render: Option<DateTime<Utc>>,
    pub average_response_time: f64, // in milliseconds
}

#[derive(Debug, Clone)]
pub struct StatsTracker {
    stats: Arc<RwLock<RefreshStats>>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self {
            stats: Arc::new(RwLock::new(RefreshStats {
                start_time: Utc::now(),
                end_time: None,
                ticks: 0,
                skipped_ticks: 0,
                fetches: 0,
                rendered: 0,
                failed: 0,
                stale_discarded: 0,
                last_error: None,
                last_render: None,
                average_response_time: 0.0,
            })),
        }
    }

    pub fn record_tick(&self, active: bool) {
        let mut stats = self.stats.write();
        stats.ticks += 1;
        if !active {
            stats.skipped_ticks += 1;
        }
    }

    pub fn record_fetch(&self) {
        self.stats.write().fetches += 1;
    }

    pub fn record_render(&self, duration: Duration) {
        let mut stats = self.stats.write();
        stats.rendered += 1;
        stats.last_render = Some(Utc::now());

        let current_total = stats.average_response_time * (stats.rendered - 1) as f64;
        let new_duration = duration.num_milliseconds() as f64;
        stats.average_response_time = (current_total + new_duration) / stats.rendered as f64;
    }

    pub fn record_failure(&self, error: String) {
        let mut stats = self.stats.write();
        stats.failed += 1;
        stats.last_error = Some(error);
    }

    pub fn record_stale(&self) {
        self.stats.write().stale_discarded += 1;
    }

    pub fn finish(&self) {
        self.stats.write().end_time = Some(Utc::now());
    }

    pub fn get_stats(&self) -> RefreshStats {
        self.stats.read().clone()
    }

    pub fn print_summary(&self) {
        let stats = self.stats.read();
        let duration = stats
            .end_time
            .unwrap_or_else(Utc::now)
            .signed_duration_since(stats.start_time);

        println!("\nRefresh Statistics:");
        println!("===================");
        println!("Duration: {} seconds", duration.num_seconds());
        println!("Ticks: {} ({} while paused)", stats.ticks, stats.skipped_ticks);
        println!("Fetches: {}", stats.fetches);
        println!("Rendered: {}", stats.rendered);
        println!("Failed: {}", stats.failed);
        println!("Stale Responses Discarded: {}", stats.stale_discarded);
        println!(
            "Average Response Time: {:.2}ms",
            stats.average_response_time
        );

        if let Some(error) = &stats.last_error {
            println!("\nLast Error: {}", error);
        }
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_response_time() {
        let tracker = StatsTracker::new();
        tracker.record_render(Duration::milliseconds(10));
        tracker.record_render(Duration::milliseconds(30));

        let stats = tracker.get_stats();
        assert_eq!(stats.rendered, 2);
        assert!((stats.average_response_time - 20.0).abs() < f64::EPSILON);
        assert!(stats.last_render.is_some());
    }

    #[test]
    fn test_skipped_ticks_and_failures() {
        let tracker = StatsTracker::new();
        tracker.record_tick(false);
        tracker.record_tick(true);
        tracker.record_failure("boom".to_string());

        let stats = tracker.get_stats();
        assert_eq!(stats.ticks, 2);
        assert_eq!(stats.skipped_ticks, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.last_error.as_deref(), Some("boom"));
    }
}
