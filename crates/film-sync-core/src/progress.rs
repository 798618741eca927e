use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// What happened to one discovered film.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemOutcome {
    Scraped,
    Skipped,
    Failed,
}

/// Per-item notification for hosts that render their own progress.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncProgress {
    pub position: usize, // 1-based
    pub total: usize,
    pub title: String,
    pub outcome: ItemOutcome,
}

pub type ProgressObserver = Arc<dyn Fn(&SyncProgress) + Send + Sync>;

/// Outcome counts of one sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub discovered: usize,
    pub scraped: usize,
    pub skipped: usize,
    pub failed: usize,
    pub duration: Duration,
}

/// Accumulates outcomes while a sync runs and logs periodic progress.
pub struct SyncTally {
    total: usize,
    scraped: usize,
    skipped: usize,
    failed: usize,
    start_time: Instant,
    progress_interval: usize, // Log every N items
    last_progress_log: usize,
    error_counts: HashMap<&'static str, usize>, // Failures by phase
}

impl SyncTally {
    pub fn new(total: usize, progress_interval: usize) -> Self {
        Self {
            total,
            scraped: 0,
            skipped: 0,
            failed: 0,
            start_time: Instant::now(),
            progress_interval: progress_interval.max(1),
            last_progress_log: 0,
            error_counts: HashMap::new(),
        }
    }

    pub fn record(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Scraped => self.scraped += 1,
            ItemOutcome::Skipped => self.skipped += 1,
            ItemOutcome::Failed => self.failed += 1,
        }
    }

    /// Record a failure and group it under `phase` for the summary.
    pub fn record_failed(&mut self, phase: &'static str) {
        self.failed += 1;
        *self.error_counts.entry(phase).or_insert(0) += 1;
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// `current` is 1-based.
    pub fn log_progress(&mut self, current: usize) {
        if current - self.last_progress_log < self.progress_interval && current != self.total {
            return;
        }
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let rate = if elapsed > 0.0 { current as f64 / elapsed } else { 0.0 };
        info!(
            "Progress: {}/{} ({:.2} films/sec) | Scraped: {} | Skipped: {} | Failed: {}",
            current, self.total, rate, self.scraped, self.skipped, self.failed
        );
        self.last_progress_log = current;
    }

    /// Log the summary and produce the final report.
    pub fn finish(self) -> SyncReport {
        let report = SyncReport {
            discovered: self.total,
            scraped: self.scraped,
            skipped: self.skipped,
            failed: self.failed,
            duration: self.start_time.elapsed(),
        };

        if report.failed > 0 {
            warn!(
                "Sync completed: {} discovered in {:.1}s | Scraped: {} | Skipped: {} | Failed: {}",
                report.discovered, report.duration.as_secs_f64(), report.scraped, report.skipped, report.failed
            );
            let mut breakdown: Vec<_> = self.error_counts.iter().collect();
            breakdown.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            let summary: Vec<String> = breakdown
                .iter()
                .map(|(phase, count)| format!("{}: {}", phase, count))
                .collect();
            info!("Failure breakdown: {}", summary.join(", "));
        } else {
            info!(
                "Sync completed: {} discovered in {:.1}s | Scraped: {} | Skipped: {}",
                report.discovered, report.duration.as_secs_f64(), report.scraped, report.skipped
            );
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_counts_outcomes() {
        let mut tally = SyncTally::new(4, 10);
        tally.record(ItemOutcome::Scraped);
        tally.record(ItemOutcome::Skipped);
        tally.record(ItemOutcome::Skipped);
        tally.record_failed("detail");
        assert_eq!(tally.failed(), 1);

        let report = tally.finish();
        assert_eq!(report.discovered, 4);
        assert_eq!(report.scraped, 1);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.failed, 1);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let mut tally = SyncTally::new(2, 0);
        tally.log_progress(1);
        tally.log_progress(2);
        assert_eq!(tally.finish().discovered, 2);
    }

    #[test]
    fn test_outcome_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&ItemOutcome::Scraped).unwrap(), "\"scraped\"");
    }
}
