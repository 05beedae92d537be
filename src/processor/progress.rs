//! Progress output for dump sessions

use crate::errors::AppResult;
use crate::types::SessionStats;
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::info;

/// Decides when the next progress line is due
pub struct ProgressTracker {
    interval: Duration,
    last_report: Instant,
}

impl ProgressTracker {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            last_report: Instant::now(),
        }
    }

    /// True at most once per interval
    pub fn due(&mut self) -> bool {
        self.due_at(Instant::now())
    }

    fn due_at(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_report) < self.interval {
            return false;
        }
        self.last_report = now;
        true
    }
}

pub fn progress_line(stats: &SessionStats) -> String {
    format!(
        "Records: {} | Decoded: {} | Failed: {} | {:.0}/sec | {:.1}s",
        stats.total_records,
        stats.decoded,
        stats.failed,
        stats.records_per_second(),
        stats.duration().as_secs_f64()
    )
}

/// Rewrite the progress line in place
pub fn print_progress(stats: &SessionStats) -> AppResult<()> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "\r{}", progress_line(stats))?;
    stdout.flush()?;
    Ok(())
}

pub fn finish_progress() {
    println!();
}

pub fn log_completion(stats: &SessionStats) {
    info!("Dump finished: {}", stats.summary());
    if stats.failed > 0 {
        info!("  {} records skipped, see warnings above", stats.failed);
    }
}
