//! Live benchmark statistics

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Thread-safe operation counters
#[derive(Debug)]
pub struct OpStats {
    /// Operations completed
    ops: AtomicU64,
    start_time: Instant,
    running: AtomicBool,
}

impl OpStats {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_ops(&self, count: u64) {
        self.ops.fetch_add(count, Ordering::Relaxed);
    }

    pub fn total_ops(&self) -> u64 {
        self.ops.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn ops_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_ops() as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    /// One-line progress string, e.g. `[12.34K op/s][Total 1.20M][3s]`
    pub fn format(&self) -> String {
        format!(
            "[{} op/s][Total {}][{}]",
            format_count(self.ops_per_second() as u64),
            format_count(self.total_ops()),
            format_duration(self.elapsed().as_secs_f64())
        )
    }
}

impl Default for OpStats {
    fn default() -> Self {
        Self {
            ops: AtomicU64::new(0),
            start_time: Instant::now(),
            running: AtomicBool::new(true),
        }
    }
}

fn format_count(count: u64) -> String {
    if count >= 1_000_000_000 {
        format!("{:.2}G", count as f64 / 1e9)
    } else if count >= 1_000_000 {
        format!("{:.2}M", count as f64 / 1e6)
    } else if count >= 1000 {
        format!("{:.2}K", count as f64 / 1e3)
    } else {
        format!("{}", count)
    }
}

fn format_duration(seconds: f64) -> String {
    if seconds < 1.0 {
        format!("{:.0}ms", seconds * 1000.0)
    } else if seconds < 60.0 {
        format!("{:.0}s", seconds)
    } else if seconds < 3600.0 {
        format!("{:.0}m", seconds / 60.0)
    } else {
        format!("{:.1}h", seconds / 3600.0)
    }
}
