use crate::models::Stats;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Process-wide counters for cycles, upstream failures and persistence.
pub struct Analytics {
    cycles_completed: AtomicU64,
    cycles_failed: AtomicU64,
    chain_fetch_failures: AtomicU64,
    history_appends: AtomicU64,
    history_write_failures: AtomicU64,
    history_corruptions: AtomicU64,
    start_time: Instant,
}

impl Analytics {
    pub fn new() -> Self {
        Self {
            cycles_completed: AtomicU64::new(0),
            cycles_failed: AtomicU64::new(0),
            chain_fetch_failures: AtomicU64::new(0),
            history_appends: AtomicU64::new(0),
            history_write_failures: AtomicU64::new(0),
            history_corruptions: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_cycle(&self, succeeded: bool) {
        let counter = if succeeded {
            &self.cycles_completed
        } else {
            &self.cycles_failed
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_fetch_failure(&self, chain: &str) {
        self.chain_fetch_failures.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(chain = chain, "Chain fetch failure recorded");
    }

    pub fn record_append(&self, persisted: bool) {
        let counter = if persisted {
            &self.history_appends
        } else {
            &self.history_write_failures
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_corruption(&self) {
        self.history_corruptions.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get_stats(&self) -> Stats {
        Stats {
            cycles_completed: self.cycles_completed.load(Ordering::SeqCst),
            cycles_failed: self.cycles_failed.load(Ordering::SeqCst),
            chain_fetch_failures: self.chain_fetch_failures.load(Ordering::SeqCst),
            history_appends: self.history_appends.load(Ordering::SeqCst),
            history_write_failures: self.history_write_failures.load(Ordering::SeqCst),
            history_corruptions: self.history_corruptions.load(Ordering::SeqCst),
            uptime_seconds: self.uptime_seconds(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for Analytics {
    fn default() -> Self {
        Self::new()
    }
}
