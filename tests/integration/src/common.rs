//! Shared helpers for the integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dcerpc::LoopbackConn;
use parking_lot::Mutex;

/// Install a tracing subscriber once per test binary
///
/// Honors `RUST_LOG`; defaults to warnings only.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Fresh in-process connection
pub fn loopback() -> Arc<LoopbackConn> {
    Arc::new(LoopbackConn::new())
}

/// Counters shared by concurrent callers
#[derive(Debug, Default)]
pub struct ConcurrentStats {
    pub succeeded: AtomicU64,
    pub failed: AtomicU64,
    latencies: Mutex<Vec<Duration>>,
}

impl ConcurrentStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self, latency: Duration) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
        self.latencies.lock().push(latency);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn succeeded(&self) -> u64 {
        self.succeeded.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn max_latency(&self) -> Duration {
        self.latencies.lock().iter().copied().max().unwrap_or_default()
    }

    pub fn print_summary(&self, label: &str) {
        println!(
            "{}: {} ok, {} failed, max latency {:?}",
            label,
            self.succeeded(),
            self.failed(),
            self.max_latency()
        );
    }
}
