use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{info, trace};

/// Counters for dispatched requests
#[derive(Debug)]
pub struct DispatchMetrics {
    /// Total number of dispatch calls that reached the transport
    pub request_count: AtomicU64,
    /// Total number of requests that produced a response
    pub success_count: AtomicU64,
    /// Total number of transport failures
    pub failure_count: AtomicU64,
    /// Dispatches refused because no credentials were set
    pub auth_rejections: AtomicU64,
    /// Total response bytes forwarded to the sink
    pub bytes_streamed: AtomicU64,
    /// Total time spent in requests (nanoseconds)
    pub total_latency_ns: AtomicU64,
    start_time: Instant,
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self {
            request_count: AtomicU64::new(0),
            success_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
            auth_rejections: AtomicU64::new(0),
            bytes_streamed: AtomicU64::new(0),
            total_latency_ns: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self, url: &str) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        trace!(api_op = "request", url = url);
    }

    pub fn record_success(&self, url: &str, bytes: u64, latency: Duration) {
        self.success_count.fetch_add(1, Ordering::Relaxed);
        self.bytes_streamed.fetch_add(bytes, Ordering::Relaxed);
        self.total_latency_ns
            .fetch_add(latency.as_nanos() as u64, Ordering::Relaxed);
        trace!(
            api_op = "success",
            url = url,
            bytes_streamed = bytes,
            latency_ms = latency.as_millis() as u64
        );
    }

    pub fn record_failure(&self, url: &str, error: &str) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
        trace!(api_op = "failure", url = url, error = error);
    }

    pub fn record_auth_rejection(&self) {
        self.auth_rejections.fetch_add(1, Ordering::Relaxed);
    }

    /// Calculate average latency in milliseconds
    pub fn avg_latency_ms(&self) -> f64 {
        let count = self.success_count.load(Ordering::Relaxed);
        if count == 0 {
            return 0.0;
        }
        let total_ns = self.total_latency_ns.load(Ordering::Relaxed);
        (total_ns as f64 / count as f64) / 1_000_000.0
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Log a summary of metrics
    pub fn log_summary(&self) {
        info!(
            operation = "dispatch_metrics_summary",
            requests = self.request_count.load(Ordering::Relaxed),
            successes = self.success_count.load(Ordering::Relaxed),
            failures = self.failure_count.load(Ordering::Relaxed),
            auth_rejections = self.auth_rejections.load(Ordering::Relaxed),
            bytes_streamed = self.bytes_streamed.load(Ordering::Relaxed),
            avg_latency_ms = self.avg_latency_ms(),
            duration_secs = self.elapsed().as_secs_f64(),
        );
    }
}
