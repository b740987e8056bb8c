use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::IngestError;

/// Counters for the ingest path, rendered on `GET /metrics`.
///
/// All counters are atomics updated with `Ordering::Relaxed`; readers get a
/// consistent-enough snapshot for Prometheus scraping, not a transaction.
#[derive(Default)]
pub struct IngestMetrics {
    request_count: AtomicUsize,
    total_latency_ns: AtomicU64,
    saved: AtomicUsize,
    saved_bytes: AtomicU64,
    rejected_method: AtomicUsize,
    rejected_too_large: AtomicUsize,
    rejected_read: AtomicUsize,
    rejected_invalid_json: AtomicUsize,
    rejected_storage: AtomicUsize,
}

impl IngestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of `/save` requests handled, accepted or not.
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    pub fn saved_count(&self) -> usize {
        self.saved.load(Ordering::Relaxed)
    }

    pub fn saved_bytes(&self) -> u64 {
        self.saved_bytes.load(Ordering::Relaxed)
    }

    /// Mean handling time across all `/save` requests.
    ///
    /// Zero before the first request.
    pub fn average_latency(&self) -> Duration {
        let count = self.request_count.load(Ordering::Relaxed) as u64;
        if count == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }

    /// Count of rejections for a reason label (see [`IngestError::reason`]).
    pub fn rejected_count(&self, reason: &str) -> usize {
        self.rejection_counter(reason)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn record_saved(&self, bytes: usize, latency: Duration) {
        self.record_request(latency);
        self.saved.fetch_add(1, Ordering::Relaxed);
        self.saved_bytes.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn record_rejected(&self, err: &IngestError, latency: Duration) {
        self.record_request(latency);
        if let Some(counter) = self.rejection_counter(err.reason()) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn record_request(&self, latency: Duration) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ns
            .fetch_add(latency.as_nanos() as u64, Ordering::Relaxed);
    }

    fn rejection_counter(&self, reason: &str) -> Option<&AtomicUsize> {
        match reason {
            "method" => Some(&self.rejected_method),
            "too_large" => Some(&self.rejected_too_large),
            "read" => Some(&self.rejected_read),
            "invalid_json" => Some(&self.rejected_invalid_json),
            "storage" => Some(&self.rejected_storage),
            _ => None,
        }
    }

    /// Prometheus text exposition of every counter.
    pub fn render(&self) -> String {
        let mut body = format!(
            "# HELP xubit_requests_total Total number of /save requests handled\n\
             # TYPE xubit_requests_total counter\n\
             xubit_requests_total {}\n\
             # HELP xubit_saved_total Result files written\n\
             # TYPE xubit_saved_total counter\n\
             xubit_saved_total {}\n\
             # HELP xubit_saved_bytes_total Bytes of result payloads written\n\
             # TYPE xubit_saved_bytes_total counter\n\
             xubit_saved_bytes_total {}\n\
             # HELP xubit_request_latency_seconds Average /save handling latency in seconds\n\
             # TYPE xubit_request_latency_seconds gauge\n\
             xubit_request_latency_seconds {}\n\
             # HELP xubit_rejected_total Rejected /save requests by reason\n\
             # TYPE xubit_rejected_total counter\n",
            self.request_count(),
            self.saved_count(),
            self.saved_bytes(),
            self.average_latency().as_secs_f64()
        );
        for reason in ["method", "too_large", "read", "invalid_json", "storage"] {
            body.push_str(&format!(
                "xubit_rejected_total{{reason=\"{}\"}} {}\n",
                reason,
                self.rejected_count(reason)
            ));
        }
        body
    }
}
