//! The ingest-and-persist path behind `POST /save`.
//!
//! ```text
//! Start -> MethodChecked -> BodyRead -> JSONParsed -> DirEnsured -> FileWritten
//!   \___________\______________\___________\_____________\-----> Rejected
//! ```
//!
//! Each step either advances or returns an [`IngestError`]; there is no other
//! state. What gets written is the raw body as received.

use crate::error::IngestError;
use crate::metrics::IngestMetrics;
use crate::naming::{self, Clock, SystemClock};
use crate::storage::ResultStore;
use crate::validator::{self, MAX_BODY_BYTES};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// A result that made it to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedResult {
    /// Where the body was written
    pub path: PathBuf,
    /// The decoded `m` field
    pub m: i64,
    /// Number of bytes written
    pub bytes: usize,
}

/// Shared by every connection coroutine; holds no per-request state.
#[derive(Clone)]
pub struct SaveHandler {
    store: ResultStore,
    clock: Arc<dyn Clock>,
    metrics: Arc<IngestMetrics>,
    max_body_bytes: usize,
}

impl SaveHandler {
    pub fn new(store: ResultStore) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            metrics: Arc::new(IngestMetrics::new()),
            max_body_bytes: MAX_BODY_BYTES,
        }
    }

    /// Replace the time source used for file names.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<IngestMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn metrics(&self) -> &Arc<IngestMetrics> {
        &self.metrics
    }

    /// Run one request through the pipeline and log the outcome.
    pub fn handle<R: Read>(
        &self,
        method: &str,
        content_length: Option<u64>,
        body: R,
    ) -> Result<SavedResult, IngestError> {
        let start = Instant::now();
        let outcome = self.process(method, content_length, body);
        let latency = start.elapsed();

        match &outcome {
            Ok(saved) => {
                self.metrics.record_saved(saved.bytes, latency);
                info!(
                    path = %saved.path.display(),
                    m = saved.m,
                    bytes = saved.bytes,
                    "Result saved"
                );
            }
            Err(err) => {
                self.metrics.record_rejected(err, latency);
                if err.is_server_error() {
                    error!(
                        status = err.status_code(),
                        reason = err.reason(),
                        error = %err,
                        "Failed to persist result"
                    );
                } else {
                    warn!(
                        status = err.status_code(),
                        reason = err.reason(),
                        error = %err,
                        "Rejected save request"
                    );
                }
            }
        }
        outcome
    }

    fn process<R: Read>(
        &self,
        method: &str,
        content_length: Option<u64>,
        body: R,
    ) -> Result<SavedResult, IngestError> {
        validator::check_method(method)?;
        let raw = validator::read_body(body, content_length, self.max_body_bytes)?;
        let request = validator::parse_request(&raw)?;

        self.store.ensure_dir()?;
        let path = naming::result_path(self.store.dir(), request.m, &self.clock.now());
        self.store.write(&path, &raw)?;

        Ok(SavedResult {
            path,
            m: request.m,
            bytes: raw.len(),
        })
    }
}
