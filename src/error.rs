use std::fmt;
use std::io;
use std::path::PathBuf;

/// Why a `/save` request was turned away.
///
/// Every variant is terminal for its request: nothing is retried and no file
/// is left behind by a rejection that happens before the write step. The
/// variant decides the HTTP status and the short message returned to the
/// caller; the detailed cause only goes to the log.
#[derive(Debug)]
pub enum IngestError {
    /// The request used a method other than `POST`.
    MethodNotAllowed {
        /// The method the client sent
        method: String,
    },
    /// The body is larger than the size cap.
    PayloadTooLarge {
        /// The configured ceiling in bytes
        limit: usize,
    },
    /// The body could not be read from the connection.
    BodyRead(io::Error),
    /// The body is not a JSON document of the expected shape.
    InvalidJson(serde_json::Error),
    /// The results directory could not be created.
    CreateDir {
        /// Directory that was being created
        path: PathBuf,
        /// Underlying filesystem error
        source: io::Error,
    },
    /// The result file could not be written.
    WriteFile {
        /// File that was being written
        path: PathBuf,
        /// Underlying filesystem error
        source: io::Error,
    },
}

impl IngestError {
    /// HTTP status code for this rejection.
    pub fn status_code(&self) -> u16 {
        match self {
            IngestError::MethodNotAllowed { .. } => 405,
            IngestError::PayloadTooLarge { .. }
            | IngestError::BodyRead(_)
            | IngestError::InvalidJson(_) => 400,
            IngestError::CreateDir { .. } | IngestError::WriteFile { .. } => 500,
        }
    }

    /// Short plain-text message sent back to the client.
    ///
    /// Server-side failures deliberately carry no detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            IngestError::MethodNotAllowed { .. } => "Method not allowed",
            IngestError::PayloadTooLarge { .. } => "Request body too large",
            IngestError::BodyRead(_) => "Failed to read body",
            IngestError::InvalidJson(_) => "Invalid JSON",
            IngestError::CreateDir { .. } => "Server error",
            IngestError::WriteFile { .. } => "Failed to save",
        }
    }

    /// Stable label used for the `reason` metric dimension.
    pub fn reason(&self) -> &'static str {
        match self {
            IngestError::MethodNotAllowed { .. } => "method",
            IngestError::PayloadTooLarge { .. } => "too_large",
            IngestError::BodyRead(_) => "read",
            IngestError::InvalidJson(_) => "invalid_json",
            IngestError::CreateDir { .. } | IngestError::WriteFile { .. } => "storage",
        }
    }

    /// True for failures caused by the server environment rather than the request.
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::MethodNotAllowed { method } => {
                write!(f, "method {} not allowed, only POST is accepted", method)
            }
            IngestError::PayloadTooLarge { limit } => {
                write!(f, "request body exceeds the {} byte limit", limit)
            }
            IngestError::BodyRead(e) => write!(f, "failed to read request body: {}", e),
            IngestError::InvalidJson(e) => write!(f, "invalid JSON body: {}", e),
            IngestError::CreateDir { path, source } => write!(
                f,
                "failed to create results directory {}: {}",
                path.display(),
                source
            ),
            IngestError::WriteFile { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::BodyRead(e) => Some(e),
            IngestError::InvalidJson(e) => Some(e),
            IngestError::CreateDir { source, .. } | IngestError::WriteFile { source, .. } => {
                Some(source)
            }
            IngestError::MethodNotAllowed { .. } | IngestError::PayloadTooLarge { .. } => None,
        }
    }
}
