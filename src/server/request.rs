use may_minihttp::Request;
use tracing::debug;

/// The parts of a request needed for routing, taken before the body is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    /// HTTP method exactly as sent (methods are case-sensitive)
    pub method: String,
    /// Request path with any query string removed
    pub path: String,
    /// Declared body length, if the client sent a parseable `Content-Length`
    pub content_length: Option<u64>,
}

impl RequestHead {
    /// Extract method, path and `Content-Length` from a `may_minihttp::Request`.
    pub fn from_request(req: &Request) -> Self {
        let method = req.method().to_string();
        let path = strip_query(req.path()).to_string();
        let content_length = req
            .headers()
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case("content-length"))
            .and_then(|h| parse_content_length(h.value));

        debug!(
            method = %method,
            path = %path,
            content_length = ?content_length,
            "HTTP request parsed"
        );

        Self {
            method,
            path,
            content_length,
        }
    }
}

/// Drop everything from the first `?`.
pub fn strip_query(raw_path: &str) -> &str {
    raw_path.split('?').next().unwrap_or("/")
}

/// Parse a `Content-Length` header value; anything malformed is treated as absent.
pub fn parse_content_length(value: &[u8]) -> Option<u64> {
    std::str::from_utf8(value).ok()?.trim().parse().ok()
}
