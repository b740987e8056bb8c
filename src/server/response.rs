use crate::error::IngestError;
use may_minihttp::Response;
use serde::Serialize;

const TEXT_PLAIN: &str = "Content-Type: text/plain; charset=utf-8";
const APPLICATION_JSON: &str = "Content-Type: application/json";
const PROMETHEUS_TEXT: &str = "Content-Type: text/plain; version=0.0.4";

pub(crate) fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "",
    }
}

/// Plain-text response with a fixed body.
pub fn write_text(res: &mut Response, status: u16, body: &'static str) {
    res.status_code(status as usize, status_reason(status));
    res.header(TEXT_PLAIN);
    res.body(body);
}

/// JSON response; falls back to a plain 500 if `body` cannot be serialized.
pub fn write_json<T: Serialize>(res: &mut Response, status: u16, body: &T) {
    match serde_json::to_vec(body) {
        Ok(bytes) => {
            res.status_code(status as usize, status_reason(status));
            res.header(APPLICATION_JSON);
            res.body_vec(bytes);
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize response body");
            write_text(res, 500, "Server error");
        }
    }
}

/// Prometheus text exposition body.
pub fn write_metrics(res: &mut Response, body: String) {
    res.status_code(200, status_reason(200));
    res.header(PROMETHEUS_TEXT);
    res.body_vec(body.into_bytes());
}

/// 405 advertising the one method the endpoint accepts.
pub fn write_method_not_allowed(res: &mut Response, allow: &'static str) {
    res.status_code(405, status_reason(405));
    res.header(allow);
    res.header(TEXT_PLAIN);
    res.body("Method not allowed");
}

/// Map an ingest rejection to its status and short public message.
pub fn write_ingest_error(res: &mut Response, err: &IngestError) {
    match err {
        IngestError::MethodNotAllowed { .. } => write_method_not_allowed(res, "Allow: POST"),
        _ => write_text(res, err.status_code(), err.public_message()),
    }
}
