use super::request::RequestHead;
use super::response::{
    write_ingest_error, write_json, write_method_not_allowed, write_metrics, write_text,
};
use crate::handler::SaveHandler;
use crate::model::SaveResponse;
use may_minihttp::{HttpService, Request, Response};
use std::io;
use tracing::debug;

/// Ingest endpoint.
pub const SAVE_PATH: &str = "/save";
/// Liveness endpoint.
pub const HEALTH_PATH: &str = "/health";
/// Prometheus scrape endpoint.
pub const METRICS_PATH: &str = "/metrics";

/// Routing table of the receiver, one clone per connection coroutine.
#[derive(Clone)]
pub struct IngestService {
    handler: SaveHandler,
}

impl IngestService {
    pub fn new(handler: SaveHandler) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &SaveHandler {
        &self.handler
    }
}

/// Liveness check: `200 OK` with body `OK` for any method, body ignored.
pub fn health_endpoint(res: &mut Response) -> io::Result<()> {
    write_text(res, 200, "OK");
    Ok(())
}

/// Ingest counters in Prometheus text format.
pub fn metrics_endpoint(res: &mut Response, handler: &SaveHandler) -> io::Result<()> {
    write_metrics(res, handler.metrics().render());
    Ok(())
}

/// `POST /save`: persist the body and answer `{"status":true}`.
///
/// Whatever the handler left unread (a rejected method, an oversized body) is
/// drained afterwards so the next request on a keep-alive connection starts
/// at a request line.
pub fn save_endpoint(
    req: Request,
    res: &mut Response,
    head: &RequestHead,
    handler: &SaveHandler,
) -> io::Result<()> {
    let mut body = req.body();
    match handler.handle(&head.method, head.content_length, &mut body) {
        Ok(_) => write_json(res, 200, &SaveResponse::saved()),
        Err(err) => write_ingest_error(res, &err),
    }
    match io::copy(&mut body, &mut io::sink()) {
        Ok(0) => {}
        Ok(skipped) => debug!(skipped, "Discarded unread request body"),
        Err(e) => debug!(error = %e, "Failed to discard unread request body"),
    }
    Ok(())
}

impl HttpService for IngestService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let head = RequestHead::from_request(&req);

        match head.path.as_str() {
            SAVE_PATH => save_endpoint(req, res, &head, &self.handler),
            HEALTH_PATH => health_endpoint(res),
            METRICS_PATH if head.method == "GET" => metrics_endpoint(res, &self.handler),
            METRICS_PATH => {
                write_method_not_allowed(res, "Allow: GET");
                Ok(())
            }
            _ => {
                write_text(res, 404, "Not Found");
                Ok(())
            }
        }
    }
}
