pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{start, ServerHandle};
pub use request::RequestHead;
pub use service::{health_endpoint, IngestService, HEALTH_PATH, METRICS_PATH, SAVE_PATH};
