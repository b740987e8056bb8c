//! # xubit-receiver
//!
//! A small HTTP receiver that accepts JSON computation results and persists
//! each one, byte for byte, as a timestamped file on local disk. It runs on
//! the `may` coroutine runtime through `may_minihttp`: every connection gets
//! its own coroutine, and handlers share nothing but the filesystem and a set
//! of atomic counters.
//!
//! ## Architecture
//!
//! - **[`validator`]** - method, size cap and JSON decode checks
//! - **[`naming`]** - derived file names (`xubit_m<M>_<YYYY-MM-DD_HH-MM-SS>.json`)
//! - **[`storage`]** - results directory and file writes
//! - **[`handler`]** - the ingest pipeline composing the three above
//! - **[`server`]** - `may_minihttp` service, routing and response writing
//! - **[`metrics`]** - counters exposed on `GET /metrics`
//! - **[`logging`]**, **[`runtime_config`]**, **[`cli`]** - process wiring
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as IngestService<br/>(may_minihttp)
//!     participant Handler as SaveHandler
//!     participant FS as File System
//!
//!     Client->>Server: POST /save {"m": 3, ...}
//!     Server->>Handler: handle(method, content_length, body)
//!     Handler->>Handler: check method, read ≤ 10 MiB, decode
//!     alt Rejected
//!         Handler-->>Client: 405 / 400 plain text
//!     end
//!     Handler->>FS: create results/ (idempotent)
//!     Handler->>FS: write raw body to xubit_m3_<now>.json
//!     alt Storage failure
//!         Handler-->>Client: 500 plain text
//!     end
//!     Handler-->>Client: 200 {"status":true}
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::PathBuf;
//! use xubit_receiver::runtime_config::ServiceConfig;
//! use xubit_receiver::{server, ResultStore, SaveHandler};
//!
//! let config = ServiceConfig {
//!     bind_addr: "0.0.0.0:8080".to_string(),
//!     port: 8080,
//!     results_dir: PathBuf::from("results"),
//!     stack_size: 0x4000,
//! };
//! let handler = SaveHandler::new(ResultStore::new(&config.results_dir));
//! let handle = server::start(&config, handler).expect("bind");
//! handle.join().expect("server coroutine panicked");
//! ```
//!
//! ```bash
//! curl -X POST -H "Content-Type: application/json" \
//!   -d '{"timestamp":"t","m":3,"full_solution_response":{"x":1},"status":"done"}' \
//!   http://localhost:8080/save
//! # {"status":true}
//! ```
//!
//! Two results with the same `m` arriving within the same second map to the
//! same file name; the later one replaces the earlier one.

pub mod cli;
pub mod error;
pub mod handler;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod naming;
pub mod runtime_config;
pub mod server;
pub mod storage;
pub mod validator;

pub use error::IngestError;
pub use handler::{SaveHandler, SavedResult};
pub use model::{SaveRequest, SaveResponse};
pub use naming::{Clock, FixedClock, SystemClock};
pub use storage::ResultStore;
