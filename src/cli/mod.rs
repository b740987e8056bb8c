//! # CLI Module
//!
//! Command-line flags for the `xubit-receiver` binary.
//!
//! ## Options
//!
//! - `--host <HOST>` - bind host (env `XUBIT_HOST`, default `0.0.0.0`)
//! - `--port <PORT>` - listen port, overrides the `PORT` environment variable
//! - `--results-dir <DIR>` - where result files go (env `XUBIT_RESULTS_DIR`,
//!   default `results`)
//!
//! ## Examples
//!
//! ```bash
//! # Defaults: 0.0.0.0:8080, ./results
//! xubit-receiver
//!
//! # Port from the environment, results somewhere else
//! PORT=9000 xubit-receiver --results-dir /var/lib/xubit/results
//! ```

mod commands;


pub use commands::Cli;
