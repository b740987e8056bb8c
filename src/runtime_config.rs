//! # Runtime Configuration Module
//!
//! Environment-driven settings read once at startup.
//!
//! ## Environment Variables
//!
//! ### `PORT`
//!
//! Listen port. Unset or empty means `8080`. Any other value, whitespace
//! included, must parse as a port number; a bad value stops the process at
//! startup.
//!
//! ### `XUBIT_STACK_SIZE`
//!
//! Stack size for the connection coroutines. Accepts decimal (`16384`) or
//! hexadecimal (`0x4000`). Default: `0x4000` (16 KB). Request handling only
//! buffers the body on the heap, so the default is plenty.
//!
//! ## Usage
//!
//! ```no_run
//! use xubit_receiver::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env().expect("valid PORT");
//! println!("Listening on port {}", config.port);
//! ```

use crate::cli::Cli;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Port used when `PORT` is unset or empty.
pub const DEFAULT_PORT: u16 = 8080;

/// Coroutine stack size used when `XUBIT_STACK_SIZE` is unset or unparseable.
pub const DEFAULT_STACK_SIZE: usize = 0x4000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Listen port
    pub port: u16,
    /// Stack size for coroutines in bytes
    pub stack_size: usize,
}

impl RuntimeConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Fails if `PORT` is set to something that is not a port number.
    pub fn from_env() -> Result<Self> {
        Self::from_values(
            env::var("PORT").ok().as_deref(),
            env::var("XUBIT_STACK_SIZE").ok().as_deref(),
        )
    }

    /// Build from raw variable values, `None` meaning unset.
    pub fn from_values(port: Option<&str>, stack_size: Option<&str>) -> Result<Self> {
        Ok(Self {
            port: resolve_port(port)?,
            stack_size: stack_size.map_or(DEFAULT_STACK_SIZE, parse_stack_size),
        })
    }
}

/// `PORT` semantics: empty or missing falls back to [`DEFAULT_PORT`].
///
/// Any other value is taken as given, so whitespace is an invalid port rather
/// than a request for the default.
pub fn resolve_port(value: Option<&str>) -> Result<u16> {
    match value {
        None | Some("") => Ok(DEFAULT_PORT),
        Some(v) => v
            .parse()
            .with_context(|| format!("PORT must be a port number, got {v:?}")),
    }
}

fn parse_stack_size(val: &str) -> usize {
    if let Some(hex) = val.strip_prefix("0x") {
        usize::from_str_radix(hex, 16).unwrap_or(DEFAULT_STACK_SIZE)
    } else {
        val.parse().unwrap_or(DEFAULT_STACK_SIZE)
    }
}

/// Everything the service needs to start, merged from CLI flags and the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// `host:port` to bind
    pub bind_addr: String,
    /// Port actually used (CLI `--port` wins over `PORT`)
    pub port: u16,
    /// Where result files are written
    pub results_dir: PathBuf,
    /// Coroutine stack size in bytes
    pub stack_size: usize,
}

impl ServiceConfig {
    pub fn new(cli: &Cli, runtime: &RuntimeConfig) -> Self {
        let port = cli.port.unwrap_or(runtime.port);
        Self {
            bind_addr: format!("{}:{}", cli.host, port),
            port,
            results_dir: cli.results_dir.clone(),
            stack_size: runtime.stack_size,
        }
    }
}
