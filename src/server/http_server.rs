//! Listener startup for the receiver.

use super::service::{IngestService, SAVE_PATH};
use crate::handler::SaveHandler;
use crate::runtime_config::ServiceConfig;
use may::coroutine::JoinHandle;
use may_minihttp::HttpServerWithHeaders;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::thread;
use tracing::info;

/// Header slots per request; clients behind a proxy or gateway send more than
/// `may_minihttp`'s default 16.
const MAX_HEADERS: usize = 32;

/// A running receiver.
pub struct ServerHandle {
    addr: SocketAddr,
    coroutine: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the listener is bound to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Block until the listener coroutine completes.
    ///
    /// The listener runs until the process is stopped, so in practice this
    /// only returns if it panicked.
    ///
    /// # Errors
    ///
    /// Returns the panic payload if the listener coroutine panicked.
    pub fn join(self) -> thread::Result<()> {
        self.coroutine.join()
    }

    /// Give up the handle and take the listener coroutine itself.
    pub fn into_coroutine(self) -> JoinHandle<()> {
        self.coroutine
    }
}

/// Bind `config.bind_addr` and serve `handler` on it.
///
/// Logs the listen port and the ingest URL once the listener is up.
///
/// # Errors
///
/// Returns an error if the address does not resolve or cannot be bound.
pub fn start(config: &ServiceConfig, handler: SaveHandler) -> io::Result<ServerHandle> {
    let addr = resolve(&config.bind_addr)?;
    let results_dir = handler.store().dir().display().to_string();

    let coroutine =
        HttpServerWithHeaders::<_, MAX_HEADERS>(IngestService::new(handler)).start(addr)?;

    info!(
        bind = %addr,
        results_dir = %results_dir,
        stack_size = config.stack_size,
        "xubit receiver running on :{}",
        config.port
    );
    info!(
        "POST your result to http://localhost:{}{}",
        config.port, SAVE_PATH
    );
    Ok(ServerHandle { addr, coroutine })
}

fn resolve(bind_addr: &str) -> io::Result<SocketAddr> {
    bind_addr.to_socket_addrs()?.next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("{bind_addr} resolves to no address"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_bind_addr() {
        let addr = resolve("127.0.0.1:8080").unwrap();
        assert_eq!(addr.port(), 8080);
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn test_resolve_rejects_malformed_addr() {
        assert!(resolve("127.0.0.1").is_err());
        assert!(resolve("127.0.0.1:http").is_err());
    }
}
