#![allow(dead_code)]

pub mod test_server {
    use std::io::{self, Read, Write};
    use std::net::{SocketAddr, TcpListener, TcpStream};
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::Once;
    use std::thread;
    use std::time::{Duration, Instant};
    use xubit_receiver::runtime_config::ServiceConfig;
    use xubit_receiver::server::{self, ServerHandle};
    use xubit_receiver::{Clock, ResultStore, SaveHandler};

    /// Ensures May coroutines are configured only once
    static MAY_INIT: Once = Once::new();

    const TEST_STACK_SIZE: usize = 0x8000;

    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(TEST_STACK_SIZE);
        });
    }

    /// Receiver started for one test; cancel it with [`TestServer::stop`].
    pub struct TestServer {
        handle: ServerHandle,
    }

    impl TestServer {
        pub fn addr(&self) -> SocketAddr {
            self.handle.addr()
        }

        /// Poll the listen address until it accepts (50 attempts x 5ms).
        fn wait_ready(&self) -> io::Result<()> {
            for _ in 0..50 {
                if TcpStream::connect(self.addr()).is_ok() {
                    return Ok(());
                }
                thread::sleep(Duration::from_millis(5));
            }
            Err(io::Error::new(io::ErrorKind::TimedOut, "server not ready"))
        }

        /// Cancel the listener coroutine and wait for it to finish.
        pub fn stop(self) {
            let coroutine = self.handle.into_coroutine();
            // SAFETY: may marks coroutine cancellation unsafe. The handle is
            // owned here and nothing observes the coroutine afterwards.
            #[allow(unsafe_code)]
            unsafe {
                coroutine.coroutine().cancel();
            }
            // A cancelled coroutine reports itself as panicked.
            coroutine.join().ok();
        }
    }

    /// Start a receiver writing into `results_dir` on an ephemeral local port.
    pub fn start_service(results_dir: &Path, clock: Option<Arc<dyn Clock>>) -> TestServer {
        setup_may_runtime();
        let mut handler = SaveHandler::new(ResultStore::new(results_dir));
        if let Some(clock) = clock {
            handler = handler.with_clock(clock);
        }
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = ServiceConfig {
            bind_addr: addr.to_string(),
            port: addr.port(),
            results_dir: results_dir.to_path_buf(),
            stack_size: TEST_STACK_SIZE,
        };
        let running = TestServer {
            handle: server::start(&config, handler).unwrap(),
        };
        running.wait_ready().unwrap();
        running
    }

    /// Parsed HTTP/1.1 response.
    #[derive(Debug)]
    pub struct RawResponse {
        pub status: u16,
        pub headers: Vec<(String, String)>,
        pub body: Vec<u8>,
    }

    impl RawResponse {
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }

        pub fn body_text(&self) -> String {
            String::from_utf8_lossy(&self.body).to_string()
        }
    }

    /// Send one request on a fresh connection.
    pub fn send(addr: SocketAddr, method: &str, path: &str, body: &[u8]) -> RawResponse {
        let mut stream = TcpStream::connect(addr).unwrap();
        send_on(&mut stream, method, path, body)
    }

    /// Send one request on an open connection and read until the declared
    /// response body has arrived, leaving the connection usable.
    pub fn send_on(stream: &mut TcpStream, method: &str, path: &str, body: &[u8]) -> RawResponse {
        let head = format!(
            "{method} {path} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n",
            body.len()
        );
        stream.write_all(head.as_bytes()).unwrap();
        stream.write_all(body).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_millis(100)))
            .unwrap();

        let deadline = Instant::now() + Duration::from_secs(10);
        let mut buf = Vec::new();
        loop {
            if let Some(resp) = try_parse(&buf) {
                return resp;
            }
            assert!(Instant::now() < deadline, "timed out waiting for response");
            let mut tmp = [0u8; 4096];
            match stream.read(&mut tmp) {
                Ok(0) => break,
                Ok(n) => buf.extend_from_slice(&tmp[..n]),
                Err(ref e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut => {}
                Err(e) => panic!("read error: {:?}", e),
            }
        }
        try_parse(&buf).expect("incomplete response")
    }

    fn try_parse(buf: &[u8]) -> Option<RawResponse> {
        let split = buf.windows(4).position(|w| w == b"\r\n\r\n")?;
        let head = String::from_utf8_lossy(&buf[..split]).to_string();
        let mut lines = head.split("\r\n");
        let status = lines
            .next()?
            .split_whitespace()
            .nth(1)?
            .parse()
            .ok()?;
        let headers: Vec<(String, String)> = lines
            .filter_map(|l| {
                let (k, v) = l.split_once(':')?;
                Some((k.trim().to_string(), v.trim().to_string()))
            })
            .collect();
        let len: usize = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.parse().ok())
            .unwrap_or(0);
        let body = &buf[split + 4..];
        if body.len() < len {
            return None;
        }
        Some(RawResponse {
            status,
            headers,
            body: body[..len].to_vec(),
        })
    }
}
