//! Minimal canned-response HTTP server for exercising the blocking clients.
//!
//! Each test registers the paths it expects and gets back a base URL to
//! point the client at. Unknown paths answer 404. Binding and serving are
//! split so routes can embed the server's own base URL (the Azure log
//! listing references absolute segment URLs). The server thread lives for
//! the rest of the test process, which is fine at test scale.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

/// Canned response: status code and body (served as application/json).
pub type Route = (u16, String);

pub struct TestServer {
    listener: Option<TcpListener>,
    pub base_url: String,
}

impl TestServer {
    /// Bind to an ephemeral port without serving yet, so the base URL is
    /// known before the routes are built.
    pub fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
        let addr = listener.local_addr().expect("test server addr");
        Self { listener: Some(listener), base_url: format!("http://{addr}") }
    }

    /// Start answering requests on a background thread.
    pub fn run(&mut self, routes: HashMap<String, Route>) {
        let listener = self.listener.take().expect("server already running");
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { return };
                let Some(path) = read_request_path(&mut stream) else { continue };
                let (status, body) =
                    routes.get(&path).cloned().unwrap_or((404, String::from("{}")));
                let response = format!(
                    "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    reason(status),
                    body.len(),
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
    }
}

/// Bind and serve in one step, for tests whose routes don't self-reference.
pub fn serve(routes: HashMap<String, Route>) -> TestServer {
    let mut server = TestServer::bind();
    server.run(routes);
    server
}

/// Read request headers and return the path from the request line.
fn read_request_path(stream: &mut TcpStream) -> Option<String> {
    let mut buf = [0u8; 1024];
    let mut request = Vec::new();
    loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        request.extend_from_slice(&buf[..n]);
        if request.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    let text = String::from_utf8_lossy(&request);
    let mut parts = text.lines().next()?.split_whitespace();
    let _method = parts.next()?;
    parts.next().map(|p| p.to_string())
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        403 => "Forbidden",
        404 => "Not Found",
        _ => "Internal Server Error",
    }
}
