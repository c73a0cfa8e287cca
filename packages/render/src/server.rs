//! Disposable HTTP server for canvas snapshots
//!
//! This server is NOT a daemon. It:
//! - Starts on a random port
//! - Serves one HTML document
//! - Shuts down after the first request (or the timeout)

use crate::{RenderError, Result};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Response, Server};

/// Disposable server that serves a single HTML document
pub struct RenderServer {
    server: Server,
    port: u16,
    html_content: String,
}

impl RenderServer {
    /// Create a new server on a random available port
    pub fn new(html_content: String) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();

        let server = Server::from_listener(listener, None)
            .map_err(|e| RenderError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string())))?;

        Ok(Self {
            server,
            port,
            html_content,
        })
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Answer at most one request, waiting up to `timeout`
    pub fn serve_once(&self, timeout: Duration) -> Result<()> {
        if let Ok(Some(request)) = self.server.recv_timeout(timeout) {
            let header = Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=UTF-8"[..])
                .map_err(|_| RenderError::Capture("invalid content-type header".to_string()))?;
            let response = Response::from_string(self.html_content.as_str()).with_header(header);

            request.respond(response)?;
        }

        Ok(())
    }
}

/// Start a disposable server and return its URL
///
/// The server runs in a background thread and will accept one request.
pub fn start_disposable_server(html: String) -> Result<(String, thread::JoinHandle<()>)> {
    let server = RenderServer::new(html)?;
    let url = server.url();

    let handle = thread::spawn(move || {
        let _ = server.serve_once(Duration::from_secs(30));
    });

    Ok((url, handle))
}
