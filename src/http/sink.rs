//! Response sink module
//!
//! The write side of one in-flight response, reduced to the two capabilities
//! handlers need: header/status access and body bytes. Decorators can
//! redirect one capability without touching the other.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io;

use crate::logger;

/// Write side of a single response.
pub trait ResponseSink: Send {
    fn set_status(&mut self, status: u16);
    fn insert_header(&mut self, name: &'static str, value: &str);
    fn write(&mut self, buf: &[u8]) -> io::Result<()>;
}

/// Accumulates status, headers and body, then converts into a hyper
/// response once the request's handling is complete.
pub struct BufferSink {
    status: u16,
    headers: Vec<(&'static str, String)>,
    body: Vec<u8>,
}

impl BufferSink {
    pub const fn new() -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Bytes accumulated so far (compressed, when a gzip decorator wraps
    /// this sink).
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Build the final response. HEAD requests get the same status line and
    /// headers with an empty body.
    pub fn into_response(self, is_head: bool) -> Response<Full<Bytes>> {
        let content_length = self.body.len();
        let mut builder = Response::builder().status(self.status);
        for (name, value) in &self.headers {
            builder = builder.header(*name, value);
        }
        let body = if is_head {
            Bytes::new()
        } else {
            Bytes::from(self.body)
        };
        builder
            .header("Content-Length", content_length)
            .body(Full::new(body))
            .unwrap_or_else(|e| {
                logger::log_error(&format!("Failed to build response: {e}"));
                Response::new(Full::new(Bytes::new()))
            })
    }
}

impl Default for BufferSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseSink for BufferSink {
    fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    fn insert_header(&mut self, name: &'static str, value: &str) {
        self.headers.push((name, value.to_string()));
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<()> {
        self.body.extend_from_slice(buf);
        Ok(())
    }
}
