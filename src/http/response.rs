//! HTTP error representation module
//!
//! Writes status-code responses into a sink, decoupled from how the sink
//! delivers them. Bodies written here flow through whatever decorators wrap
//! the sink, so error responses are compressed like everything else.

use std::io;

use super::sink::ResponseSink;

/// Write a 404 Not Found response.
pub fn write_not_found(sink: &mut dyn ResponseSink) -> io::Result<()> {
    write_plain(sink, 404, "404 Not Found")
}

/// Write a 403 Forbidden response.
pub fn write_forbidden(sink: &mut dyn ResponseSink) -> io::Result<()> {
    write_plain(sink, 403, "403 Forbidden")
}

/// Write a 500 Internal Server Error response.
pub fn write_server_error(sink: &mut dyn ResponseSink) -> io::Result<()> {
    write_plain(sink, 500, "500 Internal Server Error")
}

/// Write a 405 Method Not Allowed response.
pub fn write_method_not_allowed(sink: &mut dyn ResponseSink) -> io::Result<()> {
    sink.set_status(405);
    sink.insert_header("Allow", "GET, HEAD");
    sink.insert_header("Content-Type", "text/plain; charset=utf-8");
    sink.write(b"405 Method Not Allowed")
}

fn write_plain(sink: &mut dyn ResponseSink, status: u16, body: &str) -> io::Result<()> {
    sink.set_status(status);
    sink.insert_header("Content-Type", "text/plain; charset=utf-8");
    sink.write(body.as_bytes())
}
