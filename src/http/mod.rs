//! HTTP protocol layer module
//!
//! Base functionality shared by the serving pipeline: content types, the
//! response sink abstraction, the gzip wrapper, and status-code writers.

pub mod gzip;
pub mod mime;
pub mod response;
pub mod sink;

// Re-export commonly used types
pub use gzip::GzipSink;
pub use sink::{BufferSink, ResponseSink};
