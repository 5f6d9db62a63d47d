//! Gzip response wrapper module
//!
//! Decorates a response sink so every body byte flows through a gzip
//! encoder, while status and header writes pass straight through. The
//! downstream handler writes as if producing a plain response.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{self, Write};

use super::sink::ResponseSink;

/// Every response is declared cacheable for one year.
pub const CACHE_CONTROL: &str = "max-age=31536000";

/// Applied unconditionally; clients are not asked whether they accept gzip.
pub const CONTENT_ENCODING: &str = "gzip";

/// Bridges the sink's write capability into `io::Write` for the encoder.
struct SinkWriter<'a> {
    sink: &'a mut dyn ResponseSink,
}

impl Write for SinkWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sink.write(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Sink decorator owning the gzip encoder for one response.
///
/// Creating it stamps the cache and encoding headers on the wrapped sink.
/// The encoder is finished exactly once: either explicitly via [`finish`],
/// or on drop for paths that never reach it.
///
/// [`finish`]: GzipSink::finish
pub struct GzipSink<'a> {
    encoder: Option<GzEncoder<SinkWriter<'a>>>,
}

impl<'a> GzipSink<'a> {
    pub fn new(sink: &'a mut dyn ResponseSink) -> Self {
        sink.insert_header("Cache-Control", CACHE_CONTROL);
        sink.insert_header("Content-Encoding", CONTENT_ENCODING);
        Self {
            encoder: Some(GzEncoder::new(
                SinkWriter { sink },
                Compression::default(),
            )),
        }
    }

    /// Flush buffered bytes and write the gzip trailer.
    pub fn finish(mut self) -> io::Result<()> {
        match self.encoder.take() {
            Some(encoder) => encoder.finish().map(|_| ()),
            None => Ok(()),
        }
    }
}

impl Drop for GzipSink<'_> {
    fn drop(&mut self) {
        if let Some(encoder) = self.encoder.take() {
            let _ = encoder.finish();
        }
    }
}

impl ResponseSink for GzipSink<'_> {
    fn set_status(&mut self, status: u16) {
        if let Some(encoder) = self.encoder.as_mut() {
            encoder.get_mut().sink.set_status(status);
        }
    }

    fn insert_header(&mut self, name: &'static str, value: &str) {
        if let Some(encoder) = self.encoder.as_mut() {
            encoder.get_mut().sink.insert_header(name, value);
        }
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<()> {
        match self.encoder.as_mut() {
            Some(encoder) => encoder.write_all(buf),
            None => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "gzip encoder already finished",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::sink::BufferSink;
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn decompress(data: &[u8]) -> Vec<u8> {
        let mut decoder = GzDecoder::new(data);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn body_round_trips_through_gzip() {
        let mut sink = BufferSink::new();
        let mut gz = GzipSink::new(&mut sink);
        gz.write(b"hello ").unwrap();
        gz.write(b"compressed world").unwrap();
        gz.finish().unwrap();

        assert_eq!(decompress(sink.body()), b"hello compressed world");
    }

    #[test]
    fn wrapper_stamps_cache_and_encoding_headers() {
        let mut sink = BufferSink::new();
        let gz = GzipSink::new(&mut sink);
        gz.finish().unwrap();

        let response = sink.into_response(false);
        assert_eq!(response.headers()["Cache-Control"], "max-age=31536000");
        assert_eq!(response.headers()["Content-Encoding"], "gzip");
    }

    #[test]
    fn status_and_headers_pass_through_uncompressed() {
        let mut sink = BufferSink::new();
        let mut gz = GzipSink::new(&mut sink);
        gz.set_status(404);
        gz.insert_header("Content-Type", "text/plain; charset=utf-8");
        gz.write(b"404 Not Found").unwrap();
        gz.finish().unwrap();

        assert_eq!(decompress(sink.body()), b"404 Not Found");
        assert_eq!(sink.into_response(false).status(), 404);
    }

    #[test]
    fn empty_body_is_still_a_valid_gzip_stream() {
        let mut sink = BufferSink::new();
        GzipSink::new(&mut sink).finish().unwrap();
        assert!(!sink.body().is_empty());
        assert_eq!(decompress(sink.body()), b"");
    }

    #[test]
    fn drop_finishes_an_unfinished_encoder() {
        let mut sink = BufferSink::new();
        {
            let mut gz = GzipSink::new(&mut sink);
            gz.write(b"partial write before failure").unwrap();
            // Dropped without finish(), as when the downstream errors out.
        }
        assert_eq!(decompress(sink.body()), b"partial write before failure");
    }

    #[test]
    fn finish_then_drop_closes_exactly_once() {
        let mut finished = Vec::new();
        let mut sink = BufferSink::new();
        {
            let mut gz = GzipSink::new(&mut sink);
            gz.write(b"payload").unwrap();
            gz.finish().unwrap();
        }
        finished.extend_from_slice(sink.body());

        // A second trailer would corrupt the stream; decoding the whole
        // buffer proves the encoder was closed exactly once.
        assert_eq!(decompress(&finished), b"payload");

        let mut decoder = GzDecoder::new(&finished[..]);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"payload");
    }
}
