//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, context
//! extraction, and composition of the gzip wrapper around the static file
//! pipeline. Every response leaves through the wrapper, whatever its status.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppState;
use crate::handler::static_files;
use crate::http::{response, BufferSink, GzipSink};
use crate::logger::{self, AccessLogEntry};

/// Per-request context handed through the serving pipeline.
pub struct RequestContext<'a> {
    /// Request path with the route prefix stripped.
    pub path: &'a str,
    pub is_head: bool,
}

/// Main entry point for HTTP request handling.
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let is_head = method == Method::HEAD;
    let access_log = state.config.logging.access_log;

    let ctx = RequestContext {
        path: uri.path().trim_start_matches('/'),
        is_head,
    };

    let response = match method {
        Method::GET | Method::HEAD => respond(&ctx, &state).await,
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            respond_method_not_allowed(&ctx)
        }
    };

    if access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            uri.path().to_string(),
        );
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = version_label(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = content_length(&response);
        entry.referer = header_string(&req, "referer");
        entry.user_agent = header_string(&req, "user-agent");
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Run the file-serving pipeline with its output wrapped in gzip.
///
/// The encoder is finished whether or not the downstream succeeded; a
/// failure here means the response is truncated, which is all the transport
/// layer would make of it anyway.
async fn respond(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let mut sink = BufferSink::new();
    let served = {
        let mut gz = GzipSink::new(&mut sink);
        let served = static_files::serve_path(
            &state.opener,
            ctx,
            &state.config.static_files.index_files,
            &mut gz,
        )
        .await;
        served.and(gz.finish())
    };
    if let Err(err) = served {
        logger::log_error(&format!(
            "Response aborted after {} bytes: {err}",
            sink.body().len()
        ));
    }
    sink.into_response(ctx.is_head)
}

fn respond_method_not_allowed(ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
    let mut sink = BufferSink::new();
    let written = {
        let mut gz = GzipSink::new(&mut sink);
        response::write_method_not_allowed(&mut gz).and(gz.finish())
    };
    if let Err(err) = written {
        logger::log_error(&format!("Response aborted: {err}"));
    }
    sink.into_response(ctx.is_head)
}

fn version_label(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else {
        "1.1"
    }
}

fn content_length(response: &Response<Full<Bytes>>) -> usize {
    response
        .headers()
        .get("Content-Length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

fn header_string(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}
