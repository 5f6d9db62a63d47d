//! Static file serving module
//!
//! The generic serving primitive: resolves a request path through the
//! configured opener and streams the result into the response sink. The
//! sink decides what actually happens to the bytes; this module never
//! knows whether it is writing into a compressor.

use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::handler::router::RequestContext;
use crate::http::{mime, response, sink::ResponseSink};
use crate::logger;
use crate::resolver::{FileOpener, ListEntry, Opened};

const READ_CHUNK: usize = 64 * 1024;

/// Serve `ctx.path` from `opener` into `sink`.
///
/// Resolution failures become status-code responses written into the sink;
/// an `Err` return means the sink itself failed mid-response.
pub async fn serve_path<O: FileOpener>(
    opener: &O,
    ctx: &RequestContext<'_>,
    index_files: &[String],
    sink: &mut dyn ResponseSink,
) -> io::Result<()> {
    let opened = match opener.open(ctx.path).await {
        Ok(opened) => opened,
        Err(err) => return write_error(sink, &err),
    };

    if opened.is_dir {
        return serve_directory(opener, ctx, index_files, sink).await;
    }
    stream_file(opened, ctx.is_head, sink).await
}

/// Directory requests try the configured index files first, then fall back
/// to a listing page.
async fn serve_directory<O: FileOpener>(
    opener: &O,
    ctx: &RequestContext<'_>,
    index_files: &[String],
    sink: &mut dyn ResponseSink,
) -> io::Result<()> {
    for index in index_files {
        match opener.open(&join_request_path(ctx.path, index)).await {
            Ok(opened) if !opened.is_dir => return stream_file(opened, ctx.is_head, sink).await,
            _ => {}
        }
    }

    match opener.list(ctx.path).await {
        Ok(entries) => write_listing(ctx, &entries, sink),
        Err(err) => write_error(sink, &err),
    }
}

async fn stream_file<F>(
    opened: Opened<F>,
    is_head: bool,
    sink: &mut dyn ResponseSink,
) -> io::Result<()>
where
    F: AsyncRead + Unpin + Send,
{
    sink.set_status(200);
    sink.insert_header("Content-Type", mime::content_type_for(&opened.path));
    if is_head {
        return Ok(());
    }

    let mut file = opened.file;
    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        sink.write(&buf[..n])?;
    }
}

fn write_listing(
    ctx: &RequestContext<'_>,
    entries: &[ListEntry],
    sink: &mut dyn ResponseSink,
) -> io::Result<()> {
    sink.set_status(200);
    sink.insert_header("Content-Type", "text/html; charset=utf-8");
    if ctx.is_head {
        return Ok(());
    }

    let shown = if ctx.path.is_empty() { "/" } else { ctx.path };
    sink.write(
        format!(
            "<html><head><title>Index of {shown}</title></head><body><h1>Index of {shown}</h1><hr><pre>"
        )
        .as_bytes(),
    )?;
    if !ctx.path.is_empty() {
        sink.write(b"<a href=\"..\">../</a>\n")?;
    }
    for entry in entries {
        let display = if entry.is_dir {
            format!("{}/", entry.name)
        } else {
            entry.name.clone()
        };
        sink.write(format!("<a href=\"{display}\">{display}</a>\n").as_bytes())?;
    }
    sink.write(b"</pre><hr></body></html>")
}

/// Decide the HTTP representation of a resolution failure.
fn write_error(sink: &mut dyn ResponseSink, err: &io::Error) -> io::Result<()> {
    match err.kind() {
        io::ErrorKind::NotFound => response::write_not_found(sink),
        io::ErrorKind::PermissionDenied => response::write_forbidden(sink),
        _ => {
            logger::log_error(&format!("Unexpected error serving request: {err}"));
            response::write_server_error(sink)
        }
    }
}

/// Join a request path and an entry name with a single slash.
fn join_request_path(path: &str, name: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        name.to_string()
    } else {
        format!("{trimmed}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::sink::BufferSink;
    use crate::resolver::mem::MemOpener;
    use crate::resolver::HtmlFallback;

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
        }
    }

    fn index_files() -> Vec<String> {
        vec!["index.html".to_string(), "index.htm".to_string()]
    }

    #[tokio::test]
    async fn serves_file_with_content_type() {
        let opener = MemOpener::new().with_file("style.css", b"body {}");
        let mut sink = BufferSink::new();
        serve_path(&opener, &ctx("style.css"), &index_files(), &mut sink)
            .await
            .unwrap();

        assert_eq!(sink.body(), b"body {}");
        let response = sink.into_response(false);
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["Content-Type"], "text/css");
    }

    #[tokio::test]
    async fn missing_path_writes_not_found_body() {
        let opener = MemOpener::new();
        let mut sink = BufferSink::new();
        serve_path(&opener, &ctx("missing"), &index_files(), &mut sink)
            .await
            .unwrap();

        assert_eq!(sink.body(), b"404 Not Found");
        assert_eq!(sink.into_response(false).status(), 404);
    }

    #[tokio::test]
    async fn denied_path_writes_forbidden() {
        let opener = MemOpener::new().with_denied("private");
        let mut sink = BufferSink::new();
        serve_path(&opener, &ctx("private"), &index_files(), &mut sink)
            .await
            .unwrap();

        assert_eq!(sink.into_response(false).status(), 403);
    }

    #[tokio::test]
    async fn directory_serves_its_index_file() {
        let opener = MemOpener::new()
            .with_dir("docs")
            .with_file("docs/index.html", b"<h1>docs</h1>");
        let mut sink = BufferSink::new();
        serve_path(&opener, &ctx("docs"), &index_files(), &mut sink)
            .await
            .unwrap();

        assert_eq!(sink.body(), b"<h1>docs</h1>");
        assert_eq!(sink.into_response(false).status(), 200);
    }

    #[tokio::test]
    async fn directory_without_index_gets_a_listing() {
        let opener = MemOpener::new()
            .with_dir("media")
            .with_file("media/a.png", b"png")
            .with_file("media/b.mp4", b"mp4");
        let mut sink = BufferSink::new();
        serve_path(&opener, &ctx("media"), &index_files(), &mut sink)
            .await
            .unwrap();

        let listing = String::from_utf8(sink.body().to_vec()).unwrap();
        assert!(listing.contains("Index of media"));
        assert!(listing.contains("a.png"));
        assert!(listing.contains("b.mp4"));
    }

    #[tokio::test]
    async fn head_requests_write_no_body() {
        let opener = MemOpener::new().with_file("page.html", b"<p>hi</p>");
        let mut sink = BufferSink::new();
        let head_ctx = RequestContext {
            path: "page.html",
            is_head: true,
        };
        serve_path(&opener, &head_ctx, &index_files(), &mut sink)
            .await
            .unwrap();

        assert!(sink.body().is_empty());
        assert_eq!(sink.into_response(true).status(), 200);
    }

    #[tokio::test]
    async fn extensionless_request_is_served_via_fallback() {
        let opener = HtmlFallback::new(MemOpener::new().with_file("about.html", b"<h1>about</h1>"));
        let mut sink = BufferSink::new();
        serve_path(&opener, &ctx("about"), &index_files(), &mut sink)
            .await
            .unwrap();

        assert_eq!(sink.body(), b"<h1>about</h1>");
        // Content type follows the resolved .html path.
        let response = sink.into_response(false);
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers()["Content-Type"],
            "text/html; charset=utf-8"
        );
    }

    #[test]
    fn join_request_path_handles_roots_and_slashes() {
        assert_eq!(join_request_path("", "index.html"), "index.html");
        assert_eq!(join_request_path("docs", "index.html"), "docs/index.html");
        assert_eq!(join_request_path("docs/", "index.html"), "docs/index.html");
    }
}
