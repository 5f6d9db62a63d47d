//! Path resolution module
//!
//! Translates a requested path into an openable file. The opening capability
//! is a trait so the `.html` fallback rule composes over any backing store,
//! and tests can run against an in-memory one.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncRead;

use crate::logger;

/// A file opened for serving, plus what was learned while opening it.
#[derive(Debug)]
pub struct Opened<F> {
    pub file: F,
    /// Concrete path that ended up being opened (may differ from the request
    /// path when the `.html` fallback kicked in). Drives MIME detection.
    pub path: PathBuf,
    pub is_dir: bool,
}

/// One directory entry, as much as the listing page needs.
pub struct ListEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Capability for opening request paths under some root.
#[async_trait]
pub trait FileOpener: Send + Sync {
    type File: AsyncRead + Unpin + Send;

    /// Open `path` read-only. Not-found must surface as
    /// `io::ErrorKind::NotFound`; everything else passes through unchanged.
    async fn open(&self, path: &str) -> io::Result<Opened<Self::File>>;

    /// Enumerate a directory for the default listing page.
    async fn list(&self, path: &str) -> io::Result<Vec<ListEntry>>;
}

/// Opens files beneath a root directory on the real file system.
pub struct DirOpener {
    root: PathBuf,
}

impl DirOpener {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn canonical_root(&self) -> io::Result<PathBuf> {
        match fs::canonicalize(&self.root).await {
            Ok(root) => Ok(root),
            Err(err) => {
                logger::log_warning(&format!(
                    "Served root '{}' not accessible: {err}",
                    self.root.display()
                ));
                Err(err)
            }
        }
    }

    /// Join the request path under the root and refuse anything that
    /// escapes it after symlink resolution.
    async fn locate(&self, path: &str) -> io::Result<PathBuf> {
        let root = self.canonical_root().await?;
        let candidate = root.join(path.trim_start_matches('/'));
        let canonical = fs::canonicalize(&candidate).await?;
        if !canonical.starts_with(&root) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {path} -> {}",
                canonical.display()
            ));
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "path escapes served root",
            ));
        }
        Ok(canonical)
    }
}

#[async_trait]
impl FileOpener for DirOpener {
    type File = fs::File;

    async fn open(&self, path: &str) -> io::Result<Opened<fs::File>> {
        let located = self.locate(path).await?;
        let file = fs::File::open(&located).await?;
        let metadata = file.metadata().await?;
        Ok(Opened {
            file,
            path: located,
            is_dir: metadata.is_dir(),
        })
    }

    async fn list(&self, path: &str) -> io::Result<Vec<ListEntry>> {
        let located = self.locate(path).await?;
        let mut dir = fs::read_dir(&located).await?;
        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            entries.push(ListEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: entry.file_type().await?.is_dir(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// Decorator that retries a not-found path with a `.html` suffix.
///
/// Only the lookup strategy changes; handles come back from the inner opener
/// untouched. When both attempts fail, callers see the first attempt's error,
/// so the not-found/other classification is always decided by the literal
/// path.
pub struct HtmlFallback<O> {
    inner: O,
}

impl<O> HtmlFallback<O> {
    pub const fn new(inner: O) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<O: FileOpener> FileOpener for HtmlFallback<O> {
    type File = O::File;

    async fn open(&self, path: &str) -> io::Result<Opened<O::File>> {
        logger::log_resolve(path);
        let original = self.inner.open(path).await;
        if let Err(err) = &original {
            if err.kind() == io::ErrorKind::NotFound {
                if let Ok(opened) = self.inner.open(&format!("{path}.html")).await {
                    return Ok(opened);
                }
            }
            logger::log_resolve_error(path, err);
        }
        original
    }

    async fn list(&self, path: &str) -> io::Result<Vec<ListEntry>> {
        self.inner.list(path).await
    }
}
