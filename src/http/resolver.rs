//! URI to filesystem path resolution.
//!
//! The resolver is the only thing standing between a request URI and the
//! rest of the filesystem. The URI is appended to the document root verbatim,
//! the result is canonicalized (dots and symlinks resolved), and only then is
//! it checked to lie under the canonical root.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use crate::http::error::ServeError;

const INDEX_FILE: &str = "index.html";

/// An absolute path known to lie inside the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath(PathBuf);

impl ResolvedPath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for ResolvedPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Canonicalizes `document_root` once. Fails if it does not exist or is
    /// not a directory.
    pub fn new(document_root: impl AsRef<Path>) -> io::Result<Self> {
        let root = std::fs::canonicalize(document_root.as_ref())?;

        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("document root {} is not a directory", root.display()),
            ));
        }

        Ok(Self { root })
    }

    /// Canonical document root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps `uri` to a path inside the document root.
    ///
    /// A URI of exactly `/` resolves to `index.html` in the root; that file is
    /// appended after the containment check and is not required to exist.
    pub fn resolve(&self, uri: &[u8]) -> Result<ResolvedPath, ServeError> {
        let unresolved = || ServeError::UnresolvedResource(String::from_utf8_lossy(uri).into_owned());

        let uri_str = std::str::from_utf8(uri).map_err(|_| unresolved())?;

        let mut joined: OsString = self.root.as_os_str().to_os_string();
        joined.push(uri_str);

        let canonical = std::fs::canonicalize(&joined).map_err(|e| {
            tracing::debug!(uri = uri_str, error = %e, "canonicalize failed");
            unresolved()
        })?;

        if !canonical.starts_with(&self.root) {
            tracing::warn!(uri = uri_str, resolved = %canonical.display(), "path escapes document root");
            return Err(unresolved());
        }

        let mut resolved = canonical;
        if uri == b"/" {
            resolved.push(INDEX_FILE);
        }

        Ok(ResolvedPath(resolved))
    }
}
