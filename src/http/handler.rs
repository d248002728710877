//! Static file handler
//!
//! Turns a detected request into a framed response: parse, resolve, stat,
//! read, and fall back to an error page whenever any of that fails.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::http::detector::Detection;
use crate::http::error::ServeError;
use crate::http::mime;
use crate::http::parser::parse_request;
use crate::http::request::Request;
use crate::http::resolver::{PathResolver, ResolvedPath};
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::http::writer::serialize;

/// Body used when no `<code>.html` page is available.
pub const DEFAULT_ERROR_BODY: &str = "<HTML><HEAD><TITLE>Error</TITLE></HEAD>\
                                      <BODY><H1>Something went wrong</H1>\
                                      </BODY></HTML>";

/// Everything the transport needs after one request.
#[derive(Debug)]
pub struct ConnectionOutcome {
    /// Status sent to the client
    pub status_code: u16,
    /// Fully framed response
    pub response_bytes: Bytes,
    /// Body length for logging; -1 when not applicable (HEAD)
    pub content_length: i64,
    /// The request as parsed, for the access log
    pub request: Request,
}

/// Serves files out of one document root.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    resolver: PathResolver,
    server_name: String,
}

impl StaticFiles {
    pub fn new(document_root: impl AsRef<Path>, server_name: impl Into<String>) -> io::Result<Self> {
        Ok(Self {
            resolver: PathResolver::new(document_root)?,
            server_name: server_name.into(),
        })
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn document_root(&self) -> &Path {
        self.resolver.root()
    }

    /// Runs the pipeline over a connection buffer once the detector has
    /// finished with it.
    ///
    /// Only the first `boundary` bytes of `buf` are parsed. A malformed or
    /// incomplete head is answered with 400 without parsing.
    pub fn respond(&self, buf: &[u8], detection: Detection) -> ConnectionOutcome {
        match detection {
            Detection::Complete { boundary, legacy } => {
                let parsed = parse_request(&buf[..boundary], legacy, &self.resolver);

                if let Some(err) = &parsed.error {
                    tracing::debug!(status = parsed.status.as_u16(), error = %err, "request rejected");
                }

                self.outcome(parsed.status, parsed.request, parsed.resolved.as_ref())
            }
            Detection::Malformed { offset, state } => {
                tracing::debug!(offset, ?state, "malformed request head");
                self.outcome(StatusCode::BAD_REQUEST, Request::default(), None)
            }
            Detection::Incomplete => {
                tracing::debug!(received = buf.len(), "request head never completed");
                self.outcome(StatusCode::BAD_REQUEST, Request::default(), None)
            }
        }
    }

    fn outcome(
        &self,
        status: StatusCode,
        request: Request,
        resolved: Option<&ResolvedPath>,
    ) -> ConnectionOutcome {
        let (response, content_length) = self.build_response(status, &request, resolved);

        ConnectionOutcome {
            status_code: response.status.as_u16(),
            response_bytes: serialize(&response),
            content_length,
            request,
        }
    }

    /// Builds the response for a parsed request.
    ///
    /// A 200 status is only tentative here: the file may turn out to be
    /// missing (404), not a regular file (403) or unreadable (500), in which
    /// case the error path takes over. Returns the response together with the
    /// length to log, which is -1 for HEAD.
    pub fn build_response(
        &self,
        status: StatusCode,
        request: &Request,
        resolved: Option<&ResolvedPath>,
    ) -> (Response, i64) {
        let head_only = request.is_head() && !request.is_legacy();

        let served = match (status.is_ok(), resolved) {
            (true, Some(path)) => load_file(path.as_path(), !head_only)
                .map(|(body, len)| (body, len, mime::mime_type(path.as_path())))
                .map_err(|err| {
                    tracing::warn!(error = %err, "serving error page");
                    err.status()
                }),
            (true, None) => Err(StatusCode::NOT_FOUND),
            (false, _) => Err(status),
        };

        let (status, body, length, content_type) = match served {
            Ok((body, len, mime)) => (StatusCode::OK, body, len, mime),
            Err(status) => {
                let body = self.error_body(status);
                let len = body.len() as u64;
                (status, body, len, "text/html")
            }
        };

        if request.is_legacy() {
            let response = ResponseBuilder::new(status).body(body).legacy(true).build();
            return (response, length as i64);
        }

        let response = ResponseBuilder::new(status)
            .header("Server", self.server_name.clone())
            .header("Content-Type", content_type)
            .content_length(length)
            .body(body)
            .omit_body(head_only)
            .build();

        let logged = if head_only { -1 } else { length as i64 };
        (response, logged)
    }

    /// Contents of `<root>/<code>.html`, or the built-in body when that page
    /// is missing, not a regular file, empty or unreadable.
    pub fn error_body(&self, status: StatusCode) -> Bytes {
        let page = self.error_page_path(status);

        match load_file(&page, true) {
            Ok((body, _)) if !body.is_empty() => body,
            Ok(_) => Bytes::from_static(DEFAULT_ERROR_BODY.as_bytes()),
            Err(err) => {
                tracing::warn!(error = %err, "no usable error page");
                Bytes::from_static(DEFAULT_ERROR_BODY.as_bytes())
            }
        }
    }

    fn error_page_path(&self, status: StatusCode) -> PathBuf {
        self.resolver
            .root()
            .join(format!("{}.html", status.as_u16()))
    }
}

/// Stats `path` and, if it is a regular file, reads it when `read` is set.
///
/// Returns the contents (empty when not read) and the size reported by the
/// metadata.
fn load_file(path: &Path, read: bool) -> Result<(Bytes, u64), ServeError> {
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ServeError::UnresolvedResource(path.display().to_string()));
        }
        Err(source) => {
            return Err(ServeError::Internal {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if !meta.is_file() {
        return Err(ServeError::ForbiddenResource(path.to_path_buf()));
    }

    if !read {
        return Ok((Bytes::new(), meta.len()));
    }

    let contents = fs::read(path).map_err(|source| ServeError::Internal {
        path: path.to_path_buf(),
        source,
    })?;
    let len = contents.len() as u64;

    Ok((Bytes::from(contents), len))
}
