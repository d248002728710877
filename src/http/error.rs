//! Failure kinds of the request pipeline.
//!
//! None of these cross the connection boundary: each one is turned into an
//! HTTP status and an error page by the handler.

use std::io;
use std::path::PathBuf;

use crate::http::response::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    /// Malformed request line or header block.
    #[error("malformed request at byte {offset}: {reason}")]
    Protocol { offset: usize, reason: &'static str },

    /// Recognised method the server does not implement (POST, PUT).
    #[error("unsupported method {0}")]
    UnsupportedMethod(String),

    /// URI escapes the document root or names nothing.
    #[error("unresolved resource {0}")]
    UnresolvedResource(String),

    /// Resolved path exists but is not a regular file.
    #[error("forbidden resource {}", .0.display())]
    ForbiddenResource(PathBuf),

    /// Stat or read failure after the path resolved successfully.
    #[error("failed to read {}", path.display())]
    Internal {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ServeError {
    pub fn protocol(offset: usize, reason: &'static str) -> Self {
        ServeError::Protocol { offset, reason }
    }

    /// Status code reported to the client for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::Protocol { .. } => StatusCode::BAD_REQUEST,
            ServeError::UnsupportedMethod(_) => StatusCode::NOT_IMPLEMENTED,
            ServeError::UnresolvedResource(_) => StatusCode::NOT_FOUND,
            ServeError::ForbiddenResource(_) => StatusCode::FORBIDDEN,
            ServeError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
