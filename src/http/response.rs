use std::fmt;

use bytes::Bytes;

use crate::http::headers::HeaderSet;

/// HTTP status code.
///
/// Any numeric code can be carried; only the ones the server produces have a
/// reason phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(u16);

impl StatusCode {
    /// 200 OK
    pub const OK: StatusCode = StatusCode(200);
    /// 400 Bad Request
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    /// 403 Forbidden
    pub const FORBIDDEN: StatusCode = StatusCode(403);
    /// 404 Not Found
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    /// 500 Internal Server Error
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);
    /// 501 Not Implemented
    pub const NOT_IMPLEMENTED: StatusCode = StatusCode(501);

    pub const fn from_u16(code: u16) -> Self {
        StatusCode(code)
    }

    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use staticd::http::response::StatusCode;
    /// assert_eq!(StatusCode::OK.as_u16(), 200);
    /// assert_eq!(StatusCode::NOT_FOUND.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns the reason phrase, or an empty string for codes outside the
    /// table.
    ///
    /// # Example
    ///
    /// ```
    /// # use staticd::http::response::StatusCode;
    /// assert_eq!(StatusCode::NOT_IMPLEMENTED.reason_phrase(), "Not Implemented");
    /// assert_eq!(StatusCode::from_u16(418).reason_phrase(), "");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            400 => "Bad Request",
            403 => "Forbidden",
            404 => "Not Found",
            500 => "Internal Server Error",
            501 => "Not Implemented",
            _ => "",
        }
    }

    pub fn is_ok(&self) -> bool {
        *self == StatusCode::OK
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

/// A response ready to be serialized.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Headers in the order they go on the wire
    pub headers: HeaderSet,
    /// Entity body; may be empty for HEAD even when Content-Length is not
    pub body: Bytes,
    /// Send the head only (HEAD requests)
    pub omit_body: bool,
    /// HTTP/0.9 reply: body only, no status line or headers
    pub legacy: bool,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// Headers are emitted in the order they are added. Content-Length is not
/// added automatically, because a HEAD response reports the size of a body
/// it does not carry.
///
/// # Example
///
/// ```
/// # use staticd::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::OK)
///     .header("Content-Type", "text/plain")
///     .content_length(2)
///     .body(&b"hi"[..])
///     .build();
/// assert_eq!(response.headers.get_str("content-length"), Some("2"));
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HeaderSet,
    body: Bytes,
    omit_body: bool,
    legacy: bool,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderSet::new(),
            body: Bytes::new(),
            omit_body: false,
            legacy: false,
        }
    }

    /// Appends a header.
    pub fn header(mut self, key: impl Into<Bytes>, value: impl Into<Bytes>) -> Self {
        self.headers.add(key, value);
        self
    }

    pub fn content_length(mut self, len: u64) -> Self {
        self.headers.add_int("Content-Length", len as i64);
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn omit_body(mut self, omit: bool) -> Self {
        self.omit_body = omit;
        self
    }

    pub fn legacy(mut self, legacy: bool) -> Self {
        self.legacy = legacy;
        self
    }

    pub fn build(self) -> Response {
        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
            omit_body: self.omit_body,
            legacy: self.legacy,
        }
    }
}

impl Response {
    /// Bytes of body that will actually be sent.
    pub fn sent_body(&self) -> &[u8] {
        if self.omit_body && !self.legacy {
            &[]
        } else {
            &self.body
        }
    }
}
