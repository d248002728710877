use bytes::Bytes;

use crate::http::headers::HeaderSet;

/// HTTP request methods as far as a static file server cares.
///
/// Only GET and HEAD are served. POST and PUT are recognised so they can be
/// answered with 501 Not Implemented; anything else is a bad request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// POST or PUT - recognised but not implemented
    Unsupported,
    /// Anything else, including a method that was never parsed
    Unknown,
}

/// Protocol version named on the request line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// Request line without a version token
    Http09,
    Http10,
    Http11,
    Unknown,
}

impl Method {
    /// Classifies a method token, ignoring ASCII case.
    ///
    /// # Example
    ///
    /// ```
    /// # use staticd::http::request::Method;
    /// assert_eq!(Method::from_bytes(b"get"), Method::GET);
    /// assert_eq!(Method::from_bytes(b"PUT"), Method::Unsupported);
    /// assert_eq!(Method::from_bytes(b"BREW"), Method::Unknown);
    /// ```
    pub fn from_bytes(raw: &[u8]) -> Self {
        if raw.eq_ignore_ascii_case(b"GET") {
            Method::GET
        } else if raw.eq_ignore_ascii_case(b"HEAD") {
            Method::HEAD
        } else if raw.eq_ignore_ascii_case(b"POST") || raw.eq_ignore_ascii_case(b"PUT") {
            Method::Unsupported
        } else {
            Method::Unknown
        }
    }
}

impl Version {
    /// Accepts exactly `HTTP/1.0` or `HTTP/1.1`, ignoring ASCII case.
    pub fn from_bytes(raw: &[u8]) -> Self {
        if raw.eq_ignore_ascii_case(b"HTTP/1.0") {
            Version::Http10
        } else if raw.eq_ignore_ascii_case(b"HTTP/1.1") {
            Version::Http11
        } else {
            Version::Unknown
        }
    }
}

/// A parsed request.
///
/// Raw tokens are owned copies of the connection buffer, so a `Request`
/// outlives any reset of that buffer.
#[derive(Debug, Clone)]
pub struct Request {
    /// The classified method
    pub method: Method,
    /// Method token as sent
    pub method_raw: Bytes,
    /// Request URI as sent, undecoded
    pub uri: Bytes,
    /// Version token as sent; empty for HTTP/0.9
    pub version_raw: Bytes,
    pub version: Version,
    pub headers: HeaderSet,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            method: Method::Unknown,
            method_raw: Bytes::new(),
            uri: Bytes::new(),
            version_raw: Bytes::new(),
            version: Version::Unknown,
            headers: HeaderSet::new(),
        }
    }
}

impl Request {
    /// Retrieves a header value by name, ignoring ASCII case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get_str(key)
    }

    /// True for a bare HTTP/0.9 request line.
    pub fn is_legacy(&self) -> bool {
        self.version == Version::Http09
    }

    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }
}
