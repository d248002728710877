use bytes::Bytes;

use crate::http::error::ServeError;
use crate::http::request::{Method, Request, Version};
use crate::http::resolver::{PathResolver, ResolvedPath};
use crate::http::response::StatusCode;

/// Outcome of parsing one detector-confirmed request.
#[derive(Debug)]
pub struct ParsedRequest {
    pub request: Request,
    /// Final status: the first recorded failure, or 200.
    pub status: StatusCode,
    /// Set when the URI resolved inside the document root.
    pub resolved: Option<ResolvedPath>,
    /// The failure that decided `status`, kept for diagnostics.
    pub error: Option<ServeError>,
}

/// Byte cursor over the request head.
struct Tokens<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Returns the bytes up to the first delimiter and swallows the whole run
    /// of delimiters that follows. Returns `None`, consuming nothing, when no
    /// delimiter follows the token. The token itself may be empty.
    fn match_until(&mut self, delims: &[u8]) -> Option<&'a [u8]> {
        let buf = self.buf;
        let rest = &buf[self.pos..];
        let end = rest.iter().position(|b| delims.contains(b))?;
        let run = rest[end..]
            .iter()
            .take_while(|b| delims.contains(*b))
            .count();

        self.pos += end + run;
        Some(&rest[..end])
    }

    fn has_remaining(&self) -> bool {
        self.pos < self.buf.len()
    }

    fn offset(&self) -> usize {
        self.pos
    }
}

/// Records the first failure seen; later tentative failures are dropped.
#[derive(Default)]
struct Verdict {
    error: Option<ServeError>,
}

impl Verdict {
    fn tentative(&mut self, err: ServeError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn is_set(&self) -> bool {
        self.error.is_some()
    }
}

/// Tokenizes a request head that the detector reported complete.
///
/// `bytes` must end at the detector boundary. `legacy` is the detector's
/// HTTP/0.9 marker; such requests have no version token and no headers.
/// The URI is resolved against `resolver` while parsing, so a 404 is known
/// before the version is inspected.
pub fn parse_request(bytes: &[u8], legacy: bool, resolver: &PathResolver) -> ParsedRequest {
    let mut request = Request {
        version: if legacy { Version::Http09 } else { Version::Unknown },
        ..Request::default()
    };
    let mut resolved = None;
    let mut verdict = Verdict::default();

    if let Err(fatal) = parse_into(bytes, resolver, &mut request, &mut resolved, &mut verdict) {
        // Hard failures override anything recorded tentatively.
        verdict.error = Some(fatal);
    }

    let status = verdict
        .error
        .as_ref()
        .map(ServeError::status)
        .unwrap_or(StatusCode::OK);

    ParsedRequest {
        request,
        status,
        resolved,
        error: verdict.error,
    }
}

fn parse_into(
    bytes: &[u8],
    resolver: &PathResolver,
    req: &mut Request,
    resolved: &mut Option<ResolvedPath>,
    verdict: &mut Verdict,
) -> Result<(), ServeError> {
    let mut tokens = Tokens::new(bytes);

    let method_raw = tokens
        .match_until(b" ")
        .ok_or_else(|| ServeError::protocol(0, "missing method"))?;
    req.method_raw = Bytes::copy_from_slice(method_raw);
    req.method = Method::from_bytes(method_raw);

    match req.method {
        Method::Unsupported => verdict.tentative(ServeError::UnsupportedMethod(
            String::from_utf8_lossy(method_raw).into_owned(),
        )),
        Method::Unknown => return Err(ServeError::protocol(0, "unknown method")),
        Method::GET | Method::HEAD => {}
    }

    let uri_offset = tokens.offset();
    let uri = tokens
        .match_until(b" \r\n")
        .ok_or_else(|| ServeError::protocol(uri_offset, "missing request uri"))?;
    req.uri = Bytes::copy_from_slice(uri);

    match resolver.resolve(uri) {
        Ok(path) => *resolved = Some(path),
        Err(e) => verdict.tentative(e),
    }

    if req.version == Version::Http09 {
        return Ok(());
    }

    let version_offset = tokens.offset();
    let version_raw = tokens
        .match_until(b"\r\n")
        .ok_or_else(|| ServeError::protocol(version_offset, "missing version"))?;
    req.version_raw = Bytes::copy_from_slice(version_raw);
    req.version = Version::from_bytes(version_raw);

    if req.version == Version::Unknown {
        verdict.tentative(ServeError::protocol(version_offset, "unsupported version"));
    }

    if verdict.is_set() {
        return Ok(());
    }

    while tokens.has_remaining() {
        let line_offset = tokens.offset();
        let line = tokens
            .match_until(b"\r\n")
            .ok_or_else(|| ServeError::protocol(line_offset, "unterminated header line"))?;

        // Split inside the line only, so a key never spans a line break.
        let mut fields = Tokens::new(line);
        let key = fields.match_until(b": ");
        let value = &line[fields.offset()..];

        match key {
            Some(k) if !k.is_empty() && !value.is_empty() => {
                req.headers
                    .add(Bytes::copy_from_slice(k), Bytes::copy_from_slice(value));
            }
            _ => return Err(ServeError::protocol(line_offset, "malformed header line")),
        }
    }

    Ok(())
}
