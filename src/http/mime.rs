//! File extension to Content-Type lookup.

use std::path::Path;

/// Content type used when no extension matches.
pub const DEFAULT_MIME: &str = "text/plain";

static MIME_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("json", "application/json"),
    ("txt", "text/plain"),
];

/// Looks up the content type for `path` by its extension (case-sensitive).
pub fn lookup(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?;

    MIME_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

/// Like [`lookup`], falling back to `text/plain`.
pub fn mime_type(path: &Path) -> &'static str {
    lookup(path).unwrap_or(DEFAULT_MIME)
}
