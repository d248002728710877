//! staticd - static file HTTP server
//!
//! Serves files from a single document root over HTTP/1.0, HTTP/1.1 and
//! legacy HTTP/0.9.

pub mod buffer;
pub mod config;
pub mod http;
pub mod server;
