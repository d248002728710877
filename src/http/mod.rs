//! HTTP protocol implementation.
//!
//! This module implements a one-request-per-connection static file server.
//!
//! # Architecture
//!
//! - **`detector`**: Decides incrementally whether a complete request head has arrived
//! - **`parser`**: Tokenizes the request line and headers into a [`request::Request`]
//! - **`resolver`**: Confines request URIs to the document root
//! - **`handler`**: Builds the response, including error pages and HTTP/0.9 replies
//! - **`response`** / **`writer`**: Response representation and wire framing
//! - **`headers`**: Ordered, case-insensitive header collection
//! - **`mime`**: MIME type detection based on file extensions
//! - **`connection`**: Drives one client socket through the pipeline
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Feed bytes to the detector until it decides
//!        └──────┬──────┘
//!               │ Complete / Malformed
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Parse, resolve, build the response
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response, log it
//!        └──────┬───────────┘
//!               ▼
//!             Closed
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use staticd::http::connection::{Connection, Limits};
//! use staticd::http::handler::StaticFiles;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let files = Arc::new(StaticFiles::new("./www", "staticd")?);
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let files = Arc::clone(&files);
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, files, Limits::default());
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod detector;
pub mod error;
pub mod handler;
pub mod headers;
pub mod mime;
pub mod parser;
pub mod request;
pub mod resolver;
pub mod response;
pub mod writer;
