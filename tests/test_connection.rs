use std::sync::Arc;
use std::time::Duration;

use staticd::http::connection::{Connection, Limits};
use staticd::http::handler::StaticFiles;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream, duplex};

fn site() -> (TempDir, Arc<StaticFiles>) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>hi</h1>").unwrap();
    let files = StaticFiles::new(dir.path(), "staticd").unwrap();
    (dir, Arc::new(files))
}

/// Spawns a connection over an in-memory pipe and returns the client end.
fn connect(files: Arc<StaticFiles>, limits: Limits) -> (DuplexStream, tokio::task::JoinHandle<anyhow::Result<()>>) {
    let (client, server) = duplex(64 * 1024);
    let handle = tokio::spawn(async move {
        let mut conn = Connection::new(server, files, limits);
        conn.run().await
    });
    (client, handle)
}

async fn read_all(client: &mut DuplexStream) -> String {
    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn test_serves_request_sent_in_pieces() {
    let (_dir, files) = site();
    let (mut client, handle) = connect(files, Limits::default());

    for piece in [&b"GET / HT"[..], b"TP/1.1\r\nHo", b"st: x\r\n", b"\r\n"] {
        client.write_all(piece).await.unwrap();
        tokio::task::yield_now().await;
    }

    let response = read_all(&mut client).await;
    handle.await.unwrap().unwrap();

    assert!(response.starts_with("HTTP/1.0 200 OK\r\n"));
    assert!(response.ends_with("\r\n\r\n<h1>hi</h1>"));
}

#[tokio::test]
async fn test_legacy_request_over_connection() {
    let (_dir, files) = site();
    let (mut client, handle) = connect(files, Limits::default());

    client.write_all(b"GET /\n").await.unwrap();
    let response = read_all(&mut client).await;
    handle.await.unwrap().unwrap();

    assert_eq!(response, "<h1>hi</h1>");
}

#[tokio::test]
async fn test_malformed_request_gets_bad_request() {
    let (_dir, files) = site();
    let (mut client, handle) = connect(files, Limits::default());

    client.write_all(b"G3T / HTTP/1.1\r\n\r\n").await.unwrap();
    let response = read_all(&mut client).await;
    handle.await.unwrap().unwrap();

    assert!(response.starts_with("HTTP/1.0 400 Bad Request\r\n"));
}

#[tokio::test]
async fn test_oversized_head_gets_bad_request() {
    let (_dir, files) = site();
    let limits = Limits {
        max_request_bytes: 32,
        ..Limits::default()
    };
    let (mut client, handle) = connect(files, limits);

    client
        .write_all(b"GET / HTTP/1.1\r\nX-Padding: aaaaaaaaaaaaaaaaaaaaaaaaaaaa\r\n")
        .await
        .unwrap();
    let response = read_all(&mut client).await;
    handle.await.unwrap().unwrap();

    assert!(response.starts_with("HTTP/1.0 400 Bad Request\r\n"));
}

#[tokio::test]
async fn test_partial_head_then_eof_gets_bad_request() {
    let (_dir, files) = site();
    let (mut client, handle) = connect(files, Limits::default());

    client.write_all(b"GET / HTTP/1.1\r\n").await.unwrap();
    client.shutdown().await.unwrap();
    let response = read_all(&mut client).await;
    handle.await.unwrap().unwrap();

    assert!(response.starts_with("HTTP/1.0 400 Bad Request\r\n"));
}

#[tokio::test]
async fn test_silent_close_sends_nothing() {
    let (_dir, files) = site();
    let (mut client, handle) = connect(files, Limits::default());

    client.shutdown().await.unwrap();
    let response = read_all(&mut client).await;
    handle.await.unwrap().unwrap();

    assert!(response.is_empty());
}

#[tokio::test]
async fn test_read_timeout_closes_without_response() {
    let (_dir, files) = site();
    let limits = Limits {
        read_timeout: Duration::from_millis(50),
        ..Limits::default()
    };
    let (mut client, handle) = connect(files, limits);

    client.write_all(b"GET / HTTP/1.1\r\n").await.unwrap();
    handle.await.unwrap().unwrap();

    let response = read_all(&mut client).await;
    assert!(response.is_empty());
}
