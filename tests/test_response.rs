use staticd::http::response::{ResponseBuilder, StatusCode};
use staticd::http::writer::serialize;

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::OK.as_u16(), 200);
    assert_eq!(StatusCode::BAD_REQUEST.as_u16(), 400);
    assert_eq!(StatusCode::FORBIDDEN.as_u16(), 403);
    assert_eq!(StatusCode::NOT_FOUND.as_u16(), 404);
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR.as_u16(), 500);
    assert_eq!(StatusCode::NOT_IMPLEMENTED.as_u16(), 501);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::OK.reason_phrase(), "OK");
    assert_eq!(StatusCode::BAD_REQUEST.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::FORBIDDEN.reason_phrase(), "Forbidden");
    assert_eq!(StatusCode::NOT_FOUND.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::INTERNAL_SERVER_ERROR.reason_phrase(),
        "Internal Server Error"
    );
    assert_eq!(StatusCode::NOT_IMPLEMENTED.reason_phrase(), "Not Implemented");
}

#[test]
fn test_unlisted_status_has_empty_reason() {
    let status = StatusCode::from_u16(302);

    assert_eq!(status.reason_phrase(), "");
    let response = ResponseBuilder::new(status).build();
    assert_eq!(&serialize(&response)[..], b"HTTP/1.0 302 \r\n\r\n");
}

#[test]
fn test_serialize_keeps_header_order() {
    let response = ResponseBuilder::new(StatusCode::OK)
        .header("Server", "staticd")
        .header("Content-Type", "text/plain")
        .content_length(5)
        .body(&b"hello"[..])
        .build();

    assert_eq!(
        &serialize(&response)[..],
        &b"HTTP/1.0 200 OK\r\nServer: staticd\r\nContent-Type: text/plain\r\nContent-Length: 5\r\n\r\nhello"[..]
    );
}

#[test]
fn test_serialize_omits_body() {
    let response = ResponseBuilder::new(StatusCode::OK)
        .content_length(5)
        .body(&b"hello"[..])
        .omit_body(true)
        .build();

    assert_eq!(
        &serialize(&response)[..],
        &b"HTTP/1.0 200 OK\r\nContent-Length: 5\r\n\r\n"[..]
    );
    assert!(response.sent_body().is_empty());
}

#[test]
fn test_serialize_legacy_is_body_only() {
    let response = ResponseBuilder::new(StatusCode::NOT_FOUND)
        .header("Server", "staticd")
        .body(&b"<p>gone</p>"[..])
        .legacy(true)
        .build();

    assert_eq!(&serialize(&response)[..], b"<p>gone</p>");
}

#[test]
fn test_builder_does_not_add_content_length() {
    let response = ResponseBuilder::new(StatusCode::OK)
        .body(&b"x"[..])
        .build();

    assert!(!response.headers.contains("Content-Length"));
}

#[test]
fn test_status_display() {
    assert_eq!(StatusCode::NOT_FOUND.to_string(), "404 Not Found");
}
