//! HTTP response builders.
//!
//! One builder per response shape, decoupled from file resolution. Builder
//! failures cannot happen with the header values used here, but every
//! builder still degrades to an empty response rather than panicking.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

/// Build a 200 response for a complete file body.
pub fn full_body(
    data: Bytes,
    content_type: &str,
    etag: &str,
    last_modified: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Accept-Ranges", "bytes")
        .header("ETag", etag);
    if let Some(lm) = last_modified {
        builder = builder.header("Last-Modified", lm);
    }

    builder
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback("200", &e))
}

/// Build a 206 response for `data[start..=end]` of a `total` byte file.
pub fn partial_body(
    data: Bytes,
    content_type: &str,
    etag: &str,
    start: usize,
    end: usize,
    total: usize,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = end - start + 1;
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Content-Range", format!("bytes {start}-{end}/{total}"))
        .header("Accept-Ranges", "bytes")
        .header("ETag", etag)
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback("206", &e))
}

/// Build a 304 Not Modified response.
pub fn not_modified(etag: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header("ETag", etag)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback("304", &e))
}

/// Build a 416 Range Not Satisfiable response for a `total` byte file.
pub fn range_not_satisfiable(total: usize) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header("Content-Type", "text/plain")
        .header("Content-Range", format!("bytes */{total}"))
        .body(Full::new(Bytes::from("Range Not Satisfiable")))
        .unwrap_or_else(|e| fallback("416", &e))
}

/// Build the 204 response for an OPTIONS preflight.
pub fn options() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback("204", &e))
}

/// Build an error response with an HTML body and the given status.
pub fn status_page(status: StatusCode, html: impl Into<Bytes>) -> Response<Full<Bytes>> {
    let body: Bytes = html.into();
    Response::builder()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", body.len())
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback("error page", &e))
}

/// Build a bare status response with no body.
///
/// Used when a custom on-disk error page exists but cannot be read: the
/// client still gets the status line, just no body.
pub fn status_only(status: StatusCode) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback("status", &e))
}

/// Last-resort response when a builder rejects its input.
fn fallback(what: &str, error: &hyper::http::Error) -> Response<Full<Bytes>> {
    crate::logger::log_error(&format!("Failed to build {what} response: {error}"));
    Response::new(Full::new(Bytes::new()))
}
