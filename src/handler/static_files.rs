//! File serving: load resolved files and build conditional/range-aware
//! responses from them.

use crate::handler::router::RequestContext;
use crate::http::{cond, mime, response, RangeOutcome};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io;
use std::path::Path;
use std::time::SystemTime;
use tokio::fs;

/// A loaded file ready to be served.
pub struct FileContent {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub modified: Option<SystemTime>,
}

/// Read a resolved file from disk.
///
/// Errors here mean the file vanished or became unreadable between
/// resolution and serving; the router turns that into a 404.
pub async fn load(path: &Path) -> io::Result<FileContent> {
    let bytes = fs::read(path).await?;
    let modified = fs::metadata(path).await.ok().and_then(|m| m.modified().ok());
    Ok(FileContent {
        bytes,
        content_type: mime::content_type_for(path),
        modified,
    })
}

/// Build the response for a loaded file: 304 for a passing conditional,
/// 206/416 for range requests, otherwise 200. HEAD drops the body but
/// keeps the headers.
pub fn build_response(ctx: &RequestContext<'_>, file: &FileContent) -> Response<Full<Bytes>> {
    let etag = cond::etag_for(&file.bytes);
    let total = file.bytes.len();

    if cond::not_modified(
        ctx.if_none_match.as_deref(),
        ctx.if_modified_since.as_deref(),
        &etag,
        file.modified,
    ) {
        return response::not_modified(&etag);
    }

    match crate::http::evaluate_range(ctx.range.as_deref(), total) {
        RangeOutcome::Partial { start, end } => {
            let body = if ctx.is_head {
                Bytes::new()
            } else {
                Bytes::copy_from_slice(&file.bytes[start..=end])
            };
            response::partial_body(body, file.content_type, &etag, start, end, total, ctx.is_head)
        }
        RangeOutcome::Unsatisfiable => response::range_not_satisfiable(total),
        RangeOutcome::Full => {
            let last_modified = file.modified.map(cond::http_date);
            response::full_body(
                Bytes::copy_from_slice(&file.bytes),
                file.content_type,
                &etag,
                last_modified.as_deref(),
                ctx.is_head,
            )
        }
    }
}
