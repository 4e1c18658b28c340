//! Conditional request evaluation.
//!
//! `ETag` generation with `If-None-Match`, plus `Last-Modified` with
//! `If-Modified-Since` (RFC 7232). `If-None-Match` takes precedence when
//! both validators are present.

use chrono::{DateTime, Utc};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::SystemTime;

/// Compute a quoted `ETag` for a body.
pub fn etag_for(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

/// Format a filesystem timestamp as an HTTP-date (IMF-fixdate, always GMT).
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Decide whether a request's validators allow a 304 Not Modified.
///
/// When `If-None-Match` is present it alone decides; `If-Modified-Since` is
/// only consulted otherwise.
pub fn not_modified(
    if_none_match: Option<&str>,
    if_modified_since: Option<&str>,
    etag: &str,
    modified: Option<SystemTime>,
) -> bool {
    if let Some(client_etags) = if_none_match {
        return client_etags
            .split(',')
            .any(|e| e.trim() == etag || e.trim() == "*");
    }

    match (if_modified_since, modified) {
        (Some(header), Some(mtime)) => unmodified_since(header, mtime),
        _ => false,
    }
}

/// Compare a file's mtime against an `If-Modified-Since` header value.
/// Unparseable dates are ignored per RFC 7232.
fn unmodified_since(header: &str, mtime: SystemTime) -> bool {
    let Ok(since) = DateTime::parse_from_rfc2822(header) else {
        return false;
    };
    // HTTP dates carry whole seconds only; truncate the mtime to match.
    let mtime = DateTime::<Utc>::from(mtime);
    mtime.timestamp() <= since.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_etag_stable_and_quoted() {
        let a = etag_for(b"same bytes");
        let b = etag_for(b"same bytes");
        assert_eq!(a, b);
        assert!(a.starts_with('"') && a.ends_with('"'));
        assert_ne!(a, etag_for(b"other bytes"));
    }

    #[test]
    fn test_if_none_match() {
        let etag = etag_for(b"body");
        assert!(not_modified(Some(&etag), None, &etag, None));
        assert!(not_modified(Some("*"), None, &etag, None));
        let list = format!("\"zzz\", {etag}");
        assert!(not_modified(Some(&list), None, &etag, None));
        assert!(!not_modified(Some("\"zzz\""), None, &etag, None));
        assert!(!not_modified(None, None, &etag, None));
    }

    #[test]
    fn test_http_date_roundtrip() {
        let now = SystemTime::now();
        let formatted = http_date(now);
        assert!(formatted.ends_with("GMT"));
        assert!(DateTime::parse_from_rfc2822(&formatted).is_ok());
    }

    #[test]
    fn test_if_modified_since() {
        let mtime = SystemTime::now();
        let header = http_date(mtime + Duration::from_secs(60));
        assert!(not_modified(None, Some(&header), "\"x\"", Some(mtime)));

        let stale = http_date(mtime - Duration::from_secs(3600));
        assert!(!not_modified(None, Some(&stale), "\"x\"", Some(mtime)));

        // Same second compares as unmodified
        let exact = http_date(mtime);
        assert!(not_modified(None, Some(&exact), "\"x\"", Some(mtime)));

        assert!(!not_modified(None, Some("not a date"), "\"x\"", Some(mtime)));
    }

    #[test]
    fn test_etag_precedence_over_date() {
        let mtime = SystemTime::now();
        let header = http_date(mtime + Duration::from_secs(60));
        // Non-matching ETag wins even though the date alone would say 304
        assert!(!not_modified(
            Some("\"other\""),
            Some(&header),
            "\"mine\"",
            Some(mtime)
        ));
    }
}
