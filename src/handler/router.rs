//! Request routing: method gate, binding selection, prefix stripping and
//! dispatch to resolution and serving.

use crate::config::{AppState, ServeBinding};
use crate::handler::resolve::{self, Resolved};
use crate::handler::static_files;
use crate::http::response;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;

/// Per-request information the serving layer needs.
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
    pub range: Option<String>,
}

/// Entry point for one HTTP request. Infallible: every failure becomes an
/// HTTP error response.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();
    let path = req.uri().path();

    match *method {
        Method::GET | Method::HEAD => {}
        Method::OPTIONS => return Ok(response::options()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            let root = error_root(&state, path);
            let resp = state
                .error_pages
                .respond(&root, path, StatusCode::METHOD_NOT_ALLOWED)
                .await;
            return Ok(resp);
        }
    }

    let ctx = RequestContext {
        path,
        is_head: *method == Method::HEAD,
        if_none_match: header_string(&req, "if-none-match"),
        if_modified_since: header_string(&req, "if-modified-since"),
        range: header_string(&req, "range"),
    };

    Ok(route(&ctx, &state).await)
}

/// Route a request to its binding and serve the resolved file, or produce
/// an error response.
pub async fn route(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    // Prefix matching and resolution work on the decoded path, so encoded
    // file names ("/hello%20world.txt") reach the file they name.
    let Some(path) = decode_path(ctx.path) else {
        let root = error_root(state, ctx.path);
        return state
            .error_pages
            .respond(&root, ctx.path, StatusCode::NOT_FOUND)
            .await;
    };
    let path = path.as_str();

    let Some(binding) = match_binding(&state.bindings, path) else {
        let root = error_root(state, path);
        return state
            .error_pages
            .respond(&root, path, StatusCode::NOT_FOUND)
            .await;
    };

    let local = strip_prefix(&binding.prefix, path);
    match resolve::resolve(&binding.root, &local).await {
        Resolved::File(target) => match static_files::load(&target).await {
            Ok(file) => static_files::build_response(ctx, &file),
            // The file disappeared between resolution and read.
            Err(e) => {
                logger::log_warning(&format!(
                    "File unreadable while serving {}: {e}",
                    target.display()
                ));
                not_found(state, binding, path).await
            }
        },
        Resolved::NotFound => not_found(state, binding, path).await,
    }
}

/// Percent-decode a request path. Paths that decode to invalid UTF-8 or
/// contain a NUL byte are refused and answered with 404.
fn decode_path(path: &str) -> Option<String> {
    let decoded = percent_encoding::percent_decode_str(path)
        .decode_utf8()
        .ok()?;
    if decoded.contains('\0') {
        return None;
    }
    Some(decoded.into_owned())
}

async fn not_found(
    state: &AppState,
    binding: &ServeBinding,
    path: &str,
) -> Response<Full<Bytes>> {
    state
        .error_pages
        .respond(&binding.root, path, StatusCode::NOT_FOUND)
        .await
}

/// Select the binding with the longest matching prefix. Matching is
/// segment-aware: "/staticfoo" never matches the prefix "/static/". On
/// equal-length ties the first-registered binding wins.
pub fn match_binding<'a>(bindings: &'a [ServeBinding], path: &str) -> Option<&'a ServeBinding> {
    let mut best: Option<&ServeBinding> = None;
    for binding in bindings {
        if !prefix_matches(&binding.prefix, path) {
            continue;
        }
        match best {
            Some(current) if binding.prefix.len() <= current.prefix.len() => {}
            _ => best = Some(binding),
        }
    }
    best
}

/// Whether a normalized prefix ("/static/") covers a request path. The
/// bare prefix without its trailing slash ("/static") also matches.
fn prefix_matches(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    path.starts_with(prefix) || path == &prefix[..prefix.len() - 1]
}

/// Remove a matched prefix from a request path, yielding the root-relative
/// path, always starting with "/".
pub fn strip_prefix(prefix: &str, path: &str) -> String {
    let rest = path
        .strip_prefix(prefix.trim_end_matches('/'))
        .unwrap_or(path);
    if rest.starts_with('/') {
        rest.to_string()
    } else {
        format!("/{rest}")
    }
}

/// Root whose error pages cover requests that matched no binding: the
/// first-registered binding's, falling back to the working directory when
/// none exist (startup forbids an empty binding set).
fn error_root(state: &AppState, path: &str) -> PathBuf {
    match_binding(&state.bindings, path)
        .or_else(|| state.bindings.first())
        .map_or_else(|| PathBuf::from("."), |b| b.root.clone())
}

fn header_string<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings() -> Vec<ServeBinding> {
        vec![
            ServeBinding::new("./public", "/static/"),
            ServeBinding::new("./docs", "/static/docs/"),
            ServeBinding::new("./site", "/"),
        ]
    }

    #[test]
    fn test_longest_prefix_wins() {
        let bindings = bindings();
        let b = match_binding(&bindings, "/static/docs/guide.html").unwrap();
        assert_eq!(b.prefix, "/static/docs/");

        let b = match_binding(&bindings, "/static/app.js").unwrap();
        assert_eq!(b.prefix, "/static/");

        let b = match_binding(&bindings, "/about.html").unwrap();
        assert_eq!(b.prefix, "/");
    }

    #[test]
    fn test_segment_aware_matching() {
        let bindings = vec![ServeBinding::new("./public", "/static/")];
        // Same leading characters without a segment boundary: no match
        assert!(match_binding(&bindings, "/staticfoo").is_none());
        // The bare prefix matches
        assert_eq!(
            match_binding(&bindings, "/static").unwrap().prefix,
            "/static/"
        );
    }

    #[test]
    fn test_first_registered_wins_on_tie() {
        let bindings = vec![
            ServeBinding::new("./first", "/assets/"),
            ServeBinding::new("./second", "/assets/"),
        ];
        let b = match_binding(&bindings, "/assets/a.png").unwrap();
        assert_eq!(b.root, PathBuf::from("./first"));
    }

    #[test]
    fn test_decode_path() {
        assert_eq!(decode_path("/plain/path.txt").as_deref(), Some("/plain/path.txt"));
        assert_eq!(
            decode_path("/hello%20world.txt").as_deref(),
            Some("/hello world.txt")
        );
        assert_eq!(decode_path("/caf%C3%A9.html").as_deref(), Some("/café.html"));
        // NUL and invalid UTF-8 are refused
        assert_eq!(decode_path("/bad%00name"), None);
        assert_eq!(decode_path("/bad%FFname"), None);
    }

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_prefix("/static/", "/static/a/b.txt"), "/a/b.txt");
        assert_eq!(strip_prefix("/static/", "/static/"), "/");
        assert_eq!(strip_prefix("/static/", "/static"), "/");
        assert_eq!(strip_prefix("/", "/a/b.txt"), "/a/b.txt");
        assert_eq!(strip_prefix("/", "/"), "/");
    }
}
