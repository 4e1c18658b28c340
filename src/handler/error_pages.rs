//! Customizable error responses.
//!
//! Resolution order for an error status, first match wins:
//! 1. an installed hook, which fully controls the response;
//! 2. a body registered via [`ErrorPages::set_page`];
//! 3. a file named `<code>.html` directly under the site root, read fresh
//!    from disk on every error;
//! 4. a built-in minimal HTML page with the status and reason phrase.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::fs;

use crate::http::response;
use crate::logger;

/// Full override of error-response generation. Receives the request path
/// and the status the server would have produced.
pub type ErrorHook = dyn Fn(&str, StatusCode) -> Response<Full<Bytes>> + Send + Sync;

#[derive(Default)]
struct Registry {
    overrides: HashMap<u16, String>,
    hook: Option<Arc<ErrorHook>>,
}

/// Registry of error-page overrides and the optional responder hook.
///
/// Owned by the application state rather than being process-global, and
/// guarded for the concurrent read-mostly access pattern: every error path
/// reads it, configuration writes it rarely.
#[derive(Default)]
pub struct ErrorPages {
    registry: RwLock<Registry>,
}

impl ErrorPages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a static body for a status code. Last write wins.
    pub fn set_page(&self, code: u16, html: impl Into<String>) {
        let mut registry = self.write_lock();
        registry.overrides.insert(code, html.into());
    }

    /// Install a hook that fully replaces error-response generation.
    /// Replaces any previously installed hook.
    pub fn set_hook<F>(&self, hook: F)
    where
        F: Fn(&str, StatusCode) -> Response<Full<Bytes>> + Send + Sync + 'static,
    {
        let mut registry = self.write_lock();
        registry.hook = Some(Arc::new(hook));
    }

    /// Remove the installed hook, restoring default error responses.
    pub fn clear_hook(&self) {
        let mut registry = self.write_lock();
        registry.hook = None;
    }

    /// Produce the error response for `status`, for a request under `root`.
    pub async fn respond(
        &self,
        root: &Path,
        request_path: &str,
        status: StatusCode,
    ) -> Response<Full<Bytes>> {
        // Snapshot under the lock; disk I/O happens after release.
        let (hook, override_body) = {
            let registry = self
                .registry
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            (
                registry.hook.clone(),
                registry.overrides.get(&status.as_u16()).cloned(),
            )
        };

        if let Some(hook) = hook {
            return hook(request_path, status);
        }

        if let Some(body) = override_body {
            return response::status_page(status, body);
        }

        if let Some(resp) = respond_from_disk(root, status).await {
            return resp;
        }

        response::status_page(status, builtin_page(status))
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, Registry> {
        self.registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Serve `<code>.html` from the site root, if present. The file is read
/// fresh per error. A file that exists but cannot be read degrades to a
/// bodyless response with the status intact.
async fn respond_from_disk(root: &Path, status: StatusCode) -> Option<Response<Full<Bytes>>> {
    let page = root.join(format!("{}.html", status.as_u16()));
    let meta = fs::metadata(&page).await.ok()?;
    if !meta.is_file() {
        return None;
    }

    match fs::read(&page).await {
        Ok(bytes) => Some(response::status_page(status, bytes)),
        Err(e) => {
            logger::log_error(&format!("Error opening {}: {e}", page.display()));
            Some(response::status_only(status))
        }
    }
}

/// Built-in minimal error page: "<code>: <reason>" as title and heading.
fn builtin_page(status: StatusCode) -> String {
    let code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Unknown Error");
    format!(
        "<!doctype html>\n\
         <html>\n\
         <head>\n\
         \t<title>{code}: {reason}</title>\n\
         </head>\n\
         <body style=\"text-align:center\">\n\
         <h1>{code}: {reason}</h1>\n\
         </body>\n\
         </html>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_builtin_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let pages = ErrorPages::new();

        let resp = pages
            .respond(dir.path(), "/missing", StatusCode::NOT_FOUND)
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = body_string(resp).await;
        assert!(body.contains("404: Not Found"));
        assert!(body.contains("<h1>404: Not Found</h1>"));
    }

    #[tokio::test]
    async fn test_on_disk_page() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("404.html"), b"custom not found").unwrap();
        let pages = ErrorPages::new();

        let resp = pages
            .respond(dir.path(), "/missing", StatusCode::NOT_FOUND)
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(resp).await, "custom not found");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unreadable_on_disk_page_keeps_status_drops_body() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("404.html");
        std::fs::write(&page, b"should never be sent").unwrap();
        std::fs::set_permissions(&page, std::fs::Permissions::from_mode(0o000)).unwrap();
        if std::fs::read(&page).is_ok() {
            // Running as root: mode bits are not enforced, nothing to test
            return;
        }

        let pages = ErrorPages::new();
        let resp = pages
            .respond(dir.path(), "/missing", StatusCode::NOT_FOUND)
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(body_string(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_override_beats_on_disk_page() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("404.html"), b"from disk").unwrap();
        let pages = ErrorPages::new();
        pages.set_page(404, "Gone");

        let resp = pages
            .respond(dir.path(), "/missing", StatusCode::NOT_FOUND)
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(resp).await, "Gone");
    }

    #[tokio::test]
    async fn test_last_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let pages = ErrorPages::new();
        pages.set_page(404, "first");
        pages.set_page(404, "second");

        let resp = pages
            .respond(dir.path(), "/missing", StatusCode::NOT_FOUND)
            .await;
        assert_eq!(body_string(resp).await, "second");
    }

    #[tokio::test]
    async fn test_hook_beats_everything() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("404.html"), b"from disk").unwrap();
        let pages = ErrorPages::new();
        pages.set_page(404, "override");
        pages.set_hook(|path, status| {
            response::status_page(status, format!("hooked {} {path}", status.as_u16()))
        });

        let resp = pages
            .respond(dir.path(), "/missing", StatusCode::NOT_FOUND)
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(resp).await, "hooked 404 /missing");
    }

    #[tokio::test]
    async fn test_clear_hook_restores_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let pages = ErrorPages::new();
        pages.set_hook(|_, status| response::status_page(status, "hooked"));
        pages.clear_hook();

        let resp = pages
            .respond(dir.path(), "/missing", StatusCode::NOT_FOUND)
            .await;
        assert!(body_string(resp).await.contains("404: Not Found"));
    }

    #[tokio::test]
    async fn test_other_status_codes() {
        let dir = tempfile::tempdir().unwrap();
        let pages = ErrorPages::new();

        let resp = pages
            .respond(dir.path(), "/x", StatusCode::INTERNAL_SERVER_ERROR)
            .await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_string(resp).await.contains("500: Internal Server Error"));
    }
}
