//! Path resolution: decide what a request path denotes under a site root.
//!
//! The file-only policy lives here. A path resolves to a regular file, to
//! the `index.html` inside a directory, or to nothing. Directories without
//! an index document are not served and never listed. Every call re-stats
//! the filesystem; nothing is cached.

use crate::logger;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the index document that makes a directory servable.
pub const INDEX_FILE: &str = "index.html";

/// What a request path resolves to under a root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// A servable regular file (possibly a directory's index document).
    File(PathBuf),
    /// Nothing servable. Covers missing paths, directories without an
    /// index document, traversal attempts and permission errors alike,
    /// so filesystem structure is never leaked through status codes.
    NotFound,
}

/// Lexically clean a request path: collapse `.` and `..` segments and drop
/// duplicate separators. `..` never ascends past the start of the path.
/// The result is a relative path, empty for the root request.
pub fn clean_path(request_path: &str) -> PathBuf {
    let mut segments: Vec<&str> = Vec::new();
    for segment in request_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.iter().collect()
}

/// Resolve a request path against a site root.
///
/// The cleaned path is joined onto `root` and the result is verified, via
/// canonicalization, to still live inside `root`. A directory resolves to
/// its `index.html` when one exists directly inside it.
pub async fn resolve(root: &Path, request_path: &str) -> Resolved {
    let joined = root.join(clean_path(request_path));

    let Ok(canonical_root) = fs::canonicalize(root).await else {
        logger::log_warning(&format!(
            "Site root not found or inaccessible: {}",
            root.display()
        ));
        return Resolved::NotFound;
    };

    // Canonicalization fails for missing paths, which is the ordinary 404.
    let Ok(target) = fs::canonicalize(&joined).await else {
        return Resolved::NotFound;
    };
    if !target.starts_with(&canonical_root) {
        logger::log_warning(&format!(
            "Path escapes site root, refused: {request_path} -> {}",
            target.display()
        ));
        return Resolved::NotFound;
    }

    let Ok(meta) = fs::metadata(&target).await else {
        return Resolved::NotFound;
    };

    if meta.is_dir() {
        let index = target.join(INDEX_FILE);
        match fs::metadata(&index).await {
            Ok(index_meta) if index_meta.is_file() => Resolved::File(index),
            _ => Resolved::NotFound,
        }
    } else {
        Resolved::File(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("/a/b.txt"), PathBuf::from("a/b.txt"));
        assert_eq!(clean_path("/"), PathBuf::new());
        assert_eq!(clean_path(""), PathBuf::new());
        assert_eq!(clean_path("//a///b"), PathBuf::from("a/b"));
        assert_eq!(clean_path("/./a/./b"), PathBuf::from("a/b"));
        assert_eq!(clean_path("/a/../b"), PathBuf::from("b"));
        assert_eq!(clean_path("/../../etc/passwd"), PathBuf::from("etc/passwd"));
        assert_eq!(clean_path("a/b/../../.."), PathBuf::new());
    }

    #[tokio::test]
    async fn test_resolve_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("page.txt"), b"content").unwrap();

        match resolve(dir.path(), "/page.txt").await {
            Resolved::File(p) => assert!(p.ends_with("page.txt")),
            Resolved::NotFound => panic!("expected file"),
        }
    }

    #[tokio::test]
    async fn test_resolve_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve(dir.path(), "/nope.txt").await, Resolved::NotFound);
    }

    #[tokio::test]
    async fn test_resolve_directory_with_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/index.html"), b"<p>hi</p>").unwrap();

        match resolve(dir.path(), "/docs").await {
            Resolved::File(p) => assert!(p.ends_with("docs/index.html")),
            Resolved::NotFound => panic!("expected index document"),
        }
    }

    #[tokio::test]
    async fn test_resolve_directory_without_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("bare")).unwrap();
        assert_eq!(resolve(dir.path(), "/bare").await, Resolved::NotFound);
        assert_eq!(resolve(dir.path(), "/").await, Resolved::NotFound);
    }

    #[tokio::test]
    async fn test_resolve_root_with_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), b"Hello").unwrap();

        match resolve(dir.path(), "/").await {
            Resolved::File(p) => assert!(p.ends_with("index.html")),
            Resolved::NotFound => panic!("expected root index"),
        }
    }

    #[tokio::test]
    async fn test_traversal_confined_to_root() {
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.txt"), b"secret").unwrap();
        let root = tempfile::TempDir::new_in(outside.path()).unwrap();

        assert_eq!(
            resolve(root.path(), "/../secret.txt").await,
            Resolved::NotFound
        );
        assert_eq!(
            resolve(root.path(), "/../../../../etc/passwd").await,
            Resolved::NotFound
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escape_refused() {
        use std::os::unix::fs::symlink;

        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.txt"), b"secret").unwrap();
        let root = tempfile::tempdir().unwrap();
        symlink(outside.path().join("secret.txt"), root.path().join("link")).unwrap();

        assert_eq!(resolve(root.path(), "/link").await, Resolved::NotFound);
    }
}
