//! Frontend file serving from a local directory.
//!
//! Named pages get fixed routes; everything the router does not match
//! falls through to [`serve_asset`], which resolves the request path
//! under the frontend directory. Paths that escape the directory
//! (traversal) resolve to 404, same as missing files.

use std::path::{Component, Path, PathBuf};

use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use crate::server::app::AppState;

/// GET / - the common dashboard page
pub async fn serve_dashboard(State(state): State<AppState>) -> Response {
    serve_file(&state.frontend_dir, "common_dashboard.html").await
}

/// GET /signin
pub async fn serve_signin(State(state): State<AppState>) -> Response {
    serve_file(&state.frontend_dir, "signin.html").await
}

/// GET /signup
pub async fn serve_signup(State(state): State<AppState>) -> Response {
    serve_file(&state.frontend_dir, "signup.html").await
}

/// Fallback: serve the named file under the frontend directory.
///
/// The fallback catches all methods, so non-read methods are rejected
/// here the way a GET-only route would.
pub async fn serve_asset(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let raw = uri.path().trim_start_matches('/');
    // Request paths arrive percent-encoded
    let decoded = match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => return not_found(),
    };
    serve_file(&state.frontend_dir, &decoded).await
}

/// Normalize a request path to a relative path with no parent components.
///
/// Returns None for anything that could escape the frontend directory.
fn sanitize(path: &str) -> Option<PathBuf> {
    if path.contains('\\') {
        return None;
    }
    let mut clean = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            // RootDir, Prefix and ParentDir all escape the tree
            _ => return None,
        }
    }
    if clean.as_os_str().is_empty() {
        None
    } else {
        Some(clean)
    }
}

async fn serve_file(root: &Path, path: &str) -> Response {
    let Some(relative) = sanitize(path) else {
        tracing::warn!(path, "rejected asset path");
        return not_found();
    };

    let full = root.join(relative);
    match tokio::fs::read(&full).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&full).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], bytes).into_response()
        }
        Err(_) => not_found(),
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 Not Found").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_accepts_nested_paths() {
        assert_eq!(sanitize("css/styles.css"), Some(PathBuf::from("css/styles.css")));
        assert_eq!(sanitize("./js/app.js"), Some(PathBuf::from("js/app.js")));
        assert_eq!(sanitize("index.html"), Some(PathBuf::from("index.html")));
    }

    #[test]
    fn test_sanitize_rejects_escapes() {
        assert_eq!(sanitize("../secret.txt"), None);
        assert_eq!(sanitize("css/../../secret.txt"), None);
        assert_eq!(sanitize("/etc/passwd"), None);
        assert_eq!(sanitize("..\\windows"), None);
        assert_eq!(sanitize(""), None);
        assert_eq!(sanitize("."), None);
    }

    #[tokio::test]
    async fn test_serve_file_reads_from_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hello.html"), "<h1>hi</h1>").unwrap();

        let response = serve_file(dir.path(), "hello.html").await;
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(content_type.starts_with("text/html"));
    }

    #[tokio::test]
    async fn test_serve_file_missing_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let response = serve_file(dir.path(), "nope.html").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_serve_file_traversal_is_404() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("inside.txt"), "in").unwrap();

        let response = serve_file(dir.path(), "../inside.txt").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
