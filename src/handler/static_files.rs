//! Static asset serving module
//!
//! Loads files from the configured static directory with MIME detection
//! and ETag/304 handling. Paths are canonicalized and checked against the
//! static root so a crafted path cannot escape it.

use crate::config::AppState;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve a file addressed relative to the static directory
pub async fn serve(
    state: &AppState,
    relative_path: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    match load(&state.config.site.static_dir, relative_path).await {
        Some((content, content_type)) => {
            build_asset_response(&content, content_type, if_none_match, is_head)
        }
        None => http::build_404_response(),
    }
}

/// Load a file from the static directory, refusing paths that resolve
/// outside it
async fn load(static_dir: &str, relative_path: &str) -> Option<(Vec<u8>, &'static str)> {
    // Strip traversal sequences before joining.
    let clean_path = relative_path.trim_start_matches('/').replace("..", "");
    if clean_path.is_empty() {
        return None;
    }

    let file_path = Path::new(static_dir).join(&clean_path);

    let static_dir_canonical = match Path::new(static_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    // File not found is an ordinary 404, no need to log at warning level
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            relative_path,
            file_path_canonical.display()
        ));
        return None;
    }

    if file_path_canonical.is_dir() {
        return None;
    }

    let content = match fs::read(&file_path_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path_canonical.display(),
                e
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(
        file_path_canonical
            .extension()
            .and_then(|e| e.to_str()),
    );

    Some((content, content_type))
}

/// Build asset response with `ETag` validation
fn build_asset_response(
    data: &[u8],
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);

    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    http::response::build_cached_response(Bytes::from(data.to_owned()), content_type, &etag, is_head)
}
