//! Page handlers module
//!
//! The two rendered pages. Template failures at request time are answered
//! with a 500 and logged; they should not happen since the template set is
//! validated at startup.

use crate::config::AppState;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Serve the home page
pub fn home(state: &AppState, is_head: bool) -> Response<Full<Bytes>> {
    match state.templates.render_home() {
        Ok(html) => http::response::build_html_response(html, is_head),
        Err(e) => {
            logger::log_error(&format!("Failed to render home page: {e}"));
            http::build_500_response()
        }
    }
}

/// Serve the resume page rendered from the loaded CV
pub fn resume(state: &AppState, is_head: bool) -> Response<Full<Bytes>> {
    match state.templates.render_resume(&state.cv) {
        Ok(html) => http::response::build_html_response(html, is_head),
        Err(e) => {
            logger::log_error(&format!("Failed to render resume page: {e}"));
            http::build_500_response()
        }
    }
}
