//! Request routing dispatch module
//!
//! Entry point for HTTP request processing. Every request first passes
//! through the redirect normalizer; only a passthrough continues to method
//! validation and route dispatch. Security headers and access logging are
//! applied to every response on the way out.

use crate::config::AppState;
use crate::handler::{pages, static_files};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::redirect::{self, Decision, RedirectPolicy};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{self, HeaderValue};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Per-listener behavior: which scheme the client used to reach us and
/// which redirect policy applies. Built once at startup per listener.
pub struct ListenerRole {
    /// True when requests on this listener were TLS-terminated upstream.
    pub secure: bool,
    pub policy: RedirectPolicy,
    pub check_connection_limits: bool,
    /// Prefix for log lines from this listener, empty for the primary one.
    pub log_prefix: &'static str,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    role: Arc<ListenerRole>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    let method = req.method().clone();
    let version = version_label(req.version());
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);
    let is_head = method == Method::HEAD;

    let host_header = header_value(&req, header::HOST);
    let if_none_match = header_value_opt(&req, header::IF_NONE_MATCH);
    let referer = header_value_opt(&req, header::REFERER);
    let user_agent = header_value_opt(&req, header::USER_AGENT);

    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    // 1. Redirect normalization: a redirect or missing-host failure is
    //    terminal, nothing further runs for this request.
    let decision = redirect::evaluate(
        &role.policy,
        role.secure,
        &host_header,
        &path,
        query.as_deref(),
    );

    let mut response = match decision {
        Decision::Redirect(location) => http::build_redirect_response(&location),
        Decision::MissingHost => {
            logger::log_error(&format!(
                "request from {peer_addr} carries no host information and no canonical hostname is configured"
            ));
            http::build_500_response()
        }
        // 2. Passthrough: continue to method check and route dispatch.
        Decision::Passthrough => {
            dispatch(&state, &method, &path, is_head, if_none_match.as_deref()).await
        }
    };

    finalize_response(&mut response, &state);

    if state.config.logging.access_log {
        let entry = access_entry(
            peer_addr,
            &method,
            path,
            query,
            version,
            &response,
            referer,
            user_agent,
            started,
        );
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route a passed-through request based on method and path
async fn dispatch(
    state: &Arc<AppState>,
    method: &Method,
    path: &str,
    is_head: bool,
    if_none_match: Option<&str>,
) -> Response<Full<Bytes>> {
    if !matches!(*method, Method::GET | Method::HEAD) {
        logger::log_warning(&format!("Method not allowed: {method}"));
        return http::build_405_response();
    }

    // Favicons live at the top level but are served from the static dir.
    if state.config.site.favicon_paths.iter().any(|p| p == path) {
        let name = path.trim_start_matches('/');
        return static_files::serve(state, name, if_none_match, is_head).await;
    }

    if let Some(asset) = path.strip_prefix("/static/") {
        return static_files::serve(state, asset, if_none_match, is_head).await;
    }

    match path {
        // Exact match only: "/" is the home page, not a catch-all.
        "/" => pages::home(state, is_head),
        "/resume" => pages::resume(state, is_head),
        _ => http::build_404_response(),
    }
}

/// Add the response headers every answer carries: Server identification
/// and the security headers the site always sends.
fn finalize_response(response: &mut Response<Full<Bytes>>, state: &AppState) {
    let headers = response.headers_mut();

    if let Ok(value) = HeaderValue::from_str(&state.config.http.server_name) {
        headers.insert(header::SERVER, value);
    }
    headers.insert("X-Frame-Options", HeaderValue::from_static("deny"));
    headers.insert("X-XSS-Protection", HeaderValue::from_static("1; mode=block"));
    if state.config.http.enable_hsts {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=63072000"),
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn access_entry(
    peer_addr: SocketAddr,
    method: &Method,
    path: String,
    query: Option<String>,
    version: &'static str,
    response: &Response<Full<Bytes>>,
    referer: Option<String>,
    user_agent: Option<String>,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(peer_addr.ip().to_string(), method.to_string(), path);
    entry.query = query;
    entry.http_version = version.to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    entry.referer = referer;
    entry.user_agent = user_agent;
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

fn header_value(req: &Request<hyper::body::Incoming>, name: header::HeaderName) -> String {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn header_value_opt(
    req: &Request<hyper::body::Incoming>,
    name: header::HeaderName,
) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}
