//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation,
//! route matching, and dispatching to the API, the asset tree, or the fallback.

use crate::config::AppState;
use crate::handler::{fallback, games, static_files};
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, CONTENT_LENGTH, IF_NONE_MATCH};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Path prefix reserved for the JSON API
pub const API_PREFIX: &str = "/api";

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Routes served by the JSON API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiRoute {
    Health,
    Games,
    Game(i64),
}

impl ApiRoute {
    /// Match an API path; `None` means the path falls through to the fallback
    pub fn parse(path: &str) -> Option<Self> {
        match path {
            "/api/health" => Some(Self::Health),
            "/api/games" => Some(Self::Games),
            _ => path
                .strip_prefix("/api/games/")
                .and_then(parse_game_id)
                .map(Self::Game),
        }
    }
}

/// Only a plain run of digits names a game
fn parse_game_id(segment: &str) -> Option<i64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Whether `path` belongs to the API surface (`/api` or `/api/...`)
pub fn is_api_path(path: &str) -> bool {
    path.strip_prefix(API_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Main entry point for HTTP request handling
///
/// Only the request head is inspected; the body is dropped unread.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    drop(body);

    let path = parts.uri.path();
    let api = is_api_path(path);
    let enable_cors = state.config.http.enable_cors;

    // 1. Check HTTP method
    if let Some(resp) = check_http_method(&parts.method, api, enable_cors) {
        return Ok(with_cors(resp, api && enable_cors));
    }

    // 2. Check body size
    if let Some(resp) = check_body_size(&parts.headers, state.config.http.max_body_size) {
        return Ok(with_cors(resp, api && enable_cors));
    }

    // 3. Extract headers for conditional requests
    let ctx = RequestContext {
        path,
        is_head: parts.method == Method::HEAD,
        if_none_match: parts
            .headers
            .get(IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
    };

    // 4. Dispatch
    let response = if api {
        route_api(&ctx, &state).await
    } else {
        route_frontend(&ctx, &state).await
    };
    Ok(with_cors(response, api && enable_cors))
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(
    method: &Method,
    api: bool,
    enable_cors: bool,
) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(api && enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response(api))
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get(CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Route a request under the API prefix
async fn route_api(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    match ApiRoute::parse(ctx.path) {
        Some(ApiRoute::Health) => games::health(ctx),
        Some(ApiRoute::Games) => games::list_games(ctx, &state.storage).await,
        Some(ApiRoute::Game(id)) => games::get_game(ctx, &state.storage, id).await,
        None => fallback::api_not_found(ctx),
    }
}

/// Serve a matching asset, otherwise the SPA entry document
async fn route_frontend(
    ctx: &RequestContext<'_>,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    let frontend = &state.config.frontend;
    match static_files::serve_asset(ctx, frontend).await {
        Some(response) => response,
        None => fallback::serve_entry_document(ctx, frontend).await,
    }
}

fn with_cors(mut response: Response<Full<Bytes>>, cors: bool) -> Response<Full<Bytes>> {
    if cors {
        http::apply_cors(&mut response);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_route_parse() {
        assert_eq!(ApiRoute::parse("/api/health"), Some(ApiRoute::Health));
        assert_eq!(ApiRoute::parse("/api/games"), Some(ApiRoute::Games));
        assert_eq!(ApiRoute::parse("/api/games/17"), Some(ApiRoute::Game(17)));
        assert_eq!(ApiRoute::parse("/api/games/007"), Some(ApiRoute::Game(7)));
    }

    #[test]
    fn test_non_integer_ids_do_not_match() {
        for path in [
            "/api/games/",
            "/api/games/abc",
            "/api/games/-1",
            "/api/games/+1",
            "/api/games/1.5",
            "/api/games/1/",
            "/api/games/1/screenshots",
            "/api/games/99999999999999999999",
        ] {
            assert_eq!(ApiRoute::parse(path), None, "{path} should not match");
        }
    }

    #[test]
    fn test_unknown_api_paths_do_not_match() {
        assert_eq!(ApiRoute::parse("/api"), None);
        assert_eq!(ApiRoute::parse("/api/nonexistent"), None);
        assert_eq!(ApiRoute::parse("/api/health/"), None);
        assert_eq!(ApiRoute::parse("/games"), None);
    }

    #[test]
    fn test_is_api_path() {
        assert!(is_api_path("/api"));
        assert!(is_api_path("/api/"));
        assert!(is_api_path("/api/unknown/path"));
        assert!(!is_api_path("/apiary"));
        assert!(!is_api_path("/games/api"));
        assert!(!is_api_path("/"));
    }

    #[test]
    fn test_method_check() {
        assert!(check_http_method(&Method::GET, true, true).is_none());
        assert!(check_http_method(&Method::HEAD, false, true).is_none());
        assert_eq!(
            check_http_method(&Method::POST, true, true).unwrap().status(),
            405
        );
        assert_eq!(
            check_http_method(&Method::OPTIONS, true, true).unwrap().status(),
            204
        );
    }

    #[test]
    fn test_body_size_check() {
        let mut headers = HeaderMap::new();
        assert!(check_body_size(&headers, 10).is_none());

        headers.insert(CONTENT_LENGTH, "11".parse().unwrap());
        assert_eq!(check_body_size(&headers, 10).unwrap().status(), 413);

        headers.insert(CONTENT_LENGTH, "bogus".parse().unwrap());
        assert!(check_body_size(&headers, 10).is_none());
    }
}
