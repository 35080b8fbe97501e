//! HTTP response building module
//!
//! Builders for the JSON API payloads, asset responses, and the status-only
//! responses, decoupled from routing.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{self, HeaderValue};
use hyper::{Response, StatusCode};
use serde::Serialize;

use super::cache::CachePolicy;

const JSON: &str = "application/json";

/// Body of every JSON error response
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl<'a> ErrorBody<'a> {
    pub const fn new(error: &'a str) -> Self {
        Self {
            error,
            message: None,
            details: None,
        }
    }

    #[must_use]
    pub const fn with_message(mut self, message: &'a str) -> Self {
        self.message = Some(message);
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Build JSON response (compact encoding)
pub fn json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let json = match serde_json::to_vec(body) {
        Ok(j) => j,
        Err(e) => {
            log_error(&format!("Failed to serialize response: {e}"));
            return Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header(header::CONTENT_TYPE, JSON)
                .body(Full::new(Bytes::from_static(
                    br#"{"error":"Internal Server Error"}"#,
                )))
                .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Error"))));
        }
    };

    let content_length = json.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(json)
    };

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, JSON)
        .header(header::CONTENT_LENGTH, content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::from("Error")))
        })
}

/// JSON error response with the given status
pub fn json_error(status: StatusCode, body: &ErrorBody<'_>, is_head: bool) -> Response<Full<Bytes>> {
    json_response(status, body, is_head)
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str, policy: CachePolicy) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(header::ETAG, etag)
        .header(header::CACHE_CONTROL, policy.to_header_value())
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 405 Method Not Allowed response; JSON under the API prefix
pub fn build_405_response(as_json: bool) -> Response<Full<Bytes>> {
    let mut response = if as_json {
        json_error(
            StatusCode::METHOD_NOT_ALLOWED,
            &ErrorBody::new("Method Not Allowed")
                .with_message("The method is not allowed for the requested URL."),
            false,
        )
    } else {
        Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Full::new(Bytes::from("405 Method Not Allowed")))
            .unwrap_or_else(|e| {
                log_build_error("405", &e);
                Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
            })
    };
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static("GET, HEAD, OPTIONS"));
    response
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(header::ALLOW, "GET, HEAD, OPTIONS");

    if enable_cors {
        builder = builder
            .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
            .header(header::ACCESS_CONTROL_ALLOW_METHODS, "GET, HEAD, OPTIONS")
            .header(header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type")
            .header(header::ACCESS_CONTROL_MAX_AGE, "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    json_error(
        StatusCode::PAYLOAD_TOO_LARGE,
        &ErrorBody::new("Payload Too Large"),
        false,
    )
}

/// Build a 200 response for a file from the asset tree
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    policy: CachePolicy,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, content_length)
        .header(header::ETAG, etag)
        .header(header::CACHE_CONTROL, policy.to_header_value())
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Allow any origin on an API response
pub fn apply_cors(response: &mut Response<Full<Bytes>>) {
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
}

fn log_error(message: &str) {
    crate::logger::log_error(message);
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_error_body_omits_unset_fields() {
        let response = json_error(StatusCode::NOT_FOUND, &ErrorBody::new("Game not found"), false);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::CONTENT_TYPE], JSON);
        assert_eq!(body_string(response).await, r#"{"error":"Game not found"}"#);
    }

    #[tokio::test]
    async fn test_error_body_field_order() {
        let body = ErrorBody::new("Failed to retrieve games").with_details("disk I/O error");
        let response = json_error(StatusCode::INTERNAL_SERVER_ERROR, &body, false);
        assert_eq!(
            body_string(response).await,
            r#"{"error":"Failed to retrieve games","details":"disk I/O error"}"#
        );
    }

    #[tokio::test]
    async fn test_head_keeps_length_drops_body() {
        let response = json_error(StatusCode::NOT_FOUND, &ErrorBody::new("Game not found"), true);
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "26");
        assert!(body_string(response).await.is_empty());
    }

    #[test]
    fn test_options_response_cors_headers() {
        let response = build_options_response(true);
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let response = build_options_response(false);
        assert!(!response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[test]
    fn test_405_variants() {
        let api = build_405_response(true);
        assert_eq!(api.headers()[header::CONTENT_TYPE], JSON);
        assert_eq!(api.headers()[header::ALLOW], "GET, HEAD, OPTIONS");

        let page = build_405_response(false);
        assert_eq!(page.headers()[header::CONTENT_TYPE], "text/plain");
    }
}
