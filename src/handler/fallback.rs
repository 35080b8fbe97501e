//! Fallback responses for requests no route or asset claimed.
//!
//! Unknown API paths get a JSON 404; everything else gets the SPA entry
//! document so the client-side router can take over.

use crate::config::FrontendConfig;
use crate::handler::router::RequestContext;
use crate::handler::static_files;
use crate::http::{json_error, CachePolicy, ErrorBody};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use tokio::fs;

const NOT_FOUND_MESSAGE: &str = "The requested URL was not found on the server.";
const HTML: &str = "text/html; charset=utf-8";

/// JSON 404 for a path under the API prefix that matched no route
pub fn api_not_found(ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
    json_error(
        StatusCode::NOT_FOUND,
        &ErrorBody::new("Not Found").with_message(NOT_FOUND_MESSAGE),
        ctx.is_head,
    )
}

/// Serve the entry document, or a JSON 500 when the bundle has not been built
pub async fn serve_entry_document(
    ctx: &RequestContext<'_>,
    frontend: &FrontendConfig,
) -> Response<Full<Bytes>> {
    let path = frontend.entry_path();
    match fs::read(&path).await {
        Ok(data) => static_files::build_static_file_response(
            data,
            HTML,
            ctx.if_none_match.as_deref(),
            ctx.is_head,
            CachePolicy::ENTRY_DOCUMENT,
        ),
        Err(e) => {
            logger::log_error(&format!(
                "Frontend entry document not found at '{}' ({e}); build the frontend first",
                path.display()
            ));
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ErrorBody::new("Internal Server Error")
                    .with_message("Frontend entry document is missing"),
                ctx.is_head,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use tempfile::TempDir;

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
        }
    }

    fn frontend(root: &str) -> FrontendConfig {
        FrontendConfig {
            root: root.to_string(),
            entry_document: "index.html".to_string(),
            index_files: vec!["index.html".to_string()],
        }
    }

    #[tokio::test]
    async fn test_api_not_found_body() {
        let response = api_not_found(&ctx("/api/nonexistent"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(
            &body[..],
            br#"{"error":"Not Found","message":"The requested URL was not found on the server."}"#
        );
    }

    #[tokio::test]
    async fn test_entry_document_served_for_any_path() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>spa</html>").unwrap();
        let frontend = frontend(&dir.path().to_string_lossy());

        let response = serve_entry_document(&ctx("/unknown/path"), &frontend).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], HTML);
        assert_eq!(response.headers()["cache-control"], "no-cache");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"<html>spa</html>");
    }

    #[tokio::test]
    async fn test_missing_entry_document_is_server_error() {
        let dir = TempDir::new().unwrap();
        let frontend = frontend(&dir.path().join("build").to_string_lossy());

        let response = serve_entry_document(&ctx("/games/3"), &frontend).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()["content-type"], "application/json");
    }
}
