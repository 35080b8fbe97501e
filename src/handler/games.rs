//! JSON API handlers for the catalog.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;

use crate::handler::router::RequestContext;
use crate::http::{json_error, json_response, ErrorBody};
use crate::logger;
use crate::storage::Storage;

/// Liveness payload
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub message: &'static str,
}

pub const HEALTHY: HealthStatus = HealthStatus {
    status: "healthy",
    message: "Backend is running",
};

/// `GET /api/health`; never touches the store
pub fn health(ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &HEALTHY, ctx.is_head)
}

/// `GET /api/games`
pub async fn list_games(ctx: &RequestContext<'_>, storage: &Arc<Storage>) -> Response<Full<Bytes>> {
    match storage.run(|session| session.list_games()).await {
        Ok(games) => json_response(StatusCode::OK, &games, ctx.is_head),
        Err(e) => {
            logger::log_error(&format!("Error fetching games: {e}"));
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ErrorBody::new("Failed to retrieve games").with_details(e.to_string()),
                ctx.is_head,
            )
        }
    }
}

/// `GET /api/games/{id}`
pub async fn get_game(
    ctx: &RequestContext<'_>,
    storage: &Arc<Storage>,
    id: i64,
) -> Response<Full<Bytes>> {
    match storage.run(move |session| session.get_game(id)).await {
        Ok(Some(game)) => json_response(StatusCode::OK, &game, ctx.is_head),
        Ok(None) => json_error(
            StatusCode::NOT_FOUND,
            &ErrorBody::new("Game not found"),
            ctx.is_head,
        ),
        Err(e) => {
            logger::log_error(&format!("Error fetching game ID {id}: {e}"));
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ErrorBody::new("Failed to retrieve game details").with_details(e.to_string()),
                ctx.is_head,
            )
        }
    }
}
