//! HTTP API facade
//!
//! Exposes the resolver over two endpoints:
//!
//! - `GET /api/image?name=<item>` — resolve an image URL; `400` when the
//!   name is missing or empty, `500` on unexpected internal failure.
//! - `POST /api/cache` — cache administration: `{"action": "clear"}`,
//!   `{"action": "delete", "name": ...}`, or any other body for the
//!   diagnostic snapshot.

use crate::config::Config;
use crate::resolver::Resolver;
use crate::{ConfigError, MedImageError, Result};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;

/// Builds the API router around a shared resolver
pub fn router(resolver: Arc<Resolver>) -> Router {
    Router::new()
        .route("/api/image", get(resolve_image))
        .route("/api/cache", post(cache_admin))
        .with_state(resolver)
}

/// Binds the configured address and serves the API until shutdown
pub async fn serve(config: &Config, resolver: Arc<Resolver>) -> Result<()> {
    let addr: SocketAddr = config.server.bind_address.parse().map_err(|e| {
        MedImageError::Config(ConfigError::Validation(format!(
            "bind_address '{}' is not a valid socket address: {}",
            config.server.bind_address, e
        )))
    })?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API listening on {}", listener.local_addr()?);

    axum::serve(listener, router(resolver)).await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct ImageQuery {
    #[serde(default)]
    name: String,
}

async fn resolve_image(
    State(resolver): State<Arc<Resolver>>,
    Query(query): Query<ImageQuery>,
) -> impl IntoResponse {
    match resolver.resolve(&query.name).await {
        Ok(resolution) => (
            StatusCode::OK,
            Json(json!({
                "imageUrl": resolution.image_url,
                "source": resolution.source.as_str(),
            })),
        ),
        Err(MedImageError::MissingParameter(param)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!("Missing required parameter: {}", param),
            })),
        ),
        Err(e) => {
            tracing::error!("Resolve failed unexpectedly: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to resolve image" })),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
struct CacheRequest {
    action: Option<String>,
    name: Option<String>,
}

async fn cache_admin(
    State(resolver): State<Arc<Resolver>>,
    Json(request): Json<CacheRequest>,
) -> impl IntoResponse {
    match request.action.as_deref() {
        Some("clear") => {
            let deleted = resolver.clear_cache();
            Json(json!({
                "message": "Cache cleared",
                "deletedCount": deleted,
            }))
            .into_response()
        }

        Some("delete") => match request.name {
            Some(name) => {
                let existed = resolver.delete_cache_entry(&name);
                Json(json!({
                    "message": "Cache entry deleted",
                    "existed": existed,
                }))
                .into_response()
            }
            None => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "delete action requires a name" })),
            )
                .into_response(),
        },

        // No action / unknown action: diagnostic snapshot
        _ => {
            let entries: Vec<serde_json::Value> = resolver
                .cache_snapshot()
                .into_iter()
                .map(|entry| {
                    json!({
                        "name": entry.name,
                        "hasImage": entry.has_image,
                        "imagePreview": entry.url_preview,
                        "ageMinutes": entry.age_minutes,
                    })
                })
                .collect();

            Json(json!({
                "size": resolver.cache_size(),
                "entries": entries,
            }))
            .into_response()
        }
    }
}
