//! HTTP API for inventory items.
//!
//! Exposes item CRUD, the per-item audit log, search and analytics over any
//! [`ItemStore`]. Handlers are thin: every rule lives in [`ItemService`], and
//! this crate only maps its errors onto status codes.

mod error;

pub use error::AppError;

use anyhow::Result;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stockpile_core::{
    Analytics, AuditEntry, Item, ItemFilter, ItemService, ItemStore, ItemUpdate, NewItem,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

type SharedService<S> = Arc<ItemService<S>>;

/// Build the application router over an item service.
pub fn router<S: ItemStore + 'static>(service: ItemService<S>) -> Router {
    let state: SharedService<S> = Arc::new(service);

    Router::new()
        .route("/health", get(health))
        .route("/items", get(list_items::<S>).post(create_item::<S>))
        .route(
            "/items/{id}",
            get(get_item::<S>)
                .put(update_item::<S>)
                .delete(delete_item::<S>),
        )
        .route("/items/{id}/audit", get(get_audit_log::<S>))
        .route("/search", get(search::<S>))
        .route("/advanced-search", get(advanced_search::<S>))
        .route("/analytics", get(analytics::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the inventory server.
///
/// # Errors
/// Returns error if binding fails or server encounters an error.
pub async fn serve<S: ItemStore + 'static>(
    service: ItemService<S>,
    host: &str,
    port: u16,
) -> Result<()> {
    let app = router(service);

    let addr = format!("{host}:{port}");
    info!(address = %addr, "Starting inventory server");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Request/Response types ---

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    query: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdvancedSearchParams {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    min_price: Option<String>,
    #[serde(default)]
    max_price: Option<String>,
    /// Comma-separated tags the item must all carry.
    #[serde(default)]
    tags: Option<String>,
}

// --- Handlers ---

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn create_item<S: ItemStore>(
    State(service): State<SharedService<S>>,
    payload: Result<Json<NewItem>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>), AppError> {
    let Json(new_item) = payload?;
    let item = service.create_item(new_item)?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn list_items<S: ItemStore>(
    State(service): State<SharedService<S>>,
) -> Result<Json<Vec<Item>>, AppError> {
    Ok(Json(service.list_items()?))
}

async fn get_item<S: ItemStore>(
    State(service): State<SharedService<S>>,
    Path(id): Path<String>,
) -> Result<Json<Item>, AppError> {
    Ok(Json(service.get_item(&id)?))
}

async fn update_item<S: ItemStore>(
    State(service): State<SharedService<S>>,
    Path(id): Path<String>,
    payload: Result<Json<ItemUpdate>, JsonRejection>,
) -> Result<Json<Item>, AppError> {
    // An unknown id is reported before a malformed body.
    service.get_item(&id)?;
    let Json(update) = payload?;
    Ok(Json(service.update_item(&id, &update)?))
}

async fn delete_item<S: ItemStore>(
    State(service): State<SharedService<S>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    service.delete_item(&id)?;
    Ok(Json(MessageResponse {
        message: "Item deleted successfully",
    }))
}

async fn get_audit_log<S: ItemStore>(
    State(service): State<SharedService<S>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<AuditEntry>>, AppError> {
    Ok(Json(service.audit_log(&id)?))
}

async fn search<S: ItemStore>(
    State(service): State<SharedService<S>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Item>>, AppError> {
    let Query(params) = params?;
    let query = params.query.unwrap_or_default();
    Ok(Json(service.search(&query)?))
}

async fn advanced_search<S: ItemStore>(
    State(service): State<SharedService<S>>,
    params: Result<Query<AdvancedSearchParams>, QueryRejection>,
) -> Result<Json<Vec<Item>>, AppError> {
    let Query(params) = params?;
    let filter = ItemFilter::from_params(
        params.query.as_deref(),
        params.category.as_deref(),
        params.min_price.as_deref(),
        params.max_price.as_deref(),
        params.tags.as_deref(),
    )?;
    Ok(Json(service.advanced_search(&filter)?))
}

async fn analytics<S: ItemStore>(
    State(service): State<SharedService<S>>,
) -> Result<Json<Analytics>, AppError> {
    Ok(Json(service.analytics()?))
}
