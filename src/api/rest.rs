//! REST API for the sales dashboard.
//!
//! Endpoints:
//! - `GET  /` - service description
//! - `GET  /api/health` - liveness check
//! - `POST /api/data/load` - reload the sales table from the CSV feed
//! - `GET  /api/data/all` - every record
//! - `GET  /api/analytics/summary` - overall totals
//! - `GET  /api/analytics/categories` - totals per category
//! - `GET  /api/analytics/regions` - totals per region
//! - `GET  /api/analytics/customers?limit=N` - top customers by spend
//! - `GET  /api/analytics/products?limit=N` - top products by sales
//! - `GET  /api/database/info` - store diagnostics

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::cors::cors_layer;
use super::response::*;
use crate::analytics::parse_limit;
use crate::config::ServerConfig;
use crate::interfaces::SalesStore;
use crate::loader::Loader;

/// Routes listed by the index endpoint.
const ENDPOINTS: &[&str] = &[
    "/api/health",
    "/api/data/load (POST)",
    "/api/data/all",
    "/api/analytics/summary",
    "/api/analytics/categories",
    "/api/analytics/regions",
    "/api/analytics/customers?limit=N",
    "/api/analytics/products?limit=N",
    "/api/database/info",
];

/// Shared state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SalesStore>,
    pub loader: Arc<Loader>,
}

impl AppState {
    pub fn new(store: Arc<dyn SalesStore>, loader: Loader) -> Self {
        Self {
            store,
            loader: Arc::new(loader),
        }
    }
}

/// Serve the API on the configured address until Ctrl+C.
pub async fn serve(
    state: AppState,
    config: &ServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = router(state, &config.cors_origins);
    let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "sales API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("sales API stopped");
    Ok(())
}

/// Build the axum router (separated for testing).
pub fn router<S: AsRef<str>>(state: AppState, cors_origins: &[S]) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/data/load", post(load_data))
        .route("/api/data/all", get(all_records))
        .route("/api/analytics/summary", get(summary))
        .route("/api/analytics/categories", get(categories))
        .route("/api/analytics/regions", get(regions))
        .route("/api/analytics/customers", get(top_customers))
        .route("/api/analytics/products", get(top_products))
        .route("/api/database/info", get(database_info))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
}

// ============================================================================
// Handlers
// ============================================================================

#[derive(Debug, Deserialize)]
struct LimitParams {
    limit: Option<String>,
}

async fn index(State(state): State<AppState>) -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Sales Dashboard API",
        version: env!("CARGO_PKG_VERSION"),
        database: state.store.engine(),
        endpoints: ENDPOINTS,
    })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "API is healthy and running!",
    })
}

async fn load_data(State(state): State<AppState>) -> Result<Json<LoadResponse>, ApiError> {
    let report = state.loader.load_default().await.map_err(|e| {
        error!(error = %e, "data load failed");
        ApiError::internal("Failed to load data into the database. Check the server logs.")
    })?;

    Ok(Json(LoadResponse {
        status: SUCCESS,
        message: format!(
            "Data loaded successfully. {} records inserted.",
            report.records_inserted
        ),
        report,
    }))
}

async fn all_records(State(state): State<AppState>) -> Result<Response, ApiError> {
    let records = state.store.all_records().await.map_err(|e| {
        error!(error = %e, "failed to fetch sales records");
        ApiError::internal(format!("Failed to fetch sales data: {}", e))
    })?;

    let body = RecordsResponse {
        status: SUCCESS,
        count: records.len(),
        data: records.iter().map(|r| r.view()).collect(),
    };
    Ok(Json(body).into_response())
}

async fn summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, ApiError> {
    let summary = state.store.summary().await.map_err(|e| {
        error!(error = %e, "failed to build sales summary");
        ApiError::internal(format!("Failed to build sales summary: {}", e))
    })?;

    Ok(Json(SummaryResponse {
        status: SUCCESS,
        summary,
    }))
}

async fn categories(State(state): State<AppState>) -> Result<Json<CategoriesResponse>, ApiError> {
    let categories = state.store.by_category().await.map_err(|e| {
        error!(error = %e, "failed to get sales by category");
        ApiError::internal("Internal server error while fetching sales by category.")
    })?;

    Ok(Json(CategoriesResponse {
        status: SUCCESS,
        categories,
    }))
}

async fn regions(State(state): State<AppState>) -> Result<Json<RegionsResponse>, ApiError> {
    let regions = state.store.by_region().await.map_err(|e| {
        error!(error = %e, "failed to get regional performance");
        ApiError::internal("Internal server error while fetching regional performance.")
    })?;

    Ok(Json(RegionsResponse {
        status: SUCCESS,
        regions,
    }))
}

async fn top_customers(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Result<Json<CustomersResponse>, ApiError> {
    let limit = parse_limit(params.limit.as_deref());
    let customers = state.store.top_customers(limit).await.map_err(|e| {
        error!(error = %e, limit, "failed to get top customers");
        ApiError::internal("Internal server error while fetching top customers.")
    })?;

    Ok(Json(CustomersResponse {
        status: SUCCESS,
        customers,
    }))
}

async fn top_products(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Result<Json<ProductsResponse>, ApiError> {
    let limit = parse_limit(params.limit.as_deref());
    let products = state.store.top_products(limit).await.map_err(|e| {
        error!(error = %e, limit, "failed to get top products");
        ApiError::internal("Internal server error while fetching top products.")
    })?;

    Ok(Json(ProductsResponse {
        status: SUCCESS,
        products,
    }))
}

async fn database_info(
    State(state): State<AppState>,
) -> Result<Json<DatabaseInfoResponse>, ApiError> {
    let info = state.store.info().await.map_err(|e| {
        error!(error = %e, "failed to get database info");
        ApiError::connection(format!(
            "Failed to get database information: {}. Check the database connection.",
            e
        ))
    })?;

    Ok(Json(info.into()))
}
