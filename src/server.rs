use crate::app::{AyahService, CategoryListing, HealthReport};
use crate::error::AyahError;
use crate::selection::CategoryFallback;
use crate::templates::{LoadingPage, VersePage};
use crate::types::CachedVerse;
use askama::Template;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use hyper::Server;
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AyahService>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    pub category: Option<String>,
}

/// JSON error reply with an explicit status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: Value,
}

impl ApiError {
    fn new(status: StatusCode, error: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": error, "message": message.into() }),
        }
    }

    /// Maps a direct-fetch failure: unknown category is the caller's fault,
    /// everything else is ours.
    fn from_fetch(err: AyahError, error: &str) -> Self {
        match err {
            AyahError::InvalidCategory { available, .. } => Self {
                status: StatusCode::BAD_REQUEST,
                body: json!({ "error": "Invalid category", "availableCategories": available }),
            },
            other => Self::new(StatusCode::INTERNAL_SERVER_ERROR, error, other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Cached record with `cached: true` and the slot's install time.
fn current_payload(verse: &CachedVerse) -> Value {
    let mut body = serde_json::to_value(&verse.record).unwrap_or_else(|_| json!({}));
    if let Some(obj) = body.as_object_mut() {
        obj.insert("cached".into(), Value::Bool(true));
        obj.insert("lastUpdated".into(), json!(verse.last_updated));
    }
    body
}

async fn current_ayah(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let verse = state.service.current_or_refresh().await.map_err(|e| {
        ApiError::new(
            StatusCode::NOT_FOUND,
            "No current ayah available",
            format!("Initial fetch failed: {}", e),
        )
    })?;
    Ok(Json(current_payload(&verse)))
}

async fn ayah_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let category = category.to_lowercase();
    let record = state
        .service
        .verse_for_category(&category)
        .await
        .map_err(|e| {
            if e.is_upstream() {
                error!(%category, error = %e, "Error fetching categorized ayah");
            }
            ApiError::from_fetch(e, "Failed to fetch ayah")
        })?;
    Ok(Json(json!(record)))
}

async fn categories(State(state): State<AppState>) -> Json<CategoryListing> {
    Json(state.service.categories())
}

/// Non-JSON or empty bodies mean "no category"; a JSON body that does not
/// parse is rejected.
fn parse_refresh_body(headers: &HeaderMap, body: &[u8]) -> Result<RefreshRequest, ApiError> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase().contains("json"))
        .unwrap_or(false);
    if !is_json || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RefreshRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "Rejected malformed refresh body");
        ApiError::new(StatusCode::BAD_REQUEST, "Invalid request body", e.to_string())
    })
}

async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let request = parse_refresh_body(&headers, &body)?;
    let verse = state
        .service
        .refresh(request.category.as_deref(), CategoryFallback::Random)
        .await
        .map_err(|e| ApiError::from_fetch(e, "Failed to refresh ayah"))?;

    Ok(Json(json!({
        "message": "Ayah refreshed successfully",
        "ayah": verse.record,
        "backgroundImage": verse.record.background_image,
    })))
}

async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.service.health().await)
}

fn render(page: impl Template) -> Response {
    match page.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(error = %e, "Template rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Template rendering failed").into_response()
        }
    }
}

async fn index(State(state): State<AppState>) -> Response {
    match state.service.current_or_refresh().await {
        Ok(verse) => render(VersePage::new(&verse)),
        Err(e) => {
            warn!(error = %e, "No verse available for page, serving loading screen");
            render(LoadingPage::default())
        }
    }
}

/// Builds the router with all routes and a permissive CORS layer.
pub fn create_server(service: Arc<AyahService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/api/current-ayah", get(current_ayah))
        .route("/api/ayah/:category", get(ayah_by_category))
        .route("/api/categories", get(categories))
        .route("/api/refresh", post(refresh))
        .route("/health", get(health))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(AppState { service })
}

/// Start the HTTP server on the specified port
pub async fn start_server(service: Arc<AyahService>, port: u16) -> anyhow::Result<()> {
    let app = create_server(service);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("Quran Quote API running on http://localhost:{port}");
    info!("Current ayah: http://localhost:{port}/api/current-ayah");
    info!("Categories:   http://localhost:{port}/api/categories");

    Server::bind(&addr).serve(app.into_make_service()).await?;
    Ok(())
}
