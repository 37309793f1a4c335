//! HTTP transport layer.
//!
//! A thin axum surface over one shared [`Resolver`]: parse the request,
//! delegate, serialize the result. Resolution itself never fails, so the
//! only error responses here are for malformed uploads.
//!
//! Routes:
//! - `GET  /preview?n=`  - snapshot metadata and leading rows
//! - `POST /resolve`     - single-lead resolution
//! - `POST /upload`      - multipart CSV batch, resolved in row order

use std::sync::Arc;

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::resolver::{LeadSummary, MatchResult, Resolver};
use crate::store::{StorePreview, DEFAULT_PREVIEW_ROWS};
use crate::{ingest, MATCH_THRESHOLD};

/// Single-lead resolution request body.
#[derive(Debug, Deserialize)]
pub struct LeadInput {
    /// Raw lead text, e.g. `"mr. john smith at acme inc"`.
    pub raw_text: String,
    /// Optional override of the acceptance threshold.
    #[serde(default)]
    pub threshold: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct PreviewParams {
    n: Option<usize>,
}

/// API error body: a status code and a JSON `{"error": ...}` payload.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Builds the application router over a shared resolver.
#[must_use]
pub fn router(resolver: Arc<Resolver>) -> Router {
    Router::new()
        .route("/preview", get(preview))
        .route("/resolve", post(resolve))
        .route("/upload", post(upload))
        .layer(TraceLayer::new_for_http())
        .with_state(resolver)
}

async fn preview(
    State(resolver): State<Arc<Resolver>>,
    Query(params): Query<PreviewParams>,
) -> Json<StorePreview> {
    let n = params.n.unwrap_or(DEFAULT_PREVIEW_ROWS);
    Json(resolver.preview(n))
}

async fn resolve(
    State(resolver): State<Arc<Resolver>>,
    Json(input): Json<LeadInput>,
) -> Json<MatchResult> {
    let threshold = input.threshold.unwrap_or(MATCH_THRESHOLD);
    Json(resolver.resolve_with_threshold(&input.raw_text, threshold))
}

async fn upload(
    State(resolver): State<Arc<Resolver>>,
    mut multipart: Multipart,
) -> Result<Json<Vec<LeadSummary>>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart body: {e}")))?
    {
        let is_file = field.file_name().is_some() || field.name() == Some("file");
        if !is_file {
            continue;
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("failed to read upload: {e}")))?;
        let texts = ingest::read_lead_texts(data.as_ref())
            .map_err(|e| ApiError::bad_request(e.to_string()))?;

        info!(rows = texts.len(), "resolving uploaded lead batch");
        return Ok(Json(resolver.bulk_resolve(&texts)));
    }

    Err(ApiError::bad_request("no file field in multipart body"))
}
