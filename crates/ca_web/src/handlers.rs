use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ca_core::config::DEFAULT_MODEL;
use ca_core::Note;
use ca_feeds::select_top;
use ca_inference::generate_note;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::AppState;

pub const DEFAULT_COUNT: i64 = 5;

#[derive(Debug, Deserialize)]
pub struct DailyParams {
    pub n: Option<i64>,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DailyResponse {
    pub count: usize,
    pub notes: Vec<Note>,
}

/// Pipeline errors that escape a handler. Feed and extraction
/// failures never reach this; only generation failures do, and they
/// fail the whole request.
pub struct ApiError(ca_core::Error);

impl From<ca_core::Error> for ApiError {
    fn from(err: ca_core::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": self.0.to_string()})),
        )
            .into_response()
    }
}

pub async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "UPSC Current Affairs API. Use /daily?n=5 or open your static frontend."
    }))
}

/// Run the full pipeline: aggregate every configured feed, rank by
/// article length, and generate one note per selected article in
/// ranked order.
pub async fn daily(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DailyParams>,
) -> Result<Json<DailyResponse>, ApiError> {
    let n = params.n.unwrap_or(DEFAULT_COUNT);
    let model_name = params.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let aggregated = state.aggregator.aggregate().await;
    let selected = select_top(aggregated, n);
    info!(
        requested = n,
        selected = selected.len(),
        model = %model_name,
        "generating notes"
    );

    let mut notes = Vec::with_capacity(selected.len());
    for article in &selected {
        notes.push(generate_note(state.model.as_ref(), article, &model_name).await?);
    }

    Ok(Json(DailyResponse {
        count: notes.len(),
        notes,
    }))
}
