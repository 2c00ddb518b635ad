/// API Request Handlers

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use super::store::TvlStore;

/// GET /tvl/:protocol
///
/// Unknown protocols answer 200 with an error object instead of a series.
pub async fn get_tvl(
    State(store): State<Arc<TvlStore>>,
    Path(protocol): Path<String>,
) -> Response {
    match store.get(&protocol) {
        Some(series) => Json(series.clone()).into_response(),
        None => {
            tracing::warn!(%protocol, "no TVL data for protocol");
            Json(json!({ "error": "No TVL data found" })).into_response()
        }
    }
}

/// GET /health
pub async fn health_check(State(store): State<Arc<TvlStore>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "protocols": store.len(),
    }))
}
