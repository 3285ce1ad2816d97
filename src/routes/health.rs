//! Liveness endpoint

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

/// Reports the active rate table version alongside the status
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "rateTableVersion": state.pricing.rates().version,
    }))
}
