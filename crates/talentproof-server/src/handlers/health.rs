//! Liveness probe.

use axum::Json;
use serde_json::{Value, json};

pub async fn handler() -> Json<Value> {
  Json(json!({ "success": true, "status": "ok" }))
}
