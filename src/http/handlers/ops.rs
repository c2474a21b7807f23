use crate::http::error::ApiError;
use crate::queue::jobs;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use serde_json::json;

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn jobs_status(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut out = serde_json::Map::new();
    for queue in jobs::QUEUES {
        let counts = state
            .queue
            .counts(queue)
            .await
            .map_err(ApiError::Internal)?;
        out.insert(queue.to_string(), serde_json::to_value(counts)?);
    }

    Ok(Json(serde_json::Value::Object(out)))
}
