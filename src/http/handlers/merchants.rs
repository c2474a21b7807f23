use crate::domain::ids;
use crate::domain::merchant::{Merchant, MerchantProfile};
use crate::domain::webhook::{self, EVENT_TEST_WEBHOOK};
use crate::http::error::ApiError;
use crate::queue::jobs::{self, JobPayload};
use crate::AppState;
use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;

pub async fn get_profile(
    Extension(merchant): Extension<Merchant>,
) -> Result<Json<MerchantProfile>, ApiError> {
    Ok(Json(merchant.into()))
}

#[derive(Debug, Deserialize)]
pub struct UpdateWebhookRequest {
    pub webhook_url: String,
}

pub async fn update_webhook(
    State(state): State<AppState>,
    Extension(merchant): Extension<Merchant>,
    Json(req): Json<UpdateWebhookRequest>,
) -> Result<Json<MerchantProfile>, ApiError> {
    let url = req.webhook_url.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ApiError::BadRequest(
            "webhook_url must be an http(s) URL".to_string(),
        ));
    }

    state.merchants_repo.set_webhook_url(merchant.id, url).await?;
    if merchant.webhook_secret.is_none() {
        state
            .merchants_repo
            .set_webhook_secret(merchant.id, &ids::webhook_secret())
            .await?;
    }

    let updated = state
        .merchants_repo
        .get(merchant.id)
        .await?
        .ok_or(ApiError::NotFound("merchant"))?;

    Ok(Json(updated.into()))
}

pub async fn regenerate_webhook_secret(
    State(state): State<AppState>,
    Extension(merchant): Extension<Merchant>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let secret = ids::webhook_secret();
    state
        .merchants_repo
        .set_webhook_secret(merchant.id, &secret)
        .await?;

    Ok(Json(json!({ "webhook_secret": secret })))
}

pub async fn send_test_webhook(
    State(state): State<AppState>,
    Extension(merchant): Extension<Merchant>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if merchant.webhook_url.is_none() {
        return Err(ApiError::BadRequest(
            "webhook_url is not configured".to_string(),
        ));
    }

    // Logged before the enqueue, like worker fan-out, so a lost job is
    // recoverable from the pending row.
    let log = state
        .webhook_logs_repo
        .insert(merchant.id, EVENT_TEST_WEBHOOK, &webhook::test_event_data())
        .await?;
    state
        .queue
        .enqueue(
            jobs::WEBHOOK_QUEUE,
            JobPayload::DeliverWebhook {
                log_id: Some(log.id),
                merchant_id: log.merchant_id,
                event: log.event.clone(),
                data: log.payload.clone(),
            },
            0,
        )
        .await?;

    Ok(Json(json!({ "message": "test webhook queued" })))
}
