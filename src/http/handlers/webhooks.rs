use crate::domain::merchant::Merchant;
use crate::domain::webhook::WebhookLog;
use crate::http::error::ApiError;
use crate::http::pagination::{page_params, ListResponse, PageQuery};
use crate::queue::jobs::{self, JobPayload};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use uuid::Uuid;

pub async fn list_webhooks(
    State(state): State<AppState>,
    Extension(merchant): Extension<Merchant>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListResponse<WebhookLog>>, ApiError> {
    let (limit, offset) = page_params(&query);
    let data = state
        .webhook_logs_repo
        .list(merchant.id, limit, offset)
        .await?;
    let total = state.webhook_logs_repo.count(merchant.id).await?;

    Ok(Json(ListResponse {
        data,
        total,
        limit,
        offset,
    }))
}

/// Manual retry: a fresh schedule with the attempt counter reset, enqueued
/// immediately.
pub async fn retry_webhook(
    State(state): State<AppState>,
    Extension(merchant): Extension<Merchant>,
    Path(log_id): Path<Uuid>,
) -> Result<Json<WebhookLog>, ApiError> {
    let log = state
        .webhook_logs_repo
        .reset_for_retry(log_id, merchant.id)
        .await?
        .ok_or(ApiError::NotFound("webhook log"))?;

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

    Ok(Json(log))
}
