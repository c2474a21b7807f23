use crate::domain::merchant::Merchant;
use crate::domain::refund::{CreateRefundRequest, Refund};
use crate::http::error::ApiError;
use crate::http::pagination::{page_params, ListResponse, PageQuery};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};

pub async fn create_refund(
    State(state): State<AppState>,
    Extension(merchant): Extension<Merchant>,
    Path(payment_id): Path<String>,
    Json(req): Json<CreateRefundRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let refund = state
        .payment_service
        .create_refund(&merchant, &payment_id, req)
        .await?;

    Ok((StatusCode::CREATED, Json(refund)))
}

pub async fn get_refund(
    State(state): State<AppState>,
    Extension(merchant): Extension<Merchant>,
    Path(refund_id): Path<String>,
) -> Result<Json<Refund>, ApiError> {
    let refund = state
        .refunds_repo
        .get(&refund_id, merchant.id)
        .await?
        .ok_or(ApiError::NotFound("refund"))?;

    Ok(Json(refund))
}

pub async fn list_refunds(
    State(state): State<AppState>,
    Extension(merchant): Extension<Merchant>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListResponse<Refund>>, ApiError> {
    let (limit, offset) = page_params(&query);
    let data = state.refunds_repo.list(merchant.id, limit, offset).await?;
    let total = state.refunds_repo.count(merchant.id).await?;

    Ok(Json(ListResponse {
        data,
        total,
        limit,
        offset,
    }))
}
