use crate::domain::merchant::Merchant;
use crate::domain::payment::{CapturePaymentRequest, CreatePaymentRequest, Payment};
use crate::http::error::ApiError;
use crate::http::pagination::{page_params, ListResponse, PageQuery};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};

pub async fn create_payment(
    State(state): State<AppState>,
    Extension(merchant): Extension<Merchant>,
    headers: HeaderMap,
    Json(req): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let idempotency_key = headers
        .get("Idempotency-Key")
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);

    let body = state
        .payment_service
        .create_payment(&merchant, req, idempotency_key)
        .await?;

    Ok((StatusCode::CREATED, Json(body)))
}

pub async fn get_payment(
    State(state): State<AppState>,
    Extension(merchant): Extension<Merchant>,
    Path(payment_id): Path<String>,
) -> Result<Json<Payment>, ApiError> {
    let payment = state
        .payments_repo
        .get(&payment_id, merchant.id)
        .await?
        .ok_or(ApiError::NotFound("payment"))?;

    Ok(Json(payment))
}

pub async fn list_payments(
    State(state): State<AppState>,
    Extension(merchant): Extension<Merchant>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListResponse<Payment>>, ApiError> {
    let (limit, offset) = page_params(&query);
    let data = state.payments_repo.list(merchant.id, limit, offset).await?;
    let total = state.payments_repo.count(merchant.id).await?;

    Ok(Json(ListResponse {
        data,
        total,
        limit,
        offset,
    }))
}

pub async fn capture_payment(
    State(state): State<AppState>,
    Extension(merchant): Extension<Merchant>,
    Path(payment_id): Path<String>,
    Json(_req): Json<CapturePaymentRequest>,
) -> Result<Json<Payment>, ApiError> {
    let payment = state
        .payment_service
        .capture_payment(&merchant, &payment_id)
        .await?;

    Ok(Json(payment))
}
