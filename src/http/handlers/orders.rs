use crate::domain::ids;
use crate::domain::merchant::Merchant;
use crate::domain::order::{CreateOrderRequest, Order};
use crate::http::error::ApiError;
use crate::http::pagination::{page_params, ListResponse, PageQuery};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::Utc;

pub async fn create_order(
    State(state): State<AppState>,
    Extension(merchant): Extension<Merchant>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.amount < 1 {
        return Err(ApiError::BadRequest("amount must be at least 1".to_string()));
    }

    let order = Order {
        id: ids::order_id(),
        merchant_id: merchant.id,
        amount: req.amount,
        currency: req.currency,
        receipt: req.receipt,
        status: "created".to_string(),
        created_at: Utc::now(),
    };
    state.orders_repo.insert(&order).await?;

    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn get_order(
    State(state): State<AppState>,
    Extension(merchant): Extension<Merchant>,
    Path(order_id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order = state
        .orders_repo
        .get(&order_id, merchant.id)
        .await?
        .ok_or(ApiError::NotFound("order"))?;

    Ok(Json(order))
}

pub async fn list_orders(
    State(state): State<AppState>,
    Extension(merchant): Extension<Merchant>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListResponse<Order>>, ApiError> {
    let (limit, offset) = page_params(&query);
    let data = state.orders_repo.list(merchant.id, limit, offset).await?;
    let total = state.orders_repo.count(merchant.id).await?;

    Ok(Json(ListResponse {
        data,
        total,
        limit,
        offset,
    }))
}
