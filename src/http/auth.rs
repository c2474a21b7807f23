use crate::http::error::ApiError;
use crate::signing;
use crate::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Resolves the calling merchant from `X-Api-Key`/`X-Api-Secret` and stashes
/// it in request extensions for the handlers.
pub async fn require_merchant(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let api_key = header(&request, "X-Api-Key");
    let api_secret = header(&request, "X-Api-Secret");

    let (Some(api_key), Some(api_secret)) = (api_key, api_secret) else {
        return ApiError::Unauthorized.into_response();
    };

    let merchant = match state.merchants_repo.find_by_api_key(&api_key).await {
        Ok(Some(merchant)) => merchant,
        Ok(None) => return ApiError::Unauthorized.into_response(),
        Err(err) => return ApiError::Internal(err).into_response(),
    };

    if !signing::secrets_match(&api_secret, &merchant.api_secret) {
        return ApiError::Unauthorized.into_response();
    }

    request.extensions_mut().insert(merchant);
    next.run(request).await
}

fn header(request: &Request<Body>, name: &str) -> Option<String> {
    request
        .headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
}
