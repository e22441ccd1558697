//! # Request Handlers
//!
//! Axum request handlers for checkout, upgrade and entitlement.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use gate_core::{
    resolve_entitlement, AuthUser, CheckoutRequest, GateError, Gate, GENERIC_SERVER_ERROR,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::any::Any;
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Checkout response
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    /// Checkout URL (redirect the browser here)
    pub url: String,
}

/// Upgrade request; every field is optional and the body itself may be empty
#[derive(Debug, Default, Deserialize)]
pub struct UpgradeRequest {
    #[serde(default)]
    pub success_url: Option<String>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

/// Entitlement response
#[derive(Debug, Serialize)]
pub struct EntitlementResponse {
    pub user: Option<AuthUser>,
    pub plus: bool,
    pub gate: Gate,
    pub embed_url: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Provider status, only for relayed provider failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn gate_error_to_response(err: GateError) -> ApiError {
    let code = err.status_code();
    if code >= 500 {
        error!("Request failed: {}", err);
    }

    let mut response = ErrorResponse::new(err.public_message());
    if let Some(status) = err.upstream_status() {
        response = response.with_status(status);
    }
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn json_rejection_to_response(rejection: JsonRejection) -> ApiError {
    gate_error_to_response(GateError::InvalidRequest(rejection.body_text()))
}

/// Catch-panic handler: any panic becomes the generic 500
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!("Handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(GENERIC_SERVER_ERROR)),
    )
        .into_response()
}

/// Access token from `Authorization: Bearer <token>`
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "plus-gate",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create a checkout session
#[instrument(skip_all)]
pub async fn create_checkout(
    State(state): State<AppState>,
    body: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let Json(request) = body.map_err(json_rejection_to_response)?;
    start_checkout(&state, request).await
}

/// Create a checkout session for the signed-in account
#[instrument(skip_all)]
pub async fn upgrade(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let accounts = state.accounts().map_err(gate_error_to_response)?;

    let user = match bearer_token(&headers) {
        Some(token) => accounts
            .current_user(token)
            .await
            .map_err(gate_error_to_response)?,
        None => None,
    };
    let Some(user) = user else {
        return Err(gate_error_to_response(GateError::Unauthorized(
            "You must be logged in to upgrade.".to_string(),
        )));
    };

    let upgrade: UpgradeRequest = if body.iter().all(u8::is_ascii_whitespace) {
        UpgradeRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            gate_error_to_response(GateError::InvalidRequest(e.to_string()))
        })?
    };

    let mut request = CheckoutRequest::for_user(&user, upgrade.success_url);
    if let Some(metadata) = upgrade.metadata {
        request = request.with_metadata(metadata);
    }

    start_checkout(&state, request).await
}

/// Paywall state for the bearer token (signed out when absent)
#[instrument(skip_all)]
pub async fn entitlement(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<EntitlementResponse>, ApiError> {
    let accounts = state.accounts().map_err(gate_error_to_response)?;

    let entitlement = resolve_entitlement(accounts.as_ref(), bearer_token(&headers))
        .await
        .map_err(gate_error_to_response)?;

    Ok(Json(EntitlementResponse {
        gate: entitlement.gate(),
        embed_url: entitlement.embed_url(&state.config.embed_path),
        plus: entitlement.is_premium(),
        user: entitlement.user,
    }))
}

/// Shared checkout pipeline: validate, call the provider, relay
async fn start_checkout(
    state: &AppState,
    request: CheckoutRequest,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let payload = request
        .into_payload(state.checkout.default_product_id())
        .map_err(|e| {
            warn!("Rejected checkout request: {}", e);
            gate_error_to_response(e)
        })?;

    info!(
        "Creating checkout: provider={}, product={}, user={:?}",
        state.checkout.provider_name(),
        payload.product_id,
        payload.user_id()
    );

    let link = state
        .checkout
        .create_checkout(&payload)
        .await
        .map_err(gate_error_to_response)?;

    Ok(Json(CheckoutResponse {
        url: link.checkout_url,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_error_response_shape() {
        let (status, Json(body)) = gate_error_to_response(GateError::MissingField("email"));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "error": "Missing email" })
        );
    }

    #[test]
    fn test_upstream_error_carries_status() {
        let (status, Json(body)) = gate_error_to_response(GateError::Upstream {
            status: 404,
            body: "product not found".into(),
        });
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "product not found");
        assert_eq!(body.status, Some(404));
    }

    #[test]
    fn test_network_error_is_generic() {
        let (status, Json(body)) =
            gate_error_to_response(GateError::Network("dns failure".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, GENERIC_SERVER_ERROR);
        assert_eq!(body.status, None);
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
