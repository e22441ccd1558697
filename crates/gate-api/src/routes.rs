//! # Routes
//!
//! Axum router configuration for the plus-gate API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET  /health, / - Health check
/// - POST /api/checkout - Create checkout session
/// - POST /api/upgrade - Checkout for the signed-in account
/// - GET  /api/entitlement - Paywall state for the bearer token
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/checkout", post(handlers::create_checkout))
        .route("/upgrade", post(handlers::upgrade))
        .route("/entitlement", get(handlers::entitlement));

    let router = Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/api", api_routes)
        .with_state(state);

    with_middleware(router)
}

/// Middleware stack shared by every route.
///
/// Outermost first: request id, request id echo, tracing, CORS, panic catcher.
pub fn with_middleware(router: Router) -> Router {
    // The front end is served from its own origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .layer(CatchPanicLayer::custom(handlers::panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
