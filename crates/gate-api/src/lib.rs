//! # gate-api
//!
//! HTTP API layer for plus-gate.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/checkout` | Create checkout session |
//! | POST | `/api/upgrade` | Checkout for the signed-in account |
//! | GET | `/api/entitlement` | Paywall state for the bearer token |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState, LogFormat};
