//! # gate-core
//!
//! Core types and traits for the plus-gate checkout service.
//!
//! This crate provides:
//! - `CheckoutRequest` → `CheckoutPayload` validation and optional-field merge
//! - `CheckoutProvider` trait for payment providers
//! - `AccountBackend` trait for the hosted account store
//! - `Entitlement` and `Gate` for the paywall decision
//! - `GateError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use gate_core::{CheckoutProvider, CheckoutRequest};
//!
//! let payload = request.into_payload(provider.default_product_id())?;
//! let link = provider.create_checkout(&payload).await?;
//!
//! // Redirect the browser to link.checkout_url
//! ```

pub mod checkout;
pub mod entitlement;
pub mod error;
pub mod provider;

// Re-exports for convenience
pub use checkout::{CheckoutLink, CheckoutPayload, CheckoutRequest, Customer};
pub use entitlement::{resolve_entitlement, AuthUser, Entitlement, Gate, DEFAULT_EMBED_PATH};
pub use error::{GateError, GateResult, GENERIC_SERVER_ERROR};
pub use provider::{AccountBackend, BoxedAccountBackend, BoxedCheckoutProvider, CheckoutProvider};
