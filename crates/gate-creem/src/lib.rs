//! # gate-creem
//!
//! Creem checkout provider for plus-gate.
//!
//! Opens a Creem-hosted checkout session for one product, prefilled with the
//! customer's email, and returns the URL to redirect the browser to.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gate_creem::CreemCheckout;
//! use gate_core::CheckoutProvider;
//!
//! // Reads CREEM_API_KEY / CREEM_PRODUCT_ID / CREEM_API_BASE_URL
//! let provider = CreemCheckout::from_env()?;
//!
//! let payload = request.into_payload(provider.default_product_id())?;
//! let link = provider.create_checkout(&payload).await?;
//! ```

pub mod checkout;
pub mod config;

// Re-exports
pub use checkout::CreemCheckout;
pub use config::{CreemConfig, DEFAULT_API_BASE_URL, DEFAULT_PRODUCT_ID};
