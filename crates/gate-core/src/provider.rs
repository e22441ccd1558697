//! # Provider Traits
//!
//! Seams to the two external collaborators:
//!
//! ```text
//! ┌──────────────────────────────┐     ┌──────────────────────────────┐
//! │   CheckoutProvider (trait)   │     │    AccountBackend (trait)    │
//! │  ├── create_checkout()       │     │  ├── current_user()          │
//! │  ├── default_product_id()    │     │  ├── plus_flag()             │
//! │  └── provider_name()         │     │  └── backend_name()          │
//! └──────────────▲───────────────┘     └──────────────▲───────────────┘
//!                │                                    │
//!       ┌────────┴────────┐                  ┌────────┴────────┐
//!       │  CreemCheckout  │                  │ SupabaseBackend │
//!       └─────────────────┘                  └─────────────────┘
//! ```

use crate::checkout::{CheckoutLink, CheckoutPayload};
use crate::entitlement::AuthUser;
use crate::error::GateResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Payment provider able to open a hosted checkout session.
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Create a checkout session and return the redirect URL.
    ///
    /// Implementations issue exactly one outbound request and never retry.
    async fn create_checkout(&self, payload: &CheckoutPayload) -> GateResult<CheckoutLink>;

    /// Product sold when the request does not name one.
    fn default_product_id(&self) -> &str;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Hosted account store that owns sessions and the plus flag.
#[async_trait]
pub trait AccountBackend: Send + Sync {
    /// Resolve the account behind an access token.
    ///
    /// Returns `Ok(None)` when the backend rejects the token.
    async fn current_user(&self, access_token: &str) -> GateResult<Option<AuthUser>>;

    /// Read the plus flag for an account. A missing profile reads as `false`.
    async fn plus_flag(&self, access_token: &str, user_id: &str) -> GateResult<bool>;

    /// Get the backend name (for logging).
    fn backend_name(&self) -> &'static str;
}

/// Shared checkout provider (dynamic dispatch)
pub type BoxedCheckoutProvider = Arc<dyn CheckoutProvider>;

/// Shared account backend (dynamic dispatch)
pub type BoxedAccountBackend = Arc<dyn AccountBackend>;
