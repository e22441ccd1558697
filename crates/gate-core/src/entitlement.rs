//! # Entitlement
//!
//! Who is signed in, whether they hold the plus flag, and which paywall gate
//! the front end should put in front of the premium embed.

use crate::error::GateResult;
use crate::provider::AccountBackend;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default location of the premium embed
pub const DEFAULT_EMBED_PATH: &str = "/core/index.html";

/// Account as reported by the backend-as-a-service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl AuthUser {
    pub fn new(id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: id.into(),
            email,
        }
    }
}

/// Paywall state shown over the premium embed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gate {
    /// Signed out: create-account-and-upgrade form, with a switch to login
    Register,
    /// Signed in without plus: upgrade button
    Upgrade,
    /// Signed in with plus: no modal
    Unlocked,
}

/// Session user plus their premium flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    pub user: Option<AuthUser>,
    pub plus: bool,
}

impl Entitlement {
    pub fn signed_out() -> Self {
        Self {
            user: None,
            plus: false,
        }
    }

    pub fn signed_in(user: AuthUser, plus: bool) -> Self {
        Self {
            user: Some(user),
            plus,
        }
    }

    /// Premium access requires both a session and the flag
    pub fn is_premium(&self) -> bool {
        self.user.is_some() && self.plus
    }

    pub fn gate(&self) -> Gate {
        match (&self.user, self.plus) {
            (None, _) => Gate::Register,
            (Some(_), false) => Gate::Upgrade,
            (Some(_), true) => Gate::Unlocked,
        }
    }

    /// Source URL for the premium iframe.
    ///
    /// `{base_path}?premium=1|0&user=<encoded email>`; `user` is empty when
    /// signed out or when the account has no email.
    pub fn embed_url(&self, base_path: &str) -> String {
        let premium = if self.is_premium() { "1" } else { "0" };
        let user = self
            .user
            .as_ref()
            .and_then(|u| u.email.as_deref())
            .map(|email| urlencoding::encode(email).into_owned())
            .unwrap_or_default();
        format!("{}?premium={}&user={}", base_path, premium, user)
    }
}

/// Resolve the entitlement behind an optional access token.
///
/// A rejected token reads as signed out. A failed plus lookup reads as
/// "not plus". Only failures resolving the session itself are returned.
pub async fn resolve_entitlement(
    backend: &dyn AccountBackend,
    access_token: Option<&str>,
) -> GateResult<Entitlement> {
    let Some(token) = access_token.filter(|t| !t.is_empty()) else {
        return Ok(Entitlement::signed_out());
    };

    let Some(user) = backend.current_user(token).await? else {
        debug!("{} rejected access token", backend.backend_name());
        return Ok(Entitlement::signed_out());
    };

    let plus = match backend.plus_flag(token, &user.id).await {
        Ok(plus) => plus,
        Err(e) => {
            warn!("Plus lookup failed for user {}: {}", user.id, e);
            false
        }
    };

    Ok(Entitlement::signed_in(user, plus))
}
