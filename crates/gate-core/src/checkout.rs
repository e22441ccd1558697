//! # Checkout Types
//!
//! Inbound checkout request, the payload sent to the payment provider, and the
//! resulting checkout link.

use crate::entitlement::AuthUser;
use crate::error::{GateError, GateResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata key carrying the account id through the provider
pub const USER_ID_METADATA_KEY: &str = "userId";

/// Checkout request as posted by the browser
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutRequest {
    /// Account id in the backend-as-a-service
    #[serde(default, rename = "userId", alias = "user_id")]
    pub user_id: Option<String>,
    /// Customer email (required)
    #[serde(default)]
    pub email: Option<String>,
    /// Product to sell; falls back to the configured default
    #[serde(default)]
    pub product_id: Option<String>,
    /// Idempotency key forwarded to the provider
    #[serde(default)]
    pub request_id: Option<String>,
    /// Free-form metadata attached to the checkout
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
    /// Where the provider sends the customer after paying
    #[serde(default)]
    pub success_url: Option<String>,
}

impl CheckoutRequest {
    /// Checkout request on behalf of a signed-in account.
    ///
    /// The account id is also the idempotency key.
    pub fn for_user(user: &AuthUser, success_url: Option<String>) -> Self {
        Self {
            user_id: Some(user.id.clone()),
            email: user.email.clone(),
            product_id: None,
            request_id: Some(user.id.clone()),
            metadata: None,
            success_url,
        }
    }

    /// Builder: attach metadata
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Validate and turn into the provider payload.
    ///
    /// Blank strings count as absent; present values are forwarded as sent.
    /// The account id is written into metadata last and overrides any
    /// caller-supplied `userId` key. This is the reverse of a
    /// `{ userId, ...metadata }` spread, where the caller's key wins.
    pub fn into_payload(self, default_product_id: &str) -> GateResult<CheckoutPayload> {
        let email = present(self.email).ok_or(GateError::MissingField("email"))?;
        let product_id =
            present(self.product_id).unwrap_or_else(|| default_product_id.to_string());

        let mut metadata = self.metadata.unwrap_or_default();
        if let Some(user_id) = present(self.user_id) {
            metadata.insert(USER_ID_METADATA_KEY.to_string(), Value::String(user_id));
        }

        Ok(CheckoutPayload {
            product_id,
            customer: Customer { email },
            metadata: (!metadata.is_empty()).then_some(metadata),
            request_id: present(self.request_id),
            success_url: present(self.success_url),
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Customer prefill sent to the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub email: String,
}

/// Body of the provider's session-creation call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutPayload {
    pub product_id: String,
    pub customer: Customer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
}

impl CheckoutPayload {
    /// Account id recorded in metadata, if any
    pub fn user_id(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get(USER_ID_METADATA_KEY))
            .and_then(Value::as_str)
    }
}

/// Provider-hosted checkout the browser is redirected to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLink {
    pub checkout_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DEFAULT_PRODUCT: &str = "prod_default";

    fn request(body: Value) -> CheckoutRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_missing_email_rejected() {
        let err = request(json!({ "userId": "u1" }))
            .into_payload(DEFAULT_PRODUCT)
            .unwrap_err();
        assert!(matches!(err, GateError::MissingField("email")));

        let err = request(json!({ "email": "   " }))
            .into_payload(DEFAULT_PRODUCT)
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_minimal_payload_omits_optionals() {
        let payload = request(json!({ "email": "a@example.com" }))
            .into_payload(DEFAULT_PRODUCT)
            .unwrap();

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "product_id": DEFAULT_PRODUCT,
                "customer": { "email": "a@example.com" }
            })
        );
    }

    #[test]
    fn test_full_payload() {
        let payload = request(json!({
            "userId": "u1",
            "email": "a@example.com",
            "product_id": "prod_custom",
            "request_id": "req-1",
            "metadata": { "plan": "yearly", "userId": "spoofed" },
            "success_url": "https://app.example.com"
        }))
        .into_payload(DEFAULT_PRODUCT)
        .unwrap();

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "product_id": "prod_custom",
                "customer": { "email": "a@example.com" },
                "metadata": { "plan": "yearly", "userId": "u1" },
                "request_id": "req-1",
                "success_url": "https://app.example.com"
            })
        );
        assert_eq!(payload.user_id(), Some("u1"));
    }

    #[test]
    fn test_account_id_overrides_metadata_user_id() {
        let payload = request(json!({
            "userId": "u1",
            "email": "a@example.com",
            "metadata": { "userId": "someone-else" }
        }))
        .into_payload(DEFAULT_PRODUCT)
        .unwrap();

        assert_eq!(payload.user_id(), Some("u1"));
        assert_eq!(payload.metadata.unwrap().len(), 1);
    }

    #[test]
    fn test_metadata_without_user_is_kept() {
        let payload = request(json!({
            "email": "a@example.com",
            "metadata": { "source": "landing" }
        }))
        .into_payload(DEFAULT_PRODUCT)
        .unwrap();

        assert_eq!(payload.metadata, Some(json!({ "source": "landing" }).as_object().unwrap().clone()));
        assert_eq!(payload.user_id(), None);
    }

    #[test]
    fn test_empty_values_are_absent() {
        let payload = request(json!({
            "userId": "",
            "email": "a@example.com",
            "product_id": "",
            "request_id": "",
            "metadata": {},
            "success_url": null
        }))
        .into_payload(DEFAULT_PRODUCT)
        .unwrap();

        assert_eq!(payload.product_id, DEFAULT_PRODUCT);
        assert!(payload.metadata.is_none());
        assert!(payload.request_id.is_none());
        assert!(payload.success_url.is_none());
    }

    #[test]
    fn test_values_forwarded_untrimmed() {
        let payload = request(json!({
            "email": " a@example.com ",
            "request_id": "req-1 ",
            "success_url": " https://app.example.com",
            "product_id": "  "
        }))
        .into_payload(DEFAULT_PRODUCT)
        .unwrap();

        assert_eq!(payload.customer.email, " a@example.com ");
        assert_eq!(payload.request_id.as_deref(), Some("req-1 "));
        assert_eq!(payload.success_url.as_deref(), Some(" https://app.example.com"));
        assert_eq!(payload.product_id, DEFAULT_PRODUCT);
    }

    #[test]
    fn test_snake_case_user_id_alias() {
        let req = request(json!({ "user_id": "u9", "email": "a@example.com" }));
        assert_eq!(req.user_id.as_deref(), Some("u9"));
    }

    #[test]
    fn test_for_user() {
        let user = AuthUser::new("u1", Some("a@example.com".to_string()));
        let payload = CheckoutRequest::for_user(&user, Some("https://app.example.com".into()))
            .into_payload(DEFAULT_PRODUCT)
            .unwrap();

        assert_eq!(payload.customer.email, "a@example.com");
        assert_eq!(payload.request_id.as_deref(), Some("u1"));
        assert_eq!(payload.user_id(), Some("u1"));
        assert_eq!(payload.success_url.as_deref(), Some("https://app.example.com"));
    }
}
