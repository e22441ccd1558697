//! # Creem Checkout Sessions
//!
//! Implementation of the Creem `POST /v1/checkouts` call.

use crate::config::CreemConfig;
use async_trait::async_trait;
use gate_core::{CheckoutLink, CheckoutPayload, CheckoutProvider, GateError, GateResult};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info, instrument};

/// Response field holding the hosted checkout URL
const CHECKOUT_URL_FIELD: &str = "checkout_url";

/// Creem hosted checkout provider
pub struct CreemCheckout {
    config: CreemConfig,
    client: Client,
}

impl CreemCheckout {
    /// Create a new Creem checkout provider
    pub fn new(config: CreemConfig) -> GateResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| GateError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> GateResult<Self> {
        Self::new(CreemConfig::from_env())
    }

    pub fn config(&self) -> &CreemConfig {
        &self.config
    }
}

#[async_trait]
impl CheckoutProvider for CreemCheckout {
    #[instrument(skip(self, payload), fields(product_id = %payload.product_id))]
    async fn create_checkout(&self, payload: &CheckoutPayload) -> GateResult<CheckoutLink> {
        let api_key = self.config.require_api_key()?;
        let url = self.config.checkouts_url();

        debug!(
            "Creating Creem checkout: user={:?}, request_id={:?}",
            payload.user_id(),
            payload.request_id
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| GateError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GateError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Creem API error: status={}, body={}", status, body);
            return Err(GateError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let checkout_url = extract_checkout_url(&body)?;
        info!("Created Creem checkout: url={}", checkout_url);

        Ok(CheckoutLink { checkout_url })
    }

    fn default_product_id(&self) -> &str {
        &self.config.product_id
    }

    fn provider_name(&self) -> &'static str {
        "creem"
    }
}

/// Pull `checkout_url` out of a successful response body
fn extract_checkout_url(body: &str) -> GateResult<String> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| GateError::Serialization(e.to_string()))?;

    value
        .get(CHECKOUT_URL_FIELD)
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(String::from)
        .ok_or(GateError::MissingResponseField(CHECKOUT_URL_FIELD))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gate_core::CheckoutRequest;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload(body: Value) -> CheckoutPayload {
        serde_json::from_value::<CheckoutRequest>(body)
            .unwrap()
            .into_payload("prod_default")
            .unwrap()
    }

    fn provider(server: &MockServer) -> CreemCheckout {
        CreemCheckout::new(CreemConfig::new("creem_test_key").with_api_base_url(server.uri()))
            .unwrap()
    }

    #[test]
    fn test_extract_checkout_url() {
        assert_eq!(
            extract_checkout_url(r#"{"id":"ch_1","checkout_url":"https://pay.example/ch_1"}"#)
                .unwrap(),
            "https://pay.example/ch_1"
        );
        assert!(matches!(
            extract_checkout_url(r#"{"id":"ch_1"}"#),
            Err(GateError::MissingResponseField("checkout_url"))
        ));
        assert!(matches!(
            extract_checkout_url("<html>bad gateway</html>"),
            Err(GateError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_create_checkout_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkouts"))
            .and(header("x-api-key", "creem_test_key"))
            .and(body_json(json!({
                "product_id": "prod_default",
                "customer": { "email": "a@example.com" },
                "metadata": { "userId": "u1" },
                "request_id": "u1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "ch_123",
                "checkout_url": "https://checkout.creem.io/ch_123"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let link = provider(&server)
            .create_checkout(&payload(json!({
                "userId": "u1",
                "email": "a@example.com",
                "request_id": "u1"
            })))
            .await
            .unwrap();

        assert_eq!(link.checkout_url, "https://checkout.creem.io/ch_123");
    }

    #[tokio::test]
    async fn test_provider_rejection_is_relayed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkouts"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden: bad api key"))
            .mount(&server)
            .await;

        let err = provider(&server)
            .create_checkout(&payload(json!({ "email": "a@example.com" })))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 403);
        assert_eq!(err.public_message(), "Forbidden: bad api key");
    }

    #[tokio::test]
    async fn test_redirect_is_relayed_not_followed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkouts"))
            .respond_with(ResponseTemplate::new(302).insert_header("location", "/elsewhere"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/elsewhere"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "checkout_url": "https://elsewhere.example/ch_1"
            })))
            .expect(0)
            .mount(&server)
            .await;

        let err = provider(&server)
            .create_checkout(&payload(json!({ "email": "a@example.com" })))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 302);
        assert_eq!(err.upstream_status(), Some(302));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_checkout_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkouts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "ch_123" })))
            .mount(&server)
            .await;

        let err = provider(&server)
            .create_checkout(&payload(json!({ "email": "a@example.com" })))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 500);
        assert!(err.public_message().contains("checkout_url"));
    }

    #[tokio::test]
    async fn test_missing_api_key_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let checkout =
            CreemCheckout::new(CreemConfig::unconfigured().with_api_base_url(server.uri())).unwrap();
        let err = checkout
            .create_checkout(&payload(json!({ "email": "a@example.com" })))
            .await
            .unwrap_err();

        assert!(matches!(err, GateError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_generic() {
        // Nothing listens on the discard port
        let checkout = CreemCheckout::new(
            CreemConfig::new("creem_test_key").with_api_base_url("http://127.0.0.1:9"),
        )
        .unwrap();
        let err = checkout
            .create_checkout(&payload(json!({ "email": "a@example.com" })))
            .await
            .unwrap_err();

        assert!(matches!(err, GateError::Network(_)));
        assert_eq!(err.status_code(), 500);
    }
}
