//! # Creem Configuration
//!
//! Configuration for the Creem checkout API.
//! Secrets are loaded from environment variables.

use gate_core::{GateError, GateResult};
use std::env;

/// Production API host
pub const DEFAULT_API_BASE_URL: &str = "https://api.creem.io";

/// Product sold when neither the request nor the environment names one
pub const DEFAULT_PRODUCT_ID: &str = "prod_3Fti6u4wp141TAXBwlAdId";

/// Creem API configuration
#[derive(Debug, Clone)]
pub struct CreemConfig {
    /// API key (creem_test_... or creem_...). Checked per request.
    pub api_key: Option<String>,

    /// Default product id
    pub product_id: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,
}

impl CreemConfig {
    /// Load configuration from environment variables.
    ///
    /// - `CREEM_API_KEY` (optional here; checkout fails without it)
    /// - `CREEM_PRODUCT_ID` (optional)
    /// - `CREEM_API_BASE_URL` (optional)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self {
            api_key: non_empty_var("CREEM_API_KEY"),
            product_id: non_empty_var("CREEM_PRODUCT_ID")
                .unwrap_or_else(|| DEFAULT_PRODUCT_ID.to_string()),
            api_base_url: non_empty_var("CREEM_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        }
    }

    /// Create config with an explicit key (for testing)
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            product_id: DEFAULT_PRODUCT_ID.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Config without a key; every checkout fails with a configuration error
    pub fn unconfigured() -> Self {
        Self {
            api_key: None,
            product_id: DEFAULT_PRODUCT_ID.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// The API key, or a configuration error naming the variable
    pub fn require_api_key(&self) -> GateResult<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| GateError::Configuration("CREEM_API_KEY not set".to_string()))
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|k| k.starts_with("creem_test_"))
    }

    /// Session-creation endpoint
    pub fn checkouts_url(&self) -> String {
        format!("{}/v1/checkouts", self.api_base_url.trim_end_matches('/'))
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Builder: set default product id
    pub fn with_product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = product_id.into();
        self
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
