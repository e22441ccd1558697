//! # Application State
//!
//! Shared state for the Axum application.
//! Everything here is built once at startup and only read afterwards.

use gate_core::{
    BoxedAccountBackend, BoxedCheckoutProvider, GateError, GateResult, DEFAULT_EMBED_PATH,
};
use gate_creem::CreemCheckout;
use gate_supabase::{SupabaseBackend, SupabaseConfig};
use std::net::SocketAddr;
use std::sync::Arc;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Path of the premium embed
    pub embed_path: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            log_format: std::env::var("LOG_FORMAT")
                .map(|f| LogFormat::parse(&f))
                .unwrap_or(defaults.log_format),
            embed_path: std::env::var("PREMIUM_EMBED_PATH").unwrap_or(defaults.embed_path),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            log_format: LogFormat::Pretty,
            embed_path: DEFAULT_EMBED_PATH.to_string(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment provider
    pub checkout: BoxedCheckoutProvider,
    /// Account backend; `None` when Supabase is not configured
    pub accounts: Option<BoxedAccountBackend>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        checkout: BoxedCheckoutProvider,
        accounts: Option<BoxedAccountBackend>,
    ) -> Self {
        Self {
            checkout,
            accounts,
            config,
        }
    }

    /// Build providers from environment variables
    pub fn from_env(config: AppConfig) -> anyhow::Result<Self> {
        let creem = CreemCheckout::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Creem: {}", e))?;
        if creem.config().api_key.is_none() {
            tracing::warn!("CREEM_API_KEY not set; checkout requests will fail");
        } else if creem.config().is_test_mode() {
            tracing::info!("Creem running with a test key");
        }

        let accounts = match SupabaseConfig::from_env()? {
            Some(supabase) => {
                let backend = SupabaseBackend::new(supabase)
                    .map_err(|e| anyhow::anyhow!("Failed to initialize Supabase: {}", e))?;
                Some(Arc::new(backend) as BoxedAccountBackend)
            }
            None => {
                tracing::warn!("Supabase not configured; account endpoints disabled");
                None
            }
        };

        Ok(Self::new(
            config,
            Arc::new(creem) as BoxedCheckoutProvider,
            accounts,
        ))
    }

    /// Account backend, or a configuration error if absent
    pub fn accounts(&self) -> GateResult<&BoxedAccountBackend> {
        self.accounts.as_ref().ok_or_else(|| {
            GateError::Configuration("SUPABASE_URL and SUPABASE_ANON_KEY not set".to_string())
        })
    }
}
