//! # Supabase Account Backend
//!
//! Reads the session user from GoTrue and the plus flag from PostgREST.
//! Both calls carry the caller's access token; profiles row-level security
//! applies to them.

use crate::config::SupabaseConfig;
use async_trait::async_trait;
use gate_core::{AccountBackend, AuthUser, GateError, GateResult};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

/// Supabase-hosted auth and profiles
pub struct SupabaseBackend {
    config: SupabaseConfig,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    #[serde(default)]
    plus: Option<bool>,
}

impl SupabaseBackend {
    pub fn new(config: SupabaseConfig) -> GateResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| GateError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    fn authorized(&self, request: RequestBuilder, access_token: &str) -> RequestBuilder {
        request
            .header("apikey", &self.config.anon_key)
            .bearer_auth(access_token)
    }
}

#[async_trait]
impl AccountBackend for SupabaseBackend {
    #[instrument(skip_all)]
    async fn current_user(&self, access_token: &str) -> GateResult<Option<AuthUser>> {
        let response = self
            .authorized(self.client.get(self.config.user_url()), access_token)
            .send()
            .await
            .map_err(|e| GateError::Backend(e.to_string()))?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            debug!("Supabase rejected access token: {}", status);
            return Ok(None);
        }

        let body = response
            .text()
            .await
            .map_err(|e| GateError::Backend(e.to_string()))?;

        if !status.is_success() {
            warn!("Supabase auth error: status={}, body={}", status, body);
            return Err(GateError::Backend(format!("auth returned HTTP {}", status)));
        }

        let user: AuthUser = serde_json::from_str(&body)
            .map_err(|e| GateError::Backend(format!("unexpected user payload: {}", e)))?;
        Ok(Some(user))
    }

    #[instrument(skip(self, access_token))]
    async fn plus_flag(&self, access_token: &str, user_id: &str) -> GateResult<bool> {
        let id_filter = format!("eq.{}", user_id);
        let response = self
            .authorized(self.client.get(self.config.profiles_url()), access_token)
            .query(&[("select", "plus"), ("id", id_filter.as_str())])
            .send()
            .await
            .map_err(|e| GateError::Backend(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GateError::Backend(format!(
                "profiles returned HTTP {}: {}",
                status, body
            )));
        }

        let rows: Vec<ProfileRow> = response
            .json()
            .await
            .map_err(|e| GateError::Backend(format!("unexpected profiles payload: {}", e)))?;

        Ok(rows.first().and_then(|row| row.plus).unwrap_or(false))
    }

    fn backend_name(&self) -> &'static str {
        "supabase"
    }
}
