//! # Supabase Configuration

use gate_core::GateError;
use std::env;

/// Table holding the plus flag, keyed by auth user id
pub const DEFAULT_PROFILES_TABLE: &str = "profiles";

/// Supabase project configuration
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL (https://<ref>.supabase.co)
    pub url: String,

    /// Public anon key, sent as `apikey`
    pub anon_key: String,

    /// Table read for the plus flag
    pub profiles_table: String,
}

impl SupabaseConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `Ok(None)` when `SUPABASE_URL` and `SUPABASE_ANON_KEY` are both
    /// unset, and an error when only one of them is.
    pub fn from_env() -> Result<Option<Self>, GateError> {
        dotenvy::dotenv().ok();

        let url = non_empty_var("SUPABASE_URL");
        let anon_key = non_empty_var("SUPABASE_ANON_KEY");

        match (url, anon_key) {
            (Some(url), Some(anon_key)) => {
                let mut config = Self::new(url, anon_key);
                if let Some(table) = non_empty_var("SUPABASE_PROFILES_TABLE") {
                    config.profiles_table = table;
                }
                Ok(Some(config))
            }
            (None, None) => Ok(None),
            (Some(_), None) => Err(GateError::Configuration(
                "SUPABASE_ANON_KEY not set".to_string(),
            )),
            (None, Some(_)) => Err(GateError::Configuration("SUPABASE_URL not set".to_string())),
        }
    }

    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            profiles_table: DEFAULT_PROFILES_TABLE.to_string(),
        }
    }

    /// GoTrue endpoint resolving an access token to its user
    pub fn user_url(&self) -> String {
        format!("{}/auth/v1/user", self.url)
    }

    /// PostgREST endpoint for the profiles table
    pub fn profiles_url(&self) -> String {
        format!("{}/rest/v1/{}", self.url, self.profiles_table)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let config = SupabaseConfig::new("https://abc.supabase.co/", "anon");
        assert_eq!(config.user_url(), "https://abc.supabase.co/auth/v1/user");
        assert_eq!(config.profiles_url(), "https://abc.supabase.co/rest/v1/profiles");
    }
}
