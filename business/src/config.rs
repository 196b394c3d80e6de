//! Static configuration for the Supabase project and the publishing bot.
//!
//! The browser build embeds the project URL and the public anon key at compile
//! time. The bot reads its settings from the process environment.

use serde::Deserialize;
use std::env::vars;

/// Graph API version used when `GRAPH_API_VERSION` is not set.
pub const DEFAULT_GRAPH_API_VERSION: &str = "v19.0";

const DEFAULT_GRAPH_API_BASE_URL: &str = "https://graph.facebook.com";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid environment configuration: {0}")]
    Env(#[from] serde_env::Error),
    #[error("{0} is not set")]
    Missing(&'static str),
}

/// Endpoint and public client key of the hosted Supabase project.
///
/// The anon key is not a secret; it identifies the project to the auth and
/// REST gateways.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    url: String,
    anon_key: String,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: trim_base_url(url.into()),
            anon_key: anon_key.into(),
        }
    }

    /// Configuration baked into the binary at build time.
    ///
    /// Set `SUPABASE_URL` and `SUPABASE_ANON_KEY` when building the web bundle.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_parts(option_env!("SUPABASE_URL"), option_env!("SUPABASE_ANON_KEY"))
    }

    fn from_parts(url: Option<&str>, anon_key: Option<&str>) -> Result<Self, ConfigError> {
        let url = url
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("SUPABASE_URL"))?;
        let anon_key = anon_key
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?;
        Ok(Self::new(url.trim(), anon_key.trim()))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    /// GoTrue endpoint, e.g. `https://<ref>.supabase.co/auth/v1`.
    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.url)
    }

    /// PostgREST endpoint, e.g. `https://<ref>.supabase.co/rest/v1`.
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url)
    }
}

/// Settings for one run of the confession publisher.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub supabase: SupabaseConfig,
    /// Instagram business account that owns the posts.
    pub instagram_account_id: Option<String>,
    pub instagram_access_token: Option<String>,
    pub graph_api_version: String,
    pub graph_api_base_url: String,
}

#[derive(Debug, Deserialize)]
struct RawBotConfig {
    supabase_url: String,
    supabase_key: String,
    insta_business_account_id: Option<String>,
    insta_graph_api_access_token: Option<String>,
    graph_api_version: Option<String>,
    graph_api_base_url: Option<String>,
}

impl BotConfig {
    /// Loads the bot settings from the process environment.
    pub fn init() -> Result<Self, ConfigError> {
        let raw: RawBotConfig = serde_env::from_iter(vars())?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawBotConfig) -> Result<Self, ConfigError> {
        let RawBotConfig {
            supabase_url,
            supabase_key,
            insta_business_account_id,
            insta_graph_api_access_token,
            graph_api_version,
            graph_api_base_url,
        } = raw;

        let supabase = SupabaseConfig::from_parts(Some(&supabase_url), Some(&supabase_key))?;

        let config = Self {
            supabase,
            instagram_account_id: non_empty(insta_business_account_id),
            instagram_access_token: non_empty(insta_graph_api_access_token),
            graph_api_version: non_empty(graph_api_version)
                .unwrap_or_else(|| DEFAULT_GRAPH_API_VERSION.to_owned()),
            graph_api_base_url: trim_base_url(
                non_empty(graph_api_base_url)
                    .unwrap_or_else(|| DEFAULT_GRAPH_API_BASE_URL.to_owned()),
            ),
        };

        // Missing Instagram credentials are not fatal here: the run still
        // claims a confession and records the failure against it.
        if !config.has_instagram_credentials() {
            log::warn!("Instagram API credentials are not set; publishing will fail");
        }
        Ok(config)
    }

    /// Whether both Instagram settings are present and non-blank.
    pub fn has_instagram_credentials(&self) -> bool {
        self.instagram_account_id.is_some() && self.instagram_access_token.is_some()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_env::from_iter;

    #[test]
    fn supabase_urls_have_no_double_slash() {
        let config = SupabaseConfig::new("https://abc.supabase.co/", "anon");
        assert_eq!(config.url(), "https://abc.supabase.co");
        assert_eq!(config.auth_url(), "https://abc.supabase.co/auth/v1");
        assert_eq!(config.rest_url(), "https://abc.supabase.co/rest/v1");
    }

    #[test]
    fn missing_parts_are_reported_by_name() {
        let err = SupabaseConfig::from_parts(None, Some("anon")).expect_err("url is missing");
        assert!(matches!(err, ConfigError::Missing("SUPABASE_URL")));

        let err = SupabaseConfig::from_parts(Some("https://abc.supabase.co"), Some("  "))
            .expect_err("blank key is missing");
        assert!(matches!(err, ConfigError::Missing("SUPABASE_ANON_KEY")));
    }

    #[test]
    fn bot_config_applies_graph_defaults() {
        let raw: RawBotConfig = from_iter(vec![
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_KEY", "service-key"),
            ("INSTA_BUSINESS_ACCOUNT_ID", "1784"),
            ("INSTA_GRAPH_API_ACCESS_TOKEN", "token"),
        ])
        .expect("RawBotConfig should deserialize");

        let config = BotConfig::from_raw(raw).expect("bot config should build");
        assert_eq!(config.supabase.anon_key(), "service-key");
        assert_eq!(config.instagram_account_id.as_deref(), Some("1784"));
        assert_eq!(config.graph_api_version, DEFAULT_GRAPH_API_VERSION);
        assert_eq!(config.graph_api_base_url, "https://graph.facebook.com");
        assert!(config.has_instagram_credentials());
    }

    #[test]
    fn bot_config_tolerates_missing_instagram_credentials() {
        let raw: RawBotConfig = from_iter(vec![
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_KEY", "service-key"),
            ("GRAPH_API_BASE_URL", "http://127.0.0.1:9000/"),
        ])
        .expect("RawBotConfig should deserialize");

        let config = BotConfig::from_raw(raw).expect("bot config should build");
        assert!(config.instagram_account_id.is_none());
        assert!(config.instagram_access_token.is_none());
        assert_eq!(config.graph_api_base_url, "http://127.0.0.1:9000");
        assert!(!config.has_instagram_credentials());
    }

    #[test]
    fn blank_instagram_credentials_count_as_missing() {
        let raw: RawBotConfig = from_iter(vec![
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_KEY", "service-key"),
            ("INSTA_BUSINESS_ACCOUNT_ID", ""),
            ("INSTA_GRAPH_API_ACCESS_TOKEN", "   "),
        ])
        .expect("RawBotConfig should deserialize");

        let config = BotConfig::from_raw(raw).expect("bot config should build");
        assert!(config.instagram_account_id.is_none());
        assert!(config.instagram_access_token.is_none());
        assert!(!config.has_instagram_credentials());
    }
}
