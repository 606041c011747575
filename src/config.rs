//! Startup configuration resolved from the process environment.
//!
//! The store credentials are the only hard requirement: without them the
//! process refuses to start. Everything else gates an optional feature and
//! its absence only degrades that feature.

use once_cell::sync::OnceCell;
use thiserror::Error;

static CONFIG: OnceCell<AppConfig> = OnceCell::new();

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

/// Connection coordinates for the hosted data store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub base_url: String,
    pub api_key: String,
}

/// Credentials for the transactional email service. All three are needed
/// before the mailer is constructed at all.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub email: Option<EmailConfig>,
    pub gemini_api_key: Option<String>,
    pub admin_token: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an injected lookup so tests don't have
    /// to mutate process-wide environment state.
    pub fn from_source(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let clean = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &'static str| clean(key).ok_or(ConfigError::MissingVar(key));

        let store = StoreConfig {
            base_url: require("STORE_URL")?.trim_end_matches('/').to_string(),
            api_key: require("STORE_ANON_KEY")?,
        };

        let email = match (
            clean("EMAILJS_SERVICE_ID"),
            clean("EMAILJS_TEMPLATE_ID"),
            clean("EMAILJS_PUBLIC_KEY"),
        ) {
            (Some(service_id), Some(template_id), Some(public_key)) => Some(EmailConfig {
                service_id,
                template_id,
                public_key,
            }),
            _ => None,
        };

        Ok(AppConfig {
            store,
            email,
            gemini_api_key: clean("GEMINI_API_KEY"),
            admin_token: clean("ADMIN_TOKEN"),
        })
    }
}

/// Register the resolved configuration for the process. First caller wins.
pub fn init(config: AppConfig) -> &'static AppConfig {
    CONFIG.get_or_init(|| config)
}

pub fn get() -> Option<&'static AppConfig> {
    CONFIG.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_missing_store_url_is_fatal() {
        let vars = source(&[("STORE_ANON_KEY", "anon-key")]);
        let result = AppConfig::from_source(|k| vars.get(k).cloned());
        assert!(matches!(result, Err(ConfigError::MissingVar("STORE_URL"))));
    }

    #[test]
    fn test_missing_anon_key_is_fatal() {
        let vars = source(&[("STORE_URL", "https://example.supabase.co")]);
        let result = AppConfig::from_source(|k| vars.get(k).cloned());
        assert!(matches!(
            result,
            Err(ConfigError::MissingVar("STORE_ANON_KEY"))
        ));
    }

    #[test]
    fn test_blank_credential_counts_as_missing() {
        let vars = source(&[
            ("STORE_URL", "https://example.supabase.co"),
            ("STORE_ANON_KEY", "   "),
        ]);
        let result = AppConfig::from_source(|k| vars.get(k).cloned());
        assert!(result.is_err());
    }

    #[test]
    fn test_store_url_trailing_slash_is_trimmed() {
        let vars = source(&[
            ("STORE_URL", "https://example.supabase.co/"),
            ("STORE_ANON_KEY", "anon-key"),
        ]);
        let config = AppConfig::from_source(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(config.store.base_url, "https://example.supabase.co");
    }

    #[test]
    fn test_email_requires_all_three_credentials() {
        let vars = source(&[
            ("STORE_URL", "https://example.supabase.co"),
            ("STORE_ANON_KEY", "anon-key"),
            ("EMAILJS_SERVICE_ID", "service_x"),
            ("EMAILJS_TEMPLATE_ID", "template_y"),
        ]);
        let config = AppConfig::from_source(|k| vars.get(k).cloned()).unwrap();
        assert!(config.email.is_none());
    }

    #[test]
    fn test_full_configuration() {
        let vars = source(&[
            ("STORE_URL", "https://example.supabase.co"),
            ("STORE_ANON_KEY", "anon-key"),
            ("EMAILJS_SERVICE_ID", "service_x"),
            ("EMAILJS_TEMPLATE_ID", "template_y"),
            ("EMAILJS_PUBLIC_KEY", "public_z"),
            ("GEMINI_API_KEY", "gm-key"),
            ("ADMIN_TOKEN", "secret"),
        ]);
        let config = AppConfig::from_source(|k| vars.get(k).cloned()).unwrap();
        let email = config.email.expect("email config");
        assert_eq!(email.service_id, "service_x");
        assert_eq!(config.gemini_api_key.as_deref(), Some("gm-key"));
        assert_eq!(config.admin_token.as_deref(), Some("secret"));
    }
}
