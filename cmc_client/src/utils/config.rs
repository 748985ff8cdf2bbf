// @file: cmc_client/src/utils/config.rs
// @description: Configuration loading (defaults, optional file, environment) for the market-data client.
// @author: LAS.

use serde::Deserialize;
use config::{Config, ConfigError, File, Environment};
use std::time::Duration;
use crate::core::models::Credentials;

//
// TYPE DEFINITIONS
//

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,

    // Credentials
    pub api_key: Option<String>,
    pub api_key_env_var: String,

    // Remote API
    pub base_url: String,
    pub unauthorized_status: u16,
    pub timeout_secs: u64,

    // Currently has no effect
    pub debug: bool,
}

/// Explicit settings handed to the client at construction.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub credentials: Credentials,
    pub base_url: String,
    pub unauthorized_status: u16,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        ClientConfig {
            credentials: Credentials::new(api_key),
            base_url: DEFAULT_BASE_URL.to_string(),
            unauthorized_status: DEFAULT_UNAUTHORIZED_STATUS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}


//
// DEFAULTS
//

pub const DEFAULT_BASE_URL: &str = "https://pro-api.coinmarketcap.com";
pub const DEFAULT_API_KEY_ENV_VAR: &str = "EOD_HISTORICAL_API_KEY";
pub const DEFAULT_UNAUTHORIZED_STATUS: u16 = 403;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;


impl AppConfig {
    //
    // PUBLIC INTERFACE
    //

    pub fn load() -> Result<Self, ConfigError> {
        // #1. Pull a local .env into the process environment if present
        dotenv::dotenv().ok();

        let builder = Config::builder()
            .set_default("log_level", "info")?
            .set_default("api_key_env_var", DEFAULT_API_KEY_ENV_VAR)?
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("unauthorized_status", DEFAULT_UNAUTHORIZED_STATUS as i64)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?
            .set_default("debug", false)?

            // File & Env Overrides (CMC_API_KEY, CMC_BASE_URL, ...)
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("CMC"));

        let config = builder.build()?;
        let mut app: AppConfig = config.try_deserialize()?;

        // #2. Fall back to the legacy variable when no key was configured directly
        if app.api_key.as_deref().map_or(true, str::is_empty) {
            app.api_key = std::env::var(&app.api_key_env_var).ok().filter(|k| !k.is_empty());
        }

        Ok(app)
    }

    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        let key = self.api_key.clone().ok_or_else(|| ConfigError::NotFound(format!(
            "api_key (set CMC_API_KEY or {})",
            self.api_key_env_var
        )))?;

        Ok(ClientConfig {
            credentials: Credentials::new(key),
            base_url: self.base_url.trim_end_matches('/').to_string(),
            unauthorized_status: self.unauthorized_status,
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn sample(api_key: Option<&str>) -> AppConfig {
        AppConfig {
            log_level: "info".to_string(),
            api_key: api_key.map(str::to_string),
            api_key_env_var: DEFAULT_API_KEY_ENV_VAR.to_string(),
            base_url: "https://example.test/".to_string(),
            unauthorized_status: 401,
            timeout_secs: 5,
            debug: false,
        }
    }

    #[test]
    fn client_config_carries_explicit_values() {
        let cfg = sample(Some("k-123")).client_config().unwrap();

        assert_eq!(cfg.credentials.api_key(), "k-123");
        assert_eq!(cfg.base_url, "https://example.test");
        assert_eq!(cfg.unauthorized_status, 401);
        assert_eq!(cfg.timeout, Duration::from_secs(5));
    }

    // Single test so the process-wide variables are never touched concurrently.
    #[test]
    fn load_resolves_credential_and_typed_overrides_from_env() {
        let vars = ["CMC_API_KEY", DEFAULT_API_KEY_ENV_VAR, "CMC_UNAUTHORIZED_STATUS", "CMC_TIMEOUT_SECS", "CMC_DEBUG"];
        for var in vars {
            std::env::remove_var(var);
        }

        // #1. Legacy variable fills in when no direct key is configured
        std::env::set_var(DEFAULT_API_KEY_ENV_VAR, "legacy-key");
        std::env::set_var("CMC_UNAUTHORIZED_STATUS", "401");
        std::env::set_var("CMC_TIMEOUT_SECS", "7");
        std::env::set_var("CMC_DEBUG", "true");

        let app = AppConfig::load().unwrap();
        assert_eq!(app.api_key.as_deref(), Some("legacy-key"));
        assert_eq!(app.unauthorized_status, 401);
        assert_eq!(app.timeout_secs, 7);
        assert!(app.debug);
        assert_eq!(app.base_url, DEFAULT_BASE_URL);

        // #2. An empty direct key still falls back
        std::env::set_var("CMC_API_KEY", "");
        assert_eq!(AppConfig::load().unwrap().api_key.as_deref(), Some("legacy-key"));

        // #3. A direct key wins
        std::env::set_var("CMC_API_KEY", "direct");
        let app = AppConfig::load().unwrap();
        assert_eq!(app.api_key.as_deref(), Some("direct"));
        assert_eq!(app.client_config().unwrap().credentials.api_key(), "direct");

        // #4. Neither set
        for var in vars {
            std::env::remove_var(var);
        }
        let app = AppConfig::load().unwrap();
        assert_eq!(app.api_key, None);
        assert_eq!(app.unauthorized_status, DEFAULT_UNAUTHORIZED_STATUS);
        assert!(app.client_config().is_err());
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let err = sample(None).client_config().unwrap_err();
        assert!(err.to_string().contains(DEFAULT_API_KEY_ENV_VAR));
    }
}
