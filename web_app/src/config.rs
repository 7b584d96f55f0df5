//! Application configuration management with security considerations.
//!
//! This module handles all configuration values required for the application.
//! Sensitive fields are clearly marked and should never be logged.
//!
//! # Security Notes
//! - Production environments should use secure secret management systems
//! - `EXPOSE_ERROR_DETAILS` must stay disabled in production, it leaks raw
//!   storage errors to API clients

use envconfig::Envconfig;
use std::sync::LazyLock;

/// Application configuration with security-aware field management.
///
/// Every field has a default so a local run only needs the variables it wants
/// to override.
#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Environment name to deploy the app (NON-SENSITIVE)
    /// Values: "local", "dev", "staging", "prod"
    #[envconfig(default = "local")]
    pub env: String,

    /// Database host value (NON-SENSITIVE)
    /// Example: "sqlite:data/vet_records.db"
    #[envconfig(default = "sqlite:data/vet_records.db?mode=rwc")]
    pub db_host: String,

    /// 🔒 SENSITIVE: Database password to encrypt SQLite data (prod only)
    #[envconfig(default = "")]
    pub db_pass_encrypt: String,

    /// Host address for web server binding (NON-SENSITIVE)
    #[envconfig(default = "0.0.0.0")]
    pub wep_server_host: String,

    /// Port for web server binding (NON-SENSITIVE)
    #[envconfig(default = "5001")]
    pub wep_server_port: u16,

    /// Path to SSL private key file (SENSITIVE PATH)
    /// Security: File should have 600 permissions
    #[envconfig(default = "server.key")]
    pub private_key_path: String,

    /// Path to SSL certificate file (NON-SENSITIVE)
    #[envconfig(default = "server.crt")]
    pub certificate_path: String,

    /// Origin of the single page frontend allowed by CORS (NON-SENSITIVE)
    #[envconfig(default = "http://localhost:5173")]
    pub allowed_origin: String,

    /// 🔒 SENSITIVE: Logfire write token. Without it traces stay local
    pub logfire_token: Option<String>,

    /// 🔒 SENSITIVE: Generative language API key.
    /// Without it every chat reply comes from the fallback responder
    pub gemini_api_key: Option<String>,

    /// Generative language REST endpoint (NON-SENSITIVE)
    #[envconfig(default = "https://generativelanguage.googleapis.com/v1beta")]
    pub gemini_api_base_url: String,

    /// Comma separated model ids tried in order (NON-SENSITIVE)
    #[envconfig(
        default = "gemini-2.0-flash,gemini-2.5-pro,gemini-2.0-flash-exp,gemini-1.5-flash,gemini-1.5-pro"
    )]
    pub gemini_models: String,

    /// Per request timeout for the generative language API, in seconds
    #[envconfig(default = "30")]
    pub gemini_timeout_secs: u64,

    /// Include raw storage errors in 500 responses (debug only)
    #[envconfig(default = "false")]
    pub expose_error_details: bool,
}

impl AppConfig {
    /// Checks if running in production environment
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    /// Gets the configured model ids, in priority order, skipping blanks
    pub fn gemini_model_ids(&self) -> Vec<String> {
        self.gemini_models
            .split(',')
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .map(String::from)
            .collect()
    }

    /// The generative language API key, if one is configured and non blank
    pub fn gemini_key(&self) -> Option<&str> {
        self.gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Global application configuration instance
///
/// If the environment holds an unparsable value, the application will panic
/// with a descriptive error message on first access.
pub static APP_CONFIG: LazyLock<AppConfig> = LazyLock::new(|| {
    AppConfig::init_from_env()
        .expect("Failed to load application configuration. Check environment variables.")
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::init_from_hashmap(&vars).unwrap()
    }

    #[test]
    fn test_defaults_keep_error_details_hidden() {
        let config = config_from(&[]);

        assert!(!config.expose_error_details);
        assert!(!config.is_prod());
        assert!(config.gemini_key().is_none());
        assert_eq!(config.wep_server_port, 5001);
    }

    #[test]
    fn test_gemini_model_ids_keep_order_and_skip_blanks() {
        let config = config_from(&[("GEMINI_MODELS", "model-a, ,model-b,")]);

        assert_eq!(config.gemini_model_ids(), vec!["model-a", "model-b"]);
    }

    #[test]
    fn test_blank_gemini_key_counts_as_unconfigured() {
        let config = config_from(&[("GEMINI_API_KEY", "   ")]);
        assert!(config.gemini_key().is_none());

        let config = config_from(&[("GEMINI_API_KEY", "abc"), ("ENV", "PROD")]);
        assert_eq!(config.gemini_key(), Some("abc"));
        assert!(config.is_prod());
    }
}
