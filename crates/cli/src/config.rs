//! Configuration loader
//!
//! Builds the immutable [`Credentials`] and [`ClientConfig`] from
//! environment variables, once at startup. A `.env` file is honored
//! when present (loaded by the binary before this runs).
//!
//! ## Environment Variables
//! - `VANTAGE_SUBSCRIPTION_ID`: subscription identifier (required)
//! - `VANTAGE_APP_ID`: application identifier (required)
//! - `VANTAGE_API_KEY`: write-capable integration key (optional)
//! - `VANTAGE_BASE_URL`: API base URL (default `https://app.vantage.io`)
//! - `VANTAGE_TIMEOUT_SECS`: per-attempt timeout in seconds (default 30)

use std::time::Duration;

use vantage_domain::{ClientConfig, Credentials, Result, VantageError};

/// Everything the client needs, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: Credentials,
    pub client: ClientConfig,
}

/// Load settings from the environment.
///
/// `subscription_override` takes precedence over
/// `VANTAGE_SUBSCRIPTION_ID` when given (the `--subscription` flag).
///
/// # Errors
/// Returns `VantageError::Config` if a required variable is missing or
/// a numeric variable does not parse.
pub fn load(subscription_override: Option<&str>) -> Result<Settings> {
    let subscription_id = match subscription_override {
        Some(id) => id.to_string(),
        None => env_var("VANTAGE_SUBSCRIPTION_ID")?,
    };
    let app_id = env_var("VANTAGE_APP_ID")?;
    let api_key = std::env::var("VANTAGE_API_KEY").ok().filter(|key| !key.is_empty());

    let base_url = std::env::var("VANTAGE_BASE_URL")
        .unwrap_or_else(|_| vantage_domain::config::DEFAULT_BASE_URL.to_string());
    let timeout_secs = match std::env::var("VANTAGE_TIMEOUT_SECS") {
        Ok(raw) => raw.parse::<u64>().map_err(|err| {
            VantageError::Config(format!("invalid VANTAGE_TIMEOUT_SECS: {}", err))
        })?,
        Err(_) => 30,
    };

    Ok(Settings {
        credentials: Credentials::new(subscription_id, app_id, api_key),
        client: ClientConfig { base_url, timeout: Duration::from_secs(timeout_secs) },
    })
}

/// Get a required environment variable.
///
/// # Errors
/// Returns `VantageError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| VantageError::Config(format!("missing required environment variable: {}", key)))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use once_cell::sync::Lazy;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn clear_env() {
        for key in [
            "VANTAGE_SUBSCRIPTION_ID",
            "VANTAGE_APP_ID",
            "VANTAGE_API_KEY",
            "VANTAGE_BASE_URL",
            "VANTAGE_TIMEOUT_SECS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn loads_full_configuration() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("VANTAGE_SUBSCRIPTION_ID", "sub-123");
        std::env::set_var("VANTAGE_APP_ID", "app-456");
        std::env::set_var("VANTAGE_API_KEY", "secret");
        std::env::set_var("VANTAGE_BASE_URL", "https://staging.vantage.io");
        std::env::set_var("VANTAGE_TIMEOUT_SECS", "10");

        let settings = load(None).expect("settings");
        assert_eq!(settings.credentials.subscription_id, "sub-123");
        assert_eq!(settings.credentials.app_id, "app-456");
        assert!(settings.credentials.has_integration_key());
        assert_eq!(settings.client.base_url, "https://staging.vantage.io");
        assert_eq!(settings.client.timeout, Duration::from_secs(10));

        clear_env();
    }

    #[test]
    fn missing_api_key_is_valid_for_read_only_use() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("VANTAGE_SUBSCRIPTION_ID", "sub-123");
        std::env::set_var("VANTAGE_APP_ID", "app-456");

        let settings = load(None).expect("settings");
        assert!(!settings.credentials.has_integration_key());
        assert_eq!(settings.client.base_url, vantage_domain::config::DEFAULT_BASE_URL);
        assert_eq!(settings.client.timeout, Duration::from_secs(30));

        clear_env();
    }

    #[test]
    fn missing_subscription_is_a_config_error() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("VANTAGE_APP_ID", "app-456");

        let err = load(None).expect_err("should fail");
        assert!(matches!(err, VantageError::Config(_)));
        assert!(err.to_string().contains("VANTAGE_SUBSCRIPTION_ID"));

        clear_env();
    }

    #[test]
    fn subscription_override_wins() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("VANTAGE_SUBSCRIPTION_ID", "sub-env");
        std::env::set_var("VANTAGE_APP_ID", "app-456");

        let settings = load(Some("sub-flag")).expect("settings");
        assert_eq!(settings.credentials.subscription_id, "sub-flag");

        clear_env();
    }

    #[test]
    fn invalid_timeout_is_a_config_error() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("VANTAGE_SUBSCRIPTION_ID", "sub-123");
        std::env::set_var("VANTAGE_APP_ID", "app-456");
        std::env::set_var("VANTAGE_TIMEOUT_SECS", "soon");

        let err = load(None).expect_err("should fail");
        assert!(err.to_string().contains("VANTAGE_TIMEOUT_SECS"));

        clear_env();
    }
}
