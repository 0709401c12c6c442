//! Application configuration

use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::domain::value_objects::UserId;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Create the demo project on startup when the store is empty
    pub seed_demo_data: bool,
    /// Owner of the seeded project
    pub seed_user: UserId,
    /// Budget for a single console request before it is cancelled
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, treating `None` as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let seed_demo_data = lookup("DEVPILOT_SEED_DEMO_DATA")
            .unwrap_or_else(|| "true".to_string())
            .trim()
            .parse::<bool>()
            .context("DEVPILOT_SEED_DEMO_DATA must be true or false")?;

        let seed_user = lookup("DEVPILOT_SEED_USER")
            .unwrap_or_else(|| "demo@devpilot.dev".to_string());
        let seed_user = UserId::create(&seed_user)
            .context("DEVPILOT_SEED_USER must be a valid email address")?;

        let timeout_ms: u64 = lookup("DEVPILOT_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|| "5000".to_string())
            .trim()
            .parse()
            .context("DEVPILOT_REQUEST_TIMEOUT_MS must be a number of milliseconds")?;
        if timeout_ms == 0 {
            bail!("DEVPILOT_REQUEST_TIMEOUT_MS must be greater than zero");
        }

        Ok(Self {
            seed_demo_data,
            seed_user,
            request_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert!(config.seed_demo_data);
        assert_eq!(config.seed_user.value(), "demo@devpilot.dev");
        assert_eq!(config.request_timeout, Duration::from_millis(5000));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("DEVPILOT_SEED_DEMO_DATA", "false"),
            ("DEVPILOT_SEED_USER", "Ops@Example.com"),
            ("DEVPILOT_REQUEST_TIMEOUT_MS", "250"),
        ])
        .unwrap();
        assert!(!config.seed_demo_data);
        assert_eq!(config.seed_user.value(), "ops@example.com");
        assert_eq!(config.request_timeout, Duration::from_millis(250));
    }

    #[test]
    fn invalid_values_fail_with_context() {
        let err = load(&[("DEVPILOT_REQUEST_TIMEOUT_MS", "0")]).unwrap_err();
        assert!(err.to_string().contains("greater than zero"));

        let err = load(&[("DEVPILOT_SEED_USER", "nobody")]).unwrap_err();
        assert!(err.to_string().contains("DEVPILOT_SEED_USER"));

        assert!(load(&[("DEVPILOT_SEED_DEMO_DATA", "maybe")]).is_err());
    }
}
