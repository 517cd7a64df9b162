use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::tree::OrphanPolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub client: ClientConfig,
    pub tree: TreeConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// HTTP client options. Built once per process and handed to
/// `ApiClient::new`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    /// Send and keep the backend's session cookie
    pub with_credentials: bool,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    pub orphan_policy: OrphanPolicy,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            with_credentials: true,
            timeout_ms: 10_000,
        }
    }

    pub fn with_credentials(mut self, with_credentials: bool) -> Self {
        self.with_credentials = with_credentials;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from any key lookup; unparseable values keep the default.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("ADMIN_BACKEND_URL") {
            let v = v.trim();
            if !v.is_empty() {
                self.client.base_url = v.trim_end_matches('/').to_string();
            }
        }
        if let Some(v) = lookup("ADMIN_WITH_CREDENTIALS") {
            self.client.with_credentials = v.parse().unwrap_or(self.client.with_credentials);
        }
        if let Some(v) = lookup("ADMIN_TIMEOUT_MS") {
            self.client.timeout_ms = v.parse().unwrap_or(self.client.timeout_ms);
        }
        if let Some(v) = lookup("ADMIN_ORPHAN_POLICY") {
            self.tree.orphan_policy = v.parse().unwrap_or(self.tree.orphan_policy);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            client: ClientConfig {
                base_url: "http://localhost:3001".to_string(),
                with_credentials: true,
                timeout_ms: 10_000,
            },
            tree: TreeConfig {
                orphan_policy: OrphanPolicy::Drop,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            client: ClientConfig {
                base_url: "https://staging-api.example.com".to_string(),
                with_credentials: true,
                timeout_ms: 10_000,
            },
            tree: TreeConfig {
                orphan_policy: OrphanPolicy::Drop,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            client: ClientConfig {
                base_url: "https://api.example.com".to_string(),
                with_credentials: true,
                timeout_ms: 10_000,
            },
            tree: TreeConfig {
                orphan_policy: OrphanPolicy::Drop,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.client.base_url, "http://localhost:3001");
        assert!(config.client.with_credentials);
        assert_eq!(config.client.timeout_ms, 10_000);
        assert_eq!(config.tree.orphan_policy, OrphanPolicy::Drop);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.client.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn overrides_apply_and_bad_values_fall_back() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("ADMIN_BACKEND_URL", "http://backend:8080/"),
            ("ADMIN_WITH_CREDENTIALS", "false"),
            ("ADMIN_TIMEOUT_MS", "soon"),
            ("ADMIN_ORPHAN_POLICY", "promote"),
        ]);
        let config = AppConfig::development().with_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.client.base_url, "http://backend:8080");
        assert!(!config.client.with_credentials);
        assert_eq!(config.client.timeout_ms, 10_000);
        assert_eq!(config.tree.orphan_policy, OrphanPolicy::PromoteToRoot);
    }
}
