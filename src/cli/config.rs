use std::fs;
use std::path::PathBuf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login state kept between CLI invocations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub token: Option<String>,
    pub username: Option<String>,
    pub backend_url: Option<String>,
    pub saved_at: Option<DateTime<Utc>>,
}

impl SessionConfig {
    pub fn new(token: Option<String>, username: Option<String>, backend_url: String) -> Self {
        Self {
            token,
            username,
            backend_url: Some(backend_url),
            saved_at: Some(Utc::now()),
        }
    }

    /// Token usable against `backend_url`; a session saved for another
    /// backend does not count
    pub fn token_for(&self, backend_url: &str) -> Option<&str> {
        match self.backend_url.as_deref() {
            Some(saved) if saved.trim_end_matches('/') == backend_url.trim_end_matches('/') => self.token.as_deref(),
            Some(saved) => {
                tracing::debug!("Stored session belongs to {}, not {}", saved, backend_url);
                None
            }
            None => None,
        }
    }
}

/// `session.json` inside the CLI config directory
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(get_config_dir()?))
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join("session.json")
    }

    pub fn load(&self) -> anyhow::Result<SessionConfig> {
        let session_file = self.path();

        if !session_file.exists() {
            return Ok(SessionConfig::default());
        }

        let content = fs::read_to_string(session_file)?;
        let config: SessionConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, config: &SessionConfig) -> anyhow::Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        let content = serde_json::to_string_pretty(config)?;
        fs::write(self.path(), content)?;
        Ok(())
    }

    pub fn clear(&self) -> anyhow::Result<()> {
        let session_file = self.path();
        if session_file.exists() {
            fs::remove_file(session_file)?;
        }
        Ok(())
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("ADMIN_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("admin-console")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_default() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = SessionStore::new(dir.path());
        assert_eq!(store.load()?, SessionConfig::default());
        Ok(())
    }

    #[test]
    fn save_load_clear() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = SessionStore::new(dir.path().join("nested"));
        let session = SessionConfig::new(Some("abc".into()), Some("admin".into()), "http://localhost:3001".into());

        store.save(&session)?;
        assert_eq!(store.load()?, session);

        store.clear()?;
        assert!(!store.path().exists());
        Ok(())
    }

    #[test]
    fn token_is_bound_to_backend() {
        let session = SessionConfig::new(Some("abc".into()), None, "http://localhost:3001/".into());
        assert_eq!(session.token_for("http://localhost:3001"), Some("abc"));
        assert_eq!(session.token_for("https://api.example.com"), None);
        assert_eq!(SessionConfig::default().token_for("http://localhost:3001"), None);
    }
}
