//! Configuration loading

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

impl DatabaseConfig {
    /// Directory that must exist before a file-backed SQLite URL can be opened
    pub fn data_dir(&self) -> Option<PathBuf> {
        let rest = self
            .url
            .strip_prefix("sqlite://")
            .or_else(|| self.url.strip_prefix("sqlite:"))?;
        let path = rest.split('?').next().unwrap_or_default();
        if path.is_empty() || path == ":memory:" {
            return None;
        }
        Path::new(path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Default data seeding
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    #[serde(default = "default_seed_enabled")]
    pub enabled: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: default_seed_enabled(),
        }
    }
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_database_url() -> String {
    "sqlite:./data/docgate.db?mode=rwc".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_seed_enabled() -> bool {
    true
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &str) -> Result<Self> {
        let config_path = Path::new(path);

        if !config_path.exists() {
            info!("Config file not found at {}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        info!("Loaded configuration from {}", path);
        Ok(config)
    }
}

/// Secrets supplied through the environment or command line
#[derive(Clone)]
pub struct Secrets {
    pub api_key: String,
    pub jwt_secret: String,
}

impl Secrets {
    /// Require both secrets to be present and non-empty
    pub fn resolve(api_key: Option<String>, jwt_secret: Option<String>) -> Result<Self> {
        let api_key = match api_key.filter(|k| !k.trim().is_empty()) {
            Some(k) => k,
            None => bail!("API key is not set (use --api-key or DOCGATE_API_KEY)"),
        };
        let jwt_secret = match jwt_secret.filter(|s| !s.trim().is_empty()) {
            Some(s) => s,
            None => bail!("JWT secret is not set (use --jwt-secret or DOCGATE_JWT_SECRET)"),
        };
        Ok(Self {
            api_key,
            jwt_secret,
        })
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("api_key", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load("/nonexistent/docgate.toml").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logging.format, "pretty");
        assert!(config.seed.enabled);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8080

[database]
url = "sqlite::memory:"

[logging]
format = "json"

[seed]
enabled = false
"#
        )
        .unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
        assert!(!config.seed.enabled);
    }

    #[test]
    fn test_invalid_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();
        assert!(Config::load(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_auth_section_is_ignored() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[auth]\ntoken_ttl_secs = 86400\n\n[server]\nport = 4000").unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn test_data_dir() {
        let db = |url: &str| DatabaseConfig {
            url: url.to_string(),
        };
        assert_eq!(
            db("sqlite:./data/docgate.db?mode=rwc").data_dir(),
            Some(PathBuf::from("./data"))
        );
        assert_eq!(
            db("sqlite:///var/lib/docgate/db.sqlite").data_dir(),
            Some(PathBuf::from("/var/lib/docgate"))
        );
        assert_eq!(db("sqlite::memory:").data_dir(), None);
        assert_eq!(db("sqlite:docgate.db").data_dir(), None);
    }

    #[test]
    fn test_secrets_required() {
        assert!(Secrets::resolve(None, Some("jwt".to_string())).is_err());
        assert!(Secrets::resolve(Some("key".to_string()), None).is_err());
        assert!(Secrets::resolve(Some("  ".to_string()), Some("jwt".to_string())).is_err());

        let secrets =
            Secrets::resolve(Some("key-value".to_string()), Some("jwt-value".to_string())).unwrap();
        assert_eq!(secrets.api_key, "key-value");
        let debug = format!("{:?}", secrets);
        assert!(!debug.contains("key-value"));
        assert!(!debug.contains("jwt-value"));
    }
}
