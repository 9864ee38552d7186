//! Service configuration.
//!
//! Loaded from a TOML file (explicit `--config` path, otherwise
//! `<platform config dir>/config.toml`), then overridden by `CLIMATE_API_*`
//! environment variables. A missing file yields the defaults.

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

pub const ENV_DB: &str = "CLIMATE_API_DB";
pub const ENV_HOST: &str = "CLIMATE_API_HOST";
pub const ENV_PORT: &str = "CLIMATE_API_PORT";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub store: StoreConfig,
    pub gateway: GatewayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Path to the SQLite dataset. `~` and `$VARS` are expanded.
    pub db_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: "Resources/hawaii.sqlite".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Requests running longer than this get a 408.
    pub request_timeout_secs: u64,
    pub max_body_bytes: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5000,
            request_timeout_secs: 30,
            max_body_bytes: 64 * 1024,
        }
    }
}

impl GatewayConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("invalid gateway host `{}`", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Config {
    /// Default config file location, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "climate-api", "climate-api")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from `path` (or the default location) and apply env overrides.
    ///
    /// Not validated: command-line flags still get applied on top, so callers
    /// run [`Config::validate`] once everything is merged.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let resolved = path.map(Path::to_path_buf).or_else(Self::default_path);

        let mut config = match resolved {
            Some(p) if p.exists() => Self::from_file(&p)?,
            Some(p) if path.is_some() => bail!("config file {} does not exist", p.display()),
            _ => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply overrides from an environment lookup. Taking the lookup as a
    /// closure keeps tests off the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db) = lookup(ENV_DB).filter(|v| !v.is_empty()) {
            self.store.db_path = db;
        }
        if let Some(host) = lookup(ENV_HOST).filter(|v| !v.is_empty()) {
            self.gateway.host = host;
        }
        if let Some(port) = lookup(ENV_PORT).filter(|v| !v.is_empty()) {
            self.gateway.port = port
                .parse()
                .with_context(|| format!("{ENV_PORT} must be a port number, got `{port}`"))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.gateway.port == 0 {
            bail!("gateway.port must be non-zero");
        }
        if self.gateway.request_timeout_secs == 0 {
            bail!("gateway.request_timeout_secs must be non-zero");
        }
        if self.store.db_path.trim().is_empty() {
            bail!("store.db_path must not be empty");
        }
        self.gateway.socket_addr()?;
        Ok(())
    }

    /// Dataset path with `~` and environment variables expanded.
    pub fn db_path(&self) -> Result<PathBuf> {
        let expanded = shellexpand::full(&self.store.db_path)
            .with_context(|| format!("failed to expand db_path `{}`", self.store.db_path))?;
        Ok(PathBuf::from(expanded.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(
            config.gateway.socket_addr().unwrap(),
            "127.0.0.1:5000".parse().unwrap()
        );
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [gateway]
            port = 8080
            "#,
        )
        .unwrap();

        assert_eq!(config.gateway.port, 8080);
        assert_eq!(config.gateway.host, "127.0.0.1");
        assert_eq!(config.store, StoreConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<Config, _> = toml::from_str("[gateway]\nprot = 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn env_overrides_win() {
        let env: HashMap<&str, &str> = [
            (ENV_DB, "/data/hawaii.sqlite"),
            (ENV_HOST, "0.0.0.0"),
            (ENV_PORT, "9000"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_env_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.store.db_path, "/data/hawaii.sqlite");
        assert_eq!(config.gateway.host, "0.0.0.0");
        assert_eq!(config.gateway.port, 9000);
    }

    #[test]
    fn bad_port_override_is_an_error() {
        let mut config = Config::default();
        let err = config
            .apply_env_overrides(|k| (k == ENV_PORT).then(|| "http".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_PORT));
    }

    #[test]
    fn validate_rejects_zero_port_and_timeout() {
        let mut config = Config::default();
        config.gateway.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.gateway.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_file_expands_db_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[store]\ndb_path = \"/srv/hawaii.sqlite\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.db_path().unwrap(), PathBuf::from("/srv/hawaii.sqlite"));
    }

    #[test]
    fn load_reads_explicit_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[gateway]\nrequest_timeout_secs = 5\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.gateway.request_timeout_secs, 5);
        assert_eq!(config.gateway.max_body_bytes, 64 * 1024);
    }

    #[test]
    fn invalid_file_values_can_be_overridden_before_validation() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[gateway]\nport = 0\n").unwrap();

        let mut config = Config::load(Some(&path)).unwrap();
        assert!(config.validate().is_err());

        config.gateway.port = 8080;
        config.validate().unwrap();
    }

    #[test]
    fn load_fails_on_missing_explicit_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = Config::load(Some(&tmp.path().join("missing.toml"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
