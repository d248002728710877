use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::http::connection::Limits;

/// Config file read when `STATICD_CONFIG` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "staticd.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub read_timeout_secs: u64,
    pub max_request_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    pub document_root: PathBuf,
    /// Value of the Server response header
    pub server_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            read_timeout_secs: 30,
            max_request_bytes: 8192,
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            document_root: PathBuf::from("./www"),
            server_name: "staticd".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// See [`Config::from_sources`] for precedence.
    pub fn load() -> anyhow::Result<Self> {
        let explicit = std::env::var("STATICD_CONFIG").ok();
        Self::from_sources(explicit.as_deref(), |key| std::env::var(key).ok())
    }

    /// Merges defaults, an optional YAML file and environment overrides.
    ///
    /// With `path` unset, `staticd.yaml` is read if it exists. An explicit
    /// path that cannot be read is an error. `LISTEN` and `DOC_ROOT` from
    /// `env` override the file.
    pub fn from_sources<F>(path: Option<&str>, env: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::from_file(DEFAULT_CONFIG_FILE)?,
            None => Self::default(),
        };

        if let Some(listen) = env("LISTEN") {
            cfg.server.listen_addr = listen;
        }
        if let Some(root) = env("DOC_ROOT") {
            cfg.static_files.document_root = PathBuf::from(root);
        }

        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        Self::from_yaml(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(text)?;

        if cfg.server.max_request_bytes == 0 {
            anyhow::bail!("server.max_request_bytes must be greater than zero");
        }
        if cfg.server.read_timeout_secs == 0 {
            anyhow::bail!("server.read_timeout_secs must be greater than zero");
        }

        Ok(cfg)
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_request_bytes: self.server.max_request_bytes,
            read_timeout: Duration::from_secs(self.server.read_timeout_secs),
        }
    }
}
