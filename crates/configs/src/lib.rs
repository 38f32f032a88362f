use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// Where the JSON document lives.
///
/// `path` is the canonical copy. When `ephemeral` is set (or the platform is
/// detected as one), reads and writes go to `scratch_dir/<file name>` instead,
/// seeded from `path` on first access.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,
    #[serde(default)]
    pub ephemeral: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { path: default_db_path(), scratch_dir: default_scratch_dir(), ephemeral: false }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self { Self { format: default_log_format() } }
}

fn default_db_path() -> PathBuf { PathBuf::from("db.json") }
fn default_scratch_dir() -> PathBuf { PathBuf::from("/tmp") }
fn default_log_format() -> String { "compact".into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

/// Parse `path`; a file that does not exist means "configure from the
/// environment", any other read or parse failure is returned.
pub fn load_from_file(path: &str) -> Result<AppConfig> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse(&content).with_context(|| format!("invalid config file {path}")),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(AppConfig::from_env()),
        Err(e) => Err(e).with_context(|| format!("failed to read config file {path}")),
    }
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Config file if present, environment variables otherwise; always validated.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Build from `SERVER_HOST`, `SERVER_PORT`, `TOKIO_WORKER_THREADS`, `DB_PATH`,
    /// `SCRATCH_DIR`, `VERCEL` and `LOG_FORMAT`.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        // listener
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            cfg.server.worker_threads = Some(w);
        }
        // storage; any VERCEL value marks a read-only bundle
        if let Ok(path) = std::env::var("DB_PATH") {
            cfg.storage.path = PathBuf::from(path);
        }
        if let Ok(dir) = std::env::var("SCRATCH_DIR") {
            cfg.storage.scratch_dir = PathBuf::from(dir);
        }
        if std::env::var_os("VERCEL").is_some() {
            cfg.storage.ephemeral = true;
        }
        // logging
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            cfg.logging.format = format;
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // fill server defaults, reject an unusable port
        self.server.normalize()?;
        // the document path must name a file
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(anyhow!("storage.path is empty; set it in config.toml or DB_PATH"));
        }
        if self.path.file_name().is_none() {
            return Err(anyhow!("storage.path must name a file, got {}", self.path.display()));
        }
        if self.ephemeral && self.scratch_dir.as_os_str().is_empty() {
            return Err(anyhow!("storage.scratch_dir is required when storage.ephemeral is set"));
        }
        Ok(())
    }
}
