//! Server configuration from environment variables.

use std::path::PathBuf;
use std::str::FromStr;

use triage_core::defaults;
use triage_inference::{ConfigError, ConfigResult, InferenceConfig};

/// Where tickets live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    #[default]
    Postgres,
    Memory,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Postgres => "postgres",
            StoreKind::Memory => "memory",
        }
    }
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            _ => Err(ConfigError::InvalidValue {
                key: "TICKET_STORE",
                value: s.to_string(),
            }),
        }
    }
}

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreKind,
    pub database_url: String,
    /// CORS origins; `["*"]` allows any.
    pub allowed_origins: Vec<String>,
    /// YAML keyword vocabulary replacing the built-in one.
    pub vocabulary_path: Option<PathBuf>,
    pub inference: InferenceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_string(),
            port: defaults::PORT,
            store: StoreKind::default(),
            database_url: defaults::DATABASE_URL.to_string(),
            allowed_origins: vec!["*".to_string()],
            vocabulary_path: None,
            inference: InferenceConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from process environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(host) = get("HOST") {
            config.host = host;
        }
        if let Some(port) = get("PORT") {
            config.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                value: port.clone(),
            })?;
        }
        if let Some(store) = get("TICKET_STORE") {
            config.store = store.parse()?;
        }
        if let Some(url) = get("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(origins) = get("ALLOWED_ORIGINS") {
            config.allowed_origins = parse_allowed_origins(&origins);
        }
        config.vocabulary_path = get("TRIAGE_VOCABULARY_PATH").map(PathBuf::from);
        config.inference = InferenceConfig::from_lookup(&lookup)?;

        Ok(config)
    }

    /// Validate settings that do not depend on the model backend.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.store == StoreKind::Postgres && self.database_url.is_empty() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        if self.allowed_origins.is_empty() {
            return Err(ConfigError::Validation(
                "ALLOWED_ORIGINS has no usable entries".to_string(),
            ));
        }
        Ok(())
    }

    /// Socket address string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_allowed_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
