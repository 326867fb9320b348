//! Server configuration: defaults, then an optional TOML file named by
//! `TAROT_CONFIG`, then environment variables. Each value remembers where it
//! came from.

use crate::logging::LogFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use tarot_engine::daily::DailyVariant;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    host: String,
    port: u16,
    database_url: String,
    cors_origins: Vec<String>,
    daily_variant: DailyVariant,
    log_format: LogFormat,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16, database_url: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            database_url: database_url.into(),
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            daily_variant: DailyVariant::default(),
            log_format: LogFormat::default(),
        }
    }

    /// Loopback on an ephemeral port; pair with an explicit store.
    pub fn for_tests() -> Self {
        Self::new("127.0.0.1", 0, "sqlite::memory:")
    }

    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    pub fn with_daily_variant(mut self, variant: DailyVariant) -> Self {
        self.daily_variant = variant;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn daily_variant(&self) -> DailyVariant {
        self.daily_variant
    }

    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
    Cli,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigSources {
    pub host: ValueSource,
    pub port: ValueSource,
    pub database_url: ValueSource,
    pub cors_origins: ValueSource,
    pub daily_variant: ValueSource,
    pub log_format: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            host: ValueSource::Default,
            port: ValueSource::Default,
            database_url: ValueSource::Default,
            cors_origins: ValueSource::Default,
            daily_variant: ValueSource::Default,
            log_format: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: ServerConfig,
    pub sources: ConfigSources,
}

impl ConfigResolved {
    /// Apply `--host` / `--port` style overrides.
    pub fn override_host(&mut self, host: impl Into<String>) {
        self.config.host = host.into();
        self.sources.host = ValueSource::Cli;
    }

    pub fn override_port(&mut self, port: u16) {
        self.config.port = port;
        self.sources.port = ValueSource::Cli;
    }

    /// Config with sources, for display. The database URL is included as-is.
    pub fn to_json(&self) -> serde_json::Value {
        let c = &self.config;
        let s = &self.sources;
        serde_json::json!({
            "host": { "value": c.host, "source": s.host },
            "port": { "value": c.port, "source": s.port },
            "database_url": { "value": c.database_url, "source": s.database_url },
            "cors_origins": { "value": c.cors_origins, "source": s.cors_origins },
            "daily_variant": { "value": c.daily_variant, "source": s.daily_variant },
            "log_format": { "value": c.log_format, "source": s.log_format },
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DATABASE_URL is required")]
    MissingDatabaseUrl,
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    database_url: Option<String>,
    #[serde(default)]
    cors_origins: Option<Vec<String>>,
    #[serde(default)]
    daily_variant: Option<String>,
    #[serde(default)]
    log_format: Option<String>,
}

pub fn load() -> Result<ConfigResolved, ConfigError> {
    load_from(|key| std::env::var(key).ok())
}

/// Resolve configuration using `env` as the variable lookup.
pub fn load_from<E>(env: E) -> Result<ConfigResolved, ConfigError>
where
    E: Fn(&str) -> Option<String>,
{
    let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    let mut host = DEFAULT_HOST.to_string();
    let mut port = DEFAULT_PORT;
    let mut database_url: Option<String> = None;
    let mut cors_origins = vec![DEFAULT_CORS_ORIGIN.to_string()];
    let mut daily_variant = DailyVariant::default();
    let mut log_format = LogFormat::default();
    let mut sources = ConfigSources::default();

    if let Some(path) = env("TAROT_CONFIG") {
        let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let file: FileConfig = toml::from_str(&raw)?;

        if let Some(v) = file.host {
            host = v;
            sources.host = ValueSource::File;
        }
        if let Some(v) = file.port {
            port = v;
            sources.port = ValueSource::File;
        }
        if let Some(v) = file.database_url {
            database_url = Some(v);
            sources.database_url = ValueSource::File;
        }
        if let Some(v) = file.cors_origins {
            cors_origins = clean_origins(v);
            sources.cors_origins = ValueSource::File;
        }
        if let Some(v) = file.daily_variant {
            daily_variant = v.parse().map_err(ConfigError::Invalid)?;
            sources.daily_variant = ValueSource::File;
        }
        if let Some(v) = file.log_format {
            log_format = v.parse().map_err(ConfigError::Invalid)?;
            sources.log_format = ValueSource::File;
        }
    }

    if let Some(v) = env("HOST") {
        host = v;
        sources.host = ValueSource::Env;
    }
    if let Some(v) = env("PORT") {
        port = v
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("PORT must be a port number, got `{v}`")))?;
        sources.port = ValueSource::Env;
    }
    if let Some(v) = env("DATABASE_URL") {
        database_url = Some(v);
        sources.database_url = ValueSource::Env;
    }
    if let Some(v) = env("CORS_ORIGIN") {
        cors_origins = clean_origins(v.split(',').map(str::to_string));
        sources.cors_origins = ValueSource::Env;
    }
    if let Some(v) = env("TAROT_DAILY_VARIANT") {
        daily_variant = v.parse().map_err(ConfigError::Invalid)?;
        sources.daily_variant = ValueSource::Env;
    }
    if let Some(v) = env("TAROT_LOG_FORMAT") {
        log_format = v.parse().map_err(ConfigError::Invalid)?;
        sources.log_format = ValueSource::Env;
    }

    let database_url = database_url.ok_or(ConfigError::MissingDatabaseUrl)?;
    let config = ServerConfig {
        host,
        port,
        database_url,
        cors_origins,
        daily_variant,
        log_format,
    };
    validate(&config)?;

    Ok(ConfigResolved { config, sources })
}

fn clean_origins(origins: impl IntoIterator<Item = String>) -> Vec<String> {
    origins
        .into_iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}

fn validate(config: &ServerConfig) -> Result<(), ConfigError> {
    if config.host.trim().is_empty() {
        return Err(ConfigError::Invalid("host must not be empty".into()));
    }
    for origin in &config.cors_origins {
        let valid = origin.starts_with("http://") || origin.starts_with("https://");
        if !valid || origin.contains(char::is_whitespace) {
            return Err(ConfigError::Invalid(format!(
                "CORS origin `{origin}` must be an http(s) origin"
            )));
        }
    }
    Ok(())
}
