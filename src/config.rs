use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Discrete database settings; the connection string is assembled from these.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Engine kind. Only `sqlite` is supported.
    pub kind: String,
    /// Database name: a file path, or `:memory:`.
    pub name: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub create_if_missing: bool,
    pub busy_timeout_ms: u64,
}

impl DatabaseConfig {
    pub fn is_memory(&self) -> bool {
        self.name == ":memory:"
    }

    /// Builds the sqlx connection string for this configuration.
    ///
    /// SQLite is file-based: user, password, host, port and TLS settings have
    /// no counterpart here, so the name and the create toggle are all it takes.
    pub fn connection_string(&self) -> String {
        if self.is_memory() {
            return "sqlite::memory:".to_string();
        }
        let mode = if self.create_if_missing { "rwc" } else { "rw" };
        format!("sqlite://{}?mode={}", self.name, mode)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Text,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub filter: String,
    /// When set, logs are also written to a daily-rotated file in this directory.
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

const DEFAULTS: &str = include_str!("../config/default.toml");

impl Default for AppConfig {
    fn default() -> Self {
        // Fallback: parse the embedded default TOML
        match ::config::Config::builder()
            .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
            .build()
        {
            Ok(cfg) => match cfg.try_deserialize() {
                Ok(app_cfg) => app_cfg,
                Err(e) => panic!("Failed to deserialize default config: {}", e),
            },
            Err(e) => panic!("Failed to parse default config: {}", e),
        }
    }
}

pub fn load() -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();

    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
        // Optional local file: mftracker.toml (in CWD)
        .add_source(::config::File::with_name("mftracker").required(false));

    if let Ok(custom_path) = std::env::var("MFTRACKER_CONFIG") {
        builder = builder.add_source(::config::File::with_name(&custom_path).required(false));
    }
    // Environment variables last to have highest precedence
    builder = builder.add_source(::config::Environment::with_prefix("MFTRACKER").separator("__"));

    let cfg = builder.build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

pub fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    if cfg.server.port == 0 {
        return Err(anyhow::anyhow!("invalid server.port: {}", cfg.server.port));
    }

    let db = &cfg.database;
    if !db.kind.eq_ignore_ascii_case("sqlite") {
        return Err(anyhow::anyhow!("unsupported database.kind: {}", db.kind));
    }
    if db.name.trim().is_empty() {
        return Err(anyhow::anyhow!("database.name must not be empty"));
    }
    if db.max_connections == 0 {
        return Err(anyhow::anyhow!("database.max_connections must be > 0"));
    }
    if db.min_connections > db.max_connections {
        return Err(anyhow::anyhow!("database.min_connections must be <= max_connections"));
    }

    Ok(())
}

pub fn ensure_sqlite_parent_dir(cfg: &DatabaseConfig) -> anyhow::Result<()> {
    if cfg.is_memory() {
        return Ok(());
    }
    if let Some(parent) = Path::new(&cfg.name).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
