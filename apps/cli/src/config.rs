//! CLI configuration.
//!
//! Settings are layered, later sources winning:
//!
//! ```text
//! built-in defaults
//!     └── brew.toml           (only when --config is given)
//!           └── BREW_* env    (BREW_DATABASE_PATH, BREW_LOG_LEVEL, ...)
//!                 └── --database flag
//! ```

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Log line layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

/// Resolved settings for one `brew` invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite file, created on first use.
    pub database_path: PathBuf,

    /// Pool size
    pub max_connections: u32,

    /// Default filter directive; `RUST_LOG` takes precedence.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Prefix for amounts in text output.
    pub currency_symbol: String,
}

impl AppConfig {
    /// Loads configuration from the process environment.
    pub fn load(file: Option<&Path>, database: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(file, database, env_source())
    }

    /// Loads configuration with an explicit environment source.
    fn load_with(
        file: Option<&Path>,
        database: Option<&Path>,
        env: Environment,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("database_path", "brew.db")?
            .set_default("max_connections", 5)?
            .set_default("log_level", "info")?
            .set_default("log_format", "compact")?
            .set_default("currency_symbol", "$")?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .add_source(env)
            .set_override_option(
                "database_path",
                database.map(|p| p.display().to_string()),
            )?
            .build()?
            .try_deserialize()
    }
}

/// `BREW_MAX_CONNECTIONS=2` → `max_connections = 2`. Nested keys would use `__`.
fn env_source() -> Environment {
    Environment::with_prefix("BREW")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

// =============================================================================
// Unit Tests
// =============================================================================
