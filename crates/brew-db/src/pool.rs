//! # Database Pool Management
//!
//! Opens the SQLite file, applies migrations and hands out repositories.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbConfig::new("brew.db")          DbConfig::in_memory()               │
//! │            │                                 │                          │
//! │            └───────────────┬─────────────────┘                          │
//! │                            ▼                                            │
//! │  Database::new(config) ── WAL, foreign keys on, migrations             │
//! │                            │                                            │
//! │              SqlitePool (cloned into every repository)                 │
//! │                            │                                            │
//! │     ┌──────────────────────┼──────────────────────────┐                 │
//! │     ▼                      ▼                          ▼                 │
//! │  ingredients()          recipes()                 checkout()            │
//! │  IngredientRepository   RecipeRepository          Checkout<..>          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Foreign keys must be on for `recipe_ingredients` rows to follow their
//! recipe on delete; SQLite ships with them off.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::checkout::Checkout;
use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::ingredient::IngredientRepository;
use crate::repository::recipe::RecipeRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust
/// use brew_db::DbConfig;
///
/// let config = DbConfig::new("brew.db").max_connections(2);
/// assert_eq!(config.max_connections, 2);
/// assert!(config.run_migrations);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file; created on first open. `:memory:` for a throwaway db.
    pub database_path: PathBuf,

    /// Default: 5
    pub max_connections: u32,

    /// Default: 1
    pub min_connections: u32,

    /// How long to wait for a free connection. Default: 30 seconds
    pub connect_timeout: Duration,

    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Apply pending migrations in [`Database::new`]. Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Configuration for a database file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// A private in-memory database, one per call (for tests).
    ///
    /// Pinned to a single connection: every SQLite connection to
    /// `:memory:` would otherwise see its own empty database.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("brew.db")).await?;
///
/// let milk = db.ingredients().create("Milk", Quantity::from_units(500)).await?;
/// let quote = db.checkout().quote(&selections).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (or creates) the database and applies migrations if enabled.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening database"
        );

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(max_connections = config.max_connections, "Database pool created");

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations. Safe to call repeatedly.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Raw pool, for queries the repositories don't cover.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the ingredient store.
    pub fn ingredients(&self) -> IngredientRepository {
        IngredientRepository::new(self.pool.clone())
    }

    /// Returns the recipe catalog.
    pub fn recipes(&self) -> RecipeRepository {
        RecipeRepository::new(self.pool.clone())
    }

    /// Returns a checkout service over this database's stores.
    pub fn checkout(&self) -> Checkout<IngredientRepository, RecipeRepository> {
        Checkout::new(self.ingredients(), self.recipes())
    }

    /// Closes the pool. Every repository handed out stops working.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// `true` if the database answers a trivial query.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
