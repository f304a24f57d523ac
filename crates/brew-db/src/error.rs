//! # Database Error Types
//!
//! Error types for the ingredient store and recipe catalog.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)        MemoryStore rule check              │
//! │       │                                   │                             │
//! │       └──────────────┬────────────────────┘                             │
//! │                      ▼                                                  │
//! │  DbError (this module) ← NotFound / Conflict / TransactionFailed ...   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CheckoutError::Persistence (during a purchase)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  `brew` CLI prints the message, exits non-zero                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Store and catalog operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found.
    ///
    /// ## When This Occurs
    /// - get/update/delete with an id that doesn't exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A name is already taken.
    ///
    /// ## When This Occurs
    /// - Creating an ingredient or recipe whose name exists
    /// - Renaming a recipe to an existing name
    #[error("Duplicate {field}: '{value}' already exists")]
    Conflict { field: String, value: String },

    /// Foreign key constraint violation.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed (including CHECK constraint failures).
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A batch could not be committed and was rolled back.
    ///
    /// ## When This Occurs
    /// - An ingredient changed or vanished between planning and commit
    /// - A write inside the batch failed
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a Conflict error.
    pub fn conflict(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::Conflict {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Fills in the offending value of a Conflict classified from SQLite,
    /// which only reports the column.
    pub(crate) fn with_conflict_value(self, value: &str) -> Self {
        match self {
            DbError::Conflict { field, .. } => DbError::Conflict {
                field,
                value: value.to_string(),
            },
            other => other,
        }
    }

    /// Machine-readable code, shared with `PurchaseError::code`.
    pub fn code(&self) -> &'static str {
        match self {
            DbError::NotFound { .. } => "NOT_FOUND",
            DbError::Conflict { .. } => "CONFLICT",
            _ => "PERSISTENCE_ERROR",
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "UNIQUE constraint failed: ingredients.name"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::Conflict {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_value_is_filled_in() {
        let err = DbError::conflict("ingredients.name", "unknown").with_conflict_value("Milk");
        assert_eq!(err.to_string(), "Duplicate ingredients.name: 'Milk' already exists");
        assert_eq!(err.code(), "CONFLICT");
    }

    #[test]
    fn test_with_conflict_value_leaves_other_errors_alone() {
        let err = DbError::not_found("Ingredient", "abc").with_conflict_value("Milk");
        assert_eq!(err.to_string(), "Ingredient not found: abc");
    }
}
