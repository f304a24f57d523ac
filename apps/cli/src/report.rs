//! Maps failures to a message, a stable code and a process exit status.
//!
//! | Exit | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 1    | Internal failure (database, config, I/O)             |
//! | 2    | Bad command line (reported by clap)                  |
//! | 3    | Rejected input: validation or purchase rule          |
//! | 4    | Referenced record missing, or name already taken     |

use brew_core::{PurchaseError, ValidationError};
use brew_db::{CheckoutError, DbError};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_REJECTED: u8 = 3;
pub const EXIT_NOT_FOUND: u8 = 4;

/// A classified error, printable as text or JSON.
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip)]
    pub exit_code: u8,
}

impl Failure {
    pub fn render(&self, json_output: bool) -> String {
        if json_output {
            json!({ "error": self }).to_string()
        } else {
            format!("error: {}", self.message)
        }
    }
}

/// Classifies an error from any layer.
pub fn classify(err: &anyhow::Error) -> Failure {
    if let Some(e) = err.downcast_ref::<CheckoutError>() {
        return match e {
            CheckoutError::Purchase(p) => purchase_failure(p),
            CheckoutError::Persistence(d) => db_failure(d, err.to_string()),
        };
    }
    if let Some(e) = err.downcast_ref::<PurchaseError>() {
        return purchase_failure(e);
    }
    if let Some(e) = err.downcast_ref::<ValidationError>() {
        return Failure {
            code: "VALIDATION_ERROR",
            message: e.to_string(),
            details: None,
            exit_code: EXIT_REJECTED,
        };
    }
    if let Some(e) = err.downcast_ref::<DbError>() {
        return db_failure(e, e.to_string());
    }
    if let Some(e) = err.downcast_ref::<Refused>() {
        return Failure {
            code: "REFUSED",
            message: e.to_string(),
            details: None,
            exit_code: EXIT_REJECTED,
        };
    }

    Failure {
        code: "INTERNAL_ERROR",
        message: format!("{err:#}"),
        details: None,
        exit_code: EXIT_FAILURE,
    }
}

fn purchase_failure(e: &PurchaseError) -> Failure {
    let details = match e {
        PurchaseError::InsufficientStock { shortages } => serde_json::to_value(shortages).ok(),
        PurchaseError::PaymentTooLow { total, tendered } => {
            Some(json!({ "total": total, "tendered": tendered }))
        }
        _ => None,
    };
    let exit_code = match e {
        PurchaseError::UnknownRecipe { .. } => EXIT_NOT_FOUND,
        _ => EXIT_REJECTED,
    };
    Failure {
        code: e.code(),
        message: e.to_string(),
        details,
        exit_code,
    }
}

fn db_failure(e: &DbError, message: String) -> Failure {
    let exit_code = match e {
        DbError::NotFound { .. } | DbError::Conflict { .. } => EXIT_NOT_FOUND,
        _ => EXIT_FAILURE,
    };
    Failure {
        code: e.code(),
        message,
        details: None,
        exit_code,
    }
}

/// A destructive command run without its confirmation flag.
#[derive(Debug, Error)]
#[error("refusing to {0} without --yes")]
pub struct Refused(pub &'static str);
