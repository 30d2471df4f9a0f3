//! Unified error type for `StockBuddy`.
//!
//! Every service function returns [`Result`]. Variants are grouped the same way the
//! HTTP layer reports them: input validation, business-rule violations, missing rows,
//! authentication failures, and infrastructure errors.

use thiserror::Error;

/// All errors produced by the service and web layers.
#[derive(Debug, Error)]
pub enum Error {
    /// A form field was missing, malformed, or out of range.
    #[error("Invalid value for '{field}': {message}")]
    Validation {
        /// Name of the offending form field
        field: String,
        /// Human-readable explanation
        message: String,
    },

    /// A sale asked for more units than the product has in stock.
    #[error("Insufficient stock. Available stock: {available}")]
    InsufficientStock {
        /// Units currently in stock
        available: i32,
        /// Units requested by the sale
        requested: i32,
    },

    /// A category with this name already exists.
    #[error("A category named '{name}' already exists")]
    DuplicateCategory {
        /// The conflicting name
        name: String,
    },

    /// An account with this email already exists.
    #[error("The email '{email}' is already registered")]
    EmailTaken {
        /// The conflicting email
        email: String,
    },

    /// The requested row does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of entity (e.g. "Product")
        entity: &'static str,
        /// Identifier that was looked up
        id: i64,
    },

    /// Login failed: unknown email or wrong password.
    #[error("Incorrect email or password")]
    InvalidCredentials,

    /// No valid session accompanies the request.
    #[error("Authentication required")]
    Unauthorized,

    /// Password hashing failed.
    #[error("Password hashing error: {message}")]
    PasswordHash {
        /// Underlying hasher message
        message: String,
    },

    /// Configuration could not be loaded or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// Database error from `SeaORM`.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error (binding the listener, reading files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] error.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`Error::NotFound`] error.
    #[must_use]
    pub const fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
