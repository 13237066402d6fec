//! Unified error type for pocket-ledger.
//!
//! The aggregation engine never fails; every variant here comes from the
//! persistence layer, configuration loading or the Discord front end.

use thiserror::Error;

/// Every error the crate can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// No profile exists for the given Discord user
    #[error("User '{discord_id}' is not registered")]
    UserNotFound {
        /// Discord user id that was looked up
        discord_id: String,
    },

    /// A profile already exists for the given Discord user
    #[error("User '{discord_id}' is already registered")]
    UserAlreadyRegistered {
        /// Discord user id that was registered twice
        discord_id: String,
    },

    /// Category lookup failed
    #[error("Category '{name}' not found")]
    CategoryNotFound {
        /// Category name or id as given by the caller
        name: String,
    },

    /// Operation lookup failed
    #[error("Operation {id} not found")]
    OperationNotFound {
        /// Operation id
        id: i64,
    },

    /// The record belongs to another user
    #[error("Access denied: {message}")]
    Forbidden {
        /// What was attempted
        message: String,
    },

    /// Amount was zero, negative, NaN or infinite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// Color was not a `#rrggbb` hex string
    #[error("Invalid color '{color}', expected #rrggbb")]
    InvalidColor {
        /// The rejected color
        color: String,
    },

    /// Category type was neither income nor expense
    #[error("Invalid category type '{value}', expected 'income' or 'expense'")]
    InvalidCategoryType {
        /// The rejected value
        value: String,
    },

    /// Date could not be parsed
    #[error("Invalid date '{value}', expected YYYY-MM-DD or RFC 3339")]
    InvalidDate {
        /// The rejected value
        value: String,
    },

    /// A filter value could not be parsed
    #[error("Invalid {field} filter '{value}'")]
    InvalidFilter {
        /// Which filter field
        field: &'static str,
        /// The rejected value
        value: String,
    },

    /// Generic input validation failure
    #[error("Validation error: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Serenity/Poise framework error
    #[error("Discord error: {0}")]
    Discord(Box<poise::serenity_prelude::Error>),

    /// Writing into a response buffer failed
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Discord(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
