//! Core module - Framework-agnostic business logic.
//!
//! The aggregation engine (`filter`, `stats`, `chart`, `budget`) is pure and
//! synchronous. The persistence functions (`user`, `category`, `operation`)
//! take a `&DatabaseConnection` and know nothing about Discord, so they can be
//! reused from any front end.

pub mod budget;
pub mod category;
pub mod chart;
pub mod filter;
pub mod ledger;
pub mod operation;
pub mod report;
pub mod stats;
pub mod user;

use crate::errors::{Error, Result};

/// Longest accepted name for users, categories and operations, in characters.
pub const MAX_NAME_LENGTH: usize = 256;

/// Trims `name` and checks it is non-empty and at most [`MAX_NAME_LENGTH`]
/// characters long. `field` names the value in the error message.
pub(crate) fn clean_name(field: &str, name: &str) -> Result<String> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(Error::Validation {
            message: format!("{field} cannot be empty"),
        });
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(Error::Validation {
            message: format!("{field} is longer than {MAX_NAME_LENGTH} characters"),
        });
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("Name", "  Кафе ").unwrap(), "Кафе");
        assert!(matches!(
            clean_name("Name", "   "),
            Err(Error::Validation { .. })
        ));

        let exactly_max = "я".repeat(MAX_NAME_LENGTH);
        assert_eq!(clean_name("Name", &exactly_max).unwrap(), exactly_max);
        assert!(clean_name("Name", &"я".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }
}
