//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Statistics, listings and charts
pub mod analytics;

/// Category management commands
pub mod category;

/// General utility commands
pub mod general;

/// Operation recording commands
pub mod operation;

/// Registration, profile and budget commands
pub mod profile;

// Export commands
pub use analytics::*;
pub use category::*;
pub use general::*;
pub use operation::*;
pub use profile::*;
