//! # Error Types
//!
//! Domain-specific error types for parcel-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  parcel-core errors (this file)                                        │
//! │  ├── CoreError        - Parsing of domain values                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  parcel-db errors (separate crate)                                     │
//! │  └── DbError          - Database failures, passed through verbatim     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while interpreting domain values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A shipped status string outside the known set.
    #[error("Unknown shipped status: '{0}'")]
    UnknownStatus(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Produced by the helpers in [`crate::validation`]. The repositories never
/// raise these; they are for the layer that receives user input.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
