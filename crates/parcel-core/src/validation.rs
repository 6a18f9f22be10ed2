//! # Validation Module
//!
//! Opt-in input checks for the layer that receives user input.
//!
//! ## Where This Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (Rust)                                          │
//! │  ├── Deserialization into ListRequest                                  │
//! │  └── THIS MODULE: page size, offset, search length, status             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repositories (parcel-db)                                     │
//! │  ├── Sort identifiers resolved through allow-lists                     │
//! │  └── Everything else bound as parameters, never rejected               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The repositories deliberately do not call these: a negative page size or
//! an unknown status reaches the database exactly as given.
//!
//! ## Usage
//! ```rust
//! use parcel_core::validation::{validate_list_request, validate_status};
//! use parcel_core::{ListRequest, ShippedStatus};
//!
//! validate_list_request(&ListRequest::new(20)).unwrap();
//! assert_eq!(validate_status("arrived").unwrap(), ShippedStatus::Arrived);
//! assert!(validate_status("teleported").is_err());
//! ```

use crate::error::ValidationError;
use crate::request::ListRequest;
use crate::types::ShippedStatus;
use crate::MAX_PAGE_SIZE;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest search term accepted.
pub const MAX_SEARCH_LENGTH: usize = 100;

// =============================================================================
// Paging
// =============================================================================

/// Validates a page size.
///
/// ## Rules
/// - Must be at least 1
/// - Must not exceed MAX_PAGE_SIZE (100)
pub fn validate_page_size(page_size: i64) -> ValidationResult<()> {
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(ValidationError::OutOfRange {
            field: "page_size".to_string(),
            min: 1,
            max: MAX_PAGE_SIZE,
        });
    }

    Ok(())
}

/// Validates an offset (must be non-negative).
pub fn validate_offset(offset: i64) -> ValidationResult<()> {
    if offset < 0 {
        return Err(ValidationError::OutOfRange {
            field: "offset".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a search term (length only; any characters are allowed).
pub fn validate_search(search: &str) -> ValidationResult<()> {
    if search.chars().count() > MAX_SEARCH_LENGTH {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: MAX_SEARCH_LENGTH,
        });
    }

    Ok(())
}

/// Validates every numeric and free-text field of a list request.
///
/// Sort field and direction are not checked: the query builder maps them
/// onto allow-lists and never fails.
pub fn validate_list_request(req: &ListRequest) -> ValidationResult<()> {
    validate_page_size(req.page_size)?;
    validate_offset(req.offset)?;
    validate_search(&req.search)?;
    Ok(())
}

// =============================================================================
// Status
// =============================================================================

/// Validates a shipped status against the known set.
///
/// For callers of `update_statuses` that want to refuse typos before they
/// reach the database.
pub fn validate_status(status: &str) -> ValidationResult<ShippedStatus> {
    status.parse().map_err(|_| ValidationError::NotAllowed {
        field: "shipped_status".to_string(),
        allowed: ShippedStatus::ALL
            .iter()
            .map(|s| s.as_str().to_string())
            .collect(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_bounds() {
        assert!(validate_page_size(1).is_ok());
        assert!(validate_page_size(MAX_PAGE_SIZE).is_ok());
        assert!(validate_page_size(0).is_err());
        assert!(validate_page_size(-5).is_err());
        assert!(validate_page_size(MAX_PAGE_SIZE + 1).is_err());
    }

    #[test]
    fn test_offset_must_be_non_negative() {
        assert!(validate_offset(0).is_ok());
        assert!(validate_offset(30).is_ok());
        assert!(validate_offset(-1).is_err());
    }

    #[test]
    fn test_search_length_counts_characters() {
        assert!(validate_search("").is_ok());
        assert!(validate_search(&"ä".repeat(MAX_SEARCH_LENGTH)).is_ok());
        assert!(validate_search(&"a".repeat(MAX_SEARCH_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_list_request_reports_first_failure() {
        let req = ListRequest::new(0).offset(-1);
        let err = validate_list_request(&req).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { ref field, .. } if field == "page_size"));

        let req = ListRequest::new(10).offset(-1);
        let err = validate_list_request(&req).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { ref field, .. } if field == "offset"));
    }

    #[test]
    fn test_status_lists_allowed_values() {
        let err = validate_status("lost").unwrap_err();
        match err {
            ValidationError::NotAllowed { field, allowed } => {
                assert_eq!(field, "shipped_status");
                assert_eq!(allowed, vec!["shipping", "delivering", "completed", "arrived"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
