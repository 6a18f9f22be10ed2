//! # List Requests
//!
//! Query parameters shared by every paginated list endpoint.
//!
//! ## Normalization Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Raw parameter          Normalized to                                   │
//! │  ──────────────         ──────────────────────────────────────────────  │
//! │  type = "prefix"        SearchType::Prefix   → LIKE 'term%'             │
//! │  type = anything else   SearchType::Partial  → LIKE '%term%'            │
//! │  sort_order = "desc"    SortDirection::Desc  (case-insensitive)         │
//! │  sort_order = "up"      SortDirection::Asc   (fallback)                 │
//! │  sort_field             left raw here; resolved against an allow-list  │
//! │                         by the query builder in parcel-db              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in here is ever rejected: unknown values degrade to defaults so a
//! sloppy client still gets a page back.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::DEFAULT_PAGE_SIZE;

// =============================================================================
// Search Type
// =============================================================================

/// How the search term is matched against product names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SearchType {
    /// Name starts with the term.
    Prefix,
    /// Name contains the term anywhere.
    #[default]
    Partial,
}

impl SearchType {
    /// Interprets the wire value. Only `"prefix"` selects prefix matching.
    pub fn parse(value: &str) -> Self {
        if value == "prefix" {
            SearchType::Prefix
        } else {
            SearchType::Partial
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            SearchType::Prefix => "prefix",
            SearchType::Partial => "partial",
        }
    }

    /// Builds the `LIKE` pattern for `term`.
    ///
    /// `%`, `_` and `\` in the term are escaped with `\`, so they match
    /// literally; the pattern must be used with `ESCAPE '\'`.
    pub fn pattern(&self, term: &str) -> String {
        let term = escape_like(term);
        match self {
            SearchType::Prefix => format!("{term}%"),
            SearchType::Partial => format!("%{term}%"),
        }
    }
}

/// Escape character used in every `LIKE ... ESCAPE` clause.
pub const LIKE_ESCAPE: char = '\\';

/// Escapes `LIKE` wildcards (`%`, `_`) and the escape character itself.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}

impl From<String> for SearchType {
    fn from(value: String) -> Self {
        SearchType::parse(&value)
    }
}

impl From<SearchType> for String {
    fn from(value: SearchType) -> Self {
        value.as_str().to_string()
    }
}

// =============================================================================
// Sort Direction
// =============================================================================

/// Sort direction of the primary ORDER BY key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Case-insensitive parse; anything other than asc/desc becomes `Asc`.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    /// SQL keyword for this direction.
    pub const fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

// =============================================================================
// List Request
// =============================================================================

/// Search, sort and paging parameters for a list query.
///
/// Constructed per request, usually by deserializing query parameters:
///
/// ```rust
/// use parcel_core::{ListRequest, SearchType};
///
/// let req: ListRequest = serde_json::from_str(
///     r#"{"search":"tea","type":"prefix","page_size":5,"offset":10}"#,
/// ).unwrap();
///
/// assert_eq!(req.search_type, SearchType::Prefix);
/// assert_eq!(req.sort_field, "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct ListRequest {
    /// Search term; empty disables the name filter.
    pub search: String,

    /// Match mode for `search`.
    #[serde(rename = "type")]
    #[ts(type = "string")]
    pub search_type: SearchType,

    /// Requested sort field, validated against an allow-list downstream.
    pub sort_field: String,

    /// Requested sort direction, `"asc"` or `"desc"`.
    pub sort_order: String,

    /// Rows per page.
    pub page_size: i64,

    /// Rows to skip.
    pub offset: i64,
}

impl Default for ListRequest {
    fn default() -> Self {
        ListRequest::new(DEFAULT_PAGE_SIZE)
    }
}

impl ListRequest {
    /// First page of `page_size` rows, no search, default sort.
    pub fn new(page_size: i64) -> Self {
        ListRequest {
            search: String::new(),
            search_type: SearchType::Partial,
            sort_field: String::new(),
            sort_order: String::new(),
            page_size,
            offset: 0,
        }
    }

    /// Sets the search term and match mode.
    pub fn search(mut self, term: impl Into<String>, search_type: SearchType) -> Self {
        self.search = term.into();
        self.search_type = search_type;
        self
    }

    /// Sets the raw sort field and direction.
    pub fn sort(mut self, field: impl Into<String>, order: impl Into<String>) -> Self {
        self.sort_field = field.into();
        self.sort_order = order.into();
        self
    }

    /// Sets the offset directly.
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the offset from a 1-based page number. Pages below 1 mean page 1.
    pub fn with_page(mut self, page: i64) -> Self {
        let page = page.max(1);
        self.offset = (page - 1).saturating_mul(self.page_size);
        self
    }

    /// `LIKE` pattern for the search term, or `None` when not searching.
    pub fn search_pattern(&self) -> Option<String> {
        if self.search.is_empty() {
            None
        } else {
            Some(self.search_type.pattern(&self.search))
        }
    }

    /// Normalized sort direction.
    pub fn sort_direction(&self) -> SortDirection {
        SortDirection::parse(&self.sort_order)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
