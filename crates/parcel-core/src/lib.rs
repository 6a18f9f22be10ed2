//! # parcel-core: Domain Types for the Parcel Shop
//!
//! Pure data shapes shared between the persistence layer (`parcel-db`) and
//! the HTTP layer that serves the storefront and the delivery-robot fleet.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Parcel Shop Data Flow                            │
//! │                                                                         │
//! │  HTTP handler (GET /api/v1/orders?search=cof&type=prefix...)           │
//! │       │                                                                 │
//! │       │  ListRequest (deserialized here)                               │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               ★ parcel-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────────┐  ┌──────────────┐  ┌────────────────────┐   │   │
//! │  │   │   types     │  │   request    │  │    validation      │   │   │
//! │  │   │  Order      │  │  ListRequest │  │  page size, offset │   │   │
//! │  │   │  Product    │  │  SearchType  │  │  shipped status    │   │   │
//! │  │   │  Paginated  │  │  SortDir.    │  │                    │   │   │
//! │  │   └─────────────┘  └──────────────┘  └────────────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  parcel-db (OrderRepository, ProductRepository)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Row shapes (Order, ShippingOrder, Product) and `Paginated`
//! - [`request`] - List query parameters and their normalization
//! - [`error`] - Domain error types
//! - [`validation`] - Opt-in input checks for callers
//!
//! ## Example Usage
//!
//! ```rust
//! use parcel_core::{ListRequest, SearchType, SortDirection};
//!
//! let req = ListRequest::new(10)
//!     .search("cof", SearchType::Prefix)
//!     .sort("created_at", "desc")
//!     .with_page(3);
//!
//! assert_eq!(req.offset, 20);
//! assert_eq!(req.search_pattern().as_deref(), Some("cof%"));
//! assert_eq!(req.sort_direction(), SortDirection::Desc);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod request;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use request::{escape_like, ListRequest, SearchType, SortDirection, LIKE_ESCAPE};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Page size used when a request does not specify one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Largest page a caller may ask for (enforced by [`validation`] only).
pub const MAX_PAGE_SIZE: i64 = 100;
