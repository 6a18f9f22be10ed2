//! # parcel-db: Persistence Layer for the Parcel Shop
//!
//! Order and product repositories over SQLite, using sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Parcel Shop Data Flow                            │
//! │                                                                         │
//! │  HTTP handler / robot dispatcher                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    parcel-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │   Database    │   │  Repositories  │   │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │   │  order.rs      │   │  (embedded)  │   │   │
//! │  │   │               │   │  product.rs    │   │              │   │   │
//! │  │   │ SqlitePool    │◄──│      │         │   │ 001_init.sql │   │   │
//! │  │   │ DbTransaction │   │      ▼         │   │              │   │   │
//! │  │   │ (dbtx.rs)     │   │  query.rs      │   │              │   │   │
//! │  │   └───────────────┘   └────────────────┘   └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`dbtx`] - The `Dbtx` handle trait (pool, transaction)
//! - [`query`] - Typed WHERE / ORDER BY / LIMIT builder
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Order and product repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use parcel_core::{ListRequest, SearchType};
//! use parcel_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_env("./parcel.db")).await?;
//!
//! let order_id = db.orders().create(user_id, product_id).await?;
//!
//! let req = ListRequest::new(20).search("tea", SearchType::Prefix);
//! let page = db.orders().list_orders(user_id, &req).await?;
//! println!("{} of {} orders", page.len(), page.total);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod dbtx;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod query;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use dbtx::{DbTransaction, Dbtx, ExecResult};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
