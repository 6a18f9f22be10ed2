//! # Repository Module
//!
//! Database repository implementations for the parcel shop.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler / robot dispatcher                                       │
//! │       │                                                                 │
//! │       │  db.orders().list_orders(user_id, &req)                        │
//! │       ▼                                                                 │
//! │  OrderRepository<D: Dbtx>          ProductRepository<D: Dbtx>          │
//! │  ├── create                        └── list_products                   │
//! │  ├── update_statuses                   get_by_id, count                │
//! │  ├── get_shipping_orders                                               │
//! │  ├── list_orders                                                       │
//! │  └── find_by_id                                                        │
//! │       │                                                                 │
//! │       │  SqlQuery (built by crate::query, rebound by D)                │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories are stateless apart from the handle they wrap and never
//! depend on each other.

pub mod order;
pub mod product;
