//! # Domain Types
//!
//! Row shapes handed out by the repositories.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Order       │   │  ShippingOrder  │   │    Product      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  order_id       │   │  order_id       │   │  product_id     │       │
//! │  │  user_id (FK)   │   │  weight  ◄──────┼───┤  weight         │       │
//! │  │  product_id(FK) │   │  value   ◄──────┼───┤  value          │       │
//! │  │  product_name ◄─┼───┼─────────────────┼───┤  name           │       │
//! │  │  shipped_status │   └─────────────────┘   │  image          │       │
//! │  │  created_at     │                         │  description    │       │
//! │  │  arrived_at?    │                         └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Identifiers are the database's integer row ids. The database owns every
//! entity; these structs are read snapshots.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

// =============================================================================
// Shipped Status
// =============================================================================

/// Known values of `orders.shipped_status`.
///
/// The column is a free-form string: the repositories store whatever status
/// the caller hands them. This enum names the values the shop and the robot
/// fleet actually use.
///
/// ```text
///   create() ──► shipping ──► delivering ──► completed / arrived
///                   ▲              │
///                   └──────────────┘   (any → any via update_statuses)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ShippedStatus {
    /// Initial status of every new order; waiting for a robot.
    #[default]
    Shipping,
    /// Picked up by a robot and on its way.
    Delivering,
    /// Handed over to the customer.
    Completed,
    /// Reached the destination.
    Arrived,
}

impl ShippedStatus {
    /// Every known status, in lifecycle order.
    pub const ALL: [ShippedStatus; 4] = [
        ShippedStatus::Shipping,
        ShippedStatus::Delivering,
        ShippedStatus::Completed,
        ShippedStatus::Arrived,
    ];

    /// The string stored in the database.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ShippedStatus::Shipping => "shipping",
            ShippedStatus::Delivering => "delivering",
            ShippedStatus::Completed => "completed",
            ShippedStatus::Arrived => "arrived",
        }
    }
}

impl fmt::Display for ShippedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShippedStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShippedStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::UnknownStatus(s.to_string()))
    }
}

// =============================================================================
// Order
// =============================================================================

/// An order as shown in a user's order history.
///
/// `product_name` is denormalized from `products.name` by the listing join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub order_id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub product_name: String,
    /// Free-form status string, see [`ShippedStatus`] for known values.
    pub shipped_status: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub arrived_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Parses the stored status, if it is one of the known values.
    pub fn status(&self) -> Option<ShippedStatus> {
        self.shipped_status.parse().ok()
    }
}

// =============================================================================
// Shipping Order
// =============================================================================

/// An in-flight order with the capacity figures a robot needs for packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ShippingOrder {
    pub order_id: i64,
    /// Weight of the ordered product.
    pub weight: i64,
    /// Value of the ordered product.
    pub value: i64,
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub product_id: i64,
    pub name: String,
    pub value: i64,
    pub weight: i64,
    /// Image path or URL, served by the frontend.
    pub image: String,
    pub description: String,
}

// =============================================================================
// Paginated
// =============================================================================

/// One page of rows plus the number of rows matching the filter overall.
///
/// `total` ignores paging, so callers can compute the page count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64) -> Self {
        Paginated { items, total }
    }

    /// Number of pages of `page_size` needed to show `total` rows.
    ///
    /// A non-positive page size yields zero pages.
    pub fn total_pages(&self, page_size: i64) -> i64 {
        if page_size <= 0 || self.total <= 0 {
            return 0;
        }
        (self.total - 1) / page_size + 1
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
