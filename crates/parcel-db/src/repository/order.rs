//! # Order Repository
//!
//! Database operations for orders.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. CHECKOUT                                                           │
//! │     └── create(user_id, product_id) → "42"  { status: shipping }       │
//! │                                                                         │
//! │  2. ROBOT PICKS A BATCH                                                │
//! │     └── get_shipping_orders() → [(id, weight, value), ...]             │
//! │     └── update_statuses([12, 42, 57], "delivering")  (one UPDATE)      │
//! │                                                                         │
//! │  3. DELIVERED                                                          │
//! │     └── update_statuses([12, 42, 57], "completed")                     │
//! │                                                                         │
//! │  4. CUSTOMER LOOKS AT HISTORY                                          │
//! │     └── list_orders(user_id, &req) → page + total                      │
//! │                                                                         │
//! │  No step validates transitions; the caller owns that policy.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use parcel_core::{ListRequest, Order, Paginated, ShippedStatus, ShippingOrder};
use sqlx::SqlitePool;
use tracing::debug;

use crate::dbtx::Dbtx;
use crate::error::DbResult;
use crate::query::{
    Column, Filter, OrderBy, Page, Predicate, SelectQuery, SortAllowList, SqlQuery,
};

const ORDER_COLUMNS: &str = "o.order_id, o.user_id, o.product_id, p.name AS product_name, \
                             o.shipped_status, o.created_at, o.arrived_at";

const ORDER_SOURCE: &str = "orders o JOIN products p ON o.product_id = p.product_id";

/// Sort fields accepted by [`OrderRepository::list_orders`].
///
/// Unknown names sort by `o.order_id`, which is also the tiebreak.
pub const ORDER_SORT_FIELDS: SortAllowList = SortAllowList::new(
    &[
        ("order_id", Column::new("o.order_id")),
        ("product_name", Column::new("p.name")),
        ("created_at", Column::new("o.created_at")),
        ("arrived_at", Column::new("o.arrived_at")),
        ("shipped_status", Column::new("o.shipped_status")),
    ],
    Column::new("o.order_id"),
    Column::new("o.order_id"),
);

/// Repository for order database operations.
///
/// ## Usage
/// ```rust,ignore
/// let orders = db.orders();
///
/// let id = orders.create(user_id, product_id).await?;
/// let page = orders.list_orders(user_id, &ListRequest::new(10)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OrderRepository<D = SqlitePool> {
    db: D,
}

impl<D: Dbtx> OrderRepository<D> {
    /// Creates a new OrderRepository over a pool, a transaction, or a
    /// borrow of either.
    pub fn new(db: D) -> Self {
        OrderRepository { db }
    }

    /// Places an order and returns its id as a decimal string.
    ///
    /// The order starts in `shipping`; `created_at` is taken from the
    /// database clock.
    ///
    /// ## Errors
    /// Unknown `user_id` / `product_id` fail the foreign key and come back
    /// as `DbError::Database`.
    pub async fn create(&self, user_id: i64, product_id: i64) -> DbResult<String> {
        debug!(user_id, product_id, "Creating order");

        let query = SqlQuery::new(
            "INSERT INTO orders (user_id, product_id, shipped_status, created_at) \
             VALUES (?, ?, ?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(ShippedStatus::Shipping.as_str());

        let result = self.db.exec(&self.db.rebind(query)).await?;

        Ok(result.last_insert_id.to_string())
    }

    /// Sets `shipped_status` on every listed order in one statement.
    ///
    /// Used by the robot dispatcher when it takes a whole batch. An empty
    /// list is a no-op that never touches the database; ids that match no
    /// row are ignored.
    pub async fn update_statuses(&self, order_ids: &[i64], new_status: &str) -> DbResult<()> {
        if order_ids.is_empty() {
            return Ok(());
        }

        let mut query = SqlQuery::new("UPDATE orders SET shipped_status = ?").bind(new_status);
        Filter::new()
            .and(Predicate::in_list(
                Column::new("order_id"),
                order_ids.iter().copied(),
            ))
            .render_where(&mut query)?;

        let result = self.db.exec(&self.db.rebind(query)).await?;

        debug!(
            requested = order_ids.len(),
            updated = result.rows_affected,
            status = %new_status,
            "Updated order statuses"
        );
        Ok(())
    }

    /// All orders still waiting in `shipping`, with product weight and value.
    ///
    /// Unpaginated: the dispatcher packs robots from the full backlog.
    pub async fn get_shipping_orders(&self) -> DbResult<Vec<ShippingOrder>> {
        let query = SqlQuery::new(
            "SELECT o.order_id, p.weight, p.value \
             FROM orders o JOIN products p ON o.product_id = p.product_id \
             WHERE o.shipped_status = ? \
             ORDER BY o.order_id ASC",
        )
        .bind(ShippedStatus::Shipping.as_str());

        let orders: Vec<ShippingOrder> = self.db.select(&self.db.rebind(query)).await?;

        debug!(count = orders.len(), "Fetched shipping orders");
        Ok(orders)
    }

    /// One page of a user's order history plus the total match count.
    ///
    /// ## Query Shape
    /// ```text
    /// WHERE  o.user_id = ? [AND p.name LIKE ? ESCAPE '\']   ← shared with COUNT(*)
    /// ORDER BY <allow-listed column> <ASC|DESC>, o.order_id ASC
    /// LIMIT ? OFFSET ?
    /// ```
    ///
    /// `search_type = prefix` matches `term%`, anything else `%term%`; wildcards
    /// inside the term match literally.
    pub async fn list_orders(&self, user_id: i64, req: &ListRequest) -> DbResult<Paginated<Order>> {
        debug!(
            user_id,
            search = %req.search,
            sort_field = %req.sort_field,
            sort_order = %req.sort_order,
            page_size = req.page_size,
            offset = req.offset,
            "Listing orders"
        );

        let mut filter = Filter::new().and(Predicate::eq(Column::new("o.user_id"), user_id));
        if let Some(pattern) = req.search_pattern() {
            filter.push(Predicate::like(Column::new("p.name"), pattern));
        }

        let select = SelectQuery::new(ORDER_COLUMNS, ORDER_SOURCE)
            .filter(filter)
            .order_by(OrderBy::resolve(
                &ORDER_SORT_FIELDS,
                &req.sort_field,
                req.sort_direction(),
            ))
            .page(Page::new(req.page_size, req.offset));

        let orders: Vec<Order> = self.db.select(&self.db.rebind(select.to_query()?)).await?;
        let (total,): (i64,) = self
            .db
            .get(&self.db.rebind(select.to_count_query()?))
            .await?;

        debug!(count = orders.len(), total, "Listed orders");
        Ok(Paginated::new(orders, total))
    }

    /// Gets a single order (with product name) by id.
    pub async fn find_by_id(&self, order_id: i64) -> DbResult<Option<Order>> {
        let select = SelectQuery::new(ORDER_COLUMNS, ORDER_SOURCE)
            .filter(Filter::new().and(Predicate::eq(Column::new("o.order_id"), order_id)));

        self.db.get_optional(&self.db.rebind(select.to_query()?)).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::repository::test_support::{insert_product, insert_user, test_db};
    use chrono::Utc;
    use parcel_core::SearchType;

    fn ids(page: &Paginated<Order>) -> Vec<i64> {
        page.items.iter().map(|o| o.order_id).collect()
    }

    async fn create(repo: &OrderRepository, user_id: i64, product_id: i64) -> i64 {
        repo.create(user_id, product_id).await.unwrap().parse().unwrap()
    }

    #[tokio::test]
    async fn test_create_returns_numeric_id_and_starts_shipping() {
        let db = test_db().await;
        let user = insert_user(&db, "alice").await;
        let product = insert_product(&db, "Robot Vacuum", 24800, 3200, "").await;

        let id = db.orders().create(user, product).await.unwrap();
        assert!(!id.is_empty());
        let id: i64 = id.parse().unwrap();

        let order = db.orders().find_by_id(id).await.unwrap().unwrap();
        assert_eq!(order.user_id, user);
        assert_eq!(order.product_id, product);
        assert_eq!(order.product_name, "Robot Vacuum");
        assert_eq!(order.shipped_status, "shipping");
        assert_eq!(order.status(), Some(ShippedStatus::Shipping));
        assert!(order.created_at <= Utc::now());
        assert!(order.arrived_at.is_none());
    }

    #[tokio::test]
    async fn test_create_with_unknown_product_fails() {
        let db = test_db().await;
        let user = insert_user(&db, "alice").await;

        let err = db.orders().create(user, 9999).await.unwrap_err();
        assert!(matches!(err, DbError::Database(_)));
    }

    #[tokio::test]
    async fn test_find_by_id_missing_is_none() {
        let db = test_db().await;
        assert!(db.orders().find_by_id(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_statuses_with_no_ids_writes_nothing() {
        let db = test_db().await;
        let user = insert_user(&db, "alice").await;
        let product = insert_product(&db, "Kettle", 3000, 900, "").await;
        let repo = db.orders();
        create(&repo, user, product).await;

        let (before,): (i64,) = sqlx::query_as("SELECT total_changes()")
            .fetch_one(db.pool())
            .await
            .unwrap();

        repo.update_statuses(&[], "arrived").await.unwrap();

        let (after,): (i64,) = sqlx::query_as("SELECT total_changes()")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(before, after);
        assert_eq!(repo.get_shipping_orders().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_statuses_applies_to_listed_orders_only() {
        let db = test_db().await;
        let user = insert_user(&db, "alice").await;
        let product = insert_product(&db, "Kettle", 3000, 900, "").await;
        let repo = db.orders();
        let o1 = create(&repo, user, product).await;
        let o2 = create(&repo, user, product).await;
        let o3 = create(&repo, user, product).await;

        // 777 matches nothing and is ignored
        repo.update_statuses(&[o1, o2, 777], "arrived").await.unwrap();

        let page = repo.list_orders(user, &ListRequest::new(10)).await.unwrap();
        let status_of = |id: i64| {
            page.items
                .iter()
                .find(|o| o.order_id == id)
                .map(|o| o.shipped_status.clone())
                .unwrap()
        };
        assert_eq!(status_of(o1), "arrived");
        assert_eq!(status_of(o2), "arrived");
        assert_eq!(status_of(o3), "shipping");
    }

    #[tokio::test]
    async fn test_shipping_orders_carry_weight_and_value() {
        let db = test_db().await;
        let user = insert_user(&db, "alice").await;
        let light = insert_product(&db, "Tea Bags", 500, 100, "").await;
        let heavy = insert_product(&db, "Cast Iron Pan", 6000, 2500, "").await;
        let repo = db.orders();
        let o1 = create(&repo, user, light).await;
        let o2 = create(&repo, user, heavy).await;
        let o3 = create(&repo, user, heavy).await;

        repo.update_statuses(&[o2], "delivering").await.unwrap();

        let shipping = repo.get_shipping_orders().await.unwrap();
        assert_eq!(
            shipping,
            vec![
                ShippingOrder { order_id: o1, weight: 100, value: 500 },
                ShippingOrder { order_id: o3, weight: 2500, value: 6000 },
            ]
        );
    }

    #[tokio::test]
    async fn test_list_orders_is_scoped_to_user() {
        let db = test_db().await;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;
        let product = insert_product(&db, "Kettle", 3000, 900, "").await;
        let repo = db.orders();
        let a1 = create(&repo, alice, product).await;
        create(&repo, bob, product).await;
        let a2 = create(&repo, alice, product).await;

        let page = repo.list_orders(alice, &ListRequest::new(10)).await.unwrap();
        assert_eq!(ids(&page), vec![a1, a2]);
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn test_prefix_and_partial_search() {
        let db = test_db().await;
        let user = insert_user(&db, "alice").await;
        let green = insert_product(&db, "Green Tea", 800, 200, "").await;
        let kettle = insert_product(&db, "Tea Kettle", 3000, 900, "").await;
        let coffee = insert_product(&db, "Coffee Beans", 1500, 500, "").await;
        let repo = db.orders();
        let o_green = create(&repo, user, green).await;
        let o_kettle = create(&repo, user, kettle).await;
        create(&repo, user, coffee).await;

        let prefix = ListRequest::new(10).search("Tea", SearchType::Prefix);
        let page = repo.list_orders(user, &prefix).await.unwrap();
        assert_eq!(ids(&page), vec![o_kettle]);
        assert_eq!(page.total, 1);
        assert!(page.items.iter().all(|o| o.product_name.starts_with("Tea")));

        let partial = ListRequest::new(10).search("Tea", SearchType::Partial);
        let page = repo.list_orders(user, &partial).await.unwrap();
        assert_eq!(ids(&page), vec![o_green, o_kettle]);
        assert_eq!(page.total, 2);
        assert!(page.items.iter().all(|o| o.product_name.contains("Tea")));
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let db = test_db().await;
        let user = insert_user(&db, "alice").await;
        let kettle = insert_product(&db, "Kettle", 3000, 900, "").await;
        let mug = insert_product(&db, "Mug", 800, 300, "").await;
        let sale = insert_product(&db, "50% Off_Mug", 400, 300, "").await;
        let repo = db.orders();
        create(&repo, user, kettle).await;
        create(&repo, user, mug).await;
        let o_sale = create(&repo, user, sale).await;

        for term in ["%", "_", "_ug", "\\"] {
            let req = ListRequest::new(10).search(term, SearchType::Prefix);
            let page = repo.list_orders(user, &req).await.unwrap();
            assert!(page.is_empty(), "prefix {term:?} matched {:?}", ids(&page));
            assert_eq!(page.total, 0);
        }

        let req = ListRequest::new(10).search("50%", SearchType::Prefix);
        let page = repo.list_orders(user, &req).await.unwrap();
        assert_eq!(ids(&page), vec![o_sale]);

        let req = ListRequest::new(10).search("_M", SearchType::Partial);
        let page = repo.list_orders(user, &req).await.unwrap();
        assert_eq!(ids(&page), vec![o_sale]);
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_pagination_total_ignores_paging() {
        let db = test_db().await;
        let user = insert_user(&db, "alice").await;
        let product = insert_product(&db, "Kettle", 3000, 900, "").await;
        let repo = db.orders();
        let mut all = Vec::new();
        for _ in 0..25 {
            all.push(create(&repo, user, product).await);
        }

        let page = repo
            .list_orders(user, &ListRequest::new(10).offset(20))
            .await
            .unwrap();
        assert_eq!(ids(&page), all[20..].to_vec());
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages(10), 3);

        let page = repo
            .list_orders(user, &ListRequest::new(10).offset(30))
            .await
            .unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total, 25);
    }

    #[tokio::test]
    async fn test_unknown_sort_field_orders_by_id() {
        let db = test_db().await;
        let user = insert_user(&db, "alice").await;
        let zebra = insert_product(&db, "Zebra Plush", 2000, 300, "").await;
        let apple = insert_product(&db, "Apple Slicer", 900, 150, "").await;
        let repo = db.orders();
        let o1 = create(&repo, user, zebra).await;
        let o2 = create(&repo, user, apple).await;

        let req = ListRequest::new(10).sort("p.name; DROP TABLE orders; --", "asc");
        let page = repo.list_orders(user, &req).await.unwrap();
        assert_eq!(ids(&page), vec![o1, o2]);

        let req = ListRequest::new(10).sort("nonsense", "DESC");
        let page = repo.list_orders(user, &req).await.unwrap();
        assert_eq!(ids(&page), vec![o2, o1]);

        let req = ListRequest::new(10).sort("product_name", "asc");
        let page = repo.list_orders(user, &req).await.unwrap();
        assert_eq!(ids(&page), vec![o2, o1]);

        // The table survived the injection attempt.
        assert_eq!(repo.list_orders(user, &ListRequest::new(10)).await.unwrap().total, 2);
    }

    #[tokio::test]
    async fn test_ties_break_by_ascending_id_in_both_directions() {
        let db = test_db().await;
        let user = insert_user(&db, "alice").await;
        let tea = insert_product(&db, "Tea Bags", 500, 100, "").await;
        let coffee = insert_product(&db, "Coffee Beans", 1500, 500, "").await;
        let repo = db.orders();
        let t1 = create(&repo, user, tea).await;
        let c1 = create(&repo, user, coffee).await;
        let t2 = create(&repo, user, tea).await;
        let t3 = create(&repo, user, tea).await;

        let req = ListRequest::new(10).sort("product_name", "desc");
        let page = repo.list_orders(user, &req).await.unwrap();
        assert_eq!(ids(&page), vec![t1, t2, t3, c1]);

        let req = ListRequest::new(10).sort("product_name", "asc");
        let page = repo.list_orders(user, &req).await.unwrap();
        assert_eq!(ids(&page), vec![c1, t1, t2, t3]);

        // every order shares the same status: pure tiebreak order
        let req = ListRequest::new(10).sort("shipped_status", "desc");
        let page = repo.list_orders(user, &req).await.unwrap();
        assert_eq!(ids(&page), vec![t1, c1, t2, t3]);
    }

    #[tokio::test]
    async fn test_rolled_back_transaction_discards_order() {
        let db = test_db().await;
        let user = insert_user(&db, "alice").await;
        let product = insert_product(&db, "Kettle", 3000, 900, "").await;

        let tx = db.begin().await.unwrap();
        let id: i64 = OrderRepository::new(&tx)
            .create(user, product)
            .await
            .unwrap()
            .parse()
            .unwrap();
        assert!(OrderRepository::new(&tx).find_by_id(id).await.unwrap().is_some());
        tx.rollback().await.unwrap();

        assert!(db.orders().find_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_committed_transaction_keeps_bulk_update() {
        let db = test_db().await;
        let user = insert_user(&db, "alice").await;
        let product = insert_product(&db, "Kettle", 3000, 900, "").await;
        let o1 = create(&db.orders(), user, product).await;
        let o2 = create(&db.orders(), user, product).await;

        let tx = db.begin().await.unwrap();
        let repo = OrderRepository::new(&tx);
        let batch: Vec<i64> = repo
            .get_shipping_orders()
            .await
            .unwrap()
            .iter()
            .map(|o| o.order_id)
            .collect();
        repo.update_statuses(&batch, "delivering").await.unwrap();
        tx.commit().await.unwrap();

        assert!(db.orders().get_shipping_orders().await.unwrap().is_empty());
        let page = db.orders().list_orders(user, &ListRequest::new(10)).await.unwrap();
        assert_eq!(ids(&page), vec![o1, o2]);
        assert!(page.items.iter().all(|o| o.shipped_status == "delivering"));
    }
}
