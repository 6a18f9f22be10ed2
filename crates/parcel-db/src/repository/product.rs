//! # Product Repository
//!
//! Read-only access to the product catalog.
//!
//! Listing follows the same filter/sort/page/count shape as order history,
//! minus the user scope: search is always a substring match over name OR
//! description, and sort fields go through [`PRODUCT_SORT_FIELDS`].

use parcel_core::{ListRequest, Paginated, Product, SearchType};
use sqlx::SqlitePool;
use tracing::debug;

use crate::dbtx::Dbtx;
use crate::error::DbResult;
use crate::query::{Column, Filter, OrderBy, Page, Predicate, SelectQuery, SortAllowList, SqlQuery};

const PRODUCT_COLUMNS: &str = "product_id, name, value, weight, image, description";

const PRODUCT_SOURCE: &str = "products";

const SEARCH_COLUMNS: [Column; 2] = [Column::new("name"), Column::new("description")];

/// Sort fields accepted by [`ProductRepository::list_products`].
pub const PRODUCT_SORT_FIELDS: SortAllowList = SortAllowList::new(
    &[
        ("product_id", Column::new("product_id")),
        ("name", Column::new("name")),
        ("value", Column::new("value")),
        ("weight", Column::new("weight")),
    ],
    Column::new("product_id"),
    Column::new("product_id"),
);

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository<D = SqlitePool> {
    db: D,
}

impl<D: Dbtx> ProductRepository<D> {
    /// Creates a new ProductRepository.
    pub fn new(db: D) -> Self {
        ProductRepository { db }
    }

    /// One page of the catalog plus the total match count.
    ///
    /// `user_id` does not narrow the result; the catalog is shared by every
    /// user. `search_type` is ignored: product search is always `%term%`.
    pub async fn list_products(&self, user_id: i64, req: &ListRequest) -> DbResult<Paginated<Product>> {
        debug!(
            user_id,
            search = %req.search,
            sort_field = %req.sort_field,
            sort_order = %req.sort_order,
            page_size = req.page_size,
            offset = req.offset,
            "Listing products"
        );

        let mut filter = Filter::new();
        if !req.search.is_empty() {
            filter.push(Predicate::any_like(
                &SEARCH_COLUMNS,
                SearchType::Partial.pattern(&req.search),
            ));
        }

        let select = SelectQuery::new(PRODUCT_COLUMNS, PRODUCT_SOURCE)
            .filter(filter)
            .order_by(OrderBy::resolve(
                &PRODUCT_SORT_FIELDS,
                &req.sort_field,
                req.sort_direction(),
            ))
            .page(Page::new(req.page_size, req.offset));

        let products: Vec<Product> = self.db.select(&self.db.rebind(select.to_query()?)).await?;
        let (total,): (i64,) = self
            .db
            .get(&self.db.rebind(select.to_count_query()?))
            .await?;

        debug!(count = products.len(), total, "Listed products");
        Ok(Paginated::new(products, total))
    }

    /// Gets a product by id.
    pub async fn get_by_id(&self, product_id: i64) -> DbResult<Option<Product>> {
        let select = SelectQuery::new(PRODUCT_COLUMNS, PRODUCT_SOURCE)
            .filter(Filter::new().and(Predicate::eq(Column::new("product_id"), product_id)));

        self.db.get_optional(&self.db.rebind(select.to_query()?)).await
    }

    /// Number of products in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let (count,): (i64,) = self
            .db
            .get(&self.db.rebind(SqlQuery::new("SELECT COUNT(*) FROM products")))
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{insert_product, test_db};
    use crate::pool::Database;

    fn ids(page: &Paginated<Product>) -> Vec<i64> {
        page.items.iter().map(|p| p.product_id).collect()
    }

    async fn catalog(db: &Database) -> [i64; 4] {
        [
            insert_product(db, "Green Tea", 800, 200, "Loose leaf, 250g").await,
            insert_product(db, "Tea Kettle", 3000, 900, "Stainless steel").await,
            insert_product(db, "Coffee Beans", 1500, 500, "Goes well with milk").await,
            insert_product(db, "Mug", 800, 300, "Ceramic, fits a tea bag").await,
        ]
    }

    #[tokio::test]
    async fn test_list_without_search_returns_everything() {
        let db = test_db().await;
        let [green, kettle, coffee, mug] = catalog(&db).await;

        let page = db.products().list_products(1, &ListRequest::new(10)).await.unwrap();
        assert_eq!(ids(&page), vec![green, kettle, coffee, mug]);
        assert_eq!(page.total, 4);

        let mug_row = &page.items[3];
        assert_eq!(mug_row.name, "Mug");
        assert_eq!(mug_row.value, 800);
        assert_eq!(mug_row.weight, 300);
        assert_eq!(mug_row.image, "/images/mug.png");
    }

    #[tokio::test]
    async fn test_search_matches_name_or_description() {
        let db = test_db().await;
        let [green, kettle, _coffee, mug] = catalog(&db).await;

        // Prefix is not honored for products; "tea" still matches mid-string.
        let req = ListRequest::new(10).search("tea", SearchType::Prefix);
        let page = db.products().list_products(1, &req).await.unwrap();
        assert_eq!(ids(&page), vec![green, kettle, mug]);
        assert_eq!(page.total, 3);

        let req = ListRequest::new(10).search("milk", SearchType::Partial);
        let page = db.products().list_products(1, &req).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page.items[0].name, "Coffee Beans");
    }

    #[tokio::test]
    async fn test_search_wildcards_match_literally() {
        let db = test_db().await;
        catalog(&db).await;
        let promo = insert_product(&db, "Gift Card", 2500, 10, "10% off your_next order").await;

        let req = ListRequest::new(10).search("%", SearchType::Partial);
        let page = db.products().list_products(1, &req).await.unwrap();
        assert_eq!(ids(&page), vec![promo]);
        assert_eq!(page.total, 1);

        let req = ListRequest::new(10).search("r_n", SearchType::Partial);
        let page = db.products().list_products(1, &req).await.unwrap();
        assert_eq!(ids(&page), vec![promo]);

        // as a wildcard, "t_a" would match every "tea"
        let req = ListRequest::new(10).search("t_a", SearchType::Partial);
        let page = db.products().list_products(1, &req).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_user_id_does_not_filter() {
        let db = test_db().await;
        catalog(&db).await;

        let a = db.products().list_products(1, &ListRequest::new(10)).await.unwrap();
        let b = db.products().list_products(999, &ListRequest::new(10)).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_total_is_independent_of_paging() {
        let db = test_db().await;
        let all = catalog(&db).await;

        let page = db
            .products()
            .list_products(1, &ListRequest::new(3).offset(3))
            .await
            .unwrap();
        assert_eq!(ids(&page), vec![all[3]]);
        assert_eq!(page.total, 4);

        let page = db
            .products()
            .list_products(1, &ListRequest::new(3).offset(9))
            .await
            .unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total, 4);
    }

    #[tokio::test]
    async fn test_sort_by_value_desc_breaks_ties_by_id() {
        let db = test_db().await;
        let [green, kettle, coffee, mug] = catalog(&db).await;

        let req = ListRequest::new(10).sort("value", "DeSc");
        let page = db.products().list_products(1, &req).await.unwrap();
        assert_eq!(ids(&page), vec![kettle, coffee, green, mug]);

        let req = ListRequest::new(10).sort("value", "sideways");
        let page = db.products().list_products(1, &req).await.unwrap();
        assert_eq!(ids(&page), vec![green, mug, coffee, kettle]);
    }

    #[tokio::test]
    async fn test_injected_sort_field_falls_back_to_id() {
        let db = test_db().await;
        let [green, kettle, coffee, mug] = catalog(&db).await;

        let req = ListRequest::new(10).sort("name; DROP TABLE products; --", "desc");
        let page = db.products().list_products(1, &req).await.unwrap();
        assert_eq!(ids(&page), vec![mug, coffee, kettle, green]);

        let req = ListRequest::new(10).sort("name", "asc; DELETE FROM products");
        let page = db.products().list_products(1, &req).await.unwrap();
        assert_eq!(ids(&page), vec![coffee, green, mug, kettle]);

        assert_eq!(db.products().count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_get_by_id_and_count() {
        let db = test_db().await;
        assert_eq!(db.products().count().await.unwrap(), 0);

        let [_, kettle, _, _] = catalog(&db).await;

        let product = db.products().get_by_id(kettle).await.unwrap().unwrap();
        assert_eq!(product.name, "Tea Kettle");
        assert_eq!(product.description, "Stainless steel");
        assert!(db.products().get_by_id(12345).await.unwrap().is_none());
        assert_eq!(db.products().count().await.unwrap(), 4);
    }
}
