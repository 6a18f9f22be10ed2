//! # Database Handles
//!
//! The [`Dbtx`] trait is what repositories are written against: execute a
//! statement, select many rows, get one row, and rebind placeholders.
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   OrderRepository<D: Dbtx>      ProductRepository<D: Dbtx>              │
//! │              │                              │                           │
//! │              └──────────────┬───────────────┘                           │
//! │                             ▼                                           │
//! │                      trait Dbtx                                         │
//! │           ┌─────────────────┼──────────────────┐                        │
//! │           ▼                 ▼                  ▼                        │
//! │      SqlitePool        DbTransaction          &D                        │
//! │   (pooled, shared)   (one open tx, commit/  (borrow either)             │
//! │                       rollback consume it)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cancellation is inherited from sqlx: dropping the returned future aborts
//! the statement. Nothing here retries.

use std::fmt;
use std::future::Future;

use sqlx::sqlite::{SqliteArguments, SqliteQueryResult, SqliteRow};
use sqlx::{Arguments, FromRow, Sqlite, SqlitePool, Transaction};
use tokio::sync::Mutex;

use crate::error::{DbError, DbResult};
use crate::query::{PlaceholderStyle, SqlQuery, SqlValue};

/// Outcome of a non-SELECT statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    /// Row id of the last inserted row on this connection.
    pub last_insert_id: i64,
}

impl From<SqliteQueryResult> for ExecResult {
    fn from(result: SqliteQueryResult) -> Self {
        ExecResult {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_rowid(),
        }
    }
}

/// A handle that can run parameterized statements: a pool or a transaction.
pub trait Dbtx: Send + Sync {
    /// Placeholder syntax this handle's dialect expects.
    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Question
    }

    /// Rewrites portable `?` placeholders for this handle.
    fn rebind(&self, query: SqlQuery) -> SqlQuery {
        query.rebind(self.placeholder_style())
    }

    /// Runs a statement that returns no rows.
    fn exec(&self, query: &SqlQuery) -> impl Future<Output = DbResult<ExecResult>> + Send;

    /// Runs a query and maps every row.
    fn select<T>(&self, query: &SqlQuery) -> impl Future<Output = DbResult<Vec<T>>> + Send
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin;

    /// Runs a query that must return exactly one row.
    fn get<T>(&self, query: &SqlQuery) -> impl Future<Output = DbResult<T>> + Send
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin;

    /// Runs a query that returns at most one row.
    fn get_optional<T>(&self, query: &SqlQuery) -> impl Future<Output = DbResult<Option<T>>> + Send
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin;
}

/// Copies the query's bind values into an sqlx argument buffer.
fn arguments(params: &[SqlValue]) -> DbResult<SqliteArguments<'_>> {
    let mut args = SqliteArguments::default();
    for param in params {
        let added = match param {
            SqlValue::Int(value) => args.add(*value),
            SqlValue::Text(value) => args.add(value.as_str()),
        };
        added.map_err(|e| DbError::Bind(e.to_string()))?;
    }
    Ok(args)
}

// =============================================================================
// Pool
// =============================================================================

impl Dbtx for SqlitePool {
    async fn exec(&self, query: &SqlQuery) -> DbResult<ExecResult> {
        let args = arguments(query.params())?;
        let result = sqlx::query_with(query.sql(), args).execute(self).await?;
        Ok(result.into())
    }

    async fn select<T>(&self, query: &SqlQuery) -> DbResult<Vec<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let args = arguments(query.params())?;
        let rows = sqlx::query_as_with::<_, T, _>(query.sql(), args)
            .fetch_all(self)
            .await?;
        Ok(rows)
    }

    async fn get<T>(&self, query: &SqlQuery) -> DbResult<T>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let args = arguments(query.params())?;
        let row = sqlx::query_as_with::<_, T, _>(query.sql(), args)
            .fetch_one(self)
            .await?;
        Ok(row)
    }

    async fn get_optional<T>(&self, query: &SqlQuery) -> DbResult<Option<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let args = arguments(query.params())?;
        let row = sqlx::query_as_with::<_, T, _>(query.sql(), args)
            .fetch_optional(self)
            .await?;
        Ok(row)
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// An open transaction usable wherever a [`Dbtx`] is expected.
///
/// Statements are serialized through a mutex because the underlying
/// connection needs `&mut` access while repositories only hold `&self`.
/// Dropping the handle without [`commit`](Self::commit) rolls back.
///
/// ## Example
/// ```rust,ignore
/// let tx = db.begin().await?;
/// let order_id = OrderRepository::new(&tx).create(user_id, product_id).await?;
/// tx.commit().await?;
/// ```
pub struct DbTransaction {
    tx: Mutex<Transaction<'static, Sqlite>>,
}

impl DbTransaction {
    pub(crate) fn new(tx: Transaction<'static, Sqlite>) -> Self {
        DbTransaction { tx: Mutex::new(tx) }
    }

    /// Commits every statement run through this handle.
    pub async fn commit(self) -> DbResult<()> {
        self.tx.into_inner().commit().await?;
        Ok(())
    }

    /// Discards every statement run through this handle.
    pub async fn rollback(self) -> DbResult<()> {
        self.tx.into_inner().rollback().await?;
        Ok(())
    }
}

impl fmt::Debug for DbTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbTransaction").finish_non_exhaustive()
    }
}

impl Dbtx for DbTransaction {
    async fn exec(&self, query: &SqlQuery) -> DbResult<ExecResult> {
        let args = arguments(query.params())?;
        let mut tx = self.tx.lock().await;
        let result = sqlx::query_with(query.sql(), args)
            .execute(&mut **tx)
            .await?;
        Ok(result.into())
    }

    async fn select<T>(&self, query: &SqlQuery) -> DbResult<Vec<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let args = arguments(query.params())?;
        let mut tx = self.tx.lock().await;
        let rows = sqlx::query_as_with::<_, T, _>(query.sql(), args)
            .fetch_all(&mut **tx)
            .await?;
        Ok(rows)
    }

    async fn get<T>(&self, query: &SqlQuery) -> DbResult<T>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let args = arguments(query.params())?;
        let mut tx = self.tx.lock().await;
        let row = sqlx::query_as_with::<_, T, _>(query.sql(), args)
            .fetch_one(&mut **tx)
            .await?;
        Ok(row)
    }

    async fn get_optional<T>(&self, query: &SqlQuery) -> DbResult<Option<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let args = arguments(query.params())?;
        let mut tx = self.tx.lock().await;
        let row = sqlx::query_as_with::<_, T, _>(query.sql(), args)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(row)
    }
}

// =============================================================================
// Borrowed handles
// =============================================================================

impl<D: Dbtx> Dbtx for &D {
    fn placeholder_style(&self) -> PlaceholderStyle {
        (**self).placeholder_style()
    }

    fn exec(&self, query: &SqlQuery) -> impl Future<Output = DbResult<ExecResult>> + Send {
        (**self).exec(query)
    }

    fn select<T>(&self, query: &SqlQuery) -> impl Future<Output = DbResult<Vec<T>>> + Send
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        (**self).select(query)
    }

    fn get<T>(&self, query: &SqlQuery) -> impl Future<Output = DbResult<T>> + Send
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        (**self).get(query)
    }

    fn get_optional<T>(&self, query: &SqlQuery) -> impl Future<Output = DbResult<Option<T>>> + Send
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        (**self).get_optional(query)
    }
}
