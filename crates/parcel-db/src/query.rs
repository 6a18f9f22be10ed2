//! # Query Builder
//!
//! Small typed builder for the dynamic parts of list queries.
//!
//! ## Why Not Format Strings?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Piece of SQL            Source                    How it enters SQL    │
//! │  ───────────────         ───────────────────────   ──────────────────   │
//! │  projection / FROM       &'static str in code      text                 │
//! │  column in predicate     Column (&'static str)     text                 │
//! │  ORDER BY column         SortAllowList lookup      text                 │
//! │  ASC / DESC              SortDirection enum        text                 │
//! │  search term, ids, ...   user input                `?` + bind value     │
//! │  LIMIT / OFFSET          user input                `?` + bind value     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only `'static` strings ever become SQL text, so a request value has no
//! path into the statement except as a bind parameter. Sort identifiers must
//! come from a [`SortAllowList`]; there is no other way to build an
//! [`OrderBy`].
//!
//! One [`SelectQuery`] renders both the page query and its `COUNT(*)`
//! companion from the same [`Filter`], so the two can't disagree about
//! which rows match.

use parcel_core::SortDirection;

use crate::error::{DbError, DbResult};

// =============================================================================
// Building Blocks
// =============================================================================

/// A trusted SQL identifier, such as `o.order_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column(&'static str);

impl Column {
    pub const fn new(name: &'static str) -> Self {
        Column(name)
    }

    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

/// A bind parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Int(i64),
    Text(String),
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

/// Bind-parameter syntax of a database dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderStyle {
    /// `?` (SQLite, MySQL).
    #[default]
    Question,
    /// `$1, $2, ...` (PostgreSQL).
    Dollar,
}

/// Translates portable `?` placeholders into `style`.
///
/// Question marks inside single- or double-quoted literals, `-- line`
/// comments and `/* block */` comments are left alone.
pub fn rebind(sql: &str, style: PlaceholderStyle) -> String {
    if style == PlaceholderStyle::Question {
        return sql.to_string();
    }

    #[derive(Clone, Copy)]
    enum Skip {
        Code,
        Quoted(char),
        LineComment,
        BlockComment,
    }

    let mut out = String::with_capacity(sql.len() + 8);
    let mut state = Skip::Code;
    let mut n = 0;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            Skip::Quoted(q) => {
                if c == q {
                    state = Skip::Code;
                }
                out.push(c);
            }
            Skip::LineComment => {
                if c == '\n' {
                    state = Skip::Code;
                }
                out.push(c);
            }
            Skip::BlockComment => {
                out.push(c);
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push('/');
                    state = Skip::Code;
                }
            }
            Skip::Code => match c {
                '\'' | '"' => {
                    state = Skip::Quoted(c);
                    out.push(c);
                }
                '-' if chars.peek() == Some(&'-') => {
                    chars.next();
                    out.push_str("--");
                    state = Skip::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    out.push_str("/*");
                    state = Skip::BlockComment;
                }
                '?' => {
                    n += 1;
                    out.push('$');
                    out.push_str(&n.to_string());
                }
                _ => out.push(c),
            },
        }
    }

    out
}

/// `n` comma-separated `?` placeholders, for expanding a slice into an
/// IN-list.
pub fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

// =============================================================================
// SqlQuery
// =============================================================================

/// SQL text plus its bind values, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SqlQuery {
    sql: String,
    params: Vec<SqlValue>,
}

impl SqlQuery {
    pub fn new(sql: impl Into<String>) -> Self {
        SqlQuery {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Appends a bind value for the next placeholder.
    pub fn bind(mut self, value: impl Into<SqlValue>) -> Self {
        self.params.push(value.into());
        self
    }

    pub fn push_sql(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    pub fn push_bind(&mut self, value: impl Into<SqlValue>) {
        self.params.push(value.into());
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    /// Rewrites the placeholders for `style`; params are unchanged.
    pub fn rebind(mut self, style: PlaceholderStyle) -> Self {
        self.sql = rebind(&self.sql, style);
        self
    }
}

// =============================================================================
// WHERE
// =============================================================================

/// LIKE comparison; patterns come from `SearchType::pattern`, which escapes
/// wildcards in the search term with `\`.
const LIKE_PLACEHOLDER: &str = " LIKE ? ESCAPE '\\'";

/// A single condition of a WHERE clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `column = ?`
    Eq(Column, SqlValue),
    /// `column LIKE ? ESCAPE '\'`
    Like(Column, String),
    /// `(a LIKE ? ESCAPE '\' OR ...)`, same pattern bound for each column.
    AnyLike(Vec<Column>, String),
    /// `column IN (?, ?, ...)`; must not be empty.
    In(Column, Vec<SqlValue>),
}

impl Predicate {
    pub fn eq(column: Column, value: impl Into<SqlValue>) -> Self {
        Predicate::Eq(column, value.into())
    }

    pub fn like(column: Column, pattern: impl Into<String>) -> Self {
        Predicate::Like(column, pattern.into())
    }

    pub fn any_like(columns: &[Column], pattern: impl Into<String>) -> Self {
        Predicate::AnyLike(columns.to_vec(), pattern.into())
    }

    pub fn in_list<V, I>(column: Column, values: I) -> Self
    where
        V: Into<SqlValue>,
        I: IntoIterator<Item = V>,
    {
        Predicate::In(column, values.into_iter().map(Into::into).collect())
    }

    fn render(&self, query: &mut SqlQuery) -> DbResult<()> {
        match self {
            Predicate::Eq(column, value) => {
                query.push_sql(column.as_str());
                query.push_sql(" = ?");
                query.push_bind(value.clone());
            }
            Predicate::Like(column, pattern) => {
                query.push_sql(column.as_str());
                query.push_sql(LIKE_PLACEHOLDER);
                query.push_bind(pattern.as_str());
            }
            Predicate::AnyLike(columns, pattern) => {
                let parts: Vec<String> = columns
                    .iter()
                    .map(|c| format!("{}{}", c.as_str(), LIKE_PLACEHOLDER))
                    .collect();
                query.push_sql("(");
                query.push_sql(&parts.join(" OR "));
                query.push_sql(")");
                for _ in columns {
                    query.push_bind(pattern.as_str());
                }
            }
            Predicate::In(column, values) => {
                if values.is_empty() {
                    return Err(DbError::EmptyInList {
                        column: column.as_str().to_string(),
                    });
                }
                query.push_sql(column.as_str());
                query.push_sql(" IN (");
                query.push_sql(&placeholders(values.len()));
                query.push_sql(")");
                for value in values {
                    query.push_bind(value.clone());
                }
            }
        }
        Ok(())
    }
}

/// Conjunction of predicates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    pub fn new() -> Self {
        Filter::default()
    }

    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Appends ` WHERE a AND b ...` to `query`; nothing if empty.
    pub fn render_where(&self, query: &mut SqlQuery) -> DbResult<()> {
        for (i, predicate) in self.predicates.iter().enumerate() {
            query.push_sql(if i == 0 { " WHERE " } else { " AND " });
            predicate.render(query)?;
        }
        Ok(())
    }
}

// =============================================================================
// ORDER BY
// =============================================================================

/// Closed mapping from client sort field names to columns.
#[derive(Debug, Clone, Copy)]
pub struct SortAllowList {
    fields: &'static [(&'static str, Column)],
    fallback: Column,
    tiebreak: Column,
}

impl SortAllowList {
    /// `fallback` is used for unknown field names; `tiebreak` is always
    /// appended ascending so equal keys come back in a stable order.
    pub const fn new(
        fields: &'static [(&'static str, Column)],
        fallback: Column,
        tiebreak: Column,
    ) -> Self {
        SortAllowList {
            fields,
            fallback,
            tiebreak,
        }
    }

    /// Column for `field`, or the fallback when the name is not listed.
    pub fn resolve(&self, field: &str) -> Column {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
            .unwrap_or(self.fallback)
    }
}

/// `ORDER BY <column> <direction>, <tiebreak> ASC`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    column: Column,
    direction: SortDirection,
    tiebreak: Column,
}

impl OrderBy {
    pub fn resolve(allow_list: &SortAllowList, field: &str, direction: SortDirection) -> Self {
        OrderBy {
            column: allow_list.resolve(field),
            direction,
            tiebreak: allow_list.tiebreak,
        }
    }

    pub fn column(&self) -> Column {
        self.column
    }

    fn render(&self, query: &mut SqlQuery) {
        query.push_sql(" ORDER BY ");
        query.push_sql(self.column.as_str());
        query.push_sql(" ");
        query.push_sql(self.direction.as_sql());
        query.push_sql(", ");
        query.push_sql(self.tiebreak.as_str());
        query.push_sql(" ASC");
    }
}

// =============================================================================
// LIMIT / OFFSET
// =============================================================================

/// Page window, bound as parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: i64,
    offset: i64,
}

impl Page {
    pub fn new(limit: i64, offset: i64) -> Self {
        Page { limit, offset }
    }

    fn render(&self, query: &mut SqlQuery) {
        query.push_sql(" LIMIT ? OFFSET ?");
        query.push_bind(self.limit);
        query.push_bind(self.offset);
    }
}

// =============================================================================
// SELECT
// =============================================================================

/// A filtered, sorted, paged SELECT and its matching COUNT.
#[derive(Debug, Clone)]
pub struct SelectQuery {
    columns: &'static str,
    source: &'static str,
    filter: Filter,
    order_by: Option<OrderBy>,
    page: Option<Page>,
}

impl SelectQuery {
    /// `columns` is the projection, `source` the FROM clause (joins included).
    pub fn new(columns: &'static str, source: &'static str) -> Self {
        SelectQuery {
            columns,
            source,
            filter: Filter::new(),
            order_by: None,
            page: None,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn page(mut self, page: Page) -> Self {
        self.page = Some(page);
        self
    }

    /// `SELECT <columns> FROM <source> [WHERE] [ORDER BY] [LIMIT ? OFFSET ?]`
    pub fn to_query(&self) -> DbResult<SqlQuery> {
        let mut query = SqlQuery::new(format!("SELECT {} FROM {}", self.columns, self.source));
        self.filter.render_where(&mut query)?;
        if let Some(order_by) = &self.order_by {
            order_by.render(&mut query);
        }
        if let Some(page) = &self.page {
            page.render(&mut query);
        }
        Ok(query)
    }

    /// `SELECT COUNT(*) FROM <source> [WHERE]`, ignoring order and page.
    pub fn to_count_query(&self) -> DbResult<SqlQuery> {
        let mut query = SqlQuery::new(format!("SELECT COUNT(*) FROM {}", self.source));
        self.filter.render_where(&mut query)?;
        Ok(query)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
