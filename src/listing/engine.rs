//! Grid/list query execution.
//!
//! Builds parameterized SQL from a validated [`GridQuery`] plus the
//! endpoint's forced scope constraints, runs it against the pool, and
//! projects rows into the wire shape declared by the list configuration.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Map, Value};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{PgPool, Row};

use crate::error::ApiError;
use crate::listing::config::{FieldKind, ListConfiguration};
use crate::listing::query::{GridQuery, SortDirection};

/// Forced equality constraints merged into every query. These come from
/// the endpoint (tenant space, path-derived ids), never from the caller's
/// filter parameters.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    constraints: Vec<(&'static str, Value)>,
}

impl Scope {
    pub fn space(space_id: i64) -> Self {
        Self {
            constraints: vec![("space_id", json!(space_id))],
        }
    }

    pub fn with(mut self, column: &'static str, value: Value) -> Self {
        self.constraints.push((column, value));
        self
    }
}

/// Grid-mode output: one page of projected records plus totals.
#[derive(Debug, Serialize)]
pub struct PagedResult {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub all_pages: i64,
    pub data: Vec<Value>,
}

/// Paginated grid query. `total` reflects filters but never paging; a page
/// beyond `all_pages` yields empty `data` with accurate totals.
pub async fn grid(
    pool: &PgPool,
    table: &str,
    cfg: &'static ListConfiguration,
    query: &GridQuery,
    scope: &Scope,
) -> Result<PagedResult, ApiError> {
    let (where_sql, params) = build_where(query, scope);

    let count_sql = if where_sql.is_empty() {
        format!("SELECT COUNT(*) AS count FROM \"{}\"", table)
    } else {
        format!("SELECT COUNT(*) AS count FROM \"{}\" WHERE {}", table, where_sql)
    };
    let row = bind_params(sqlx::query(&count_sql), &params)
        .fetch_one(pool)
        .await?;
    let total: i64 = row.try_get("count")?;
    let all_pages = if total == 0 {
        0
    } else {
        (total + query.per_page - 1) / query.per_page
    };

    let offset = (query.page - 1) * query.per_page;
    let data_sql = format!(
        "{} LIMIT {} OFFSET {}",
        select_sql(table, cfg, &where_sql, query.sort),
        query.per_page,
        offset
    );
    let rows = bind_params(sqlx::query(&data_sql), &params)
        .fetch_all(pool)
        .await?;

    let data = rows
        .iter()
        .map(|r| row_to_value(cfg, r))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PagedResult {
        page: query.page,
        per_page: query.per_page,
        total,
        all_pages,
        data,
    })
}

/// Plain list mode: full matching set, same filter/sort/scoping semantics
/// as grid mode, no paging metadata.
pub async fn list(
    pool: &PgPool,
    table: &str,
    cfg: &'static ListConfiguration,
    query: &GridQuery,
    scope: &Scope,
) -> Result<Vec<Value>, ApiError> {
    let (where_sql, params) = build_where(query, scope);
    let sql = select_sql(table, cfg, &where_sql, query.sort);
    let rows = bind_params(sqlx::query(&sql), &params)
        .fetch_all(pool)
        .await?;
    rows.iter().map(|r| row_to_value(cfg, r)).collect()
}

fn select_sql(
    table: &str,
    cfg: &ListConfiguration,
    where_sql: &str,
    sort: Option<(&'static crate::listing::config::FieldDescriptor, SortDirection)>,
) -> String {
    let columns = cfg
        .fields
        .iter()
        .map(|f| format!("\"{}\"", f.column))
        .collect::<Vec<_>>()
        .join(", ");

    [
        format!("SELECT {}", columns),
        format!("FROM \"{}\"", table),
        if where_sql.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", where_sql)
        },
        build_order(sort),
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

/// WHERE clause from scope constraints plus caller filters, with `$n`
/// placeholders numbered in predicate order.
fn build_where(query: &GridQuery, scope: &Scope) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    for (column, value) in &scope.constraints {
        params.push(value.clone());
        clauses.push(format!("\"{}\" = ${}", column, params.len()));
    }

    for filter in &query.filters {
        let field = filter.field;
        match field.kind {
            FieldKind::Text => {
                params.push(json!(like_pattern(&filter.value)));
                clauses.push(format!("\"{}\" ILIKE ${}", field.column, params.len()));
            }
            FieldKind::Integer | FieldKind::Object => {
                // Value pre-validated as i64 by GridQuery
                params.push(json!(filter.value.parse::<i64>().unwrap_or_default()));
                clauses.push(format!("\"{}\" = ${}", field.column, params.len()));
            }
            FieldKind::Boolean => {
                let b = matches!(filter.value.as_str(), "true" | "1");
                params.push(json!(b));
                clauses.push(format!("\"{}\" = ${}", field.column, params.len()));
            }
            FieldKind::Date => {
                params.push(json!(filter.value));
                clauses.push(format!("\"{}\" = ${}::date", field.column, params.len()));
            }
        }
    }

    (clauses.join(" AND "), params)
}

/// Substring pattern for text filters. `%`, `_` and `\` in the caller's
/// value must match literally, never as pattern metacharacters.
fn like_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// ORDER BY with a stable `id ASC` tie-break so repeated paginated reads
/// neither skip nor duplicate rows.
fn build_order(
    sort: Option<(&'static crate::listing::config::FieldDescriptor, SortDirection)>,
) -> String {
    match sort {
        Some((field, direction)) if field.column != "id" => format!(
            "ORDER BY \"{}\" {}, \"id\" ASC",
            field.column,
            direction.to_sql()
        ),
        Some((_, direction)) => format!("ORDER BY \"id\" {}", direction.to_sql()),
        None => "ORDER BY \"id\" ASC".to_string(),
    }
}

fn bind_params<'q>(
    mut q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    params: &'q [Value],
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    for p in params {
        q = bind_param(q, p);
    }
    q
}

fn bind_param<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()),
    }
}

/// Project one row into the flattened wire representation: every declared
/// field by wire name, Object references as their raw id.
pub fn row_to_value(cfg: &ListConfiguration, row: &PgRow) -> Result<Value, ApiError> {
    let mut out = Map::new();
    for field in cfg.fields {
        let value = match field.kind {
            FieldKind::Integer | FieldKind::Object => {
                let v: Option<i64> = row.try_get(field.column)?;
                json!(v)
            }
            FieldKind::Text => {
                let v: Option<String> = row.try_get(field.column)?;
                json!(v)
            }
            FieldKind::Boolean => {
                let v: Option<bool> = row.try_get(field.column)?;
                json!(v)
            }
            FieldKind::Date => {
                let v: Option<NaiveDate> = row.try_get(field.column)?;
                json!(v.map(|d| d.to_string()))
            }
        };
        out.insert(field.id.to_string(), value);
    }
    Ok(Value::Object(out))
}
