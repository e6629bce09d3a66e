//! Generic persistence operations shared by every admin resource.
//!
//! All reads and mutations are scoped by `space_id`; a record outside the
//! caller's space behaves exactly like a missing record.

use serde_json::{json, Map, Value};
use sqlx::{PgPool, Row};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::ApiError;
use crate::listing::config::{FieldKind, ListConfiguration};
use crate::listing::engine::row_to_value;
use crate::resources::{ReferenceUsage, ResourceDef};

/// One validated writable column from a request payload.
#[derive(Debug, Clone)]
pub struct ColumnValue {
    pub column: &'static str,
    pub kind: FieldKind,
    pub value: Value,
}

/// Validate a create/update payload against the resource's writable field
/// descriptors. Undeclared body fields are ignored; missing required
/// fields (create only) and type mismatches produce a 610 validation
/// error with per-field details.
pub fn validate_payload(
    res: &ResourceDef,
    body: &Value,
    require_all: bool,
) -> Result<Vec<ColumnValue>, ApiError> {
    let obj = body.as_object().ok_or_else(|| {
        ApiError::validation("Request body must be a JSON object", HashMap::new())
    })?;

    let mut columns = Vec::new();
    let mut details = HashMap::new();

    for field in res.list_config.fields {
        if !field.writable {
            continue;
        }
        match obj.get(field.id) {
            None | Some(Value::Null) => {
                if require_all && field.required {
                    details.insert(field.id.to_string(), "This field is required".to_string());
                } else if obj.contains_key(field.id) && !field.required {
                    // explicit null clears an optional field
                    columns.push(ColumnValue {
                        column: field.column,
                        kind: field.kind,
                        value: Value::Null,
                    });
                } else if obj.contains_key(field.id) && field.required {
                    details.insert(field.id.to_string(), "This field is required".to_string());
                }
            }
            Some(value) => {
                let accepted = match field.kind {
                    FieldKind::Integer | FieldKind::Object => value.as_i64().is_some(),
                    FieldKind::Text => value.is_string(),
                    FieldKind::Boolean => value.is_boolean(),
                    FieldKind::Date => value
                        .as_str()
                        .is_some_and(|s| chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()),
                };
                if accepted {
                    columns.push(ColumnValue {
                        column: field.column,
                        kind: field.kind,
                        value: value.clone(),
                    });
                } else {
                    details.insert(
                        field.id.to_string(),
                        format!("Expected {} value", field.kind.as_str()),
                    );
                }
            }
        }
    }

    if !details.is_empty() {
        return Err(ApiError::validation("Invalid input", details));
    }
    Ok(columns)
}

fn placeholder(n: usize, kind: FieldKind) -> String {
    // Date values travel as strings and are cast server-side
    match kind {
        FieldKind::Date => format!("${}::date", n),
        _ => format!("${}", n),
    }
}

fn not_found(res: &ResourceDef) -> ApiError {
    ApiError::not_found(res.not_found_code, format!("{} not found", res.name))
}

/// Single-record fetch. Object reference fields are expanded into nested
/// `{id, title}` objects; listings keep them flat.
pub async fn fetch(
    pool: &PgPool,
    res: &'static ResourceDef,
    space_id: i64,
    id: i64,
) -> Result<Value, ApiError> {
    let cfg = &res.list_config;
    let columns = cfg
        .fields
        .iter()
        .map(|f| format!("\"{}\"", f.column))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "SELECT {} FROM \"{}\" WHERE \"id\" = $1 AND \"space_id\" = $2",
        columns, res.table
    );

    let row = sqlx::query(&sql)
        .bind(id)
        .bind(space_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| not_found(res))?;

    let flat = row_to_value(cfg, &row)?;
    expand_references(pool, cfg, flat).await
}

async fn expand_references(
    pool: &PgPool,
    cfg: &ListConfiguration,
    flat: Value,
) -> Result<Value, ApiError> {
    let mut obj = match flat {
        Value::Object(map) => map,
        other => return Ok(other),
    };

    for field in cfg.fields {
        let Some(reference) = field.reference else {
            continue;
        };
        let Some(ref_id) = obj.get(field.id).and_then(Value::as_i64) else {
            continue;
        };
        let sql = format!(
            "SELECT \"id\", \"title\" FROM \"{}\" WHERE \"id\" = $1",
            reference.table
        );
        let nested = match sqlx::query(&sql).bind(ref_id).fetch_optional(pool).await? {
            Some(row) => {
                let id: i64 = row.try_get("id")?;
                let title: Option<String> = row.try_get("title")?;
                json!({ "id": id, "title": title })
            }
            None => Value::Null,
        };
        obj.insert(field.id.to_string(), nested);
    }

    Ok(Value::Object(obj))
}

/// Insert a record, forcing the caller's space, and return the new id.
pub async fn insert(
    pool: &PgPool,
    res: &'static ResourceDef,
    space_id: i64,
    body: &Value,
) -> Result<i64, ApiError> {
    let values = validate_payload(res, body, true)?;

    let mut columns: Vec<String> = values.iter().map(|v| format!("\"{}\"", v.column)).collect();
    let mut placeholders: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(i, v)| placeholder(i + 1, v.kind))
        .collect();
    columns.push("\"space_id\"".to_string());
    placeholders.push(format!("${}", values.len() + 1));

    let sql = format!(
        "INSERT INTO \"{}\" ({}) VALUES ({}) RETURNING \"id\"",
        res.table,
        columns.join(", "),
        placeholders.join(", ")
    );

    let mut q = sqlx::query(&sql);
    for v in &values {
        q = bind_json(q, &v.value);
    }
    q = q.bind(space_id);

    let row = q.fetch_one(pool).await?;
    let id: i64 = row.try_get("id")?;
    Ok(id)
}

/// Partial update of the supplied writable fields.
pub async fn update(
    pool: &PgPool,
    res: &'static ResourceDef,
    space_id: i64,
    id: i64,
    body: &Value,
) -> Result<(), ApiError> {
    let values = validate_payload(res, body, false)?;
    if values.is_empty() {
        return Err(ApiError::validation(
            "No writable fields supplied",
            HashMap::new(),
        ));
    }

    let assignments: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(i, v)| format!("\"{}\" = {}", v.column, placeholder(i + 1, v.kind)))
        .collect();

    let sql = format!(
        "UPDATE \"{}\" SET {} WHERE \"id\" = ${} AND \"space_id\" = ${}",
        res.table,
        assignments.join(", "),
        values.len() + 1,
        values.len() + 2
    );

    let mut q = sqlx::query(&sql);
    for v in &values {
        q = bind_json(q, &v.value);
    }
    let result = q.bind(id).bind(space_id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(not_found(res));
    }
    Ok(())
}

/// Single delete.
pub async fn delete(
    pool: &PgPool,
    res: &'static ResourceDef,
    space_id: i64,
    id: i64,
) -> Result<(), ApiError> {
    let sql = format!(
        "DELETE FROM \"{}\" WHERE \"id\" = $1 AND \"space_id\" = $2",
        res.table
    );
    let result = sqlx::query(&sql).bind(id).bind(space_id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(not_found(res));
    }
    Ok(())
}

/// Bulk delete, all-or-nothing: if any requested id is absent from the
/// caller's space the transaction rolls back and nothing is removed.
pub async fn delete_many(
    pool: &PgPool,
    res: &'static ResourceDef,
    space_id: i64,
    ids: &[i64],
) -> Result<(), ApiError> {
    if ids.is_empty() {
        return Err(ApiError::validation_field(
            "Invalid input",
            "ids",
            "At least one id is required",
        ));
    }
    let unique: Vec<i64> = ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();

    let mut tx = pool.begin().await?;
    let sql = format!(
        "DELETE FROM \"{}\" WHERE \"space_id\" = $1 AND \"id\" = ANY($2) RETURNING \"id\"",
        res.table
    );
    let deleted = sqlx::query(&sql)
        .bind(space_id)
        .bind(&unique)
        .fetch_all(&mut *tx)
        .await?;

    if deleted.len() != unique.len() {
        tx.rollback().await?;
        return Err(not_found(res));
    }
    tx.commit().await?;
    Ok(())
}

/// Cross-reference usage counts for the given ids, used to warn before
/// deleting records referenced elsewhere. Counts only cover the caller's
/// space; ids owned by another tenant report as unused.
pub async fn related_info(
    pool: &PgPool,
    res: &'static ResourceDef,
    space_id: i64,
    ids: &[i64],
) -> Result<Value, ApiError> {
    let unique: Vec<i64> = ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
    let mut usage: BTreeMap<i64, Vec<Value>> = unique.iter().map(|id| (*id, Vec::new())).collect();

    for reference in res.references {
        let sql = related_count_sql(reference);
        let rows = sqlx::query(&sql)
            .bind(space_id)
            .bind(&unique)
            .fetch_all(pool)
            .await?;
        for row in rows {
            let ref_id: i64 = row.try_get("ref_id")?;
            let count: i64 = row.try_get("count")?;
            if let Some(entries) = usage.get_mut(&ref_id) {
                entries.push(json!({ "resource": reference.resource, "count": count }));
            }
        }
    }

    let data: Vec<Value> = usage
        .into_iter()
        .map(|(id, used_by)| {
            let mut entry = Map::new();
            entry.insert("id".to_string(), json!(id));
            entry.insert("used_by".to_string(), Value::Array(used_by));
            Value::Object(entry)
        })
        .collect();
    Ok(Value::Array(data))
}

fn related_count_sql(reference: &ReferenceUsage) -> String {
    format!(
        "SELECT \"{col}\" AS ref_id, COUNT(*) AS count FROM \"{table}\" WHERE \"space_id\" = $1 AND \"{col}\" = ANY($2) GROUP BY \"{col}\"",
        col = reference.column,
        table = reference.table
    )
}

fn bind_json<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources;
    use serde_json::json;

    fn allergen() -> &'static ResourceDef {
        resources::resource("allergen").unwrap()
    }

    #[test]
    fn create_payload_requires_title() {
        let err = validate_payload(allergen(), &json!({"description": "x"}), true).unwrap_err();
        assert_eq!(err.app_code(), 610);
        let body = err.to_json();
        assert_eq!(body["details"]["title"], "This field is required");
    }

    #[test]
    fn update_payload_does_not_require_title() {
        let cols = validate_payload(allergen(), &json!({"description": "x"}), false).unwrap();
        assert_eq!(cols.len(), 1);
        assert_eq!(cols[0].column, "description");
    }

    #[test]
    fn undeclared_body_fields_are_ignored() {
        let cols = validate_payload(
            allergen(),
            &json!({"title": "Lidocaine", "space_id": 1, "bogus": true}),
            true,
        )
        .unwrap();
        let names: Vec<_> = cols.iter().map(|c| c.column).collect();
        assert_eq!(names, vec!["title"]);
    }

    #[test]
    fn type_mismatch_reports_field_detail() {
        let apartment = resources::resource("apartment").unwrap();
        let err =
            validate_payload(apartment, &json!({"title": "A-12", "floor": "three"}), true)
                .unwrap_err();
        let body = err.to_json();
        assert_eq!(body["details"]["floor"], "Expected integer value");
    }

    #[test]
    fn explicit_null_clears_optional_field() {
        let cols =
            validate_payload(allergen(), &json!({"description": null}), false).unwrap();
        assert_eq!(cols.len(), 1);
        assert!(cols[0].value.is_null());
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = validate_payload(allergen(), &json!([1, 2]), true).unwrap_err();
        assert_eq!(err.app_code(), 610);
    }

    #[test]
    fn related_counts_are_space_scoped() {
        let sql = related_count_sql(&allergen().references[0]);
        assert_eq!(
            sql,
            "SELECT \"allergen_id\" AS ref_id, COUNT(*) AS count FROM \"resident_allergen\" WHERE \"space_id\" = $1 AND \"allergen_id\" = ANY($2) GROUP BY \"allergen_id\""
        );
    }

    #[test]
    fn date_placeholder_casts() {
        assert_eq!(placeholder(3, FieldKind::Date), "$3::date");
        assert_eq!(placeholder(3, FieldKind::Text), "$3");
    }
}
