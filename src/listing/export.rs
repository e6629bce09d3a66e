//! CSV export for grid endpoints.
//!
//! Export mode reuses the exact matching/ordering logic of the engine; the
//! full unpaginated result set is rendered as a downloadable document
//! instead of a JSON body.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::listing::config::ListConfiguration;

/// Render projected records as CSV, header row first.
pub fn to_csv(cfg: &ListConfiguration, records: &[Value]) -> String {
    let mut out = String::new();

    let header: Vec<&str> = cfg.fields.iter().map(|f| f.id).collect();
    out.push_str(&header.join(","));
    out.push('\n');

    for record in records {
        let row: Vec<String> = cfg
            .fields
            .iter()
            .map(|f| csv_cell(record.get(f.id).unwrap_or(&Value::Null)))
            .collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

fn csv_cell(value: &Value) -> String {
    let raw = match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if raw.contains(',') || raw.contains('"') || raw.contains('\n') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw
    }
}

/// Attachment response with the resource name as filename.
pub fn csv_response(resource: &str, body: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.csv\"", resource),
            ),
        ],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::config::{FieldDescriptor, FieldKind};
    use serde_json::json;

    const FIELDS: &[FieldDescriptor] = &[
        FieldDescriptor::new("id", "id", FieldKind::Integer),
        FieldDescriptor::new("title", "title", FieldKind::Text),
        FieldDescriptor::new("shared", "shared", FieldKind::Boolean),
    ];

    const CFG: ListConfiguration = ListConfiguration {
        name: "api_admin_test_grid",
        fields: FIELDS,
    };

    #[test]
    fn header_row_uses_field_ids() {
        let csv = to_csv(&CFG, &[]);
        assert_eq!(csv, "id,title,shared\n");
    }

    #[test]
    fn rows_follow_field_order() {
        let records = vec![json!({"id": 1, "title": "Lidocaine", "shared": true})];
        let csv = to_csv(&CFG, &records);
        assert_eq!(csv, "id,title,shared\n1,Lidocaine,true\n");
    }

    #[test]
    fn cells_with_commas_and_quotes_are_escaped() {
        let records = vec![json!({"id": 2, "title": "Eggs, \"large\"", "shared": false})];
        let csv = to_csv(&CFG, &records);
        assert_eq!(csv, "id,title,shared\n2,\"Eggs, \"\"large\"\"\",false\n");
    }

    #[test]
    fn null_values_render_empty() {
        let records = vec![json!({"id": 3, "title": null, "shared": null})];
        let csv = to_csv(&CFG, &records);
        assert_eq!(csv, "id,title,shared\n3,,\n");
    }
}
