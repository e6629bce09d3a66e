//! Per-request query parameters for grid and list endpoints.
//!
//! Validation policy is strict: sorting or filtering on a field the list
//! configuration does not declare as sortable/filterable is rejected with
//! an `InvalidQueryParameter` error rather than silently ignored.

use std::collections::HashMap;

use crate::config;
use crate::error::ApiError;
use crate::listing::config::{FieldDescriptor, FieldKind, ListConfiguration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Csv,
}

/// One validated filter: declared field plus the raw caller value.
#[derive(Debug, Clone)]
pub struct FieldFilter {
    pub field: &'static FieldDescriptor,
    pub value: String,
}

/// Validated per-request query input. Constructed fresh per HTTP request.
#[derive(Debug, Clone)]
pub struct GridQuery {
    pub page: i64,
    pub per_page: i64,
    pub sort: Option<(&'static FieldDescriptor, SortDirection)>,
    pub filters: Vec<FieldFilter>,
    pub format: ResponseFormat,
}

/// Query string keys with reserved meaning; everything else is treated as
/// a field filter.
const RESERVED_KEYS: &[&str] = &["page", "per_page", "sort", "direction", "format", "config"];

impl GridQuery {
    /// Parse and validate grid-mode parameters against a list configuration.
    pub fn from_params(
        cfg: &'static ListConfiguration,
        params: &HashMap<String, String>,
    ) -> Result<Self, ApiError> {
        let page = match params.get("page") {
            Some(raw) => raw.parse::<i64>().ok().filter(|p| *p >= 1).ok_or_else(|| {
                ApiError::invalid_query_parameter(format!("Invalid page number: {}", raw))
            })?,
            None => 1,
        };

        let listing = &config::config().listing;
        let per_page = match params.get("per_page") {
            Some(raw) => {
                let n = raw.parse::<i64>().map_err(|_| {
                    ApiError::validation_field(
                        "Invalid page size",
                        "per_page",
                        format!("Not a number: {}", raw),
                    )
                })?;
                if n < 1 {
                    return Err(ApiError::validation_field(
                        "Invalid page size",
                        "per_page",
                        "Page size must be at least 1",
                    ));
                }
                n.min(listing.max_per_page)
            }
            None => listing.default_per_page,
        };

        let mut query = Self::unpaginated(cfg, params)?;
        query.page = page;
        query.per_page = per_page;
        Ok(query)
    }

    /// Parse sort/filter/format only, for plain list mode and export mode.
    pub fn unpaginated(
        cfg: &'static ListConfiguration,
        params: &HashMap<String, String>,
    ) -> Result<Self, ApiError> {
        let sort = match params.get("sort") {
            Some(id) => {
                let field = cfg.field(id).filter(|f| f.sortable).ok_or_else(|| {
                    ApiError::invalid_query_parameter(format!("Field '{}' is not sortable", id))
                })?;
                let direction = match params.get("direction").map(|s| s.as_str()) {
                    None | Some("asc") | Some("ASC") => SortDirection::Asc,
                    Some("desc") | Some("DESC") => SortDirection::Desc,
                    Some(other) => {
                        return Err(ApiError::invalid_query_parameter(format!(
                            "Invalid sort direction: {}",
                            other
                        )))
                    }
                };
                Some((field, direction))
            }
            None => None,
        };

        let format = match params.get("format").map(|s| s.as_str()) {
            None | Some("json") => ResponseFormat::Json,
            Some("csv") => ResponseFormat::Csv,
            Some(other) => {
                return Err(ApiError::invalid_query_parameter(format!(
                    "Unsupported format: {}",
                    other
                )))
            }
        };

        let mut filters = Vec::new();
        for (key, value) in params {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            let field = cfg.field(key).filter(|f| f.filterable).ok_or_else(|| {
                ApiError::invalid_query_parameter(format!("Field '{}' is not filterable", key))
            })?;
            validate_filter_value(field, value)?;
            filters.push(FieldFilter {
                field,
                value: value.clone(),
            });
        }
        // Deterministic predicate order regardless of HashMap iteration
        filters.sort_by_key(|f| f.field.id);

        Ok(Self {
            page: 1,
            per_page: 0,
            sort,
            filters,
            format,
        })
    }
}

/// Reject filter values that cannot be interpreted for the field's
/// declared type before any SQL is built.
fn validate_filter_value(field: &FieldDescriptor, value: &str) -> Result<(), ApiError> {
    let ok = match field.kind {
        FieldKind::Integer | FieldKind::Object => value.parse::<i64>().is_ok(),
        FieldKind::Boolean => matches!(value, "true" | "false" | "1" | "0"),
        FieldKind::Date => chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
        FieldKind::Text => true,
    };
    if ok {
        Ok(())
    } else {
        Err(ApiError::invalid_query_parameter(format!(
            "Invalid {} value for field '{}': {}",
            field.kind.as_str(),
            field.id,
            value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::config::{FieldDescriptor, FieldKind, ListConfiguration};

    const FIELDS: &[FieldDescriptor] = &[
        FieldDescriptor::new("id", "id", FieldKind::Integer)
            .sortable()
            .filterable(),
        FieldDescriptor::new("title", "title", FieldKind::Text)
            .sortable()
            .filterable(),
        FieldDescriptor::new("shared", "shared", FieldKind::Boolean).filterable(),
        FieldDescriptor::new("notes", "notes", FieldKind::Text),
    ];

    const CFG: ListConfiguration = ListConfiguration {
        name: "api_admin_test_grid",
        fields: FIELDS,
    };

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_without_parameters() {
        let q = GridQuery::from_params(&CFG, &params(&[])).unwrap();
        assert_eq!(q.page, 1);
        assert_eq!(q.per_page, 25);
        assert!(q.sort.is_none());
        assert!(q.filters.is_empty());
        assert_eq!(q.format, ResponseFormat::Json);
    }

    #[test]
    fn reserved_keys_are_not_treated_as_filters() {
        let q =
            GridQuery::from_params(&CFG, &params(&[("config", "api_admin_test_grid")])).unwrap();
        assert!(q.filters.is_empty());
    }

    #[test]
    fn sort_on_undeclared_field_is_rejected() {
        let err = GridQuery::from_params(&CFG, &params(&[("sort", "notes")])).unwrap_err();
        assert_eq!(err.app_code(), 611);
    }

    #[test]
    fn filter_on_undeclared_field_is_rejected() {
        let err = GridQuery::from_params(&CFG, &params(&[("notes", "x")])).unwrap_err();
        assert_eq!(err.app_code(), 611);
        let err = GridQuery::from_params(&CFG, &params(&[("bogus", "x")])).unwrap_err();
        assert_eq!(err.app_code(), 611);
    }

    #[test]
    fn zero_or_negative_page_size_is_validation_error() {
        let err = GridQuery::from_params(&CFG, &params(&[("per_page", "0")])).unwrap_err();
        assert_eq!(err.app_code(), 610);
        let err = GridQuery::from_params(&CFG, &params(&[("per_page", "-5")])).unwrap_err();
        assert_eq!(err.app_code(), 610);
    }

    #[test]
    fn unparseable_typed_filter_value_is_rejected() {
        let err = GridQuery::from_params(&CFG, &params(&[("id", "abc")])).unwrap_err();
        assert_eq!(err.app_code(), 611);
        let err = GridQuery::from_params(&CFG, &params(&[("shared", "maybe")])).unwrap_err();
        assert_eq!(err.app_code(), 611);
    }

    #[test]
    fn sort_and_filters_parse() {
        let q = GridQuery::from_params(
            &CFG,
            &params(&[
                ("sort", "title"),
                ("direction", "desc"),
                ("title", "lido"),
                ("page", "3"),
                ("per_page", "10"),
            ]),
        )
        .unwrap();
        assert_eq!(q.page, 3);
        assert_eq!(q.per_page, 10);
        let (field, dir) = q.sort.unwrap();
        assert_eq!(field.id, "title");
        assert_eq!(dir, SortDirection::Desc);
        assert_eq!(q.filters.len(), 1);
        assert_eq!(q.filters[0].value, "lido");
    }

    #[test]
    fn per_page_is_capped_at_configured_maximum() {
        let q = GridQuery::from_params(&CFG, &params(&[("per_page", "999999")])).unwrap();
        assert!(q.per_page <= crate::config::config().listing.max_per_page);
    }

    #[test]
    fn csv_format_is_recognized() {
        let q = GridQuery::unpaginated(&CFG, &params(&[("format", "csv")])).unwrap();
        assert_eq!(q.format, ResponseFormat::Csv);
        let err = GridQuery::unpaginated(&CFG, &params(&[("format", "xml")])).unwrap_err();
        assert_eq!(err.app_code(), 611);
    }
}
