//! Declarative list configurations.
//!
//! The source system built these from runtime entity metadata; here each
//! grid/list endpoint declares its exposed fields statically, so what a
//! caller may project, sort, and filter is fixed at compile time.

use serde::Serialize;

/// Declared type of an exposed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Text,
    Boolean,
    Date,
    /// Reference to another record; projected as its id in listings and
    /// expanded to a nested object on single fetch.
    Object,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Integer => "integer",
            FieldKind::Text => "string",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::Object => "object",
        }
    }
}

/// Target of an Object field.
#[derive(Debug, Clone, Copy)]
pub struct Reference {
    /// Referenced table; must expose `id` and `title` columns for
    /// nested expansion.
    pub table: &'static str,
}

/// One exposed field of a list configuration.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// Wire name used in responses, sort and filter parameters.
    pub id: &'static str,
    /// Backing SQL column.
    pub column: &'static str,
    pub kind: FieldKind,
    pub sortable: bool,
    pub filterable: bool,
    /// May be supplied in create/update payloads.
    pub writable: bool,
    /// Must be present on create.
    pub required: bool,
    pub reference: Option<Reference>,
}

impl FieldDescriptor {
    pub const fn new(id: &'static str, column: &'static str, kind: FieldKind) -> Self {
        Self {
            id,
            column,
            kind,
            sortable: false,
            filterable: false,
            writable: false,
            required: false,
            reference: None,
        }
    }

    pub const fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub const fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub const fn writable(mut self) -> Self {
        self.writable = true;
        self
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn references(mut self, table: &'static str) -> Self {
        self.reference = Some(Reference { table });
        self
    }
}

/// Immutable descriptor of which fields a grid/list endpoint exposes.
/// Defined per resource at startup, read-only at runtime.
#[derive(Debug, Clone, Copy)]
pub struct ListConfiguration {
    /// Unique name, e.g. `api_admin_allergen_grid`.
    pub name: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl ListConfiguration {
    pub fn field(&self, id: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Field metadata for OPTIONS responses; no query execution involved.
    pub fn field_metadata(&self) -> Vec<FieldMeta> {
        self.fields
            .iter()
            .map(|f| FieldMeta {
                id: f.id,
                field_type: f.kind.as_str(),
                sortable: f.sortable,
                filterable: f.filterable,
            })
            .collect()
    }
}

/// Wire shape of one OPTIONS metadata entry.
#[derive(Debug, Clone, Serialize)]
pub struct FieldMeta {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub field_type: &'static str,
    pub sortable: bool,
    pub filterable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[FieldDescriptor] = &[
        FieldDescriptor::new("id", "id", FieldKind::Integer).sortable(),
        FieldDescriptor::new("title", "title", FieldKind::Text)
            .sortable()
            .filterable()
            .writable()
            .required(),
        FieldDescriptor::new("space", "space_id", FieldKind::Object).references("space"),
    ];

    const CONFIG: ListConfiguration = ListConfiguration {
        name: "api_admin_test_grid",
        fields: FIELDS,
    };

    #[test]
    fn field_lookup_by_wire_name() {
        assert!(CONFIG.field("title").is_some());
        assert!(CONFIG.field("nope").is_none());
        assert_eq!(CONFIG.field("space").unwrap().column, "space_id");
    }

    #[test]
    fn metadata_reflects_declared_flags() {
        let meta = CONFIG.field_metadata();
        assert_eq!(meta.len(), 3);
        let title = &meta[1];
        assert_eq!(title.id, "title");
        assert_eq!(title.field_type, "string");
        assert!(title.sortable);
        assert!(title.filterable);
        let space = &meta[2];
        assert_eq!(space.field_type, "object");
        assert!(!space.sortable);
    }

    #[test]
    fn metadata_serializes_type_key() {
        let meta = CONFIG.field_metadata();
        let v = serde_json::to_value(&meta[0]).unwrap();
        assert_eq!(v["type"], "integer");
        assert!(v.get("data").is_none());
    }
}
