//! Static resource catalog.
//!
//! The source system derived its per-entity configuration from runtime
//! entity metadata; here every admin resource is one table entry: URL
//! name, backing table, grant name, not-found code family, the list
//! configuration, and the tables that reference it (for related-info
//! lookups). Adding a resource means adding an entry, nothing else.

use crate::listing::config::{FieldDescriptor, FieldKind, ListConfiguration};

/// A table that holds foreign keys pointing at this resource. Used by the
/// related-info endpoint to warn before deleting a referenced record.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceUsage {
    /// Wire name reported to the client, e.g. "resident".
    pub resource: &'static str,
    pub table: &'static str,
    pub column: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct ResourceDef {
    /// URL segment under /api/v1.0/admin/.
    pub name: &'static str,
    pub table: &'static str,
    /// Grant name checked by the authorization gate.
    pub grant: &'static str,
    /// Per-resource application code for 404 responses.
    pub not_found_code: u16,
    pub list_config: ListConfiguration,
    pub references: &'static [ReferenceUsage],
}

const ALLERGEN_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("id", "id", FieldKind::Integer)
        .sortable()
        .filterable(),
    FieldDescriptor::new("title", "title", FieldKind::Text)
        .sortable()
        .filterable()
        .writable()
        .required(),
    FieldDescriptor::new("description", "description", FieldKind::Text)
        .filterable()
        .writable(),
    FieldDescriptor::new("space", "space_id", FieldKind::Object)
        .filterable()
        .references("space"),
];

const APARTMENT_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("id", "id", FieldKind::Integer)
        .sortable()
        .filterable(),
    FieldDescriptor::new("title", "title", FieldKind::Text)
        .sortable()
        .filterable()
        .writable()
        .required(),
    FieldDescriptor::new("floor", "floor", FieldKind::Integer)
        .sortable()
        .filterable()
        .writable(),
    FieldDescriptor::new("shared", "shared", FieldKind::Boolean)
        .filterable()
        .writable(),
    FieldDescriptor::new("notes", "notes", FieldKind::Text).writable(),
    FieldDescriptor::new("space", "space_id", FieldKind::Object)
        .filterable()
        .references("space"),
];

const DIAGNOSIS_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("id", "id", FieldKind::Integer)
        .sortable()
        .filterable(),
    FieldDescriptor::new("title", "title", FieldKind::Text)
        .sortable()
        .filterable()
        .writable()
        .required(),
    FieldDescriptor::new("acronym", "acronym", FieldKind::Text)
        .sortable()
        .filterable()
        .writable(),
    FieldDescriptor::new("description", "description", FieldKind::Text).writable(),
    FieldDescriptor::new("space", "space_id", FieldKind::Object)
        .filterable()
        .references("space"),
];

const DIET_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("id", "id", FieldKind::Integer)
        .sortable()
        .filterable(),
    FieldDescriptor::new("title", "title", FieldKind::Text)
        .sortable()
        .filterable()
        .writable()
        .required(),
    FieldDescriptor::new("color", "color", FieldKind::Text).writable(),
    FieldDescriptor::new("description", "description", FieldKind::Text).writable(),
    FieldDescriptor::new("space", "space_id", FieldKind::Object)
        .filterable()
        .references("space"),
];

const PHYSICIAN_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("id", "id", FieldKind::Integer)
        .sortable()
        .filterable(),
    FieldDescriptor::new("first_name", "first_name", FieldKind::Text)
        .sortable()
        .filterable()
        .writable()
        .required(),
    FieldDescriptor::new("last_name", "last_name", FieldKind::Text)
        .sortable()
        .filterable()
        .writable()
        .required(),
    FieldDescriptor::new("office_phone", "office_phone", FieldKind::Text).writable(),
    FieldDescriptor::new("email", "email", FieldKind::Text)
        .filterable()
        .writable(),
    FieldDescriptor::new("space", "space_id", FieldKind::Object)
        .filterable()
        .references("space"),
];

const RELATIONSHIP_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("id", "id", FieldKind::Integer)
        .sortable()
        .filterable(),
    FieldDescriptor::new("title", "title", FieldKind::Text)
        .sortable()
        .filterable()
        .writable()
        .required(),
    FieldDescriptor::new("space", "space_id", FieldKind::Object)
        .filterable()
        .references("space"),
];

const RESPONSIBLE_PERSON_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("id", "id", FieldKind::Integer)
        .sortable()
        .filterable(),
    FieldDescriptor::new("first_name", "first_name", FieldKind::Text)
        .sortable()
        .filterable()
        .writable()
        .required(),
    FieldDescriptor::new("last_name", "last_name", FieldKind::Text)
        .sortable()
        .filterable()
        .writable()
        .required(),
    FieldDescriptor::new("email", "email", FieldKind::Text)
        .filterable()
        .writable(),
    FieldDescriptor::new("phone", "phone", FieldKind::Text).writable(),
    FieldDescriptor::new("space", "space_id", FieldKind::Object)
        .filterable()
        .references("space"),
];

pub const CATALOG: &[ResourceDef] = &[
    ResourceDef {
        name: "allergen",
        table: "allergen",
        grant: "persistence-common-allergen",
        not_found_code: 621,
        list_config: ListConfiguration {
            name: "api_admin_allergen_grid",
            fields: ALLERGEN_FIELDS,
        },
        references: &[ReferenceUsage {
            resource: "resident",
            table: "resident_allergen",
            column: "allergen_id",
        }],
    },
    ResourceDef {
        name: "apartment",
        table: "apartment",
        grant: "persistence-common-apartment",
        not_found_code: 622,
        list_config: ListConfiguration {
            name: "api_admin_apartment_grid",
            fields: APARTMENT_FIELDS,
        },
        references: &[ReferenceUsage {
            resource: "resident",
            table: "resident",
            column: "apartment_id",
        }],
    },
    ResourceDef {
        name: "diagnosis",
        table: "diagnosis",
        grant: "persistence-common-diagnosis",
        not_found_code: 623,
        list_config: ListConfiguration {
            name: "api_admin_diagnosis_grid",
            fields: DIAGNOSIS_FIELDS,
        },
        references: &[ReferenceUsage {
            resource: "resident",
            table: "resident_diagnosis",
            column: "diagnosis_id",
        }],
    },
    ResourceDef {
        name: "diet",
        table: "diet",
        grant: "persistence-common-diet",
        not_found_code: 624,
        list_config: ListConfiguration {
            name: "api_admin_diet_grid",
            fields: DIET_FIELDS,
        },
        references: &[ReferenceUsage {
            resource: "resident",
            table: "resident_diet",
            column: "diet_id",
        }],
    },
    ResourceDef {
        name: "physician",
        table: "physician",
        grant: "persistence-common-physician",
        not_found_code: 625,
        list_config: ListConfiguration {
            name: "api_admin_physician_grid",
            fields: PHYSICIAN_FIELDS,
        },
        references: &[ReferenceUsage {
            resource: "resident",
            table: "resident_physician",
            column: "physician_id",
        }],
    },
    ResourceDef {
        name: "relationship",
        table: "relationship",
        grant: "persistence-common-relationship",
        not_found_code: 626,
        list_config: ListConfiguration {
            name: "api_admin_relationship_grid",
            fields: RELATIONSHIP_FIELDS,
        },
        references: &[ReferenceUsage {
            resource: "responsible-person",
            table: "responsible_person",
            column: "relationship_id",
        }],
    },
    ResourceDef {
        name: "responsible-person",
        table: "responsible_person",
        grant: "persistence-common-responsible-person",
        not_found_code: 627,
        list_config: ListConfiguration {
            name: "api_admin_responsible_person_grid",
            fields: RESPONSIBLE_PERSON_FIELDS,
        },
        references: &[ReferenceUsage {
            resource: "resident",
            table: "resident_responsible_person",
            column: "responsible_person_id",
        }],
    },
];

/// Resolve a resource by URL segment.
pub fn resource(name: &str) -> Option<&'static ResourceDef> {
    CATALOG.iter().find(|r| r.name == name)
}

/// Resolve a list configuration by its unique name.
pub fn list_config(name: &str) -> Option<&'static ListConfiguration> {
    CATALOG
        .iter()
        .find(|r| r.list_config.name == name)
        .map(|r| &r.list_config)
}
