pub mod config;
pub mod engine;
pub mod export;
pub mod query;

pub use config::{FieldDescriptor, FieldKind, FieldMeta, ListConfiguration, Reference};
pub use engine::{PagedResult, Scope};
pub use query::{GridQuery, ResponseFormat, SortDirection};
