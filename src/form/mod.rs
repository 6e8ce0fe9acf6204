//! Form data model: the fixed field schema, the value store, option catalogs
//! and field validation rules.

pub mod catalog;
pub mod record;
pub mod schema;
pub mod validation;

pub use catalog::CatalogOption;
pub use record::FormRecord;
pub use schema::{FieldKey, FieldTypeError, FieldValue, UnknownFieldError, ValueKind};
pub use validation::{FieldError, ValidationError, ValidationErrors, Validator};
