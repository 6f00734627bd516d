//! Interactive form fields (AcroForm).
//!
//! Fields are collected at document level and written as merged
//! field/widget dictionaries on the first page.

mod field;

pub use field::{FieldKind, FieldType, FormField};
