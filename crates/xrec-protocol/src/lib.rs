//! Typed field containers for XREC records.
//!
//! A [`Record`] holds `(field, value)` pairs. Bound to a [`Template`], it
//! enforces which fields must, may, or default to being present; free, it
//! accepts any registered field. Records encode to a canonical byte form
//! whose order is independent of insertion order, and a signing form that
//! omits signature fields.
//!
//! # Key Types
//!
//! - [`Record`]: the field container
//! - [`Template`] and [`SoeStyle`]: schemas and presence rules
//! - [`TypedField`]: a field constant bound to its payload type (see [`fields`])
//! - [`Value`]: the tagged payload of one slot
//! - [`ValueProxy`], [`OptionalProxy`]: typed views of a single field
//! - [`FormatCatalog`]: built-in transaction, ledger entry, and inner formats

pub mod array;
pub mod config;
pub mod error;
pub mod fields;
pub mod formats;
mod json;
pub mod proxy;
pub mod record;
pub mod sign;
pub mod template;
pub mod value;
pub mod wire;

pub use array::RecordArray;
pub use config::CodecConfig;
pub use error::{RecordError, RecordResult, SchemaError};
pub use fields::TypedField;
pub use formats::{catalog, Format, FormatCatalog, FormatKind};
pub use proxy::{OptionalProxy, ValueProxy};
pub use record::{Record, Slot};
pub use sign::{sign_record, verify_record};
pub use template::{SoeStyle, Template, TemplateEntry};
pub use value::{FieldType, Value};
pub use wire::SerializeMode;
