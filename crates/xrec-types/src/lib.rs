//! Foundation types for XREC structured ledger records.
//!
//! Every other XREC crate depends on `xrec-types`. It holds the field identity
//! used for ordering and lookup, the wire type tags, and the plain value types
//! that fields carry.
//!
//! # Key Types
//!
//! - [`FieldId`]: `(type, ordinal)` identity of a schema field
//! - [`SerializedTypeId`]: wire type tag of a field
//! - [`Hash128`], [`Hash160`], [`Hash256`]: fixed-width hashes
//! - [`AccountId`], [`Currency`]: 160-bit identifiers
//! - [`Amount`]: native or issued monetary amount
//! - [`PathSet`], [`Vector256`]: composite list values

pub mod account;
pub mod amount;
pub mod error;
pub mod field;
pub mod hash;
pub mod path;
pub mod vector;

pub use account::{AccountId, Currency};
pub use amount::{Amount, IssuedAmount};
pub use error::TypeError;
pub use field::{FieldId, SerializedTypeId};
pub use hash::{Hash128, Hash160, Hash256};
pub use path::{Path, PathElement, PathSet};
pub use vector::Vector256;
