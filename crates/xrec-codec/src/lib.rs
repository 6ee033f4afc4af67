//! Binary wire codec for XREC records.
//!
//! [`Serializer`] is the byte sink and [`SerialIter`] the forward-only byte
//! cursor. [`WireCodec`] gives every leaf value kind a uniform encode/decode
//! interface; the record layer builds field headers, nested objects and
//! arrays on top of these.

pub mod error;
pub mod serial_iter;
pub mod serializer;
pub mod values;

pub use error::{CodecError, CodecResult};
pub use serial_iter::SerialIter;
pub use serializer::{encode_vl_length, Serializer, MAX_VL_LENGTH};
pub use values::WireCodec;
