//! Cryptographic collaborators for XREC records.
//!
//! Provides the four-byte hash prefixes, the [`Digest`] interface with BLAKE3
//! and SHA-512-half implementations, and Ed25519 signing keys used to sign the
//! signing subset of a record.
//!
//! All primitives come from established libraries.

pub mod digest;
pub mod prefix;
pub mod signer;

pub use digest::{digest_by_name, Blake3Digest, Digest, Sha512Half};
pub use prefix::HashPrefix;
pub use signer::{Signature, SignatureError, SigningKey, VerifyingKey};
