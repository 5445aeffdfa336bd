//! Schema-driven handling of data in Basic and Distinguished Encoding Rules.
//!
//! This crate decodes and encodes ASN.1 values as they appear in PKI
//! structures such as certificates, CRLs, and CMS messages. Rather than
//! writing a decoder for every type, the layout of a type is described once
//! by a [`Schema`]. The generic decoder then turns encoded data into a
//! [`Value`] tree and the generic encoder turns such a tree back into DER.
//!
//! Fields whose type depends on the value of another field, such as the
//! parameters of an algorithm identifier or the value of an extension, are
//! described through a [`DispatchTable`] mapping object identifiers or
//! integers to the schema to use.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use dertree::{DispatchTable, Presence, Schema, Value};
//!
//! let params = Arc::new(
//!     DispatchTable::new()
//!         .register_oid("1.2.840.113549.1.1.1", "rsa", Schema::null())?
//! );
//! let alg = Schema::sequence("AlgorithmIdentifier")
//!     .field("algorithm", Schema::oid())
//!     .defined_by("parameters", "algorithm", params, Presence::Optional)
//!     .build()?;
//!
//! let data = b"\x30\x0d\x06\x09\x2a\x86\x48\x86\xf7\x0d\x01\x01\x01\x05\x00";
//! let (value, len) = alg.decode(data)?;
//! assert_eq!(len, data.len());
//! assert_eq!(
//!     value.field("parameters"), Some(&Value::open("rsa", Value::Null))
//! );
//! assert_eq!(alg.encode(&value)?, data);
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
//!
//! Schemas are immutable once built and can be shared between threads for
//! any number of concurrent operations.

pub use self::captured::Captured;
pub use self::decode::DecodeError;
pub use self::encode::EncodeError;
pub use self::error::ErrorKind;
pub use self::header::Header;
pub use self::int::Integer;
pub use self::length::Length;
pub use self::mode::Mode;
pub use self::oid::{Oid, RelativeOid};
pub use self::schema::{
    BuildError, CompositeBuilder, Constraint, Discriminator, DispatchTable,
    Field, Kind, Presence, PrimitiveKind, Schema,
};
pub use self::string::{BitString, StringKind};
pub use self::tag::{Class, Tag, TagOverride, Tagging};
pub use self::value::{Chosen, Fields, OpenValue, Slot, Value};

#[macro_use] mod debug;

pub mod decode;
pub mod encode;
pub mod oid;
pub mod schema;
pub mod string;
pub mod value;

mod captured;
mod error;
mod header;
mod int;
mod length;
mod mode;
mod tag;


//------------ Convenience Functions -----------------------------------------

/// Decodes a value of `schema` from the start of DER-encoded data.
///
/// Returns the value and the number of octets it occupied. Any data
/// following the value is not looked at.
pub fn decode(
    schema: &Schema, data: &[u8]
) -> Result<(Value, usize), DecodeError> {
    schema.decode(data)
}

/// Encodes a value of `schema` in DER.
pub fn encode(schema: &Schema, value: &Value) -> Result<Vec<u8>, EncodeError> {
    schema.encode(value)
}
