//! Encoding values in DER.
//!
//! Encoding walks a [`Value`] tree alongside its [`Schema`]. The content of
//! each value is produced first, tags are then applied from the inside out
//! and headers are added once the lengths are known. The result is always
//! in the canonical form required by DER: lengths and integers use their
//! shortest form, BOOLEAN true is `0xFF`, and fields carrying their default
//! value are left out.
//!
//! The walk stops at the first problem with the value tree. The resulting
//! [`EncodeError`] carries the path of field names and list indexes that
//! leads to the offending value.
//!
//! Besides producing a vector via [`Schema::encode`], encoded data can be
//! written to anything implementing [`Target`] through
//! [`Schema::write_encoded`]. Any `io::Write` can be used as a target by
//! wrapping it into an [`IoTarget`].
//!
//! [`Value`]: crate::value::Value
//! [`Schema`]: crate::schema::Schema
//! [`Schema::encode`]: crate::schema::Schema::encode
//! [`Schema::write_encoded`]: crate::schema::Schema::write_encoded

pub use self::error::{EncodeError, WriteError};
pub use self::target::{IoTarget, Target};
pub(crate) use self::structure::{encode_field, encode_value};

mod error;
mod primitive;
mod structure;
mod target;
mod tlv;
