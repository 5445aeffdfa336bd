//! Decoding data in BER and DER.
//!
//! Decoding walks a [`Schema`] against a slice of octets. The input is
//! accessed through a [`SliceSource`] that never reads past the end of the
//! slice and tracks the absolute position for error reporting. Any failure
//! is returned as a [`DecodeError`]. Since the value tree is only handed
//! out once decoding succeeded, a failed decode never leaves a partially
//! filled value behind.
//!
//! The usual entry points are [`Schema::decode`] and [`Mode::decode`].
//!
//! [`Schema`]: crate::schema::Schema
//! [`Schema::decode`]: crate::schema::Schema::decode
//! [`Mode::decode`]: crate::mode::Mode::decode

pub use self::error::{DecodeError, Pos};
pub use self::source::SliceSource;
pub(crate) use self::structure::decode_value;

mod error;
mod primitive;
mod source;
mod structure;
