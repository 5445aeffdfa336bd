//! Strings and string-like values.
//!
//! Octet strings are kept as plain `Bytes` values. This module provides the
//! types for bit strings and the restricted character strings.

pub use self::bit::BitString;
pub use self::restricted::{CharSetError, StringKind};

mod bit;
mod restricted;
mod time;
