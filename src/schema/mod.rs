//! Type descriptions.
//!
//! A [`Schema`] describes an ASN.1 type and how its values are encoded.
//! Primitive types are available directly through associated functions,
//! composite types are assembled through a [`CompositeBuilder`]. Open types
//! whose actual type depends on the value of another field use a
//! [`DispatchTable`].
//!
//! All of these are built once, typically when a program starts, and are
//! immutable afterwards. They can be used for any number of concurrent
//! decoding and encoding operations.

pub use self::builder::{BuildError, CompositeBuilder};
pub use self::dispatch::{Discriminator, DispatchEntry, DispatchTable};
pub use self::node::{
    Constraint, Field, Kind, OpenType, Presence, PrimitiveKind, Schema
};

mod builder;
mod dispatch;
mod node;
