//! Dispatch tables for open types.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use std::str::FromStr;
use std::collections::HashMap;
use std::sync::Arc;
use crate::oid::Oid;
use crate::value::Value;
use super::builder::BuildError;
use super::node::{Schema, TagSet};


//------------ DispatchTable -------------------------------------------------

/// A table mapping discriminator values to types.
///
/// Open types such as the parameters of an algorithm identifier or the
/// value of a certificate extension have a type that depends on the value
/// of another field, the discriminator. A dispatch table provides the
/// mapping from the discriminator values to the schema to use. Each entry
/// also has a label which names the variant in decoded values.
///
/// Tables are assembled once and then shared behind an `Arc` by all the
/// fields using them. Lookups check the entries of the table first, then
/// the table set via [`with_next`][Self::with_next], if any, and finally
/// the wildcard entry set via [`with_wildcard`][Self::with_wildcard].
#[derive(Clone, Debug, Default)]
pub struct DispatchTable {
    /// The entries in the order they were registered.
    entries: Vec<DispatchEntry>,

    /// An index into `entries`.
    index: HashMap<Discriminator, usize>,

    /// The table to try if there is no match in this table.
    next: Option<Arc<DispatchTable>>,

    /// The entry to use if nothing else matches.
    wildcard: Option<DispatchEntry>,
}

impl DispatchTable {
    /// Creates a new, empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry.
    ///
    /// Fails if there already is an entry for `key`.
    pub fn register(
        mut self,
        key: impl Into<Discriminator>,
        label: impl Into<Arc<str>>,
        schema: Schema,
    ) -> Result<Self, BuildError> {
        let key = key.into();
        if self.index.contains_key(&key) {
            log::debug!("rejected duplicate discriminator {}", key);
            return Err(BuildError::DuplicateDiscriminator(key.to_string()))
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(DispatchEntry {
            key: Some(key),
            label: label.into(),
            schema,
        });
        Ok(self)
    }

    /// Adds an entry for an object identifier in dotted notation.
    pub fn register_oid(
        self, oid: &str, label: impl Into<Arc<str>>, schema: Schema,
    ) -> Result<Self, BuildError> {
        let oid = Oid::from_str(oid).map_err(|_| {
            BuildError::InvalidKey(oid.into())
        })?;
        self.register(oid, label, schema)
    }

    /// Adds an entry for an integer.
    pub fn register_int(
        self, value: i64, label: impl Into<Arc<str>>, schema: Schema,
    ) -> Result<Self, BuildError> {
        self.register(value, label, schema)
    }

    /// Sets the entry used for all otherwise unknown discriminators.
    pub fn with_wildcard(
        mut self, label: impl Into<Arc<str>>, schema: Schema
    ) -> Self {
        self.wildcard = Some(DispatchEntry {
            key: None,
            label: label.into(),
            schema,
        });
        self
    }

    /// Sets the table to consult if this table has no matching entry.
    pub fn with_next(mut self, next: Arc<DispatchTable>) -> Self {
        self.next = Some(next);
        self
    }

    /// Looks up the entry for a discriminator.
    pub fn resolve(&self, key: &Discriminator) -> Option<&DispatchEntry> {
        if let Some(&idx) = self.index.get(key) {
            return self.entries.get(idx)
        }
        if let Some(res) = self.next.as_ref().and_then(|next| {
            next.resolve(key)
        }) {
            return Some(res)
        }
        self.wildcard.as_ref()
    }

    /// Looks up the entry for a discriminator field’s value.
    pub fn resolve_value(&self, value: &Value) -> Option<&DispatchEntry> {
        Discriminator::from_value(value).and_then(|key| self.resolve(&key))
    }

    /// Returns an iterator over the entries of this table in order.
    ///
    /// Neither the wildcard entry nor the entries of the next table are
    /// included.
    pub fn iter(&self) -> impl Iterator<Item = &DispatchEntry> + '_ {
        self.entries.iter()
    }

    /// Returns the number of entries of this table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns all tags a value of any of the entries may start with.
    pub(crate) fn outer_tags(&self) -> TagSet {
        let mut res = TagSet::empty();
        for entry in self.all_entries() {
            res.extend(entry.schema.outer_tags());
        }
        res
    }

    /// Returns which kinds of keys the table and its successors contain.
    pub(crate) fn key_kinds(&self) -> KeyKinds {
        let mut res = KeyKinds::default();
        for entry in self.all_entries() {
            match entry.key {
                Some(Discriminator::Oid(_)) => res.oid = true,
                Some(Discriminator::Int(_)) => res.int = true,
                None => { }
            }
        }
        res
    }

    /// Returns an iterator over all entries including the chained ones.
    fn all_entries(&self) -> impl Iterator<Item = &DispatchEntry> + '_ {
        let mut tables = Some(self);
        let mut res = Vec::new();
        while let Some(table) = tables {
            res.extend(table.entries.iter());
            res.extend(table.wildcard.iter());
            tables = table.next.as_deref();
        }
        res.into_iter()
    }
}


//------------ DispatchEntry -------------------------------------------------

/// One entry of a dispatch table.
#[derive(Clone, Debug)]
pub struct DispatchEntry {
    key: Option<Discriminator>,
    label: Arc<str>,
    schema: Schema,
}

impl DispatchEntry {
    /// Returns the discriminator or `None` for a wildcard entry.
    pub fn key(&self) -> Option<&Discriminator> {
        self.key.as_ref()
    }

    /// Returns the label naming the variant.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the type of the variant.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}


//------------ Discriminator -------------------------------------------------

/// The value of a discriminator field.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Discriminator {
    Oid(Oid),
    Int(i64),
}

impl Discriminator {
    /// Creates a discriminator from a decoded value.
    ///
    /// Returns `None` if the value is neither an object identifier nor an
    /// integer that fits into an `i64`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match *value {
            Value::Oid(ref oid) => Some(Discriminator::Oid(oid.clone())),
            Value::Integer(ref int) => int.to_i64().map(Discriminator::Int),
            _ => None
        }
    }

    /// Describes a discriminator field’s value for error messages.
    pub(crate) fn describe(value: &Value) -> String {
        match *value {
            Value::Oid(ref oid) => oid.to_string(),
            Value::Integer(ref int) => int.to_string(),
            ref other => other.kind_name().into(),
        }
    }
}

impl From<Oid> for Discriminator {
    fn from(oid: Oid) -> Self {
        Discriminator::Oid(oid)
    }
}

impl From<i64> for Discriminator {
    fn from(value: i64) -> Self {
        Discriminator::Int(value)
    }
}

impl fmt::Display for Discriminator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Discriminator::Oid(ref oid) => fmt::Display::fmt(oid, f),
            Discriminator::Int(value) => fmt::Display::fmt(&value, f),
        }
    }
}


//------------ KeyKinds ------------------------------------------------------

/// The kinds of discriminators present in a table.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct KeyKinds {
    pub oid: bool,
    pub int: bool,
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::tag::Tag;
    use super::*;

    fn oid(s: &str) -> Discriminator {
        Discriminator::Oid(Oid::from_str(s).unwrap())
    }

    #[test]
    fn register_and_resolve() {
        let table = DispatchTable::new()
            .register_oid("1.2.840.113549.1.1.1", "rsa", Schema::null())
            .unwrap()
            .register_oid("1.2.840.10040.4.1", "dsa", Schema::any())
            .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.resolve(&oid("1.2.840.113549.1.1.1")).map(|x| x.label()),
            Some("rsa")
        );
        assert!(table.resolve(&oid("2.289.9")).is_none());
        assert!(table.resolve(&Discriminator::Int(1)).is_none());
        let labels: Vec<_> = table.iter().map(DispatchEntry::label).collect();
        assert_eq!(labels, ["rsa", "dsa"]);
    }

    #[test]
    fn rejects_bad_keys() {
        let table = DispatchTable::new()
            .register_int(1, "one", Schema::null()).unwrap();
        assert_eq!(
            table.clone().register_int(1, "again", Schema::null())
                .unwrap_err(),
            BuildError::DuplicateDiscriminator("1".into())
        );
        assert_eq!(
            table.register_oid("1.x", "bad", Schema::null()).unwrap_err(),
            BuildError::InvalidKey("1.x".into())
        );
    }

    #[test]
    fn chain_and_wildcard() {
        let base = Arc::new(
            DispatchTable::new()
                .register_int(1, "base-one", Schema::null()).unwrap()
                .register_int(2, "base-two", Schema::null()).unwrap()
        );
        let table = DispatchTable::new()
            .register_int(1, "one", Schema::boolean()).unwrap()
            .with_next(base)
            .with_wildcard("other", Schema::any());
        let label = |key| {
            table.resolve(&Discriminator::Int(key)).map(|x| x.label())
        };
        assert_eq!(label(1), Some("one"));
        assert_eq!(label(2), Some("base-two"));
        assert_eq!(label(3), Some("other"));
        assert_eq!(table.outer_tags(), TagSet::Any);
        assert!(table.key_kinds().int);
        assert!(!table.key_kinds().oid);
    }

    #[test]
    fn outer_tags() {
        let table = DispatchTable::new()
            .register_int(1, "null", Schema::null()).unwrap()
            .register_int(2, "bool", Schema::boolean()).unwrap();
        let tags = table.outer_tags();
        assert!(tags.contains(Tag::NULL));
        assert!(tags.contains(Tag::BOOLEAN));
        assert!(!tags.contains(Tag::INTEGER));
    }

    #[test]
    fn from_value() {
        assert_eq!(
            Discriminator::from_value(&Value::from(7i64)),
            Some(Discriminator::Int(7))
        );
        assert_eq!(Discriminator::from_value(&Value::Null), None);
    }
}
