//! Decoded values.
//!
//! A value tree is what decoding produces and what encoding consumes. It
//! mirrors the shape of the [`Schema`] it belongs to but is plain owned
//! data: it can be built by hand, inspected, cloned, and changed freely
//! without ever affecting the schema or any other value.
//!
//! Composite values keep their fields in a [`Fields`] map which records for
//! every field whether it was present, left out, or has its default value.
//!
//! [`Schema`]: crate::schema::Schema

use std::fmt;
use bytes::Bytes;
use crate::captured::Captured;
use crate::int::Integer;
use crate::oid::{Oid, RelativeOid};
use crate::string::BitString;


//------------ Value ---------------------------------------------------------

/// A single value of some schema.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    /// A BOOLEAN.
    Boolean(bool),

    /// An INTEGER or ENUMERATED.
    Integer(Integer),

    /// A BIT STRING.
    BitString(BitString),

    /// An OCTET STRING.
    OctetString(Bytes),

    /// NULL.
    Null,

    /// An OBJECT IDENTIFIER.
    Oid(Oid),

    /// A RELATIVE-OID.
    RelativeOid(RelativeOid),

    /// Any of the restricted character strings or a time value.
    Text(String),

    /// The fields of a SEQUENCE.
    Sequence(Fields),

    /// The fields of a SET.
    Set(Fields),

    /// The chosen alternative of a CHOICE.
    Choice(Box<Chosen>),

    /// The elements of a SEQUENCE OF or SET OF.
    List(Vec<Value>),

    /// An open type resolved through a dispatch table.
    Open(Box<OpenValue>),

    /// A complete encoded value kept verbatim.
    Any(Captured),
}

impl Value {
    /// Creates a CHOICE value.
    pub fn choice(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Value::Choice(Box::new(Chosen::new(name, value)))
    }

    /// Creates an open type value for the dispatch entry `label`.
    pub fn open(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Value::Open(Box::new(OpenValue::new(label, value)))
    }

    /// Returns a short description of the kind of value.
    pub fn kind_name(&self) -> &'static str {
        match *self {
            Value::Boolean(_) => "BOOLEAN",
            Value::Integer(_) => "INTEGER",
            Value::BitString(_) => "BIT STRING",
            Value::OctetString(_) => "OCTET STRING",
            Value::Null => "NULL",
            Value::Oid(_) => "OBJECT IDENTIFIER",
            Value::RelativeOid(_) => "RELATIVE-OID",
            Value::Text(_) => "string",
            Value::Sequence(_) => "SEQUENCE",
            Value::Set(_) => "SET",
            Value::Choice(_) => "CHOICE",
            Value::List(_) => "list",
            Value::Open(_) => "open type",
            Value::Any(_) => "ANY",
        }
    }

    /// Returns the value of a BOOLEAN.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Boolean(value) => Some(value),
            _ => None
        }
    }

    /// Returns the value of an INTEGER or ENUMERATED.
    pub fn as_integer(&self) -> Option<&Integer> {
        match *self {
            Value::Integer(ref value) => Some(value),
            _ => None
        }
    }

    /// Returns the value as an `i64` if it is an integer that fits.
    pub fn to_i64(&self) -> Option<i64> {
        self.as_integer().and_then(Integer::to_i64)
    }

    /// Returns the value of a BIT STRING.
    pub fn as_bit_string(&self) -> Option<&BitString> {
        match *self {
            Value::BitString(ref value) => Some(value),
            _ => None
        }
    }

    /// Returns the content of an OCTET STRING.
    pub fn as_octets(&self) -> Option<&Bytes> {
        match *self {
            Value::OctetString(ref value) => Some(value),
            _ => None
        }
    }

    /// Returns the value of an OBJECT IDENTIFIER.
    pub fn as_oid(&self) -> Option<&Oid> {
        match *self {
            Value::Oid(ref value) => Some(value),
            _ => None
        }
    }

    /// Returns the value of a RELATIVE-OID.
    pub fn as_relative_oid(&self) -> Option<&RelativeOid> {
        match *self {
            Value::RelativeOid(ref value) => Some(value),
            _ => None
        }
    }

    /// Returns the text of a character string or time value.
    pub fn as_str(&self) -> Option<&str> {
        match *self {
            Value::Text(ref value) => Some(value.as_str()),
            _ => None
        }
    }

    /// Returns the fields of a SEQUENCE or SET value.
    pub fn as_fields(&self) -> Option<&Fields> {
        match *self {
            Value::Sequence(ref fields) | Value::Set(ref fields) => {
                Some(fields)
            }
            _ => None
        }
    }

    /// Returns mutable access to the fields of a SEQUENCE or SET value.
    pub fn as_fields_mut(&mut self) -> Option<&mut Fields> {
        match *self {
            Value::Sequence(ref mut fields) | Value::Set(ref mut fields) => {
                Some(fields)
            }
            _ => None
        }
    }

    /// Returns the chosen alternative of a CHOICE.
    pub fn as_choice(&self) -> Option<&Chosen> {
        match *self {
            Value::Choice(ref value) => Some(value),
            _ => None
        }
    }

    /// Returns the elements of a SEQUENCE OF or SET OF.
    pub fn as_list(&self) -> Option<&[Value]> {
        match *self {
            Value::List(ref value) => Some(value.as_slice()),
            _ => None
        }
    }

    /// Returns a resolved open type value.
    pub fn as_open(&self) -> Option<&OpenValue> {
        match *self {
            Value::Open(ref value) => Some(value),
            _ => None
        }
    }

    /// Returns a value kept in its encoded form.
    pub fn as_captured(&self) -> Option<&Captured> {
        match *self {
            Value::Any(ref value) => Some(value),
            _ => None
        }
    }

    /// Returns the value of the named field of a SEQUENCE or SET.
    ///
    /// Both present and defaulted fields are returned.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.as_fields().and_then(|fields| fields.get(name))
    }
}


//--- From

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<Integer> for Value {
    fn from(value: Integer) -> Self {
        Value::Integer(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value.into())
    }
}

impl From<BitString> for Value {
    fn from(value: BitString) -> Self {
        Value::BitString(value)
    }
}

impl From<Bytes> for Value {
    fn from(value: Bytes) -> Self {
        Value::OctetString(value)
    }
}

impl From<Oid> for Value {
    fn from(value: Oid) -> Self {
        Value::Oid(value)
    }
}

impl From<RelativeOid> for Value {
    fn from(value: RelativeOid) -> Self {
        Value::RelativeOid(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.into())
    }
}

impl From<Captured> for Value {
    fn from(value: Captured) -> Self {
        Value::Any(value)
    }
}

impl From<Chosen> for Value {
    fn from(value: Chosen) -> Self {
        Value::Choice(Box::new(value))
    }
}

impl From<OpenValue> for Value {
    fn from(value: OpenValue) -> Self {
        Value::Open(Box::new(value))
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}


//------------ Slot ----------------------------------------------------------

/// The state of one field of a composite value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Slot {
    /// The field is not present.
    Absent,

    /// The field is present with the given value.
    Present(Value),

    /// The field has its declared default value.
    ///
    /// Decoding produces this both when the field was left out and when it
    /// was encoded explicitly with the default value. Encoding leaves such
    /// a field out and fails if the value differs from the default.
    Defaulted(Value),
}

impl Slot {
    /// Returns the value of a present or defaulted field.
    pub fn value(&self) -> Option<&Value> {
        match *self {
            Slot::Absent => None,
            Slot::Present(ref value) | Slot::Defaulted(ref value) => {
                Some(value)
            }
        }
    }

    /// Converts the slot into its value if there is one.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Slot::Absent => None,
            Slot::Present(value) | Slot::Defaulted(value) => Some(value)
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(*self, Slot::Absent)
    }

    pub fn is_present(&self) -> bool {
        matches!(*self, Slot::Present(_))
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(*self, Slot::Defaulted(_))
    }
}

impl Default for Slot {
    fn default() -> Self {
        Slot::Absent
    }
}


//------------ Fields --------------------------------------------------------

/// The fields of a SEQUENCE or SET value.
///
/// This is an ordered map from field names to slots. Decoding fills in a
/// slot for every field of the schema in declaration order. When building
/// a value for encoding, absent fields can simply be left out: a missing
/// name is treated exactly like an [`Slot::Absent`] slot, including when
/// comparing two values.
#[derive(Clone, Default)]
pub struct Fields {
    items: Vec<(String, Slot)>,
}

static ABSENT: Slot = Slot::Absent;

impl Fields {
    /// Creates a new, empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty map with room for `capacity` fields.
    pub fn with_capacity(capacity: usize) -> Self {
        Fields { items: Vec::with_capacity(capacity) }
    }

    /// Adds a present field and returns the map.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a field to be present with the given value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.insert(name, Slot::Present(value.into()))
    }

    /// Marks a field as absent.
    pub fn remove(&mut self, name: &str) -> Option<Slot> {
        let idx = self.items.iter().position(|item| item.0 == name)?;
        Some(self.items.remove(idx).1)
    }

    /// Sets the slot of a field.
    ///
    /// If the field already exists, its slot is replaced and it keeps its
    /// position. Otherwise it is appended.
    pub fn insert(&mut self, name: impl Into<String>, slot: Slot) {
        let name = name.into();
        match self.items.iter_mut().find(|item| item.0 == name) {
            Some(item) => item.1 = slot,
            None => self.items.push((name, slot)),
        }
    }

    /// Returns the slot of a field.
    ///
    /// Unknown fields are reported as absent.
    pub fn slot(&self, name: &str) -> &Slot {
        self.items.iter().find(|item| item.0 == name).map(|item| &item.1)
            .unwrap_or(&ABSENT)
    }

    /// Returns the value of a present or defaulted field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slot(name).value()
    }

    /// Returns a mutable reference to the value of a field.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.items.iter_mut().find(|item| item.0 == name).and_then(|item| {
            match item.1 {
                Slot::Absent => None,
                Slot::Present(ref mut value)
                    | Slot::Defaulted(ref mut value) => Some(value)
            }
        })
    }

    /// Returns whether the map contains a slot for a field.
    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|item| item.0 == name)
    }

    /// Returns an iterator over the names and slots in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Slot)> + '_ {
        self.items.iter().map(|item| (item.0.as_str(), &item.1))
    }

    /// Returns the number of slots.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether there are no slots at all.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the slot at the given position.
    pub(crate) fn slot_at(&self, idx: usize) -> &Slot {
        self.items.get(idx).map(|item| &item.1).unwrap_or(&ABSENT)
    }

    /// Appends a slot without checking for duplicates.
    pub(crate) fn push(&mut self, name: &str, slot: Slot) {
        self.items.push((name.into(), slot))
    }
}


//--- PartialEq and Eq

impl PartialEq for Fields {
    fn eq(&self, other: &Self) -> bool {
        self.items.iter().all(|(name, slot)| other.slot(name) == slot)
        && other.items.iter().all(|(name, slot)| self.slot(name) == slot)
    }
}

impl Eq for Fields { }


//--- Debug

impl fmt::Debug for Fields {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(
            self.items.iter().map(|item| (&item.0, &item.1))
        ).finish()
    }
}


//------------ Chosen --------------------------------------------------------

/// The value of a CHOICE: the name of the alternative and its value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Chosen {
    pub name: String,
    pub value: Value,
}

impl Chosen {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Chosen { name: name.into(), value: value.into() }
    }
}


//------------ OpenValue -----------------------------------------------------

/// The value of an open type.
///
/// The label names the dispatch table entry that was selected by the
/// discriminator, i.e., the variant of the open type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OpenValue {
    pub label: String,
    pub value: Value,
}

impl OpenValue {
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        OpenValue { label: label.into(), value: value.into() }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_equals_absent() {
        let mut left = Fields::new().with("a", 1i64);
        let right = Fields::new().with("a", 1i64);
        left.insert("b", Slot::Absent);
        assert_eq!(left, right);
        assert!(right.slot("b").is_absent());

        left.insert("b", Slot::Defaulted(false.into()));
        assert_ne!(left, right);
    }

    #[test]
    fn insert_keeps_position() {
        let mut fields = Fields::new().with("a", 1i64).with("b", true);
        fields.set("a", 2i64);
        let names: Vec<_> = fields.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(fields.get("a").and_then(Value::to_i64), Some(2));
        assert_eq!(fields.remove("a"), Some(Slot::Present(2i64.into())));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn clone_is_deep() {
        let inner = Value::Sequence(Fields::new().with("x", 1i64));
        let mut outer = Value::Sequence(Fields::new().with("inner", inner));
        let copy = outer.clone();
        if let Some(Value::Sequence(fields)) = outer.as_fields_mut()
            .and_then(|fields| fields.get_mut("inner"))
        {
            fields.set("x", 2i64);
        }
        assert_eq!(
            copy.field("inner").and_then(|v| v.field("x"))
                .and_then(Value::to_i64),
            Some(1)
        );
        assert_eq!(
            outer.field("inner").and_then(|v| v.field("x"))
                .and_then(Value::to_i64),
            Some(2)
        );
    }
}
