//! Type descriptions.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use std::sync::Arc;
use bytes::Bytes;
use smallvec::{smallvec, SmallVec};
use crate::decode::DecodeError;
use crate::encode::{EncodeError, Target, WriteError};
use crate::error::ErrorKind;
use crate::int::Integer;
use crate::mode::Mode;
use crate::string::StringKind;
use crate::tag::{Tag, TagOverride, Tagging};
use crate::value::Value;
use super::builder::{BuildError, CompositeBuilder, CompositeKind};
use super::dispatch::DispatchTable;


//------------ Schema --------------------------------------------------------

/// The description of an ASN.1 type.
///
/// A schema describes how values of a type are encoded: the kind of the
/// type, the tags applied to it, and any constraints on its values. For
/// composite types it also contains the descriptions of all fields.
///
/// Schemas are created once and never change afterwards. They are cheap to
/// clone and can be shared freely between threads, between the fields of
/// several composite types, and between dispatch tables.
///
/// Primitive types are created through the associated functions such as
/// [`integer`][Self::integer]. Composite types are assembled with a
/// [`CompositeBuilder`] obtained from [`sequence`][Self::sequence],
/// [`set`][Self::set], or [`choice`][Self::choice].
#[derive(Clone)]
pub struct Schema(Arc<SchemaInner>);

#[derive(Clone, Debug)]
struct SchemaInner {
    /// The name of the type, if it has one.
    name: Option<Arc<str>>,

    /// What the type is.
    kind: Kind,

    /// The tags applied to the type, the outermost tag first.
    tags: SmallVec<[TagOverride; 2]>,

    /// The constraint on the values of the type.
    constraint: Option<Constraint>,
}

/// # Primitive Types
///
impl Schema {
    fn from_kind(kind: Kind) -> Self {
        Schema(Arc::new(SchemaInner {
            name: None,
            kind,
            tags: SmallVec::new(),
            constraint: None,
        }))
    }

    fn primitive(kind: PrimitiveKind) -> Self {
        Self::from_kind(Kind::Primitive(kind))
    }

    /// Returns the schema of the BOOLEAN type.
    pub fn boolean() -> Self {
        Self::primitive(PrimitiveKind::Boolean)
    }

    /// Returns the schema of the INTEGER type.
    pub fn integer() -> Self {
        Self::primitive(PrimitiveKind::Integer)
    }

    /// Returns the schema of an ENUMERATED type.
    pub fn enumerated() -> Self {
        Self::primitive(PrimitiveKind::Enumerated)
    }

    /// Returns the schema of the BIT STRING type.
    pub fn bit_string() -> Self {
        Self::primitive(PrimitiveKind::BitString)
    }

    /// Returns the schema of the OCTET STRING type.
    pub fn octet_string() -> Self {
        Self::primitive(PrimitiveKind::OctetString)
    }

    /// Returns the schema of the NULL type.
    pub fn null() -> Self {
        Self::primitive(PrimitiveKind::Null)
    }

    /// Returns the schema of the OBJECT IDENTIFIER type.
    pub fn oid() -> Self {
        Self::primitive(PrimitiveKind::Oid)
    }

    /// Returns the schema of the RELATIVE-OID type.
    pub fn relative_oid() -> Self {
        Self::primitive(PrimitiveKind::RelativeOid)
    }

    /// Returns the schema of a restricted character string type.
    pub fn string(kind: StringKind) -> Self {
        Self::primitive(PrimitiveKind::String(kind))
    }

    /// Returns the schema of the UTCTime type.
    pub fn utc_time() -> Self {
        Self::string(StringKind::UtcTime)
    }

    /// Returns the schema of the GeneralizedTime type.
    pub fn generalized_time() -> Self {
        Self::string(StringKind::GeneralizedTime)
    }

    /// Returns the schema of a type that accepts any single value.
    ///
    /// Values of this type are kept in their encoded form.
    pub fn any() -> Self {
        Self::from_kind(Kind::Any)
    }
}

/// # Constructed Types
///
impl Schema {
    /// Starts building a SEQUENCE type.
    pub fn sequence(name: impl Into<Arc<str>>) -> CompositeBuilder {
        CompositeBuilder::new(name.into(), CompositeKind::Sequence)
    }

    /// Starts building a SET type.
    ///
    /// The fields of a SET are encoded and decoded in the order they are
    /// declared in, just like for a SEQUENCE.
    pub fn set(name: impl Into<Arc<str>>) -> CompositeBuilder {
        CompositeBuilder::new(name.into(), CompositeKind::Set)
    }

    /// Starts building a CHOICE type.
    pub fn choice(name: impl Into<Arc<str>>) -> CompositeBuilder {
        CompositeBuilder::new(name.into(), CompositeKind::Choice)
    }

    /// Returns a SEQUENCE OF type with the given element type.
    pub fn sequence_of(element: Schema) -> Self {
        Self::from_kind(Kind::SequenceOf(element))
    }

    /// Returns a SET OF type with the given element type.
    ///
    /// Elements are encoded in the order given, they are not sorted.
    pub fn set_of(element: Schema) -> Self {
        Self::from_kind(Kind::SetOf(element))
    }

    /// Returns an OCTET STRING type that contains an encoded value.
    ///
    /// This is the type of X.509 extension values: on the wire, there is an
    /// OCTET STRING whose content is the DER encoding of a value of
    /// `inner`. The value of the type is the value of `inner`.
    pub fn octet_string_containing(inner: Schema) -> Self {
        Self::from_kind(Kind::Containing(inner))
    }

    pub(super) fn composite(
        name: Arc<str>, kind: Kind
    ) -> Self {
        Schema(Arc::new(SchemaInner {
            name: Some(name),
            kind,
            tags: SmallVec::new(),
            constraint: None,
        }))
    }
}

/// # Derived Types
///
impl Schema {
    /// Returns a copy of the type with a different name.
    pub fn with_name(self, name: impl Into<Arc<str>>) -> Self {
        self.derive(|inner| inner.name = Some(name.into()))
    }

    /// Returns a copy of the type with a constraint.
    ///
    /// A SIZE constraint limits the number of octets of an OCTET STRING,
    /// the number of bits of a BIT STRING, the number of characters of a
    /// character string, and the number of elements of a SEQUENCE OF or
    /// SET OF. A range constraint limits the value of an INTEGER or
    /// ENUMERATED. Any other combination is rejected.
    pub fn with_constraint(
        self, constraint: Constraint
    ) -> Result<Self, BuildError> {
        if !constraint.applies_to(self.kind()) {
            return Err(BuildError::InapplicableConstraint(self.to_string()))
        }
        Ok(self.derive(|inner| inner.constraint = Some(constraint)))
    }

    /// Returns a copy of the type with an additional outer tag.
    ///
    /// Tags on a CHOICE or ANY type are always explicit. An implicit tag
    /// directly applied to either is therefore turned into an explicit one.
    pub fn with_tag(self, tag: TagOverride) -> Self {
        let tag = if self.0.tags.is_empty() && self.is_untagged_kind()
            && !tag.is_explicit()
        {
            TagOverride::new(tag.tag(), Tagging::Explicit)
        }
        else {
            tag
        };
        self.derive(|inner| inner.tags.insert(0, tag))
    }

    fn derive(self, op: impl FnOnce(&mut SchemaInner)) -> Self {
        let mut inner = Arc::unwrap_or_clone(self.0);
        op(&mut inner);
        Schema(Arc::new(inner))
    }
}

/// # Access to Properties
///
impl Schema {
    /// Returns the name of the type if it has one.
    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    /// Returns the kind of the type.
    pub fn kind(&self) -> &Kind {
        &self.0.kind
    }

    /// Returns the tags of the type, the outermost tag first.
    pub fn tags(&self) -> &[TagOverride] {
        self.0.tags.as_slice()
    }

    /// Returns the constraint of the type.
    pub fn constraint(&self) -> Option<&Constraint> {
        self.0.constraint.as_ref()
    }

    /// Returns whether two schema values refer to the very same type.
    pub fn ptr_eq(&self, other: &Schema) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Returns whether the kind of the type does not have a tag of its own.
    pub(crate) fn is_untagged_kind(&self) -> bool {
        matches!(self.0.kind, Kind::Choice(_) | Kind::Any)
    }

    /// Returns the tag of the type before any tags are applied.
    ///
    /// Returns `None` for CHOICE and ANY.
    pub(crate) fn natural_tag(&self) -> Option<Tag> {
        match self.0.kind {
            Kind::Primitive(kind) => Some(kind.tag()),
            Kind::Sequence(_) | Kind::SequenceOf(_) => Some(Tag::SEQUENCE),
            Kind::Set(_) | Kind::SetOf(_) => Some(Tag::SET),
            Kind::Containing(_) => Some(Tag::OCTET_STRING),
            Kind::Choice(_) | Kind::Any => None,
        }
    }

    /// Returns whether an encoded value of the type may start with `tag`.
    pub(crate) fn matches(&self, tag: Tag) -> bool {
        if let Some(outer) = self.0.tags.first() {
            return outer.tag() == tag
        }
        match self.0.kind {
            Kind::Choice(ref alternatives) => {
                alternatives.iter().any(|alt| alt.matches(tag))
            }
            Kind::Any => true,
            _ => self.natural_tag() == Some(tag)
        }
    }

    /// Returns all tags an encoded value of the type may start with.
    pub(crate) fn outer_tags(&self) -> TagSet {
        if let Some(outer) = self.0.tags.first() {
            return TagSet::one(outer.tag())
        }
        match self.0.kind {
            Kind::Choice(ref alternatives) => {
                let mut res = TagSet::empty();
                for alt in alternatives {
                    res.extend(alt.outer_tags());
                }
                res
            }
            Kind::Any => TagSet::Any,
            _ => match self.natural_tag() {
                Some(tag) => TagSet::one(tag),
                None => TagSet::Any,
            }
        }
    }

    /// Checks a length against a SIZE constraint.
    pub(crate) fn check_size(&self, len: usize) -> Result<(), ErrorKind> {
        match self.0.constraint {
            Some(ref constraint) => constraint.check_size(len),
            None => Ok(())
        }
    }

    /// Checks an integer against a range constraint.
    pub(crate) fn check_range(&self, value: &Integer) -> Result<(), ErrorKind> {
        match self.0.constraint {
            Some(ref constraint) => constraint.check_range(value),
            None => Ok(())
        }
    }
}

/// # Decoding and Encoding
///
impl Schema {
    /// Decodes a value of the type from the start of DER-encoded data.
    ///
    /// Returns the value and the number of octets it occupied.
    pub fn decode(&self, data: &[u8]) -> Result<(Value, usize), DecodeError> {
        Mode::Der.decode(self, data)
    }

    /// Decodes a value of the type using the given mode.
    pub fn decode_with_mode(
        &self, data: &[u8], mode: Mode
    ) -> Result<(Value, usize), DecodeError> {
        mode.decode(self, data)
    }

    /// Encodes a value of the type in DER.
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        crate::encode::encode_value(self, value)
    }

    /// Encodes a value of the type in DER into a target.
    ///
    /// Nothing is written if the value cannot be encoded.
    pub fn write_encoded<T: Target>(
        &self, value: &Value, target: &mut T
    ) -> Result<(), WriteError<T::Error>> {
        let data = self.encode(value)?;
        target.write_all(&data).map_err(WriteError::Target)
    }
}


//--- Display and Debug

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(name) = self.name() {
            return f.write_str(name)
        }
        match self.0.kind {
            Kind::Primitive(kind) => write!(f, "{}", kind),
            Kind::SequenceOf(ref element) => {
                write!(f, "SEQUENCE OF {}", element)
            }
            Kind::SetOf(ref element) => write!(f, "SET OF {}", element),
            Kind::Containing(ref inner) => {
                write!(f, "OCTET STRING (CONTAINING {})", inner)
            }
            Kind::Sequence(_) => f.write_str("SEQUENCE"),
            Kind::Set(_) => f.write_str("SET"),
            Kind::Choice(_) => f.write_str("CHOICE"),
            Kind::Any => f.write_str("ANY"),
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}


//------------ Kind ----------------------------------------------------------

/// The kind of a type.
#[derive(Clone, Debug)]
pub enum Kind {
    /// A primitive type.
    Primitive(PrimitiveKind),

    /// A SEQUENCE with the given fields.
    Sequence(Vec<Field>),

    /// A SET with the given fields.
    Set(Vec<Field>),

    /// A CHOICE between the given alternatives.
    Choice(Vec<Field>),

    /// A SEQUENCE OF the given element type.
    SequenceOf(Schema),

    /// A SET OF the given element type.
    SetOf(Schema),

    /// An OCTET STRING containing an encoded value of the given type.
    Containing(Schema),

    /// Any single value, kept in its encoded form.
    Any,
}


//------------ PrimitiveKind -------------------------------------------------

/// The primitive types.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PrimitiveKind {
    Boolean,
    Integer,
    Enumerated,
    BitString,
    OctetString,
    Null,
    Oid,
    RelativeOid,
    String(StringKind),
}

impl PrimitiveKind {
    /// Returns the natural tag of the type.
    pub fn tag(self) -> Tag {
        match self {
            PrimitiveKind::Boolean => Tag::BOOLEAN,
            PrimitiveKind::Integer => Tag::INTEGER,
            PrimitiveKind::Enumerated => Tag::ENUMERATED,
            PrimitiveKind::BitString => Tag::BIT_STRING,
            PrimitiveKind::OctetString => Tag::OCTET_STRING,
            PrimitiveKind::Null => Tag::NULL,
            PrimitiveKind::Oid => Tag::OID,
            PrimitiveKind::RelativeOid => Tag::RELATIVE_OID,
            PrimitiveKind::String(kind) => kind.tag(),
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PrimitiveKind::Boolean => f.write_str("BOOLEAN"),
            PrimitiveKind::Integer => f.write_str("INTEGER"),
            PrimitiveKind::Enumerated => f.write_str("ENUMERATED"),
            PrimitiveKind::BitString => f.write_str("BIT STRING"),
            PrimitiveKind::OctetString => f.write_str("OCTET STRING"),
            PrimitiveKind::Null => f.write_str("NULL"),
            PrimitiveKind::Oid => f.write_str("OBJECT IDENTIFIER"),
            PrimitiveKind::RelativeOid => f.write_str("RELATIVE-OID"),
            PrimitiveKind::String(kind) => fmt::Display::fmt(&kind, f),
        }
    }
}


//------------ Field ---------------------------------------------------------

/// One field of a SEQUENCE or SET or one alternative of a CHOICE.
#[derive(Clone, Debug)]
pub struct Field {
    /// The name of the field.
    name: Arc<str>,

    /// The type of the field.
    ///
    /// For open type fields, this is ANY.
    schema: Schema,

    /// Whether the field has to be present.
    presence: Presence,

    /// A tag applied to the field outside of the tags of its type.
    tagging: Option<TagOverride>,

    /// The dispatch information for an open type field.
    open: Option<OpenType>,

    /// The complete encoding of the default value.
    default_encoded: Option<Bytes>,
}

impl Field {
    pub(super) fn new(
        name: Arc<str>,
        schema: Schema,
        presence: Presence,
        tagging: Option<TagOverride>,
        open: Option<OpenType>,
    ) -> Self {
        Field {
            name, schema, presence, tagging, open,
            default_encoded: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    /// Returns the tag applied to the field itself.
    pub fn tagging(&self) -> Option<TagOverride> {
        self.tagging
    }

    /// Returns the dispatch information if this is an open type field.
    pub fn open_type(&self) -> Option<&OpenType> {
        self.open.as_ref()
    }

    /// Returns the default value if the field has one.
    pub fn default_value(&self) -> Option<&Value> {
        match self.presence {
            Presence::Default(ref value) => Some(value),
            _ => None
        }
    }

    pub(crate) fn default_encoded(&self) -> Option<&[u8]> {
        self.default_encoded.as_deref()
    }

    pub(super) fn set_default_encoded(&mut self, encoded: Bytes) {
        self.default_encoded = Some(encoded)
    }

    /// Returns whether an encoded value of the field may start with `tag`.
    pub(crate) fn matches(&self, tag: Tag) -> bool {
        if let Some(tagging) = self.tagging {
            return tagging.tag() == tag
        }
        match self.open {
            Some(ref open) => open.table.outer_tags().contains(tag),
            None => self.schema.matches(tag)
        }
    }

    /// Returns all tags an encoded value of the field may start with.
    pub(crate) fn outer_tags(&self) -> TagSet {
        if let Some(tagging) = self.tagging {
            return TagSet::one(tagging.tag())
        }
        match self.open {
            Some(ref open) => open.table.outer_tags(),
            None => self.schema.outer_tags()
        }
    }
}


//------------ Presence ------------------------------------------------------

/// Whether a field has to be present in a value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Presence {
    /// The field must always be present.
    Required,

    /// The field may be left out.
    Optional,

    /// The field may be left out in which case it has the given value.
    Default(Value),
}

impl Presence {
    /// Returns whether the field must always be present.
    pub fn is_required(&self) -> bool {
        matches!(*self, Presence::Required)
    }
}


//------------ OpenType ------------------------------------------------------

/// How the type of an open type field is determined.
#[derive(Clone, Debug)]
pub struct OpenType {
    /// The index of the discriminator among the sibling fields.
    pub(crate) discriminator: usize,

    /// The table mapping discriminator values to types.
    pub(crate) table: Arc<DispatchTable>,
}

impl OpenType {
    /// Returns the position of the discriminator field.
    pub fn discriminator(&self) -> usize {
        self.discriminator
    }

    /// Returns the dispatch table.
    pub fn table(&self) -> &DispatchTable {
        &self.table
    }
}


//------------ Constraint ----------------------------------------------------

/// A constraint on the values of a type.
///
/// Both bounds are inclusive. A missing bound means there is no limit in
/// that direction.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Constraint {
    /// A limit on the length of a value.
    Size {
        min: Option<usize>,
        max: Option<usize>,
    },

    /// A limit on the numerical value.
    Range {
        min: Option<i64>,
        max: Option<i64>,
    },
}

impl Constraint {
    /// Creates a SIZE constraint with both bounds.
    pub fn size(min: usize, max: usize) -> Self {
        Constraint::Size { min: Some(min), max: Some(max) }
    }

    /// Creates a range constraint with both bounds.
    pub fn range(min: i64, max: i64) -> Self {
        Constraint::Range { min: Some(min), max: Some(max) }
    }

    /// Returns whether the constraint can be applied to a kind of type.
    pub fn applies_to(&self, kind: &Kind) -> bool {
        match (self, kind) {
            (
                Constraint::Size { .. },
                Kind::Primitive(
                    PrimitiveKind::BitString | PrimitiveKind::OctetString
                    | PrimitiveKind::String(_)
                ) | Kind::SequenceOf(_) | Kind::SetOf(_)
            ) => true,
            (
                Constraint::Range { .. },
                Kind::Primitive(
                    PrimitiveKind::Integer | PrimitiveKind::Enumerated
                )
            ) => true,
            _ => false
        }
    }

    fn check_size(&self, len: usize) -> Result<(), ErrorKind> {
        if let Constraint::Size { min, max } = *self {
            if min.is_some_and(|min| len < min) {
                xerr!(return Err(ErrorKind::constraint(format!(
                    "size {} below minimum {}", len, min.unwrap_or_default()
                ))))
            }
            if max.is_some_and(|max| len > max) {
                xerr!(return Err(ErrorKind::constraint(format!(
                    "size {} above maximum {}", len, max.unwrap_or_default()
                ))))
            }
        }
        Ok(())
    }

    fn check_range(&self, value: &Integer) -> Result<(), ErrorKind> {
        let Constraint::Range { min, max } = *self else {
            return Ok(())
        };
        let (below, above) = match value.to_i128() {
            Some(value) => (
                min.is_some_and(|min| value < i128::from(min)),
                max.is_some_and(|max| value > i128::from(max)),
            ),
            // Too large for any bound.
            None => (
                min.is_some() && value.is_negative(),
                max.is_some() && !value.is_negative(),
            )
        };
        if below || above {
            xerr!(Err(ErrorKind::constraint(format!(
                "value {} out of range", value
            ))))
        }
        else {
            Ok(())
        }
    }
}


//------------ TagSet --------------------------------------------------------

/// The set of tags an encoded value may start with.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum TagSet {
    /// Any tag at all.
    Any,

    /// One of the given tags.
    Tags(SmallVec<[Tag; 4]>),
}

impl TagSet {
    pub fn empty() -> Self {
        TagSet::Tags(SmallVec::new())
    }

    pub fn one(tag: Tag) -> Self {
        TagSet::Tags(smallvec![tag])
    }

    pub fn contains(&self, tag: Tag) -> bool {
        match *self {
            TagSet::Any => true,
            TagSet::Tags(ref tags) => tags.contains(&tag)
        }
    }

    /// Adds all tags of `other`.
    pub fn extend(&mut self, other: TagSet) {
        match (&mut *self, other) {
            (TagSet::Any, _) => { }
            (_, TagSet::Any) => *self = TagSet::Any,
            (TagSet::Tags(tags), TagSet::Tags(other)) => {
                for tag in other {
                    if !tags.contains(&tag) {
                        tags.push(tag)
                    }
                }
            }
        }
    }

    /// Returns a tag contained in both sets, if there is one.
    ///
    /// If both sets contain any tag, returns `Some(None)`.
    pub fn common(&self, other: &TagSet) -> Option<Option<Tag>> {
        match (self, other) {
            (TagSet::Any, TagSet::Any) => Some(None),
            (TagSet::Any, TagSet::Tags(tags))
            | (TagSet::Tags(tags), TagSet::Any) => {
                tags.first().map(|tag| Some(*tag))
            }
            (TagSet::Tags(left), TagSet::Tags(right)) => {
                left.iter().find(|tag| right.contains(tag)).map(|tag| {
                    Some(*tag)
                })
            }
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tags_and_matching() {
        let int = Schema::integer();
        assert!(int.matches(Tag::INTEGER));
        assert!(!int.matches(Tag::BOOLEAN));

        let tagged = Schema::integer().with_tag(Tag::ctx(0).implicit());
        assert!(tagged.matches(Tag::ctx(0)));
        assert!(!tagged.matches(Tag::INTEGER));
        assert_eq!(tagged.outer_tags(), TagSet::one(Tag::ctx(0)));

        assert!(Schema::any().matches(Tag::private(7)));
        assert!(Schema::sequence_of(Schema::oid()).matches(Tag::SEQUENCE));
        assert!(
            Schema::octet_string_containing(Schema::boolean())
                .matches(Tag::OCTET_STRING)
        );
    }

    #[test]
    fn untagged_kinds_get_explicit_tags() {
        let any = Schema::any().with_tag(Tag::ctx(1).implicit());
        assert_eq!(any.tags(), &[Tag::ctx(1).explicit()]);

        // Only the innermost tag is forced to be explicit.
        let any = any.with_tag(Tag::application(2).implicit());
        assert_eq!(
            any.tags(),
            &[Tag::application(2).implicit(), Tag::ctx(1).explicit()]
        );
    }

    #[test]
    fn derive_keeps_original() {
        let plain = Schema::octet_string();
        let sized = plain.clone().with_constraint(
            Constraint::size(1, 4)
        ).unwrap();
        assert!(plain.constraint().is_none());
        assert_eq!(sized.constraint(), Some(&Constraint::size(1, 4)));
        assert!(!plain.ptr_eq(&sized));
    }

    #[test]
    fn size_constraint() {
        let constraint = Constraint::Size { min: Some(1), max: None };
        assert!(constraint.check_size(0).is_err());
        assert!(constraint.check_size(1).is_ok());
        assert!(constraint.check_size(usize::MAX).is_ok());
        assert!(Constraint::size(1, 2).check_size(3).is_err());
    }

    #[test]
    fn range_constraint() {
        let constraint = Constraint::range(0, 255);
        assert!(constraint.check_range(&Integer::from(0)).is_ok());
        assert!(constraint.check_range(&Integer::from(255)).is_ok());
        assert!(constraint.check_range(&Integer::from(256)).is_err());
        assert!(constraint.check_range(&Integer::from(-1)).is_err());
        assert!(constraint.check_range(&Integer::from(u64::MAX)).is_err());

        let huge = Integer::from_content(&[0x01; 20], Mode::Der).unwrap();
        assert!(constraint.check_range(&huge).is_err());
        assert!(
            Constraint::Range { min: Some(0), max: None }
                .check_range(&huge).is_ok()
        );
    }

    #[test]
    fn applicable_constraints() {
        let size = Constraint::size(1, 2);
        let range = Constraint::range(1, 2);
        assert!(size.applies_to(Schema::octet_string().kind()));
        assert!(size.applies_to(Schema::set_of(Schema::oid()).kind()));
        assert!(!size.applies_to(Schema::integer().kind()));
        assert!(range.applies_to(Schema::enumerated().kind()));
        assert!(!range.applies_to(Schema::null().kind()));
    }

    #[test]
    fn tag_sets() {
        let mut set = TagSet::one(Tag::INTEGER);
        set.extend(TagSet::one(Tag::BOOLEAN));
        assert!(set.contains(Tag::BOOLEAN));
        assert_eq!(
            set.common(&TagSet::one(Tag::BOOLEAN)), Some(Some(Tag::BOOLEAN))
        );
        assert_eq!(set.common(&TagSet::one(Tag::NULL)), None);
        assert_eq!(TagSet::Any.common(&TagSet::Any), Some(None));
        set.extend(TagSet::Any);
        assert_eq!(set, TagSet::Any);
    }
}
