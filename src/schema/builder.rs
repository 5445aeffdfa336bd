//! Assembling composite types.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use std::sync::Arc;
use crate::encode::EncodeError;
use crate::tag::{Tag, TagOverride};
use crate::value::Value;
use super::dispatch::DispatchTable;
use super::node::{Field, Kind, OpenType, Presence, PrimitiveKind, Schema};


//------------ CompositeBuilder ----------------------------------------------

/// A builder for SEQUENCE, SET, and CHOICE types.
///
/// Fields are appended in the order they appear in the encoding or, for a
/// CHOICE, in the order alternatives are tried when decoding. The builder
/// is consumed by [`build`][Self::build] which checks the declaration as a
/// whole and produces the final, immutable [`Schema`].
///
/// ```
/// use dertree::Schema;
///
/// let schema = Schema::sequence("Version")
///     .field("major", Schema::integer())
///     .default("minor", Schema::integer(), 0i64)
///     .build().unwrap();
/// assert_eq!(schema.to_string(), "Version");
/// ```
#[derive(Clone, Debug)]
pub struct CompositeBuilder {
    name: Arc<str>,
    kind: CompositeKind,
    fields: Vec<PendingField>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum CompositeKind {
    Sequence,
    Set,
    Choice,
}

#[derive(Clone, Debug)]
struct PendingField {
    name: Arc<str>,
    schema: Schema,
    presence: Presence,
    tagging: Option<TagOverride>,
    open: Option<(Arc<str>, Arc<DispatchTable>)>,
}

impl CompositeBuilder {
    pub(super) fn new(name: Arc<str>, kind: CompositeKind) -> Self {
        CompositeBuilder { name, kind, fields: Vec::new() }
    }

    /// Appends a field.
    ///
    /// The `tag_override` is applied to the field on top of any tags the
    /// type of the field already has.
    pub fn define_field(
        mut self,
        name: impl Into<Arc<str>>,
        schema: Schema,
        presence: Presence,
        tag_override: Option<TagOverride>,
    ) -> Self {
        self.fields.push(PendingField {
            name: name.into(),
            schema, presence,
            tagging: tag_override,
            open: None,
        });
        self
    }

    /// Appends a required field or a CHOICE alternative.
    pub fn field(self, name: impl Into<Arc<str>>, schema: Schema) -> Self {
        self.define_field(name, schema, Presence::Required, None)
    }

    /// Appends an OPTIONAL field.
    pub fn optional(self, name: impl Into<Arc<str>>, schema: Schema) -> Self {
        self.define_field(name, schema, Presence::Optional, None)
    }

    /// Appends a field with a DEFAULT value.
    pub fn default(
        self,
        name: impl Into<Arc<str>>,
        schema: Schema,
        value: impl Into<Value>,
    ) -> Self {
        self.define_field(name, schema, Presence::Default(value.into()), None)
    }

    /// Appends a tagged field.
    pub fn tagged(
        self,
        name: impl Into<Arc<str>>,
        schema: Schema,
        tag: TagOverride,
        presence: Presence,
    ) -> Self {
        self.define_field(name, schema, presence, Some(tag))
    }

    /// Appends an open type field.
    ///
    /// The type of the field is determined by looking up the value of the
    /// field named `discriminator` in `table`. The discriminator has to be
    /// an earlier field of type OBJECT IDENTIFIER, INTEGER, or ENUMERATED.
    pub fn defined_by(
        self,
        name: impl Into<Arc<str>>,
        discriminator: impl Into<Arc<str>>,
        table: Arc<DispatchTable>,
        presence: Presence,
    ) -> Self {
        self.define_open(name, discriminator, table, presence, None)
    }

    /// Appends an open type field with an optional tag.
    pub fn define_open(
        mut self,
        name: impl Into<Arc<str>>,
        discriminator: impl Into<Arc<str>>,
        table: Arc<DispatchTable>,
        presence: Presence,
        tag_override: Option<TagOverride>,
    ) -> Self {
        self.fields.push(PendingField {
            name: name.into(),
            schema: Schema::any(),
            presence,
            tagging: tag_override,
            open: Some((discriminator.into(), table)),
        });
        self
    }

    /// Finishes the type.
    pub fn build(self) -> Result<Schema, BuildError> {
        match self.build_fields() {
            Ok(fields) => {
                let kind = match self.kind {
                    CompositeKind::Sequence => Kind::Sequence(fields),
                    CompositeKind::Set => Kind::Set(fields),
                    CompositeKind::Choice => Kind::Choice(fields),
                };
                Ok(Schema::composite(self.name, kind))
            }
            Err(err) => {
                log::debug!("rejected declaration of {}: {}", self.name, err);
                Err(err)
            }
        }
    }

    fn build_fields(&self) -> Result<Vec<Field>, BuildError> {
        if self.kind == CompositeKind::Choice && self.fields.is_empty() {
            return Err(BuildError::EmptyChoice(self.name.to_string()))
        }
        let mut res: Vec<Field> = Vec::with_capacity(self.fields.len());
        for (idx, pending) in self.fields.iter().enumerate() {
            if self.fields[..idx].iter().any(|x| x.name == pending.name) {
                return Err(BuildError::DuplicateField(field_name(pending)))
            }
            self.check_field(pending)?;
            let open = match pending.open {
                Some((ref discriminator, ref table)) => {
                    Some(self.open_type(idx, discriminator, table)?)
                }
                None => None,
            };
            let mut field = Field::new(
                pending.name.clone(), pending.schema.clone(),
                pending.presence.clone(), pending.tagging, open,
            );
            if let Presence::Default(ref value) = pending.presence {
                let encoded = crate::encode::encode_field(
                    &field, value
                ).map_err(|err| {
                    BuildError::InvalidDefault(field_name(pending), err)
                })?;
                field.set_default_encoded(encoded.into());
            }
            res.push(field);
        }
        match self.kind {
            CompositeKind::Choice => Self::check_alternatives(&res)?,
            _ => Self::check_optionals(&res)?,
        }
        Ok(res)
    }

    /// Checks a field on its own.
    fn check_field(&self, pending: &PendingField) -> Result<(), BuildError> {
        if let Some(tagging) = pending.tagging {
            let untagged = pending.open.is_some() || (
                pending.schema.tags().is_empty()
                && pending.schema.is_untagged_kind()
            );
            if untagged && !tagging.is_explicit() {
                return Err(BuildError::ImplicitUntagged(field_name(pending)))
            }
        }
        if self.kind == CompositeKind::Choice {
            if !pending.presence.is_required() {
                return Err(BuildError::InvalidPresence(field_name(pending)))
            }
            if pending.open.is_some() {
                return Err(BuildError::InvalidDiscriminator(
                    field_name(pending)
                ))
            }
        }
        if pending.open.is_some() {
            if let Presence::Default(_) = pending.presence {
                return Err(BuildError::InvalidPresence(field_name(pending)))
            }
        }
        Ok(())
    }

    /// Resolves the discriminator of the open type field at `idx`.
    fn open_type(
        &self,
        idx: usize,
        discriminator: &str,
        table: &Arc<DispatchTable>,
    ) -> Result<OpenType, BuildError> {
        let err = || BuildError::InvalidDiscriminator(
            field_name(&self.fields[idx])
        );
        let pos = self.fields[..idx].iter().position(|x| {
            &*x.name == discriminator
        }).ok_or_else(err)?;
        let target = &self.fields[pos];
        if target.open.is_some() {
            return Err(err())
        }
        let keys = table.key_kinds();
        let fits = match target.schema.kind() {
            Kind::Primitive(PrimitiveKind::Oid) => !keys.int,
            Kind::Primitive(
                PrimitiveKind::Integer | PrimitiveKind::Enumerated
            ) => !keys.oid,
            _ => false
        };
        if !fits {
            return Err(err())
        }
        Ok(OpenType { discriminator: pos, table: table.clone() })
    }

    /// Checks that no two alternatives of a CHOICE can start alike.
    fn check_alternatives(fields: &[Field]) -> Result<(), BuildError> {
        for (idx, first) in fields.iter().enumerate() {
            let tags = first.outer_tags();
            for second in &fields[idx + 1..] {
                if let Some(tag) = tags.common(&second.outer_tags()) {
                    return Err(BuildError::AmbiguousChoice {
                        first: first.name().into(),
                        second: second.name().into(),
                        tag,
                    })
                }
            }
        }
        Ok(())
    }

    /// Checks that leaving out a field can always be detected.
    ///
    /// The tags of an OPTIONAL or DEFAULT field must differ from those of
    /// all following fields up to and including the next required one.
    fn check_optionals(fields: &[Field]) -> Result<(), BuildError> {
        for (idx, field) in fields.iter().enumerate() {
            if field.presence().is_required() {
                continue
            }
            let tags = field.outer_tags();
            for next in &fields[idx + 1..] {
                if let Some(tag) = tags.common(&next.outer_tags()) {
                    return Err(BuildError::AmbiguousOptional {
                        field: field.name().into(),
                        next: next.name().into(),
                        tag,
                    })
                }
                if next.presence().is_required() {
                    break
                }
            }
        }
        Ok(())
    }
}

fn field_name(pending: &PendingField) -> String {
    pending.name.to_string()
}


//------------ BuildError ----------------------------------------------------

/// A type declaration is defective.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("duplicate field '{0}'")]
    DuplicateField(String),

    #[error("choice without alternatives in {0}")]
    EmptyChoice(String),

    #[error("alternatives '{first}' and '{second}' share {}", DisplayTag(.tag))]
    AmbiguousChoice {
        first: String,
        second: String,
        tag: Option<Tag>,
    },

    #[error(
        "absence of field '{field}' indistinguishable from '{next}' ({})",
        DisplayTag(.tag)
    )]
    AmbiguousOptional {
        field: String,
        next: String,
        tag: Option<Tag>,
    },

    #[error("implicit tag on untagged type in field '{0}'")]
    ImplicitUntagged(String),

    #[error("invalid presence for field '{0}'")]
    InvalidPresence(String),

    #[error("invalid discriminator for field '{0}'")]
    InvalidDiscriminator(String),

    #[error("constraint does not apply to type {0}")]
    InapplicableConstraint(String),

    #[error("invalid default value for field '{0}': {1}")]
    InvalidDefault(String, EncodeError),

    #[error("duplicate discriminator {0}")]
    DuplicateDiscriminator(String),

    #[error("invalid discriminator '{0}'")]
    InvalidKey(String),
}

/// Displays an optional tag, `None` meaning any tag.
struct DisplayTag<'a>(&'a Option<Tag>);

impl fmt::Display for DisplayTag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.0 {
            Some(tag) => write!(f, "tag {}", tag),
            None => f.write_str("any tag"),
        }
    }
}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::error::ErrorKind;
    use crate::tag::Tag;
    use super::*;

    fn table() -> Arc<DispatchTable> {
        Arc::new(
            DispatchTable::new()
                .register_oid("1.2.3", "null", Schema::null()).unwrap()
        )
    }

    #[test]
    fn builds_in_order() {
        let schema = Schema::sequence("Test")
            .field("a", Schema::integer())
            .optional("b", Schema::boolean())
            .default("c", Schema::integer(), 3i64)
            .build().unwrap();
        let Kind::Sequence(fields) = schema.kind() else {
            panic!("not a sequence")
        };
        let names: Vec<_> = fields.iter().map(Field::name).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(fields[2].default_encoded(), Some(b"\x02\x01\x03".as_ref()));
    }

    #[test]
    fn duplicate_field() {
        assert_eq!(
            Schema::sequence("Test")
                .field("a", Schema::integer())
                .field("a", Schema::boolean())
                .build().unwrap_err(),
            BuildError::DuplicateField("a".into())
        );
    }

    #[test]
    fn ambiguous_choice() {
        assert_eq!(
            Schema::choice("Test")
                .field("first", Schema::integer())
                .field("second", Schema::integer())
                .build().unwrap_err(),
            BuildError::AmbiguousChoice {
                first: "first".into(),
                second: "second".into(),
                tag: Some(Tag::INTEGER),
            }
        );
        assert!(
            Schema::choice("Test")
                .field("first", Schema::integer())
                .tagged(
                    "second", Schema::integer(), Tag::ctx(0).implicit(),
                    Presence::Required
                )
                .build().is_ok()
        );

        // Nested untagged choices contribute all their tags.
        let inner = Schema::choice("Inner")
            .field("int", Schema::integer())
            .field("bool", Schema::boolean())
            .build().unwrap();
        assert!(matches!(
            Schema::choice("Outer")
                .field("inner", inner)
                .field("flag", Schema::boolean())
                .build(),
            Err(BuildError::AmbiguousChoice { tag: Some(Tag::BOOLEAN), .. })
        ));
        assert!(matches!(
            Schema::choice("Outer")
                .field("any", Schema::any())
                .field("flag", Schema::boolean())
                .build(),
            Err(BuildError::AmbiguousChoice { .. })
        ));
        assert_eq!(
            Schema::choice("Empty").build().unwrap_err(),
            BuildError::EmptyChoice("Empty".into())
        );
    }

    #[test]
    fn ambiguous_optional() {
        assert!(matches!(
            Schema::sequence("Test")
                .optional("a", Schema::integer())
                .field("b", Schema::integer())
                .build(),
            Err(BuildError::AmbiguousOptional { .. })
        ));
        assert!(matches!(
            Schema::sequence("Test")
                .optional("a", Schema::integer())
                .optional("b", Schema::boolean())
                .field("c", Schema::integer())
                .build(),
            Err(BuildError::AmbiguousOptional { .. })
        ));
        // A required field in between stops the check.
        assert!(
            Schema::sequence("Test")
                .optional("a", Schema::integer())
                .field("b", Schema::boolean())
                .field("c", Schema::integer())
                .build().is_ok()
        );
        assert!(
            Schema::sequence("Test")
                .tagged(
                    "a", Schema::integer(), Tag::ctx(0).explicit(),
                    Presence::Optional
                )
                .field("b", Schema::integer())
                .build().is_ok()
        );
    }

    #[test]
    fn implicit_untagged() {
        let choice = Schema::choice("Choice")
            .field("int", Schema::integer())
            .build().unwrap();
        assert_eq!(
            Schema::sequence("Test")
                .tagged(
                    "c", choice.clone(), Tag::ctx(0).implicit(),
                    Presence::Required
                )
                .build().unwrap_err(),
            BuildError::ImplicitUntagged("c".into())
        );
        assert!(
            Schema::sequence("Test")
                .tagged(
                    "c", choice, Tag::ctx(0).explicit(), Presence::Required
                )
                .build().is_ok()
        );
        assert_eq!(
            Schema::sequence("Test")
                .field("id", Schema::oid())
                .define_open(
                    "value", "id", table(), Presence::Required,
                    Some(Tag::ctx(0).implicit())
                )
                .build().unwrap_err(),
            BuildError::ImplicitUntagged("value".into())
        );
    }

    #[test]
    fn discriminators() {
        assert!(
            Schema::sequence("Test")
                .field("id", Schema::oid())
                .defined_by("value", "id", table(), Presence::Optional)
                .build().is_ok()
        );
        // Later field.
        assert_eq!(
            Schema::sequence("Test")
                .defined_by("value", "id", table(), Presence::Optional)
                .field("id", Schema::oid())
                .build().unwrap_err(),
            BuildError::InvalidDiscriminator("value".into())
        );
        // Wrong type.
        assert!(
            Schema::sequence("Test")
                .field("id", Schema::boolean())
                .defined_by("value", "id", table(), Presence::Optional)
                .build().is_err()
        );
        // Table keyed by integers.
        let ints = Arc::new(
            DispatchTable::new()
                .register_int(1, "one", Schema::null()).unwrap()
        );
        assert!(
            Schema::sequence("Test")
                .field("id", Schema::oid())
                .defined_by("value", "id", ints.clone(), Presence::Optional)
                .build().is_err()
        );
        assert!(
            Schema::sequence("Test")
                .field("id", Schema::enumerated())
                .defined_by("value", "id", ints, Presence::Required)
                .build().is_ok()
        );
        // Not in a choice.
        assert!(
            Schema::choice("Test")
                .defined_by("value", "id", table(), Presence::Required)
                .build().is_err()
        );
    }

    #[test]
    fn invalid_default() {
        match Schema::sequence("Test")
            .default("a", Schema::integer(), "zero")
            .build()
        {
            Err(BuildError::InvalidDefault(name, err)) => {
                assert_eq!(name, "a");
                assert!(matches!(err.kind(), ErrorKind::ValueMismatch(_)));
            }
            res => panic!("unexpected result {:?}", res)
        }
        assert!(
            Schema::sequence("Test")
                .default(
                    "a",
                    Schema::integer().with_constraint(
                        crate::schema::Constraint::range(1, 10)
                    ).unwrap(),
                    0i64
                )
                .build().is_err()
        );
    }

    #[test]
    fn inapplicable_constraint() {
        use crate::schema::Constraint;

        assert_eq!(
            Schema::boolean().with_constraint(Constraint::size(1, 2))
                .unwrap_err(),
            BuildError::InapplicableConstraint("BOOLEAN".into())
        );
        assert_eq!(
            Schema::boolean().with_constraint(Constraint::range(0, 0))
                .unwrap_err(),
            BuildError::InapplicableConstraint("BOOLEAN".into())
        );
        assert_eq!(
            Schema::integer().with_constraint(Constraint::size(1, 1))
                .unwrap_err(),
            BuildError::InapplicableConstraint("INTEGER".into())
        );
        assert!(
            Schema::sequence_of(Schema::integer())
                .with_constraint(Constraint::range(0, 1)).is_err()
        );
        assert!(
            Schema::sequence_of(Schema::integer())
                .with_constraint(Constraint::size(1, 1)).is_ok()
        );
        assert!(
            Schema::integer().with_name("Port")
                .with_constraint(Constraint::range(0, 65535)).is_ok()
        );
    }
}
