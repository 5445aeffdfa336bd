//! Encoding values of a schema.
//!
//! This is an internal module. The entry points are re-exported by the
//! parent.

use crate::error::ErrorKind;
use crate::schema::{Discriminator, Field, Kind, OpenType, Schema};
use crate::tag::{Tag, TagOverride};
use crate::value::{Fields, Slot, Value};
use super::error::EncodeError;
use super::primitive::encode_content;
use super::tlv::Tlv;


//------------ Entry Points --------------------------------------------------

/// Encodes a value of `schema` in DER.
pub fn encode_value(
    schema: &Schema, value: &Value
) -> Result<Vec<u8>, EncodeError> {
    encode_type(schema, value, None).map(|tlv| tlv.to_vec())
}

/// Encodes the value of a regular field including the field’s tag.
pub fn encode_field(
    field: &Field, value: &Value
) -> Result<Vec<u8>, EncodeError> {
    encode_type(field.schema(), value, field.tagging()).map(|tlv| tlv.to_vec())
}


//------------ Walking the Schema --------------------------------------------

/// Encodes a value of a type with an optional extra tag outside.
fn encode_type(
    schema: &Schema, value: &Value, extra: Option<TagOverride>
) -> Result<Tlv, EncodeError> {
    let mut res = encode_base(schema, value)?;
    for tag in schema.tags().iter().rev() {
        res = res.apply(*tag);
    }
    if let Some(tag) = extra {
        res = res.apply(tag);
    }
    Ok(res)
}

/// Encodes a value of a type without the type’s tags.
fn encode_base(schema: &Schema, value: &Value) -> Result<Tlv, EncodeError> {
    match (schema.kind(), value) {
        (&Kind::Primitive(kind), value) => {
            Ok(Tlv::primitive(kind.tag(), encode_content(kind, schema, value)?))
        }
        (Kind::Sequence(fields), Value::Sequence(values)) => {
            Ok(Tlv::constructed(Tag::SEQUENCE, encode_fields(fields, values)?))
        }
        (Kind::Set(fields), Value::Set(values)) => {
            Ok(Tlv::constructed(Tag::SET, encode_fields(fields, values)?))
        }
        (Kind::Choice(alternatives), Value::Choice(chosen)) => {
            let Some(alt) = alternatives.iter().find(|alt| {
                alt.name() == chosen.name
            }) else {
                xerr!(return Err(ErrorKind::mismatch(format!(
                    "{} has no alternative '{}'", schema, chosen.name
                )).into()))
            };
            encode_type(alt.schema(), &chosen.value, alt.tagging()).map_err(
                |err| err.within(alt.name())
            )
        }
        (Kind::SequenceOf(element), Value::List(items)) => {
            encode_list(schema, element, items, Tag::SEQUENCE)
        }
        (Kind::SetOf(element), Value::List(items)) => {
            encode_list(schema, element, items, Tag::SET)
        }
        (Kind::Containing(inner), value) => {
            let content = encode_type(inner, value, None)?.to_vec();
            Ok(Tlv::primitive(Tag::OCTET_STRING, content))
        }
        (Kind::Any, Value::Any(captured)) => {
            Ok(Tlv::from_captured(captured)?)
        }
        (_, value) => {
            xerr!(Err(ErrorKind::mismatch(format!(
                "expected {}, got {}", schema, value.kind_name()
            )).into()))
        }
    }
}

/// Encodes the content of a SEQUENCE OF or SET OF.
///
/// Elements are encoded in the order given.
fn encode_list(
    schema: &Schema, element: &Schema, items: &[Value], tag: Tag
) -> Result<Tlv, EncodeError> {
    schema.check_size(items.len())?;
    let mut content = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        let tlv = encode_type(element, item, None).map_err(|err| {
            err.within(idx)
        })?;
        content.extend_from_slice(&tlv.to_vec());
    }
    Ok(Tlv::constructed(tag, content))
}

/// Encodes the content of a SEQUENCE or SET.
///
/// Absent fields and fields with their default value are left out.
fn encode_fields(
    fields: &[Field], values: &Fields
) -> Result<Vec<u8>, EncodeError> {
    for (name, slot) in values.iter() {
        if !slot.is_absent() && !fields.iter().any(|x| x.name() == name) {
            xerr!(return Err(
                ErrorKind::mismatch(format!("unknown field '{}'", name)).into()
            ))
        }
    }
    let mut content = Vec::new();
    for field in fields {
        let (value, defaulted) = match *values.slot(field.name()) {
            Slot::Present(ref value) => (value, false),
            Slot::Defaulted(ref value) => (value, true),
            Slot::Absent => {
                if field.presence().is_required() {
                    xerr!(return Err(ErrorKind::MissingRequiredField(
                        field.name().into()
                    ).into()))
                }
                continue
            }
        };
        let tlv = match field.open_type() {
            Some(open) => encode_open(fields, values, field, open, value),
            None => encode_type(field.schema(), value, field.tagging()),
        }.map_err(|err| err.within(field.name()))?;
        let encoded = tlv.to_vec();
        if field.default_encoded() == Some(encoded.as_slice()) {
            log::trace!("{}: leaving out default value", field.name());
            continue
        }
        if defaulted {
            xerr!(return Err(EncodeError::from(ErrorKind::mismatch(
                "defaulted value differs from the default"
            )).within(field.name())))
        }
        content.extend_from_slice(&encoded);
    }
    Ok(content)
}

/// Encodes the value of an open type field.
///
/// The value can be given either as an open value whose label must match
/// the entry selected by the discriminator, as the plain value of that
/// entry’s type, or as a captured value which is used unchanged.
fn encode_open(
    fields: &[Field],
    values: &Fields,
    field: &Field,
    open: &OpenType,
    value: &Value,
) -> Result<Tlv, EncodeError> {
    if let Value::Any(captured) = value {
        let mut res = Tlv::from_captured(captured)?;
        if let Some(tag) = field.tagging() {
            res = res.apply(tag);
        }
        return Ok(res)
    }
    let discriminator = fields.get(open.discriminator()).and_then(|x| {
        values.get(x.name())
    });
    let Some(discriminator) = discriminator else {
        xerr!(return Err(ErrorKind::UnknownOpenTypeDiscriminator(
            "absent".into()
        ).into()))
    };
    let Some(entry) = open.table().resolve_value(discriminator) else {
        xerr!(return Err(ErrorKind::UnknownOpenTypeDiscriminator(
            Discriminator::describe(discriminator)
        ).into()))
    };
    let value = match value {
        Value::Open(open) => {
            if open.label != entry.label() {
                xerr!(return Err(ErrorKind::mismatch(format!(
                    "variant '{}' given but discriminator selects '{}'",
                    open.label, entry.label()
                )).into()))
            }
            &open.value
        }
        other => other
    };
    encode_type(entry.schema(), value, field.tagging())
}


//============ Tests =========================================================
