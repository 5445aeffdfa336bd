//! Decoding values of a schema.
//!
//! This is a private module. The entry point is re-exported by the parent.

use smallvec::SmallVec;
use crate::captured::Captured;
use crate::error::ErrorKind;
use crate::header::Header;
use crate::mode::Mode;
use crate::schema::{Discriminator, Field, Kind, OpenType, Presence, Schema};
use crate::tag::{Tag, TagOverride, Tagging};
use crate::value::{Fields, Slot, Value};
use super::error::DecodeError;
use super::primitive::{take_content, take_primitive};
use super::source::SliceSource;


//------------ decode_value --------------------------------------------------

/// Decodes one value of `schema` from the start of `data`.
///
/// Returns the value and the number of octets it occupied.
pub fn decode_value(
    mode: Mode, schema: &Schema, data: &[u8]
) -> Result<(Value, usize), DecodeError> {
    let mut source = SliceSource::new(data);
    let value = Decoder { mode }.decode_type(&mut source, None, schema)?;
    Ok((value, data.len() - source.remaining().len()))
}


//------------ Decoder -------------------------------------------------------

/// Walks a schema against encoded data.
///
/// All state lives in the sources passed around, so the decoder itself is
/// just the mode.
#[derive(Clone, Copy, Debug)]
struct Decoder {
    mode: Mode,
}

impl Decoder {
    /// Decodes a value of a type with an optional extra tag.
    ///
    /// The extra tag is the tag of the field the value is decoded for. It
    /// is applied outside of any tags of the type itself.
    fn decode_type(
        self,
        source: &mut SliceSource,
        extra: Option<TagOverride>,
        schema: &Schema,
    ) -> Result<Value, DecodeError> {
        let layers: SmallVec<[TagOverride; 4]> = extra.into_iter().chain(
            schema.tags().iter().copied()
        ).collect();
        self.decode_layers(source, &layers, schema, None)
    }

    /// Unwraps the tags in `layers`, outermost first.
    ///
    /// An implicit tag replaces the tag of whatever comes next, so it is
    /// carried along in `replace` until an explicit tag or the value itself
    /// is reached. Only the outermost of several implicit tags counts.
    fn decode_layers(
        self,
        source: &mut SliceSource,
        layers: &[TagOverride],
        schema: &Schema,
        mut replace: Option<Tag>,
    ) -> Result<Value, DecodeError> {
        for (idx, layer) in layers.iter().enumerate() {
            match layer.tagging() {
                Tagging::Implicit => {
                    replace.get_or_insert(layer.tag());
                }
                Tagging::Explicit => {
                    let tag = replace.unwrap_or(layer.tag());
                    let mut content = self.take_constructed(source, tag)?;
                    let res = self.decode_layers(
                        &mut content, &layers[idx + 1..], schema, None
                    )?;
                    content.exhausted()?;
                    return Ok(res)
                }
            }
        }
        self.decode_base(source, schema, replace)
    }

    /// Decodes a value of a type after all its tags have been processed.
    fn decode_base(
        self,
        source: &mut SliceSource,
        schema: &Schema,
        replace: Option<Tag>,
    ) -> Result<Value, DecodeError> {
        match *schema.kind() {
            Kind::Primitive(kind) => {
                take_primitive(
                    source, kind, schema, replace.unwrap_or(kind.tag()),
                    self.mode
                )
            }
            Kind::Sequence(ref fields) => {
                let mut content = self.take_constructed(
                    source, replace.unwrap_or(Tag::SEQUENCE)
                )?;
                self.decode_fields(&mut content, fields).map(Value::Sequence)
            }
            Kind::Set(ref fields) => {
                let mut content = self.take_constructed(
                    source, replace.unwrap_or(Tag::SET)
                )?;
                self.decode_fields(&mut content, fields).map(Value::Set)
            }
            Kind::SequenceOf(ref element) => {
                self.decode_list(
                    source, schema, element, replace.unwrap_or(Tag::SEQUENCE)
                )
            }
            Kind::SetOf(ref element) => {
                self.decode_list(
                    source, schema, element, replace.unwrap_or(Tag::SET)
                )
            }
            Kind::Containing(ref inner) => {
                let (content, pos) = take_content(
                    source, replace.unwrap_or(Tag::OCTET_STRING),
                    Some(Tag::OCTET_STRING), self.mode
                )?;
                let mut content = SliceSource::with_pos(&content, pos);
                let res = self.decode_type(&mut content, None, inner)?;
                content.exhausted()?;
                Ok(res)
            }
            Kind::Choice(ref alternatives) => {
                if replace.is_some() {
                    xerr!(return Err(source.content_err(
                        ErrorKind::malformed("implicit tag on CHOICE")
                    )))
                }
                self.decode_choice(source, schema, alternatives)
            }
            Kind::Any => {
                if replace.is_some() {
                    xerr!(return Err(source.content_err(
                        ErrorKind::malformed("implicit tag on ANY")
                    )))
                }
                Captured::take_from(source, self.mode).map(Value::Any)
            }
        }
    }

    /// Takes the header of a constructed value and returns its content.
    fn take_constructed<'s>(
        self, source: &mut SliceSource<'s>, tag: Tag
    ) -> Result<SliceSource<'s>, DecodeError> {
        let start = *source;
        let header = Header::take_from(source, self.mode)?;
        if header.tag() != tag {
            xerr!(return Err(start.content_err(ErrorKind::UnexpectedTag {
                expected: tag, found: header.tag()
            })))
        }
        if !header.is_constructed() {
            xerr!(return Err(start.content_err(
                ErrorKind::malformed("expected constructed value")
            )))
        }
        source.take_limited(header.length())
    }

    /// Decodes the fields of a SEQUENCE or SET.
    ///
    /// Fields are decoded in declaration order. The source must be
    /// exhausted afterwards.
    fn decode_fields(
        self, source: &mut SliceSource, fields: &[Field]
    ) -> Result<Fields, DecodeError> {
        let mut res = Fields::with_capacity(fields.len());
        for (idx, field) in fields.iter().enumerate() {
            let slot = match field.open_type() {
                Some(open) => {
                    self.decode_open(source, fields, idx, open, &res)?
                }
                None => self.decode_field(source, field)?,
            };
            res.push(field.name(), slot);
        }
        source.exhausted()?;
        Ok(res)
    }

    /// Decodes a regular field.
    fn decode_field(
        self, source: &mut SliceSource, field: &Field
    ) -> Result<Slot, DecodeError> {
        match source.peek_tag()? {
            Some(tag) if field.matches(tag) => {
                let value = self.decode_type(
                    source, field.tagging(), field.schema()
                )?;
                Ok(Self::check_default(field, value))
            }
            _ => Self::absent(source, field)
        }
    }

    /// Decodes an open type field.
    ///
    /// The discriminator has been decoded already and is in `decoded`.
    fn decode_open(
        self,
        source: &mut SliceSource,
        fields: &[Field],
        idx: usize,
        open: &OpenType,
        decoded: &Fields,
    ) -> Result<Slot, DecodeError> {
        let field = &fields[idx];
        let next = source.peek_tag()?;
        let Some(discriminator) = decoded.slot_at(
            open.discriminator()
        ).value() else {
            if field.presence().is_required() {
                xerr!(return Err(source.content_err(
                    ErrorKind::UnknownOpenTypeDiscriminator("absent".into())
                )))
            }
            log::trace!("{}: absent with its discriminator", field.name());
            return Ok(Slot::Absent)
        };
        match open.table().resolve_value(discriminator) {
            Some(entry) => {
                let matches = match (next, field.tagging()) {
                    (Some(tag), Some(tagging)) => tagging.tag() == tag,
                    (Some(tag), None) => entry.schema().matches(tag),
                    (None, _) => false,
                };
                if !matches {
                    return Self::absent(source, field)
                }
                log::trace!(
                    "{}: open type resolved to {}",
                    field.name(), entry.label()
                );
                let value = self.decode_type(
                    source, field.tagging(), entry.schema()
                )?;
                Ok(Slot::Present(Value::open(entry.label(), value)))
            }
            None => {
                // An unknown discriminator is only acceptable if the
                // field is optional and clearly not there.
                let skip = !field.presence().is_required() && match next {
                    None => true,
                    Some(tag) => fields[idx + 1..].iter().any(|later| {
                        later.open_type().is_none() && later.matches(tag)
                    })
                };
                if skip {
                    log::trace!(
                        "{}: absent with unknown discriminator",
                        field.name()
                    );
                    Ok(Slot::Absent)
                }
                else {
                    xerr!(Err(source.content_err(
                        ErrorKind::UnknownOpenTypeDiscriminator(
                            Discriminator::describe(discriminator)
                        )
                    )))
                }
            }
        }
    }

    /// Decodes a CHOICE by trying its alternatives in order.
    fn decode_choice(
        self,
        source: &mut SliceSource,
        schema: &Schema,
        alternatives: &[Field],
    ) -> Result<Value, DecodeError> {
        let Some(tag) = source.peek_tag()? else {
            xerr!(return Err(source.content_err(ErrorKind::TruncatedInput)))
        };
        for alt in alternatives {
            if alt.matches(tag) {
                log::trace!("{}: chose alternative {}", schema, alt.name());
                let value = self.decode_type(
                    source, alt.tagging(), alt.schema()
                )?;
                return Ok(Value::choice(alt.name(), value))
            }
        }
        xerr!(Err(source.content_err(ErrorKind::NoMatchingChoiceAlternative)))
    }

    /// Decodes a SEQUENCE OF or SET OF.
    fn decode_list(
        self,
        source: &mut SliceSource,
        schema: &Schema,
        element: &Schema,
        tag: Tag,
    ) -> Result<Value, DecodeError> {
        let start = *source;
        let mut content = self.take_constructed(source, tag)?;
        let mut res = Vec::new();
        while !content.is_empty() {
            res.push(self.decode_type(&mut content, None, element)?);
        }
        schema.check_size(res.len()).map_err(|err| start.content_err(err))?;
        Ok(Value::List(res))
    }

    /// Produces the slot for a field that is not in the data.
    fn absent(
        source: &SliceSource, field: &Field
    ) -> Result<Slot, DecodeError> {
        match *field.presence() {
            Presence::Required => {
                xerr!(Err(source.content_err(
                    ErrorKind::MissingRequiredField(field.name().into())
                )))
            }
            Presence::Optional => {
                log::trace!("{}: absent", field.name());
                Ok(Slot::Absent)
            }
            Presence::Default(ref value) => {
                log::trace!("{}: using default", field.name());
                Ok(Slot::Defaulted(value.clone()))
            }
        }
    }

    /// Marks a decoded value equal to the field’s default as defaulted.
    ///
    /// Values are equal if their encodings are.
    fn check_default(field: &Field, value: Value) -> Slot {
        match field.default_encoded() {
            Some(default) => {
                let same = crate::encode::encode_field(field, &value)
                    .is_ok_and(|encoded| encoded == default);
                if same {
                    log::trace!("{}: explicitly encoded default", field.name());
                    Slot::Defaulted(value)
                }
                else {
                    Slot::Present(value)
                }
            }
            None => Slot::Present(value)
        }
    }
}

//============ Tests =========================================================
