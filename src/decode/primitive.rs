//! Decoding primitive values.
//!
//! This is a private module. It provides the content decoders used by the
//! structural decoder.

use std::borrow::Cow;
use bytes::Bytes;
use crate::error::ErrorKind;
use crate::header::Header;
use crate::int::Integer;
use crate::mode::Mode;
use crate::oid::{Oid, RelativeOid};
use crate::schema::{PrimitiveKind, Schema};
use crate::string::BitString;
use crate::tag::Tag;
use crate::value::Value;
use super::error::DecodeError;
use super::source::SliceSource;


//------------ take_primitive ------------------------------------------------

/// Takes a value of a primitive type from the source.
///
/// The value must carry `tag` which is either the natural tag of `kind` or
/// an implicit tag replacing it.
pub fn take_primitive(
    source: &mut SliceSource,
    kind: PrimitiveKind,
    schema: &Schema,
    tag: Tag,
    mode: Mode,
) -> Result<Value, DecodeError> {
    let segmented = matches!(
        kind, PrimitiveKind::OctetString | PrimitiveKind::String(_)
    );
    let (content, pos) = take_content(
        source, tag, segmented.then(|| kind.tag()), mode
    )?;
    decode_content(kind, schema, &content, mode).map_err(|kind| {
        DecodeError::new(kind, pos.into())
    })
}

/// Takes the content octets of a primitive value.
///
/// If `segments` is given, the BER constructed form is allowed with the
/// content split into primitive values with the given tag. The content of
/// these segments is concatenated. Only one level of nesting is accepted.
///
/// Returns the content and the position where it starts.
pub fn take_content<'s>(
    source: &mut SliceSource<'s>,
    tag: Tag,
    segments: Option<Tag>,
    mode: Mode,
) -> Result<(Cow<'s, [u8]>, usize), DecodeError> {
    let start = *source;
    let header = Header::take_from(source, mode)?;
    if header.tag() != tag {
        xerr!(return Err(start.content_err(ErrorKind::UnexpectedTag {
            expected: tag, found: header.tag()
        })))
    }
    let pos = source.pos().offset();
    if !header.is_constructed() {
        return Ok((Cow::Borrowed(source.take_slice(header.length())?), pos))
    }
    let segment_tag = match segments {
        Some(segment_tag) if !mode.is_restricted() => segment_tag,
        _ => {
            xerr!(return Err(start.content_err(ErrorKind::malformed(
                "constructed encoding of primitive value"
            ))))
        }
    };
    let mut inner = source.take_limited(header.length())?;
    let mut res = Vec::new();
    while !inner.is_empty() {
        let segment_start = inner;
        let segment = Header::take_from(&mut inner, mode)?;
        if segment.tag() != segment_tag || segment.is_constructed() {
            xerr!(return Err(segment_start.content_err(
                ErrorKind::malformed("invalid segment in constructed string")
            )))
        }
        res.extend_from_slice(inner.take_slice(segment.length())?);
    }
    Ok((Cow::Owned(res), pos))
}


//------------ decode_content ------------------------------------------------

/// Decodes the content octets of a primitive value.
///
/// Checks the constraints of `schema`, too.
pub fn decode_content(
    kind: PrimitiveKind,
    schema: &Schema,
    content: &[u8],
    mode: Mode,
) -> Result<Value, ErrorKind> {
    match kind {
        PrimitiveKind::Boolean => decode_boolean(content, mode),
        PrimitiveKind::Integer | PrimitiveKind::Enumerated => {
            let value = Integer::from_content(content, mode)?;
            schema.check_range(&value)?;
            Ok(Value::Integer(value))
        }
        PrimitiveKind::BitString => {
            let value = BitString::from_content(content, mode)?;
            schema.check_size(value.bit_len())?;
            Ok(Value::BitString(value))
        }
        PrimitiveKind::OctetString => {
            schema.check_size(content.len())?;
            Ok(Value::OctetString(Bytes::copy_from_slice(content)))
        }
        PrimitiveKind::Null => {
            if content.is_empty() {
                Ok(Value::Null)
            }
            else {
                xerr!(Err(ErrorKind::malformed("non-empty NULL")))
            }
        }
        PrimitiveKind::Oid => Oid::from_content(content).map(Value::Oid),
        PrimitiveKind::RelativeOid => {
            RelativeOid::from_content(content).map(Value::RelativeOid)
        }
        PrimitiveKind::String(string) => {
            let value = string.decode(content).map_err(|_| {
                ErrorKind::malformed(format!("invalid {}", string))
            })?;
            string.check_syntax(&value, mode.is_restricted()).map_err(|err| {
                ErrorKind::malformed(format!("invalid {}: {}", string, err))
            })?;
            schema.check_size(value.chars().count())?;
            Ok(Value::Text(value))
        }
    }
}

fn decode_boolean(content: &[u8], mode: Mode) -> Result<Value, ErrorKind> {
    match *content {
        [0] => Ok(Value::Boolean(false)),
        [0xFF] => Ok(Value::Boolean(true)),
        [_] if !mode.is_restricted() => Ok(Value::Boolean(true)),
        [_] => xerr!(Err(ErrorKind::malformed("invalid boolean"))),
        _ => xerr!(Err(ErrorKind::malformed("invalid boolean length")))
    }
}


//============ Tests =========================================================
