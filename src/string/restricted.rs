//! Restricted character strings.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use crate::tag::Tag;
use super::time;


//------------ StringKind ----------------------------------------------------

/// The kind of a restricted character string.
///
/// ASN.1 defines a number of string types that differ in the characters they
/// allow and how these characters are encoded. Values of all of them are
/// kept as a Rust `String`, the kind determines how that string is turned
/// into content octets and back.
///
/// The two time types are included here, too. They are carried as their
/// textual representation. Besides the character repertoire, the codecs
/// check that the text is a valid time through [`check_syntax`].
///
/// [`check_syntax`]: StringKind::check_syntax
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StringKind {
    /// UTF8String: any Unicode text encoded in UTF-8.
    Utf8,

    /// NumericString: digits and space.
    Numeric,

    /// PrintableString: letters, digits, space, and `'()+,-./:=?`.
    Printable,

    /// TeletexString, mapped one octet per character.
    Teletex,

    /// IA5String: all of ASCII.
    Ia5,

    /// VisibleString: printing ASCII characters and space.
    Visible,

    /// GeneralString, mapped one octet per character.
    General,

    /// UniversalString: Unicode in UTF-32BE.
    Universal,

    /// BMPString: the Basic Multilingual Plane in UTF-16BE.
    Bmp,

    /// UTCTime.
    UtcTime,

    /// GeneralizedTime.
    GeneralizedTime,
}

impl StringKind {
    /// Returns the natural tag of the string kind.
    pub fn tag(self) -> Tag {
        match self {
            StringKind::Utf8 => Tag::UTF8_STRING,
            StringKind::Numeric => Tag::NUMERIC_STRING,
            StringKind::Printable => Tag::PRINTABLE_STRING,
            StringKind::Teletex => Tag::TELETEX_STRING,
            StringKind::Ia5 => Tag::IA5_STRING,
            StringKind::Visible => Tag::VISIBLE_STRING,
            StringKind::General => Tag::GENERAL_STRING,
            StringKind::Universal => Tag::UNIVERSAL_STRING,
            StringKind::Bmp => Tag::BMP_STRING,
            StringKind::UtcTime => Tag::UTC_TIME,
            StringKind::GeneralizedTime => Tag::GENERALIZED_TIME,
        }
    }

    /// Checks that a string is valid for the kind beyond its characters.
    ///
    /// This only does something for the time types. With `strict`, the
    /// stricter form required by DER is enforced.
    pub fn check_syntax(
        self, s: &str, strict: bool
    ) -> Result<(), &'static str> {
        match self {
            StringKind::UtcTime => time::check_utc_time(s, strict),
            StringKind::GeneralizedTime => {
                time::check_generalized_time(s, strict)
            }
            _ => Ok(())
        }
    }

    /// Decodes content octets into a string.
    pub fn decode(self, content: &[u8]) -> Result<String, CharSetError> {
        match self {
            StringKind::Utf8 => {
                String::from_utf8(content.to_vec()).map_err(|_| CharSetError)
            }
            StringKind::Teletex | StringKind::General => {
                Ok(content.iter().map(|&ch| char::from(ch)).collect())
            }
            StringKind::Universal => {
                if content.len() % 4 != 0 {
                    return Err(CharSetError)
                }
                content.chunks_exact(4).map(|chunk| {
                    char::from_u32(u32::from_be_bytes(
                        [chunk[0], chunk[1], chunk[2], chunk[3]]
                    )).ok_or(CharSetError)
                }).collect()
            }
            StringKind::Bmp => {
                if content.len() % 2 != 0 {
                    return Err(CharSetError)
                }
                content.chunks_exact(2).map(|chunk| {
                    char::from_u32(u32::from(
                        u16::from_be_bytes([chunk[0], chunk[1]])
                    )).ok_or(CharSetError)
                }).collect()
            }
            _ => {
                self.check_ascii(content)?;
                // Checked to be ASCII, so this is valid UTF-8.
                String::from_utf8(content.to_vec()).map_err(|_| CharSetError)
            }
        }
    }

    /// Encodes a string into content octets.
    pub fn encode(self, s: &str) -> Result<Vec<u8>, CharSetError> {
        match self {
            StringKind::Utf8 => Ok(s.as_bytes().to_vec()),
            StringKind::Teletex | StringKind::General => {
                s.chars().map(|ch| {
                    u8::try_from(u32::from(ch)).map_err(|_| CharSetError)
                }).collect()
            }
            StringKind::Universal => {
                Ok(s.chars().flat_map(|ch| u32::from(ch).to_be_bytes()).collect())
            }
            StringKind::Bmp => {
                let mut res = Vec::with_capacity(s.len() * 2);
                for ch in s.chars() {
                    let ch = u16::try_from(u32::from(ch))
                        .map_err(|_| CharSetError)?;
                    res.extend_from_slice(&ch.to_be_bytes());
                }
                Ok(res)
            }
            _ => {
                self.check_ascii(s.as_bytes())?;
                Ok(s.as_bytes().to_vec())
            }
        }
    }

    /// Checks an octet sequence against one of the ASCII based sets.
    fn check_ascii(self, slice: &[u8]) -> Result<(), CharSetError> {
        let check: fn(u8) -> bool = match self {
            StringKind::Numeric => |ch| ch.is_ascii_digit() || ch == b' ',
            StringKind::Printable => |ch| {
                ch.is_ascii_alphanumeric() || // A-Z a-z 0-9
                ch == b' ' || ch == b'\'' || ch == b'(' || ch == b')' ||
                ch == b'+' || ch == b',' || ch == b'-' || ch == b'.' ||
                ch == b'/' || ch == b':' || ch == b'=' || ch == b'?'
            },
            StringKind::Ia5 => |ch| ch.is_ascii(),
            StringKind::Visible => |ch| (0x20..0x7f).contains(&ch),
            StringKind::UtcTime | StringKind::GeneralizedTime => |ch| {
                ch.is_ascii_digit() ||
                ch == b'Z' || ch == b'+' || ch == b'-' || ch == b'.'
            },
            _ => |_| true,
        };
        if slice.iter().copied().all(check) {
            Ok(())
        }
        else {
            Err(CharSetError)
        }
    }
}

impl fmt::Display for StringKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.tag(), f)
    }
}


//------------ CharSetError --------------------------------------------------

/// A string contained characters not allowed by its kind.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, thiserror::Error)]
#[error("invalid characters")]
pub struct CharSetError;


//============ Tests =========================================================
