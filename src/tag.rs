//! The identifier octets of a BER encoded value.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use crate::decode::{DecodeError, SliceSource};
use crate::encode::Target;
use crate::error::ErrorKind;


//------------ Tag -----------------------------------------------------------

/// The tag of a value.
///
/// In ASN.1, tags are used to identify the type of a value. Tags consist of
/// one of four classes, represented by the [`Class`] enum, and a number
/// within this class.
///
/// In BER encoding, the tag becomes part of the identifier octets by
/// combining it with a bit indicating whether a value is primitive or
/// constructed. Tag numbers up to 30 are encoded in the single identifier
/// octet, larger numbers use the high tag number form: the five lower bits
/// of the first octet are all set and the number follows base 128, most
/// significant digit first, with bit 8 set in all octets but the last.
///
/// # Limitations
///
/// We only support tag numbers that fit into a `u32`. This should be more
/// than enough in practice.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Tag {
    class: Class,
    number: u32,
}

impl Tag {
    /// The bit marking the constructed encoding in the first octet.
    const CONSTRUCTED_MASK: u8 = 0x20;

    /// The bits for the tag number in the first octet.
    const SINGLEBYTE_DATA_MASK: u8 = 0x1f;

    /// The largest tag number using the single octet form.
    const MAX_SINGLEBYTE: u32 = 0x1e;

    /// Creates a tag from a class and number.
    pub const fn new(class: Class, number: u32) -> Self {
        Tag { class, number }
    }

    /// Creates a new tag in the universal class with the given number.
    pub const fn universal(number: u32) -> Self {
        Self::new(Class::Universal, number)
    }

    /// Creates a new tag in the application class with the given number.
    pub const fn application(number: u32) -> Self {
        Self::new(Class::Application, number)
    }

    /// Creates a new tag in class “context specific” with the given number.
    pub const fn ctx(number: u32) -> Self {
        Self::new(Class::Context, number)
    }

    /// Creates a new tag in the private class with the given number.
    pub const fn private(number: u32) -> Self {
        Self::new(Class::Private, number)
    }

    /// Returns the class of the tag.
    pub const fn class(self) -> Class {
        self.class
    }

    /// Returns the number of the tag.
    pub const fn number(self) -> u32 {
        self.number
    }

    /// Returns an implicit override using this tag.
    pub const fn implicit(self) -> TagOverride {
        TagOverride::new(self, Tagging::Implicit)
    }

    /// Returns an explicit override using this tag.
    pub const fn explicit(self) -> TagOverride {
        TagOverride::new(self, Tagging::Explicit)
    }
}

/// # Constants for universal tags.
///
/// See clause 8.4 of ITU Recommendation X.690.
///
impl Tag {
    /// The tag for the BOOLEAN type, UNIVERSAL 1.
    pub const BOOLEAN: Self = Self::universal(1);

    /// The tag for the INTEGER type, UNIVERSAL 2.
    pub const INTEGER: Self = Self::universal(2);

    /// The tag for the BIT STRING type, UNIVERSAL 3.
    pub const BIT_STRING: Self = Self::universal(3);

    /// The tag for the OCTET STRING type, UNIVERSAL 4.
    pub const OCTET_STRING: Self = Self::universal(4);

    /// The tag for the NULL type, UNIVERSAL 5.
    pub const NULL: Self = Self::universal(5);

    /// The tag for the OBJECT IDENTIFIER type, UNIVERSAL 6.
    pub const OID: Self = Self::universal(6);

    /// The tag for the ENUMERATED type, UNIVERSAL 10.
    pub const ENUMERATED: Self = Self::universal(10);

    /// The tag for the RELATIVE-OID type, UNIVERSAL 13.
    pub const RELATIVE_OID: Self = Self::universal(13);

    /// The tag for the UTF8String type, UNIVERSAL 12
    pub const UTF8_STRING: Self = Self::universal(12);

    /// The tag for the SEQUENCE and SEQUENCE OF types, UNIVERSAL 16.
    pub const SEQUENCE: Self = Self::universal(16);

    /// The tag for the SET and SET OF types, UNIVERSAL 17.
    pub const SET: Self = Self::universal(17);

    /// The tag for the NumericString type, UNIVERSAL 18.
    pub const NUMERIC_STRING: Self = Self::universal(18);

    /// The tag for the PrintableString type, UNIVERSAL 19.
    pub const PRINTABLE_STRING: Self = Self::universal(19);

    /// The tag for the TeletexString type, UNIVERSAL 20.
    pub const TELETEX_STRING: Self = Self::universal(20);

    /// The tag for the IA5String type, UNIVERSAL 22.
    pub const IA5_STRING: Self = Self::universal(22);

    /// The tag for the UTCTime type, UNIVERSAL 23.
    pub const UTC_TIME: Self = Self::universal(23);

    /// The tag for the GeneralizedType type, UNIVERSAL 24.
    pub const GENERALIZED_TIME: Self = Self::universal(24);

    /// The tag for the VisibleString type, UNIVERSAL 26.
    pub const VISIBLE_STRING: Self = Self::universal(26);

    /// The tag for the GeneralString type, UNIVERSAL 27.
    pub const GENERAL_STRING: Self = Self::universal(27);

    /// The tag for the UniversalString type, UNIVERSAL 28.
    pub const UNIVERSAL_STRING: Self = Self::universal(28);

    /// The tag for the BMPString type, UNIVERSAL 30.
    pub const BMP_STRING: Self = Self::universal(30);
}

/// # Decoding and Encoding
///
impl Tag {
    /// Takes the identifier octets from the beginning of a source.
    ///
    /// Upon success, returns both the tag and whether the value is
    /// constructed. The high tag number form is only accepted for numbers
    /// that need it and without leading zero digits.
    pub fn take_from(
        source: &mut SliceSource
    ) -> Result<(Self, bool), DecodeError> {
        let start = *source;
        let first = source.take_u8()?;
        let class = Class::from_u8(first);
        let constructed = first & Tag::CONSTRUCTED_MASK != 0;
        if first & Tag::SINGLEBYTE_DATA_MASK != Tag::SINGLEBYTE_DATA_MASK {
            return Ok((
                Tag::new(class, u32::from(first & Tag::SINGLEBYTE_DATA_MASK)),
                constructed
            ))
        }

        let mut number = 0u32;
        let mut digits = 0;
        loop {
            let octet = source.take_u8()?;
            if digits == 0 && octet == 0x80 {
                xerr!(return Err(start.content_err(
                    ErrorKind::malformed("leading zero in tag number")
                )))
            }
            if number > (u32::MAX >> 7) {
                xerr!(return Err(start.content_err(
                    ErrorKind::malformed("tag number too large")
                )))
            }
            number = (number << 7) | u32::from(octet & 0x7f);
            digits += 1;
            if octet & 0x80 == 0 {
                break
            }
        }
        if number <= Tag::MAX_SINGLEBYTE {
            xerr!(return Err(start.content_err(
                ErrorKind::malformed("high tag number form for small tag")
            )))
        }
        Ok((Tag::new(class, number), constructed))
    }

    /// Returns the number of octets of the encoded form of the tag.
    pub fn encoded_len(self) -> usize {
        if self.number <= Tag::MAX_SINGLEBYTE {
            1
        }
        else {
            let bits = 32 - self.number.leading_zeros() as usize;
            1 + bits.div_ceil(7)
        }
    }

    /// Appends the identifier octets to the end of `target`.
    ///
    /// If `constructed` is `true`, the encoded tag will signal a value in
    /// constructed encoding and primitive encoding otherwise.
    pub fn append_encoded(self, constructed: bool, target: &mut Vec<u8>) {
        let mut first = self.class.into_u8();
        if constructed {
            first |= Tag::CONSTRUCTED_MASK
        }
        if self.number <= Tag::MAX_SINGLEBYTE {
            target.push(first | self.number as u8);
            return
        }
        target.push(first | Tag::SINGLEBYTE_DATA_MASK);
        let digits = self.encoded_len() - 1;
        for i in (0..digits).rev() {
            let digit = ((self.number >> (7 * i)) & 0x7f) as u8;
            if i == 0 {
                target.push(digit)
            }
            else {
                target.push(digit | 0x80)
            }
        }
    }

    /// Writes the identifier octets to a target.
    pub fn write_encoded<T: Target>(
        self, constructed: bool, target: &mut T
    ) -> Result<(), T::Error> {
        let mut buf = Vec::with_capacity(6);
        self.append_encoded(constructed, &mut buf);
        target.write_all(&buf)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Tag::BOOLEAN => write!(f, "BOOLEAN"),
            Tag::INTEGER => write!(f, "INTEGER"),
            Tag::BIT_STRING => write!(f, "BIT STRING"),
            Tag::OCTET_STRING => write!(f, "OCTET STRING"),
            Tag::NULL => write!(f, "NULL"),
            Tag::OID => write!(f, "OBJECT IDENTIFIER"),
            Tag::ENUMERATED => write!(f, "ENUMERATED"),
            Tag::UTF8_STRING => write!(f, "UTF8String"),
            Tag::SEQUENCE => write!(f, "SEQUENCE"),
            Tag::SET => write!(f, "SET"),
            Tag::NUMERIC_STRING => write!(f, "NumericString"),
            Tag::PRINTABLE_STRING => write!(f, "PrintableString"),
            Tag::TELETEX_STRING => write!(f, "TeletexString"),
            Tag::IA5_STRING => write!(f, "IA5String"),
            Tag::UTC_TIME => write!(f, "UTCTime"),
            Tag::GENERALIZED_TIME => write!(f, "GeneralizedTime"),
            Tag::VISIBLE_STRING => write!(f, "VisibleString"),
            Tag::GENERAL_STRING => write!(f, "GeneralString"),
            Tag::UNIVERSAL_STRING => write!(f, "UniversalString"),
            Tag::BMP_STRING => write!(f, "BMPString"),
            tag => {
                match tag.class() {
                    Class::Universal => write!(f, "[UNIVERSAL ")?,
                    Class::Application => write!(f, "[APPLICATION ")?,
                    Class::Context => write!(f, "[")?,
                    Class::Private => write!(f, "[PRIVATE ")?,
                }
                write!(f, "{}]", tag.number())
            }
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({})", self)
    }
}


//------------ Class ---------------------------------------------------------

/// The class of a tag.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Class {
    Universal,
    Application,
    Context,
    Private,
}

impl Class {
    const fn from_u8(octet: u8) -> Self {
        match octet {
            0x00..=0x3F => Self::Universal,
            0x40..=0x7F => Self::Application,
            0x80..=0xBF => Self::Context,
            0xC0..=0xFF => Self::Private
        }
    }

    const fn into_u8(self) -> u8 {
        match self {
            Self::Universal => 0x00,
            Self::Application => 0x40,
            Self::Context => 0x80,
            Self::Private => 0xC0,
        }
    }
}


//------------ Tagging -------------------------------------------------------

/// How an overriding tag is applied.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Tagging {
    /// The tag replaces the outermost tag of the value.
    Implicit,

    /// The value is wrapped into a constructed value with the tag.
    Explicit,
}


//------------ TagOverride ---------------------------------------------------

/// A tag declared for a type or field in place of its natural tag.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TagOverride {
    tag: Tag,
    tagging: Tagging,
}

impl TagOverride {
    /// The shift of the class in the raw form.
    pub const CLASS_SHIFT: u32 = 30;

    /// The flag marking explicit tagging in the raw form.
    pub const EXPLICIT_FLAG: u32 = 1 << 29;

    /// The mask for the tag number in the raw form.
    pub const NUMBER_MASK: u32 = Self::EXPLICIT_FLAG - 1;

    /// Creates a new override.
    pub const fn new(tag: Tag, tagging: Tagging) -> Self {
        TagOverride { tag, tagging }
    }

    /// Creates an override from its raw integer form.
    ///
    /// The raw form is `(class << CLASS_SHIFT) | flag | number` where the
    /// class is 0 to 3 for universal, application, context specific, and
    /// private and the flag is either `EXPLICIT_FLAG` or zero for implicit
    /// tagging.
    pub const fn from_raw(raw: u32) -> Self {
        let class = match raw >> Self::CLASS_SHIFT {
            0 => Class::Universal,
            1 => Class::Application,
            2 => Class::Context,
            _ => Class::Private,
        };
        let tagging = if raw & Self::EXPLICIT_FLAG != 0 {
            Tagging::Explicit
        }
        else {
            Tagging::Implicit
        };
        TagOverride::new(Tag::new(class, raw & Self::NUMBER_MASK), tagging)
    }

    /// Returns the raw integer form of the override.
    pub const fn to_raw(self) -> u32 {
        let class = match self.tag.class {
            Class::Universal => 0,
            Class::Application => 1,
            Class::Context => 2,
            Class::Private => 3,
        };
        let flag = match self.tagging {
            Tagging::Implicit => 0,
            Tagging::Explicit => Self::EXPLICIT_FLAG,
        };
        (class << Self::CLASS_SHIFT) | flag
            | (self.tag.number & Self::NUMBER_MASK)
    }

    /// Returns the tag.
    pub const fn tag(self) -> Tag {
        self.tag
    }

    /// Returns how the tag is applied.
    pub const fn tagging(self) -> Tagging {
        self.tagging
    }

    /// Returns whether the override is explicit.
    pub const fn is_explicit(self) -> bool {
        matches!(self.tagging, Tagging::Explicit)
    }
}

impl fmt::Display for TagOverride {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.tagging {
            Tagging::Implicit => write!(f, "{} IMPLICIT", self.tag),
            Tagging::Explicit => write!(f, "{} EXPLICIT", self.tag),
        }
    }
}


//============ Tests =========================================================
