//! A single value on its way to being encoded.
//!
//! This is an internal module.

use std::convert::Infallible;
use crate::error::ErrorKind;
use crate::header::Header;
use crate::mode::Mode;
use crate::captured::Captured;
use crate::decode::SliceSource;
use crate::tag::{Tag, TagOverride, Tagging};
use super::target::Target;


//------------ Tlv -----------------------------------------------------------

/// An encoded value with its header not yet written.
///
/// Encoding happens bottom up: the content of a value is produced first,
/// then tags are applied and finally the header is written once the length
/// is known. Keeping the tag and content apart until then allows implicit
/// tags to replace the tag after the fact.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tlv {
    tag: Tag,
    constructed: bool,
    content: Vec<u8>,
}

impl Tlv {
    /// Creates a primitive value.
    pub fn primitive(tag: Tag, content: Vec<u8>) -> Self {
        Tlv { tag, constructed: false, content }
    }

    /// Creates a constructed value.
    pub fn constructed(tag: Tag, content: Vec<u8>) -> Self {
        Tlv { tag, constructed: true, content }
    }

    /// Splits a captured value back into its parts.
    pub fn from_captured(captured: &Captured) -> Result<Self, ErrorKind> {
        let mut source = SliceSource::new(captured.as_slice());
        let header = Header::take_from(&mut source, Mode::Ber).map_err(|err| {
            err.into_kind()
        })?;
        let content = source.take_slice(header.length()).map_err(|err| {
            err.into_kind()
        })?;
        Ok(Tlv {
            tag: header.tag(),
            constructed: header.is_constructed(),
            content: content.to_vec()
        })
    }

    /// Applies a tag to the value.
    ///
    /// An implicit tag replaces the current tag, an explicit tag wraps the
    /// value into a new constructed value.
    pub fn apply(self, tag: TagOverride) -> Self {
        match tag.tagging() {
            Tagging::Implicit => Tlv { tag: tag.tag(), ..self },
            Tagging::Explicit => {
                let mut content = Vec::with_capacity(self.encoded_len());
                infallible(self.write_encoded(&mut content));
                Tlv::constructed(tag.tag(), content)
            }
        }
    }

    /// Returns the length of the complete encoding.
    pub fn encoded_len(&self) -> usize {
        self.header().total_len()
    }

    /// Writes the complete encoding to a target.
    pub fn write_encoded<T: Target>(
        &self, target: &mut T
    ) -> Result<(), T::Error> {
        self.header().write_encoded(target)?;
        target.write_all(&self.content)
    }

    /// Returns the complete encoding.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut res = Vec::with_capacity(self.encoded_len());
        infallible(self.write_encoded(&mut res));
        res
    }

    fn header(&self) -> Header {
        Header::new(self.tag, self.constructed, self.content.len())
    }
}


//------------ infallible ----------------------------------------------------

/// Erases an error if it can’t happen.
pub fn infallible<T, E: Into<Infallible>>(res: Result<T, E>) -> T {
    match res {
        Ok(some) => some,
        Err(err) => match Into::<Infallible>::into(err) { }
    }
}


//============ Tests =========================================================
