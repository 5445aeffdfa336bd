//! The header of an encoded value.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::decode::{DecodeError, SliceSource};
use crate::encode::Target;
use crate::error::ErrorKind;
use crate::length::Length;
use crate::mode::Mode;
use crate::tag::{Class, Tag};


//------------ Header --------------------------------------------------------

/// The identifier and length octets of an encoded value.
///
/// This is pure framing: the header tells the class and number of the tag,
/// whether the content is constructed, and how many content octets follow.
/// It does not interpret the content in any way.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Header {
    tag: Tag,
    constructed: bool,
    length: usize,
    header_len: usize,
}

impl Header {
    /// Creates a header for encoding.
    pub fn new(tag: Tag, constructed: bool, length: usize) -> Self {
        let header_len = tag.encoded_len() + Length::new(length).encoded_len();
        Header { tag, constructed, length, header_len }
    }

    /// Decodes the header at `offset` in `buf`.
    ///
    /// Fails with [`ErrorKind::TruncatedInput`] if either the header itself
    /// or the content it announces does not fit into the buffer.
    pub fn decode(
        buf: &[u8], offset: usize, mode: Mode
    ) -> Result<Self, DecodeError> {
        match buf.get(offset..) {
            Some(data) => {
                Self::peek(&SliceSource::with_pos(data, offset), mode)
            }
            None => {
                xerr!(Err(DecodeError::new(
                    ErrorKind::TruncatedInput, buf.len().into()
                )))
            }
        }
    }

    /// Takes a header from the beginning of a source.
    ///
    /// The source is advanced past the header only. The content is
    /// guaranteed to be available in full.
    pub fn take_from(
        source: &mut SliceSource, mode: Mode
    ) -> Result<Self, DecodeError> {
        let start = *source;
        let (tag, constructed) = Tag::take_from(source)?;
        let length = Length::take_from(source, mode)?.to_usize();
        if length > source.remaining().len() {
            xerr!(return Err(start.content_err(ErrorKind::TruncatedInput)))
        }
        Ok(Header {
            tag, constructed, length,
            header_len: start.remaining().len() - source.remaining().len(),
        })
    }

    /// Decodes the header at the beginning of a source without advancing.
    pub fn peek(
        source: &SliceSource, mode: Mode
    ) -> Result<Self, DecodeError> {
        let mut lookahead = *source;
        Self::take_from(&mut lookahead, mode)
    }

    /// Returns the encoded header for the given values.
    pub fn encode(tag: Tag, constructed: bool, length: usize) -> Vec<u8> {
        let mut res = Vec::with_capacity(8);
        Self::new(tag, constructed, length).append_encoded(&mut res);
        res
    }

    /// Returns the tag.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns the class of the tag.
    pub fn class(&self) -> Class {
        self.tag.class()
    }

    /// Returns whether the content is constructed.
    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    /// Returns the number of content octets.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns the number of octets of the header itself.
    pub fn header_len(&self) -> usize {
        self.header_len
    }

    /// Returns the number of octets of the complete value.
    pub fn total_len(&self) -> usize {
        self.header_len + self.length
    }

    /// Appends the encoded header to `target`.
    pub fn append_encoded(&self, target: &mut Vec<u8>) {
        self.tag.append_encoded(self.constructed, target);
        Length::new(self.length).append_encoded(target);
    }

    /// Writes the encoded header to a target.
    pub fn write_encoded<T: Target>(
        &self, target: &mut T
    ) -> Result<(), T::Error> {
        self.tag.write_encoded(self.constructed, target)?;
        Length::new(self.length).write_encoded(target)
    }
}


//============ Tests =========================================================
