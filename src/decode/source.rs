//! The source of octets for decoding.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use crate::error::ErrorKind;
use crate::tag::Tag;
use super::error::{DecodeError, Pos};


//------------ SliceSource ---------------------------------------------------

/// A cursor over a slice of input octets.
///
/// The source keeps track of its absolute position within the original
/// input so errors can point at the offending octet even when the source
/// has been limited to the content of some nested value.
///
/// No method of the source ever reads past the end of the slice. Requests
/// for more octets than are available result in a
/// [`ErrorKind::TruncatedInput`] error.
#[derive(Clone, Copy, Debug)]
pub struct SliceSource<'s> {
    /// The remaining data.
    data: &'s [u8],

    /// The absolute position of the first octet of `data`.
    pos: usize,
}

impl<'s> SliceSource<'s> {
    /// Creates a new source starting at position 0.
    pub fn new(data: &'s [u8]) -> Self {
        Self::with_pos(data, 0)
    }

    /// Creates a new source for data starting at the given position.
    pub fn with_pos(data: &'s [u8], pos: usize) -> Self {
        SliceSource { data, pos }
    }

    /// Returns the position of the next octet.
    pub fn pos(&self) -> Pos {
        self.pos.into()
    }

    /// Returns the remaining data.
    pub fn remaining(&self) -> &'s [u8] {
        self.data
    }

    /// Returns whether all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the n-th octet if that many octets are available.
    pub fn peek_opt_nth(&self, n: usize) -> Option<u8> {
        self.data.get(n).copied()
    }

    /// Returns the n-th octet or a truncation error.
    pub fn peek_nth(&self, n: usize) -> Result<u8, DecodeError> {
        match self.peek_opt_nth(n) {
            Some(value) => Ok(value),
            None => xerr!(Err(self.content_err(ErrorKind::TruncatedInput)))
        }
    }

    /// Takes a single octet from the source.
    pub fn take_u8(&mut self) -> Result<u8, DecodeError> {
        let res = self.peek_nth(0)?;
        self.advance(1);
        Ok(res)
    }

    /// Takes exactly `len` octets from the source.
    pub fn take_slice(&mut self, len: usize) -> Result<&'s [u8], DecodeError> {
        match self.data.split_at_checked(len) {
            Some((head, tail)) => {
                self.data = tail;
                self.pos += len;
                Ok(head)
            }
            None => xerr!(Err(self.content_err(ErrorKind::TruncatedInput)))
        }
    }

    /// Splits off a source for the next `len` octets.
    ///
    /// The returned source covers the next `len` octets and `self` is
    /// advanced past them.
    pub fn take_limited(
        &mut self, len: usize
    ) -> Result<SliceSource<'s>, DecodeError> {
        let pos = self.pos;
        let data = self.take_slice(len)?;
        Ok(SliceSource::with_pos(data, pos))
    }

    /// Peeks at the tag of the next value without consuming anything.
    ///
    /// Returns `Ok(None)` if the source is exhausted.
    pub fn peek_tag(&self) -> Result<Option<Tag>, DecodeError> {
        if self.is_empty() {
            return Ok(None)
        }
        let mut lookahead = *self;
        Tag::take_from(&mut lookahead).map(|(tag, _)| Some(tag))
    }

    /// Checks that the source has been consumed completely.
    pub fn exhausted(&self) -> Result<(), DecodeError> {
        if self.is_empty() {
            Ok(())
        }
        else {
            xerr!(Err(self.content_err(ErrorKind::UnexpectedTrailingData)))
        }
    }

    /// Returns an error at the current position of the source.
    pub fn content_err(&self, kind: ErrorKind) -> DecodeError {
        DecodeError::new(kind, self.pos())
    }

    fn advance(&mut self, len: usize) {
        let len = len.min(self.data.len());
        self.data = &self.data[len..];
        self.pos += len;
    }
}


//============ Tests =========================================================
