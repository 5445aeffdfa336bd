//! Captured encoded data.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use bytes::Bytes;
use crate::decode::{DecodeError, SliceSource};
use crate::header::Header;
use crate::mode::Mode;
use crate::tag::Tag;


//------------ Captured ------------------------------------------------------

/// A single encoded value kept verbatim.
///
/// This is used for values of fields declared as ANY when there is no
/// further information on how to interpret them. The captured data always
/// consists of exactly one complete value, i.e., header and content.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Captured {
    tag: Tag,
    data: Bytes,
}

impl Captured {
    /// Creates a captured value from encoded data.
    ///
    /// The data must contain exactly one value.
    pub fn from_encoded(
        data: impl Into<Bytes>, mode: Mode
    ) -> Result<Self, DecodeError> {
        let data = data.into();
        let mut source = SliceSource::new(data.as_ref());
        let tag = Self::take_from(&mut source, mode)?.tag;
        source.exhausted()?;
        Ok(Captured { tag, data })
    }

    /// Takes one complete value from the beginning of a source.
    pub fn take_from(
        source: &mut SliceSource, mode: Mode
    ) -> Result<Self, DecodeError> {
        let header = Header::peek(source, mode)?;
        let data = source.take_slice(header.total_len())?;
        Ok(Captured {
            tag: header.tag(),
            data: Bytes::copy_from_slice(data),
        })
    }

    /// Returns the tag of the captured value.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns a bytes slice with the raw data of the captured value.
    pub fn as_slice(&self) -> &[u8] {
        self.data.as_ref()
    }

    /// Converts the captured value into the underlying bytes value.
    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}


//--- AsRef

impl AsRef<[u8]> for Captured {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}


//--- Debug

impl fmt::Debug for Captured {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Captured(")?;
        for octet in self.data.iter() {
            write!(f, "{:02x}", octet)?;
        }
        write!(f, ")")
    }
}


//============ Tests =========================================================
