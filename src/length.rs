//! The length octets.
//!
//! This is a private module. The [`Length`] defined herein is re-exported
//! by the parent.

use crate::decode::{DecodeError, SliceSource};
use crate::encode::Target;
use crate::error::ErrorKind;
use crate::mode::Mode;


//------------ Length --------------------------------------------------------

/// The length octets of an encoded value.
///
/// # BER Encoding
///
/// The length can be encoded in one of two basic ways. Which one is used is
/// determined by the most significant bit of the first octet. If it is not
/// set, the length octets is one octet long and the remaining bits of this
/// first octet provide the definite length. Thus, if the first octet is
/// less than 128, it provides the definite length already.
///
/// If the most significant bit is set, the remaining bits of the first
/// octet specify the number of octets that follow to encode the actual
/// length. If they specify that there are zero more octets, i.e., the
/// value of the first octet is 128, the length is indefinite. Otherwise,
/// those following octets give the big-endian encoding of the definite
/// length of the content octets.
///
/// Indefinite lengths are not supported and always rejected. Under DER, a
/// definite length must be encoded in the minimum number of octets.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Length(usize);

impl Length {
    const LEN: usize = 0usize.to_ne_bytes().len();

    /// Creates a new length.
    pub fn new(len: usize) -> Self {
        Length(len)
    }

    /// Returns the length as a `usize`.
    pub fn to_usize(self) -> usize {
        self.0
    }

    /// Parses the length octets from the beginning of a source.
    ///
    /// The length is not checked against the remaining data. This is
    /// left to the caller which will have to take the content anyway.
    pub fn take_from(
        source: &mut SliceSource, mode: Mode
    ) -> Result<Self, DecodeError> {
        let start = *source;
        let first = source.take_u8()?;
        let count = match first {
            n if n & 0x80 == 0 => return Ok(Length(n as usize)),
            0x80 => {
                xerr!(return Err(start.content_err(
                    ErrorKind::malformed("indefinite length not supported")
                )))
            }
            0xFF => {
                xerr!(return Err(start.content_err(
                    ErrorKind::malformed("illegal length octets")
                )))
            }
            n => (n & 0x7F) as usize
        };
        let octets = source.take_slice(count)?;

        // Skip leading zeros. Under DER, there mustn’t be any and the
        // length must need the long form in the first place.
        let start_idx = octets.iter().position(|&x| x != 0);
        if mode.is_restricted() {
            match start_idx {
                Some(0) if count > 1 || octets[0] >= 0x80 => { }
                _ => {
                    xerr!(return Err(start.content_err(
                        ErrorKind::malformed("non-minimal length in DER")
                    )))
                }
            }
        }
        let Some(start_idx) = start_idx else {
            return Ok(Length(0))
        };
        let octets = &octets[start_idx..];
        if octets.len() > Self::LEN {
            xerr!(return Err(start.content_err(
                ErrorKind::malformed("excessive length")
            )))
        }
        let mut res = 0usize;
        for &octet in octets {
            res = (res << 8) | usize::from(octet);
        }
        Ok(Length(res))
    }

    /// Returns the length of the encoded representation of the value.
    pub fn encoded_len(self) -> usize {
        if self.0 > 0x7F {
            Self::LEN - self.encoded_start_idx() + 1
        }
        else {
            1
        }
    }

    /// Appends the encoded length to the end of `target`.
    pub fn append_encoded(self, target: &mut Vec<u8>) {
        if self.0 > 0x7F {
            let idx = self.encoded_start_idx();
            debug_assert!(idx < Self::LEN);

            // LEN will never be greater than 126 bytes. Also, `idx` won’t be
            // greater than LEN, so the subtraction here is fine.
            target.push(((Self::LEN - idx) | 0x80) as u8);
            target.extend_from_slice(&self.0.to_be_bytes()[idx..])
        }
        else {
            target.push(self.0 as u8)
        }
    }

    /// Writes the encoded length to the given target.
    pub fn write_encoded<T: Target>(
        self, target: &mut T
    ) -> Result<(), T::Error> {
        let mut buf = Vec::with_capacity(Self::LEN + 1);
        self.append_encoded(&mut buf);
        target.write_all(&buf)
    }

    /// Returns the index of the first non-zero octet of the length.
    fn encoded_start_idx(self) -> usize {
        (self.0.leading_zeros() / 8) as usize
    }
}

impl From<usize> for Length {
    fn from(len: usize) -> Self {
        Length(len)
    }
}


//============ Tests =========================================================
