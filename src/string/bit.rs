//! BER-encoded bit strings.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use crate::error::ErrorKind;
use crate::mode::Mode;


//------------ BitString -----------------------------------------------------

/// A bit string value.
///
/// Bit strings are a sequence of bits. Unlike octet strings, they do not
/// need to contain a multiple of eight bits.
///
/// There are two types of methods for accessing the data in a bit string.
/// Methods starting with `bit` operate on the individual bits while those
/// prefixed with `octet` access entire octets and ignore the fact that there
/// may be unused bits in the final octet.
///
/// # BER Encoding
///
/// Only the primitive encoding is supported. The first octet of the content
/// contains the number of unused bits in the last octet and the following
/// octets contain the bits with the first bit in the most significant bit
/// of the octet. DER additionally requires the unused bits to be zero.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct BitString {
    /// The number of unused bits in the last byte.
    unused: u8,

    /// The bytes of the bit string.
    bits: Bytes,
}

impl BitString {
    /// Creates a new bit string.
    ///
    /// Returns an error if `unused` is larger than seven or not zero for an
    /// empty string. Unused bits in the last octet are cleared.
    pub fn new(unused: u8, bits: impl Into<Bytes>) -> Result<Self, ErrorKind> {
        let bits = bits.into();
        Self::check_unused(unused, &bits)?;
        let mask = Self::unused_mask(unused);
        match bits.last() {
            Some(last) if last & mask != 0 => {
                let mut owned = bits.to_vec();
                if let Some(last) = owned.last_mut() {
                    *last &= !mask;
                }
                Ok(BitString { unused, bits: owned.into() })
            }
            _ => Ok(BitString { unused, bits })
        }
    }

    /// Creates a bit string from whole octets.
    pub fn from_octets(bits: impl Into<Bytes>) -> Self {
        BitString { unused: 0, bits: bits.into() }
    }

    /// Parses the content octets of a bit string value.
    pub fn from_content(
        content: &[u8], mode: Mode
    ) -> Result<Self, ErrorKind> {
        let Some((&unused, bits)) = content.split_first() else {
            xerr!(return Err(ErrorKind::malformed("empty bit string")))
        };
        Self::check_unused(unused, bits)?;
        if mode.is_restricted() {
            if let Some(last) = bits.last() {
                if last & Self::unused_mask(unused) != 0 {
                    xerr!(return Err(ErrorKind::malformed(
                        "non-zero unused bits in DER"
                    )))
                }
            }
        }
        Self::new(unused, Bytes::copy_from_slice(bits))
    }

    /// Returns the value of the given bit.
    pub fn bit(&self, bit: usize) -> bool {
        if bit >= self.bit_len() {
            return false
        }
        let idx = bit >> 3;
        let bit = 7 - (bit as u8 & 7);
        self.bits[idx] & (1 << bit) != 0
    }

    /// Returns the number of bits in the bit string.
    pub fn bit_len(&self) -> usize {
        (self.bits.len() << 3) - (self.unused as usize)
    }

    /// Returns the number of unused bits in the last octet.
    pub fn unused(&self) -> u8 {
        self.unused
    }

    /// Returns the number of octets in the bit string.
    pub fn octet_len(&self) -> usize {
        self.bits.len()
    }

    /// Returns a slice of the octets in the bit string.
    pub fn octet_slice(&self) -> &[u8] {
        self.bits.as_ref()
    }

    /// Returns the length of the content octets.
    pub fn encoded_len(&self) -> usize {
        self.bits.len() + 1
    }

    /// Appends the content octets to `target`.
    pub fn append_content(&self, target: &mut Vec<u8>) {
        target.push(self.unused);
        target.extend_from_slice(self.bits.as_ref());
    }

    fn check_unused(unused: u8, bits: &[u8]) -> Result<(), ErrorKind> {
        if unused > 7 || (bits.is_empty() && unused != 0) {
            xerr!(Err(ErrorKind::malformed("invalid unused bits")))
        }
        else {
            Ok(())
        }
    }

    fn unused_mask(unused: u8) -> u8 {
        ((1u16 << unused) - 1) as u8
    }
}


//============ Tests =========================================================
