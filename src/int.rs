//! BER encoded integers.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{cmp, fmt};
use bytes::Bytes;
use crate::error::ErrorKind;
use crate::mode::Mode;


//------------ Integer -------------------------------------------------------

/// A BER encoded integer.
///
/// As integers are variable length in BER, this type is just a simple
/// wrapper atop the underlying `Bytes` value containing the content octets.
/// These are always kept in their minimal form, i.e., the first nine bits
/// of a multi-octet integer are never all the same. This means two integers
/// are equal exactly if their content octets are.
///
/// Conversions from and to Rust’s built-in integer types are available for
/// values that fit.
///
/// # BER Encoding
///
/// In BER, an INTEGER is encoded as a primitive value with the content
/// octets providing a variable-length, big-endian, two‘s complement byte
/// sequence of that integer. Thus, the most-significant bit of the first
/// octet serves as the sign bit.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Integer(Bytes);

impl Integer {
    /// Creates an integer from content octets.
    ///
    /// In DER mode, the content must be in minimal form. In BER mode,
    /// superfluous leading octets are silently dropped.
    pub fn from_content(
        content: &[u8], mode: Mode
    ) -> Result<Self, ErrorKind> {
        if content.is_empty() {
            xerr!(return Err(ErrorKind::malformed("empty integer")))
        }
        let minimal = minimal_start(content);
        if minimal != 0 && mode.is_restricted() {
            xerr!(return Err(ErrorKind::malformed("non-minimal integer")))
        }
        Ok(Integer(Bytes::copy_from_slice(&content[minimal..])))
    }

    /// Returns the content octets.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Returns whether the integer is less than zero.
    pub fn is_negative(&self) -> bool {
        self.0.first().is_some_and(|x| x & 0x80 != 0)
    }

    /// Returns the value as an `i64` if it fits.
    pub fn to_i64(&self) -> Option<i64> {
        self.to_i128().and_then(|x| i64::try_from(x).ok())
    }

    /// Returns the value as an `i128` if it fits.
    pub fn to_i128(&self) -> Option<i128> {
        if self.0.len() > 16 {
            return None
        }
        let mut res: i128 = if self.is_negative() { -1 } else { 0 };
        for &octet in self.0.iter() {
            res = (res << 8) | i128::from(octet);
        }
        Some(res)
    }

    /// Returns the value as a `u64` if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        self.to_i128().and_then(|x| u64::try_from(x).ok())
    }
}

impl From<i128> for Integer {
    fn from(value: i128) -> Self {
        let octets = value.to_be_bytes();
        let start = minimal_start(&octets);
        Integer(Bytes::copy_from_slice(&octets[start..]))
    }
}

macro_rules! from_builtin {
    ( $( $type:ident ),* ) => {
        $(
            impl From<$type> for Integer {
                fn from(value: $type) -> Self {
                    Integer::from(i128::from(value))
                }
            }
        )*
    }
}

from_builtin!(i8, i16, i32, i64, u8, u16, u32, u64);

impl PartialOrd for Integer {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Integer {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        match (self.is_negative(), other.is_negative()) {
            (true, false) => cmp::Ordering::Less,
            (false, true) => cmp::Ordering::Greater,
            (negative, _) => {
                // Same sign: a longer minimal encoding means a larger
                // magnitude. Equal lengths compare octet-wise.
                let res = self.0.len().cmp(&other.0.len()).then_with(|| {
                    self.0.as_ref().cmp(other.0.as_ref())
                });
                match (negative, self.0.len() == other.0.len()) {
                    (true, false) => res.reverse(),
                    _ => res,
                }
            }
        }
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.to_i128() {
            Some(value) => write!(f, "{}", value),
            None => {
                f.write_str("0x")?;
                for octet in self.0.iter() {
                    write!(f, "{:02x}", octet)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Integer({})", self)
    }
}


//------------ Helper Functions ----------------------------------------------

/// Returns the index of the first octet of the minimal encoding.
///
/// A leading octet is superfluous if it and the sign bit of the next octet
/// are all zero or all one.
fn minimal_start(octets: &[u8]) -> usize {
    let mut start = 0;
    while start + 1 < octets.len() {
        match (octets[start], octets[start + 1] & 0x80 != 0) {
            (0x00, false) | (0xFF, true) => start += 1,
            _ => break
        }
    }
    start
}


//============ Tests =========================================================
