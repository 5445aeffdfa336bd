//! ASN.1 Object Identifiers.
//!
//! This module contains the [`Oid`] type that implements object identifiers,
//! a construct used by ASN.1 to uniquely identify all sorts of things. The
//! type is also re-exported at the top-level.
//!
//! The [`RelativeOid`] type holds the trailing components of an identifier
//! relative to some base known from context.

use std::{fmt, str};
use bytes::Bytes;
use smallvec::SmallVec;
use crate::error::ErrorKind;


//------------ Oid -----------------------------------------------------------

/// An object identifier.
///
/// Object identifiers are globally unique, hierarchical values that are used
/// to identify objects or their type. When written, they are presented as a
/// sequence of integers separated by dots such as ‘1.3.6.1.5.5.7.1’.
///
/// Values of this type keep a single object identifier in its BER encoding.
/// Each component, called a sub-identifier, is encoded base 128 with bit 8
/// set in all but its last octet. The first two components are merged into
/// one sub-identifier with the value `40 * X + Y`.
///
/// Since the encoding is unique, two identifiers are equal if their content
/// octets are equal. Dispatch tables use this for their lookups.
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Oid(Bytes);

/// # Decoding and Encoding
///
impl Oid {
    /// Creates an object identifier from its content octets.
    ///
    /// The content must not be empty, every sub-identifier must be encoded
    /// in the fewest possible octets, and the last octet must not have
    /// bit 8 set.
    pub fn from_content(content: &[u8]) -> Result<Self, ErrorKind> {
        Self::check_content(content)?;
        Ok(Oid(Bytes::copy_from_slice(content)))
    }

    /// Creates an object identifier from a static byte slice.
    ///
    /// # Panics
    ///
    /// The function panics if the content is not a valid encoding. It is
    /// intended for defining constants with the octets `mkoid` produces.
    pub fn from_static(content: &'static [u8]) -> Self {
        if Self::check_content(content).is_err() {
            panic!("invalid object identifier content")
        }
        Oid(Bytes::from_static(content))
    }

    /// Creates an object identifier from its components.
    pub fn from_arcs(arcs: &[u64]) -> Result<Self, ParseOidError> {
        let (first, second) = match arcs {
            [first, second, ..] => (*first, *second),
            _ => return Err(ParseOidError::TooShort)
        };
        if first > 2 {
            return Err(ParseOidError::FirstArc)
        }
        if first < 2 && second >= 40 {
            return Err(ParseOidError::SecondArc)
        }
        let merged = second.checked_add(40 * first).ok_or(
            ParseOidError::SecondArc
        )?;
        let mut res = Vec::with_capacity(arcs.len() + 4);
        push_subidentifier(merged, &mut res);
        for &arc in &arcs[2..] {
            push_subidentifier(arc, &mut res);
        }
        Ok(Oid(res.into()))
    }

    /// Returns the content octets.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Returns the components of the identifier.
    ///
    /// Returns `None` if a component does not fit into a `u64`.
    pub fn arcs(&self) -> Option<SmallVec<[u64; 12]>> {
        let mut res = SmallVec::new();
        for (idx, sub) in SubIdentifiers(self.as_slice()).enumerate() {
            let sub = sub?;
            if idx == 0 {
                let first = (sub / 40).min(2);
                res.push(first);
                res.push(sub - 40 * first);
            }
            else {
                res.push(sub);
            }
        }
        Some(res)
    }

    fn check_content(content: &[u8]) -> Result<(), ErrorKind> {
        match content.last() {
            None => {
                xerr!(return Err(ErrorKind::malformed("empty object identifier")))
            }
            Some(last) if last & 0x80 != 0 => {
                xerr!(return Err(ErrorKind::malformed(
                    "object identifier ends inside a sub-identifier"
                )))
            }
            _ => { }
        }
        let mut at_start = true;
        for &octet in content {
            if at_start && octet == 0x80 {
                xerr!(return Err(ErrorKind::malformed(
                    "non-minimal sub-identifier"
                )))
            }
            at_start = octet & 0x80 == 0;
        }
        Ok(())
    }
}


//--- FromStr

impl str::FromStr for Oid {
    type Err = ParseOidError;

    /// Parses an identifier in ‘dot integer’ notation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let arcs = s.split('.').map(|item| {
            item.parse::<u64>().map_err(|_| ParseOidError::Component)
        }).collect::<Result<SmallVec<[u64; 12]>, _>>()?;
        Self::from_arcs(&arcs)
    }
}


//--- AsRef

impl AsRef<[u8]> for Oid {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}


//--- Display and Debug

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.arcs() {
            Some(arcs) => {
                let mut arcs = arcs.into_iter();
                if let Some(first) = arcs.next() {
                    write!(f, "{}", first)?;
                }
                for arc in arcs {
                    write!(f, ".{}", arc)?;
                }
                Ok(())
            }
            // XXX Components beyond u64 are rare enough that we don’t
            //     bother converting them to decimal.
            None => {
                f.write_str("oid:")?;
                for octet in self.0.iter() {
                    write!(f, "{:02x}", octet)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}


//------------ RelativeOid ---------------------------------------------------

/// A relative object identifier.
///
/// The value holds the content octets of a RELATIVE-OID. Unlike in an
/// [`Oid`], every component is encoded as a sub-identifier of its own, so
/// there are no restrictions on the first two components.
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct RelativeOid(Bytes);

impl RelativeOid {
    /// Creates a relative identifier from its content octets.
    ///
    /// The same rules as for [`Oid::from_content`] apply.
    pub fn from_content(content: &[u8]) -> Result<Self, ErrorKind> {
        Oid::check_content(content)?;
        Ok(RelativeOid(Bytes::copy_from_slice(content)))
    }

    /// Creates a relative identifier from its components.
    pub fn from_arcs(arcs: &[u64]) -> Result<Self, ParseOidError> {
        if arcs.is_empty() {
            return Err(ParseOidError::Empty)
        }
        let mut res = Vec::with_capacity(arcs.len() + 4);
        for &arc in arcs {
            push_subidentifier(arc, &mut res);
        }
        Ok(RelativeOid(res.into()))
    }

    /// Returns the content octets.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Returns the components.
    ///
    /// Returns `None` if a component does not fit into a `u64`.
    pub fn arcs(&self) -> Option<SmallVec<[u64; 12]>> {
        SubIdentifiers(self.as_slice()).collect()
    }
}

impl str::FromStr for RelativeOid {
    type Err = ParseOidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let arcs = s.split('.').map(|item| {
            item.parse::<u64>().map_err(|_| ParseOidError::Component)
        }).collect::<Result<SmallVec<[u64; 12]>, _>>()?;
        Self::from_arcs(&arcs)
    }
}

impl AsRef<[u8]> for RelativeOid {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl fmt::Display for RelativeOid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for sub in SubIdentifiers(self.as_slice()) {
            if !first {
                f.write_str(".")?;
            }
            first = false;
            match sub {
                Some(sub) => write!(f, "{}", sub)?,
                None => f.write_str("?")?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for RelativeOid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "RelativeOid({})", self)
    }
}


//------------ SubIdentifiers ------------------------------------------------

/// An iterator over the values of the sub-identifiers.
///
/// Yields `None` for sub-identifiers too large for a `u64`.
struct SubIdentifiers<'a>(&'a [u8]);

impl Iterator for SubIdentifiers<'_> {
    type Item = Option<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0.is_empty() {
            return None
        }
        let end = self.0.iter().position(|x| x & 0x80 == 0)
            .unwrap_or(self.0.len() - 1);
        let (head, tail) = self.0.split_at(end + 1);
        self.0 = tail;
        let mut res = 0u64;
        for &octet in head {
            if res > (u64::MAX >> 7) {
                return Some(None)
            }
            res = (res << 7) | u64::from(octet & 0x7F);
        }
        Some(Some(res))
    }
}

fn push_subidentifier(value: u64, target: &mut Vec<u8>) {
    let bits = (64 - value.leading_zeros() as usize).max(1);
    let digits = bits.div_ceil(7);
    for i in (0..digits).rev() {
        let digit = ((value >> (7 * i)) & 0x7F) as u8;
        target.push(if i == 0 { digit } else { digit | 0x80 });
    }
}


//------------ ParseOidError -------------------------------------------------

/// An object identifier in dotted notation was invalid.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ParseOidError {
    #[error("at least two components required")]
    TooShort,

    #[error("no components given")]
    Empty,

    #[error("only integer components allowed")]
    Component,

    #[error("first component can only be 0, 1, or 2")]
    FirstArc,

    #[error("second component for 0. and 1. must be less than 40")]
    SecondArc,
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use std::str::FromStr;
    use super::*;

    #[test]
    fn parse_and_display() {
        let oid = Oid::from_str("1.2.840.113549.1.1.1").unwrap();
        assert_eq!(
            oid.as_slice(), b"\x2a\x86\x48\x86\xf7\x0d\x01\x01\x01"
        );
        assert_eq!(oid.to_string(), "1.2.840.113549.1.1.1");

        let oid = Oid::from_str("2.999.3").unwrap();
        assert_eq!(oid.as_slice(), b"\x88\x37\x03");
        assert_eq!(oid.to_string(), "2.999.3");

        let oid = Oid::from_str("0.0").unwrap();
        assert_eq!(oid.as_slice(), b"\x00");
        assert_eq!(oid.to_string(), "0.0");
    }

    #[test]
    fn parse_failures() {
        assert_eq!(Oid::from_str("1"), Err(ParseOidError::TooShort));
        assert_eq!(Oid::from_str("1.x.3"), Err(ParseOidError::Component));
        assert_eq!(Oid::from_str("3.1"), Err(ParseOidError::FirstArc));
        assert_eq!(Oid::from_str("1.40"), Err(ParseOidError::SecondArc));
        assert_eq!(Oid::from_str(""), Err(ParseOidError::Component));
    }

    #[test]
    fn content_checks() {
        assert!(Oid::from_content(b"\x2a\x03").is_ok());
        assert!(Oid::from_content(b"").is_err());
        assert!(Oid::from_content(b"\x2a\x86").is_err());
        assert!(Oid::from_content(b"\x2a\x80\x01").is_err());
    }

    #[test]
    fn oversized_component() {
        let oid = Oid::from_content(
            b"\x2a\x82\x80\x80\x80\x80\x80\x80\x80\x80\x00"
        ).unwrap();
        assert_eq!(oid.arcs(), None);
        assert!(oid.to_string().starts_with("oid:"));
    }

    #[test]
    fn relative_oid() {
        let rel = RelativeOid::from_str("8571.3.2").unwrap();
        assert_eq!(rel.as_slice(), b"\xc2\x7b\x03\x02");
        assert_eq!(rel.to_string(), "8571.3.2");
        assert_eq!(rel.arcs().unwrap().as_slice(), &[8571, 3, 2]);

        // No merging of the first two components.
        let rel = RelativeOid::from_arcs(&[1, 2]).unwrap();
        assert_eq!(rel.as_slice(), b"\x01\x02");
        assert_eq!(RelativeOid::from_arcs(&[99]).unwrap().as_slice(), b"\x63");

        assert_eq!(RelativeOid::from_arcs(&[]), Err(ParseOidError::Empty));
        assert_eq!(RelativeOid::from_str("1..2"), Err(ParseOidError::Component));
        assert!(RelativeOid::from_content(b"").is_err());
        assert!(RelativeOid::from_content(b"\x80\x01").is_err());
        assert!(RelativeOid::from_content(b"\x03\x81").is_err());
    }
}
