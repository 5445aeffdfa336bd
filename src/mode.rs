//! The decoding modes.
//!
//! Encoding always produces DER. Decoding can be done either strictly, i.e.,
//! insisting on the canonical forms required by DER, or leniently accepting
//! the alternative encodings BER allows. Indefinite length values are not
//! supported in either mode.

use crate::decode::DecodeError;
use crate::schema::Schema;
use crate::value::Value;


//------------ Mode ----------------------------------------------------------

/// The encoding rules used when decoding data.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Mode {
    /// Basic Encoding Rules.
    ///
    /// These are the most flexible rules, allowing alternative encodings
    /// for some types. Non-minimal lengths and integers are accepted and
    /// normalised, any non-zero octet is a true BOOLEAN.
    Ber,

    /// Distinguished Encoding Rules.
    ///
    /// These rules always employ definite length values and require the
    /// shortest possible encoding. Additional rules apply to some types.
    Der,
}

impl Mode {
    /// Returns whether the mode insists on canonical encodings.
    pub fn is_restricted(self) -> bool {
        matches!(self, Mode::Der)
    }

    /// Decodes one value of `schema` from the start of `data`.
    ///
    /// Returns the value together with the number of octets it occupied.
    /// Any data following the value is left alone.
    pub fn decode(
        self, schema: &Schema, data: &[u8]
    ) -> Result<(Value, usize), DecodeError> {
        crate::decode::decode_value(self, schema, data)
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Der
    }
}
