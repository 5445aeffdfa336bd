//! Error Handling.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::fmt;
use crate::error::ErrorKind;


//------------ DecodeError ---------------------------------------------------

/// An error happened while decoding data.
///
/// The error contains the kind of failure as well as the position in the
/// input where it was detected.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{kind} at {pos}")]
pub struct DecodeError {
    kind: ErrorKind,
    pos: Pos,
}

impl DecodeError {
    /// Creates a new error from its kind and position.
    pub fn new(kind: ErrorKind, pos: Pos) -> Self {
        DecodeError { kind, pos }
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the position in the input where the error was detected.
    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// Converts the error into its kind.
    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }
}


//------------ Pos -----------------------------------------------------------

/// The octet offset from the start of the input.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Pos(usize);

impl Pos {
    /// Returns the offset as a number.
    pub fn offset(self) -> usize {
        self.0
    }
}

impl From<usize> for Pos {
    fn from(pos: usize) -> Pos {
        Pos(pos)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "offset {}", self.0)
    }
}
