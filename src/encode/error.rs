//! Error Handling.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::fmt;
use crate::error::ErrorKind;


//------------ EncodeError ---------------------------------------------------

/// A value could not be encoded.
///
/// The error contains the kind of failure and the path of field names
/// leading to the offending value, e.g., `tbsCertificate.version`.
/// Elements of a SEQUENCE OF or SET OF appear as their index.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{kind}{}", DisplayPath(.path))]
pub struct EncodeError {
    kind: ErrorKind,
    path: String,
}

impl EncodeError {
    /// Creates a new error for the value currently being encoded.
    pub fn new(kind: ErrorKind) -> Self {
        EncodeError { kind, path: String::new() }
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the path to the value that failed to encode.
    ///
    /// The path is empty if the outermost value itself failed.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Converts the error into its kind.
    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    /// Prefixes the path with the name of an enclosing field.
    pub(crate) fn within(mut self, segment: impl fmt::Display) -> Self {
        self.path = if self.path.is_empty() {
            segment.to_string()
        }
        else {
            format!("{}.{}", segment, self.path)
        };
        self
    }
}

impl From<ErrorKind> for EncodeError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

struct DisplayPath<'a>(&'a str);

impl fmt::Display for DisplayPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_empty() {
            Ok(())
        }
        else {
            write!(f, " in {}", self.0)
        }
    }
}


//------------ WriteError ----------------------------------------------------

/// Encoding into a target failed.
#[derive(Debug, thiserror::Error)]
pub enum WriteError<E> {
    /// The value could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The target failed.
    #[error("failed to write encoded data: {0}")]
    Target(E),
}


//============ Tests =========================================================
