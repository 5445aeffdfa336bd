//! The error taxonomy shared by decoding and encoding.
//!
//! Both [`DecodeError`] and [`EncodeError`] wrap an [`ErrorKind`] and add
//! information on where things went wrong: the input position for the
//! former, the field path for the latter.
//!
//! [`DecodeError`]: crate::decode::DecodeError
//! [`EncodeError`]: crate::encode::EncodeError

use std::borrow::Cow;
use crate::tag::Tag;


//------------ ErrorKind -----------------------------------------------------

/// What went wrong.
///
/// All of these are structural failures. None of them are ever retried
/// internally.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    /// The input ended before a header or its content was complete.
    #[error("unexpected end of data")]
    TruncatedInput,

    /// The octets do not form a valid encoding.
    #[error("malformed encoding: {0}")]
    MalformedEncoding(Cow<'static, str>),

    /// A value is outside the bounds declared for its field.
    #[error("constraint violation: {0}")]
    ConstraintViolation(Cow<'static, str>),

    /// A required field is missing.
    #[error("missing required field '{0}'")]
    MissingRequiredField(String),

    /// A constructed value contains more data than its fields.
    #[error("unexpected trailing data")]
    UnexpectedTrailingData,

    /// None of the alternatives of a CHOICE matches the next value.
    #[error("no matching choice alternative")]
    NoMatchingChoiceAlternative,

    /// The discriminator of an open type is not in its table.
    #[error("unknown open type discriminator {0}")]
    UnknownOpenTypeDiscriminator(String),

    /// A value has a different tag than the one required at its place.
    #[error("expected tag {expected}, found {found}")]
    UnexpectedTag {
        expected: Tag,
        found: Tag,
    },

    /// A value tree does not have the shape its schema requires.
    #[error("value mismatch: {0}")]
    ValueMismatch(Cow<'static, str>),
}

impl ErrorKind {
    /// Creates a malformed encoding error.
    pub fn malformed(msg: impl Into<Cow<'static, str>>) -> Self {
        ErrorKind::MalformedEncoding(msg.into())
    }

    /// Creates a constraint violation error.
    pub fn constraint(msg: impl Into<Cow<'static, str>>) -> Self {
        ErrorKind::ConstraintViolation(msg.into())
    }

    /// Creates a value mismatch error.
    pub fn mismatch(msg: impl Into<Cow<'static, str>>) -> Self {
        ErrorKind::ValueMismatch(msg.into())
    }
}
