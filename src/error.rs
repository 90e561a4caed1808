//! Error type and result alias for OER parsing

use crate::oer::OerValue;
use nom::error::{ErrorKind, FromExternalError, ParseError};
use nom::IResult;
use thiserror::Error;

/// Holds the result of parsing functions
///
/// `O` is the output type, and defaults to a `OerValue`.
///
/// Note that this type is also a `Result`, so usual functions (`map`, `unwrap` etc.) are available.
///
/// This type is a wrapper around nom's IResult type
pub type OerResult<'a, O = OerValue<'a>> = IResult<&'a [u8], O, OerError>;

/// Error for OER parsing functions
#[derive(Clone, Debug, PartialEq, Error)]
pub enum OerError {
    /// A decode step needs more bytes than remain in the buffer
    #[error("truncated input")]
    TruncatedInput,

    /// Length determinant is malformed (long form with no length octets)
    #[error("invalid length determinant")]
    InvalidLength,
    /// Long-form length determinant uses more than 4 octets
    #[error("length determinant too large")]
    LengthTooLarge,

    /// Integer bounds are not covered by any implemented fixed-width encoding
    #[error("unsupported integer encoding")]
    UnsupportedIntegerEncoding,
    /// Unbounded integer length is 0, or larger than supported
    #[error("malformed integer")]
    MalformedInteger,

    /// Bit string has no unused-bits octet, or the count is larger than 7
    #[error("invalid bit string")]
    InvalidBitString,

    /// Sequence declares more optional fields than the presence bitmap supports
    #[error("too many optional fields")]
    TooManyOptionalFields,
    /// SEQUENCE OF count is larger than both the item limit and the remaining input
    #[error("too many items")]
    TooManyItems,

    /// A self-referential schema recursed past the configured depth
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,

    /// Choice tag number does not fit the engine integer width
    #[error("unsupported choice tag")]
    UnsupportedChoiceTag,

    /// Object identifier content is empty or not terminated
    #[error("invalid object identifier")]
    InvalidOid,

    /// Value does not have the expected type
    #[error("unexpected value type")]
    TypeError,
    /// Integer does not fit in the requested native type
    #[error("integer too large for native type")]
    IntegerTooLarge,

    #[error("nom error: {0:?}")]
    NomError(ErrorKind),
}

impl OerError {
    /// Test if this error reports a limit of this implementation, rather than malformed input
    pub fn is_implementation_limit(&self) -> bool {
        matches!(
            self,
            OerError::LengthTooLarge
                | OerError::UnsupportedIntegerEncoding
                | OerError::MalformedInteger
                | OerError::TooManyOptionalFields
                | OerError::TooManyItems
                | OerError::UnsupportedChoiceTag
        )
    }
}

impl<I> ParseError<I> for OerError {
    fn from_error_kind(_input: I, kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Eof => OerError::TruncatedInput,
            _ => OerError::NomError(kind),
        }
    }
    fn append(_input: I, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<I, E> FromExternalError<I, E> for OerError {
    fn from_external_error(_input: I, kind: ErrorKind, _e: E) -> Self {
        OerError::NomError(kind)
    }
}

/// Convert a nom error into a plain `OerError`
///
/// All parsers in this crate work on complete input, so `Incomplete` is reported as
/// truncated input.
pub(crate) fn flatten_error(e: nom::Err<OerError>) -> OerError {
    match e {
        nom::Err::Error(e) | nom::Err::Failure(e) => e,
        nom::Err::Incomplete(_) => OerError::TruncatedInput,
    }
}
