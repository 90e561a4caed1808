use crate::error::*;
use crate::oer::IntegerBounds;

/// Wire encoding of an INTEGER, selected from its static bounds
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IntegerEncoding {
    /// Fixed-width unsigned, width in octets
    Unsigned(u8),
    /// Fixed-width two's complement, width in octets
    Signed(u8),
    /// Length-prefixed unsigned
    UnboundedUnsigned,
    /// Length-prefixed two's complement
    UnboundedSigned,
}

const U64_MAX: i128 = u64::MAX as i128;
const U32_MAX: i128 = u32::MAX as i128;

/// Select the encoding of an INTEGER type (X.696 10)
///
/// The width depends only on the bounds, never on the value being decoded.
/// Bound combinations not covered here are rejected with `UnsupportedIntegerEncoding`.
pub fn integer_encoding(bounds: &IntegerBounds) -> Result<IntegerEncoding, OerError> {
    match (bounds.min, bounds.max) {
        (Some(min), Some(max)) if min >= 0 => match max {
            m if m < 0x100 => Ok(IntegerEncoding::Unsigned(1)),
            m if m < 0x1_0000 => Ok(IntegerEncoding::Unsigned(2)),
            U32_MAX => Ok(IntegerEncoding::Unsigned(4)),
            U64_MAX => Ok(IntegerEncoding::Unsigned(8)),
            m if m > U64_MAX => Ok(IntegerEncoding::UnboundedUnsigned),
            _ => Err(OerError::UnsupportedIntegerEncoding),
        },
        (Some(min), None) if min >= 0 => Ok(IntegerEncoding::UnboundedUnsigned),
        (Some(min), Some(max)) => {
            if min >= i128::from(i8::MIN) && max <= i128::from(i8::MAX) {
                Ok(IntegerEncoding::Signed(1))
            } else if min >= i128::from(i16::MIN) && max <= i128::from(i16::MAX) {
                Ok(IntegerEncoding::Signed(2))
            } else if min >= i128::from(i32::MIN) && max <= i128::from(i32::MAX) {
                Ok(IntegerEncoding::Signed(4))
            } else if max > U64_MAX {
                Ok(IntegerEncoding::UnboundedSigned)
            } else {
                Err(OerError::UnsupportedIntegerEncoding)
            }
        }
        (_, _) => Ok(IntegerEncoding::UnboundedSigned),
    }
}

/// Decode big-endian unsigned content octets (at most 8)
pub(crate) fn decode_array_uint(bytes: &[u8]) -> Result<u64, OerError> {
    if bytes.len() > 8 {
        return Err(OerError::IntegerTooLarge);
    }
    // Input may be shorter than 8 octets, so we need to add leading zeroes back
    let mut output = [0u8; 8];
    output[8 - bytes.len()..].copy_from_slice(bytes);
    Ok(u64::from_be_bytes(output))
}

/// Decode two's complement content octets (at most 8), sign-extending from the top bit
pub(crate) fn decode_array_int(input: &[u8]) -> Result<i64, OerError> {
    let i_len = input.len();
    if i_len > 8 {
        return Err(OerError::IntegerTooLarge);
    }
    if i_len == 0 {
        return Ok(0);
    }

    let mut output = [0x00u8; 8];
    output[..i_len].copy_from_slice(input);

    let result = i64::from_be_bytes(output);

    Ok(result.wrapping_shr((8_u32 - (i_len as u32)) << 3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, 255 => Ok(IntegerEncoding::Unsigned(1)) ; "uint8")]
    #[test_case(0, 7 => Ok(IntegerEncoding::Unsigned(1)) ; "uint3")]
    #[test_case(0, 65535 => Ok(IntegerEncoding::Unsigned(2)) ; "uint16")]
    #[test_case(0, 4_294_967_295 => Ok(IntegerEncoding::Unsigned(4)) ; "uint32")]
    #[test_case(0, 18_446_744_073_709_551_615 => Ok(IntegerEncoding::Unsigned(8)) ; "uint64")]
    #[test_case(0, 100_000 => Err(OerError::UnsupportedIntegerEncoding) ; "uncovered unsigned")]
    #[test_case(-128, 127 => Ok(IntegerEncoding::Signed(1)) ; "int8")]
    #[test_case(-1, 1000 => Ok(IntegerEncoding::Signed(2)) ; "int16")]
    #[test_case(-900_000_000, 900_000_000 => Ok(IntegerEncoding::Signed(4)) ; "int32")]
    #[test_case(-1, 4_294_967_296 => Err(OerError::UnsupportedIntegerEncoding) ; "uncovered signed")]
    fn test_bounded_encoding(min: i128, max: i128) -> Result<IntegerEncoding, OerError> {
        integer_encoding(&IntegerBounds::new(min, max))
    }

    #[test]
    fn test_unbounded_encoding() {
        assert_eq!(
            integer_encoding(&IntegerBounds::at_least(0)),
            Ok(IntegerEncoding::UnboundedUnsigned)
        );
        assert_eq!(
            integer_encoding(&IntegerBounds::unbounded()),
            Ok(IntegerEncoding::UnboundedSigned)
        );
        assert_eq!(
            integer_encoding(&IntegerBounds::at_least(-5)),
            Ok(IntegerEncoding::UnboundedSigned)
        );
    }

    #[test]
    fn test_decode_arrays() {
        assert_eq!(decode_array_uint(&[0x01, 0x00, 0x01]), Ok(0x10001));
        assert_eq!(decode_array_uint(&[0xff; 9]), Err(OerError::IntegerTooLarge));
        assert_eq!(decode_array_int(&[0xff]), Ok(-1));
        assert_eq!(decode_array_int(&[0xff, 0x7f]), Ok(-129));
        assert_eq!(decode_array_int(&[0x7f, 0xff]), Ok(32767));
        assert_eq!(decode_array_int(&[0x80, 0, 0, 0, 0, 0, 0, 0]), Ok(i64::MIN));
    }
}
