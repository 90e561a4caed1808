use crate::error::*;
use nom::bytes::complete::take;
use nom::number::complete::be_u8;
use rusticata_macros::custom_check;
use tracing::trace;

/// Maximum number of octets in a long-form length determinant
pub const MAX_LENGTH_OCTETS: u8 = 4;

/// Read a length determinant (X.696 8.6)
///
/// Short form: one octet, high bit clear, value 0..=127.
/// Long form: first octet `0x80 | n`, followed by `n` octets holding the length as a
/// big-endian unsigned integer. Only `n` in `1..=4` is supported.
///
/// ```rust
/// # use oer_parser::oer::parse_oer_length;
/// let empty = &b""[..];
/// assert_eq!(parse_oer_length(&[0x05]), Ok((empty, 5)));
/// assert_eq!(parse_oer_length(&[0x81, 0xc8]), Ok((empty, 200)));
/// ```
pub fn parse_oer_length(i: &[u8]) -> OerResult<u32> {
    let (rem, b) = be_u8(i)?;
    if b & 0b1000_0000 == 0 {
        trace!(raw = ?&i[..1], length = b, "length determinant");
        return Ok((rem, u32::from(b)));
    }
    let n = b & 0b0111_1111;
    custom_check!(i, n == 0, OerError::InvalidLength)?;
    custom_check!(i, n > MAX_LENGTH_OCTETS, OerError::LengthTooLarge)?;
    let (rem, bytes) = take(n)(rem)?;
    let len = bytes
        .iter()
        .fold(0u32, |acc, &c| (acc << 8) | u32::from(c));
    trace!(raw = ?&i[..=n as usize], length = len, "length determinant");
    Ok((rem, len))
}

/// Read a length determinant, then the content octets it announces
pub fn parse_oer_length_prefixed(i: &[u8]) -> OerResult<&[u8]> {
    let (i, len) = parse_oer_length(i)?;
    take(len as usize)(i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nom::Err;

    #[test]
    fn test_short_form() {
        let empty = &b""[..];
        assert_eq!(parse_oer_length(&[0x00]), Ok((empty, 0)));
        assert_eq!(parse_oer_length(&[0x7f]), Ok((empty, 127)));
    }

    #[test]
    fn test_long_form() {
        let empty = &b""[..];
        assert_eq!(parse_oer_length(&[0x81, 0x80]), Ok((empty, 128)));
        assert_eq!(parse_oer_length(&[0x82, 0x01, 0x00]), Ok((empty, 256)));
        assert_eq!(
            parse_oer_length(&[0x84, 0xff, 0xff, 0xff, 0xff, 0x01]),
            Ok((&[0x01][..], u32::MAX))
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_oer_length(&[]), Err(Err::Error(OerError::TruncatedInput)));
        assert_eq!(
            parse_oer_length(&[0x80]),
            Err(Err::Error(OerError::InvalidLength))
        );
        assert_eq!(
            parse_oer_length(&[0x85, 0, 0, 0, 0, 1]),
            Err(Err::Error(OerError::LengthTooLarge))
        );
        assert_eq!(
            parse_oer_length(&[0x82, 0x01]),
            Err(Err::Error(OerError::TruncatedInput))
        );
    }

    #[test]
    fn test_length_prefixed() {
        let bytes = [0x02, 0xaa, 0xbb, 0xcc];
        assert_eq!(
            parse_oer_length_prefixed(&bytes),
            Ok((&bytes[3..], &bytes[1..3]))
        );
    }
}
