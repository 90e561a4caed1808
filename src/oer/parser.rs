use crate::context::DecodingContext;
use crate::error::*;
use crate::oer::integer::{decode_array_int, decode_array_uint};
use crate::oer::*;
use crate::oid::Oid;
use crate::registry::OerRegistry;
use nom::bytes::complete::take;
use nom::combinator::map;
use nom::number::complete::be_u8;
use nom::Err;
use rusticata_macros::custom_check;
use tracing::debug;

/// Read a boolean value
///
/// The encoding is a single octet: zero is FALSE, any other value is TRUE.
#[inline]
pub fn parse_oer_bool(i: &[u8]) -> OerResult {
    map(be_u8, |b| OerValue::Boolean(b != 0))(i)
}

/// Read a null value
///
/// A NULL has no content octets: nothing is consumed.
#[inline]
pub fn parse_oer_null(i: &[u8]) -> OerResult {
    Ok((i, OerValue::Null))
}

/// Read an integer with the given static bounds, returning the native value
///
/// ```rust
/// # use oer_parser::oer::{parse_oer_integer_value, IntegerBounds, OerInteger};
/// let bounds = IntegerBounds::new(0, 65535);
/// let (rem, v) = parse_oer_integer_value(&[0x00, 0x05, 0xff], &bounds).expect("parsing failed");
/// assert_eq!(v, OerInteger::Unsigned { value: 5, width: 2 });
/// assert_eq!(rem, &[0xff]);
/// ```
pub fn parse_oer_integer_value<'a>(i: &'a [u8], bounds: &IntegerBounds) -> OerResult<'a, OerInteger> {
    let encoding = integer_encoding(bounds).map_err(Err::Error)?;
    match encoding {
        IntegerEncoding::Unsigned(width) => {
            let (rem, b) = take(width)(i)?;
            let value = decode_array_uint(b).map_err(Err::Error)?;
            Ok((rem, OerInteger::Unsigned { value, width }))
        }
        IntegerEncoding::Signed(width) => {
            let (rem, b) = take(width)(i)?;
            let value = decode_array_int(b).map_err(Err::Error)?;
            Ok((rem, OerInteger::Signed { value, width }))
        }
        IntegerEncoding::UnboundedUnsigned => parse_unbounded_integer(i, false),
        IntegerEncoding::UnboundedSigned => parse_unbounded_integer(i, true),
    }
}

fn parse_unbounded_integer(i: &[u8], signed: bool) -> OerResult<OerInteger> {
    let (i, len) = parse_oer_length(i)?;
    custom_check!(i, len == 0, OerError::MalformedInteger)?;
    #[cfg(not(feature = "bigint"))]
    custom_check!(i, len > 4, OerError::MalformedInteger)?;
    let (i, bytes) = take(len as usize)(i)?;
    #[cfg(feature = "bigint")]
    {
        if len > 4 {
            use num_bigint::{BigInt, Sign};
            let big = if signed {
                BigInt::from_signed_bytes_be(bytes)
            } else {
                BigInt::from_bytes_be(Sign::Plus, bytes)
            };
            return Ok((i, OerInteger::Big(big)));
        }
    }
    let width = len as u8;
    let value = if signed {
        OerInteger::Signed {
            value: decode_array_int(bytes).map_err(Err::Error)?,
            width,
        }
    } else {
        OerInteger::Unsigned {
            value: decode_array_uint(bytes).map_err(Err::Error)?,
            width,
        }
    };
    Ok((i, value))
}

/// Read an integer with the given static bounds
///
/// ```rust
/// # use oer_parser::oer::{parse_oer_integer, IntegerBounds, OerValue};
/// let empty = &b""[..];
/// let bounds = IntegerBounds::new(0, 255);
/// assert_eq!(
///     parse_oer_integer(&[0x05], &bounds),
///     Ok((empty, OerValue::from_u64(5, 1)))
/// );
/// ```
#[inline]
pub fn parse_oer_integer<'a>(i: &'a [u8], bounds: &IntegerBounds) -> OerResult<'a> {
    map(|i| parse_oer_integer_value(i, bounds), OerValue::Integer)(i)
}

/// Read an `INTEGER (0..255)` as `u8`
#[inline]
pub fn parse_oer_u8(i: &[u8]) -> OerResult<u8> {
    be_u8(i)
}

/// Read an `INTEGER (0..65535)` as `u16`
#[inline]
pub fn parse_oer_u16(i: &[u8]) -> OerResult<u16> {
    nom::number::complete::be_u16(i)
}

/// Read an `INTEGER (0..4294967295)` as `u32`
#[inline]
pub fn parse_oer_u32(i: &[u8]) -> OerResult<u32> {
    nom::number::complete::be_u32(i)
}

/// Read an `INTEGER (0..18446744073709551615)` as `u64`
#[inline]
pub fn parse_oer_u64(i: &[u8]) -> OerResult<u64> {
    nom::number::complete::be_u64(i)
}

/// Read an enumerated value
///
/// The value is always self-delimiting: values 0..=127 use a single octet, other
/// values are `0x80 | n` followed by `n` octets of two's complement. The ordinal is
/// not checked against the known enumerators.
pub fn parse_oer_enum(i: &[u8]) -> OerResult {
    let (rem, b) = be_u8(i)?;
    if b & 0b1000_0000 == 0 {
        return Ok((rem, OerValue::Enumerated(i64::from(b))));
    }
    let n = b & 0b0111_1111;
    custom_check!(i, n == 0, OerError::InvalidLength)?;
    custom_check!(i, n > MAX_LENGTH_OCTETS, OerError::LengthTooLarge)?;
    let (rem, b) = take(n)(rem)?;
    let value = decode_array_int(b).map_err(Err::Error)?;
    Ok((rem, OerValue::Enumerated(value)))
}

/// Read an octet string value
///
/// Fixed-size strings have no length prefix.
pub fn parse_oer_octetstring<'a>(i: &'a [u8], size: &SizeBounds) -> OerResult<'a> {
    match size.fixed_size() {
        Some(n) => map(take(n), OerValue::OctetString)(i),
        None => map(parse_oer_length_prefixed, OerValue::OctetString)(i),
    }
}

/// Read a bit string value
///
/// Fixed-size strings (size in bits) have no length prefix. Otherwise, the length
/// counts the initial octet giving the number of unused bits in the last octet.
/// Unused bits are cleared.
pub fn parse_oer_bitstring<'a>(i: &'a [u8], size: &SizeBounds) -> OerResult<'a> {
    map(|i| parse_oer_bitstring_object(i, size), OerValue::BitString)(i)
}

pub(crate) fn parse_oer_bitstring_object<'a>(
    i: &'a [u8],
    size: &SizeBounds,
) -> OerResult<'a, BitStringObject<'a>> {
    if let Some(bits) = size.fixed_size() {
        let octets = (bits + 7) / 8;
        let unused = (octets * 8 - bits) as u8;
        let (rem, data) = take(octets)(i)?;
        return Ok((rem, BitStringObject::new(unused, data)));
    }
    let (rem, content) = parse_oer_length_prefixed(i)?;
    custom_check!(i, content.is_empty(), OerError::InvalidBitString)?;
    let unused = content[0];
    let data = &content[1..];
    custom_check!(i, unused > 7, OerError::InvalidBitString)?;
    custom_check!(i, data.is_empty() && unused != 0, OerError::InvalidBitString)?;
    Ok((rem, BitStringObject::new(unused, data)))
}

/// Read a restricted character string
///
/// Fixed-size known-multiplier strings have no length prefix. The size is given in
/// characters.
pub fn parse_oer_string<'a>(i: &'a [u8], kind: StringType, size: &SizeBounds) -> OerResult<'a> {
    match (size.fixed_size(), kind.octets_per_char()) {
        (Some(n), Some(k)) => map(take(n * k), |s| OerValue::CharacterString(kind, s))(i),
        _ => map(parse_oer_length_prefixed, |s| {
            OerValue::CharacterString(kind, s)
        })(i),
    }
}

/// Read an object identifier value
///
/// ```rust
/// # use oer_parser::oer::{parse_oer_oid, OerValue};
/// # use oer_parser::oid::Oid;
/// let empty = &b""[..];
/// assert_eq!(
///     parse_oer_oid(&[0x03, 0x55, 0x04, 0x03]),
///     Ok((empty, OerValue::ObjectIdentifier(Oid::from(&[2, 5, 4, 3]))))
/// );
/// ```
pub fn parse_oer_oid(i: &[u8]) -> OerResult {
    let (rem, content) = parse_oer_length_prefixed(i)?;
    let oid = Oid::from_der_content(content).map_err(Err::Error)?;
    Ok((rem, OerValue::ObjectIdentifier(oid)))
}

/// Read a value of a leaf type
pub fn parse_oer_primitive<'a>(i: &'a [u8], primitive: &Primitive) -> OerResult<'a> {
    match primitive {
        Primitive::Boolean => parse_oer_bool(i),
        Primitive::Integer(bounds) => parse_oer_integer(i, bounds),
        Primitive::Enumerated => parse_oer_enum(i),
        Primitive::Null => parse_oer_null(i),
        Primitive::OctetString(size) => parse_oer_octetstring(i, size),
        Primitive::BitString(size) => parse_oer_bitstring(i, size),
        Primitive::CharacterString(kind, size) => parse_oer_string(i, *kind, size),
        Primitive::ObjectIdentifier => parse_oer_oid(i),
    }
}

/// Decode one value, walking the schema recursively
pub fn parse_oer_with_schema<'a>(
    i: &'a [u8],
    schema: &Schema<'_>,
    ctx: &mut DecodingContext<'_>,
) -> OerResult<'a> {
    match schema {
        Schema::Primitive(p) => parse_oer_primitive(i, p),
        Schema::Sequence(seq) => parse_oer_sequence(i, seq, ctx),
        Schema::SequenceOf(item) => parse_oer_sequence_of(i, item, ctx),
        Schema::Choice(choice) => parse_oer_choice(i, choice, ctx),
        Schema::OpenType(open) => parse_oer_open_type_schema(i, open, ctx),
        Schema::Discriminant(inner) => {
            let (rem, value) = parse_oer_with_schema(i, inner, ctx)?;
            match value.as_u64() {
                Ok(key) => ctx.set_discriminant(key),
                Err(_) => {
                    debug!(?value, "discriminant is not a non-negative integer");
                    ctx.clear_discriminant();
                }
            }
            Ok((rem, value))
        }
        Schema::Recursive(r) => {
            let mut guard = ctx.enter(r.weight).map_err(Err::Error)?;
            parse_oer_with_schema(i, (r.resolve)(), &mut guard)
        }
        Schema::Item(f) => f(i, ctx),
    }
}

/// Decode one top-level value from `buffer[offset..]`
///
/// A fresh decoding context is created for this call. Returns the decoded value and
/// the absolute offset following it.
///
/// ```rust
/// # use oer_parser::oer::*;
/// # use oer_parser::parse_oer_at;
/// const ITEM: Schema = Schema::Primitive(Primitive::Integer(IntegerBounds::new(0, 255)));
/// const LIST: Schema = Schema::SequenceOf(&ITEM);
///
/// let (value, offset) = parse_oer_at(&[0x02, 0x00, 0x01], 0, &LIST, None).expect("decoding failed");
/// assert_eq!(offset, 3);
/// assert_eq!(
///     value,
///     OerValue::SequenceOf(vec![OerValue::from_u64(0, 1), OerValue::from_u64(1, 1)])
/// );
/// ```
pub fn parse_oer_at<'a>(
    buffer: &'a [u8],
    offset: usize,
    schema: &Schema<'_>,
    registry: Option<&OerRegistry>,
) -> Result<(OerValue<'a>, usize), OerError> {
    let mut ctx = match registry {
        Some(r) => DecodingContext::with_registry(r),
        None => DecodingContext::new(),
    };
    parse_oer_with_context(buffer, offset, schema, &mut ctx)
}

/// Decode one top-level value from `buffer[offset..]`, using the provided context
pub fn parse_oer_with_context<'a>(
    buffer: &'a [u8],
    offset: usize,
    schema: &Schema<'_>,
    ctx: &mut DecodingContext<'_>,
) -> Result<(OerValue<'a>, usize), OerError> {
    let input = buffer.get(offset..).ok_or(OerError::TruncatedInput)?;
    let (rem, value) = parse_oer_with_schema(input, schema, ctx).map_err(flatten_error)?;
    Ok((value, buffer.len() - rem.len()))
}
