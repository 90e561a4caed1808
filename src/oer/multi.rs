use crate::context::DecodingContext;
use crate::error::*;
use crate::oer::parser::parse_oer_bitstring_object;
use crate::oer::*;
use nom::combinator::map;
use rusticata_macros::custom_check;
use tracing::debug;

/// Maximum number of optional root fields in a SEQUENCE
pub const MAX_OPTIONAL_FIELDS: usize = 128;

/// Default maximum number of SEQUENCE OF items, when the input is shorter
pub const MAX_SEQUENCE_OF_ITEMS: usize = 65536;

/// Parse a SEQUENCE OF object, given a subparser for the item type
///
/// The content is an occurrence count (a length determinant, read as a number of items
/// rather than a number of octets) followed by the items.
///
/// The count is limited to [`MAX_SEQUENCE_OF_ITEMS`], or to the length of the remaining
/// input if larger. See [`parse_oer_sequence_of_limit_v`] to use another limit.
///
/// ```rust
/// # use oer_parser::oer::{parse_oer_sequence_of_v, parse_oer_u8};
/// # use oer_parser::error::OerResult;
/// #
/// /// Read a SEQUENCE OF INTEGER (0..255)
/// fn parser(i: &[u8]) -> OerResult<Vec<u8>> {
///     parse_oer_sequence_of_v(parse_oer_u8)(i)
/// }
///
/// # let empty = &b""[..];
/// let (rem, v) = parser(&[0x03, 0x01, 0x02, 0x03]).expect("parsing failed");
/// assert_eq!(v, vec![1, 2, 3]);
/// # assert_eq!(rem, empty);
/// ```
pub fn parse_oer_sequence_of_v<'a, T, F>(f: F) -> impl FnMut(&'a [u8]) -> OerResult<'a, Vec<T>>
where
    F: FnMut(&'a [u8]) -> OerResult<'a, T>,
{
    parse_oer_sequence_of_limit_v(MAX_SEQUENCE_OF_ITEMS, f)
}

/// Parse a SEQUENCE OF object, accepting at most `max_items` items
///
/// Items that consume at least one octet are bounded by the input itself, so a count
/// up to the remaining input length is always accepted. Above both limits, the count
/// can only describe zero-width items and is rejected with `TooManyItems`.
pub fn parse_oer_sequence_of_limit_v<'a, T, F>(
    max_items: usize,
    mut f: F,
) -> impl FnMut(&'a [u8]) -> OerResult<'a, Vec<T>>
where
    F: FnMut(&'a [u8]) -> OerResult<'a, T>,
{
    move |i: &'a [u8]| {
        let (mut i, count) = parse_oer_length(i)?;
        custom_check!(
            i,
            count as usize > max_items.max(i.len()),
            OerError::TooManyItems
        )?;
        // the count is read from the input, do not trust it for allocation
        let mut v = Vec::with_capacity((count as usize).min(i.len()));
        for _ in 0..count {
            let (rem, item) = f(i)?;
            v.push(item);
            i = rem;
        }
        Ok((i, v))
    }
}

/// Parse a SEQUENCE OF object, decoding items with the given schema
///
/// The item limit is [`DecodingContext::max_items`].
pub fn parse_oer_sequence_of<'a>(
    i: &'a [u8],
    item: &Schema<'_>,
    ctx: &mut DecodingContext<'_>,
) -> OerResult<'a> {
    let max_items = ctx.max_items();
    map(
        parse_oer_sequence_of_limit_v(max_items, |i| parse_oer_with_schema(i, item, ctx)),
        OerValue::SequenceOf,
    )(i)
}

/// Read the preamble of a SEQUENCE: `bits` flags packed MSB-first
///
/// No octet is read if `bits` is 0.
pub fn parse_oer_preamble(i: &[u8], bits: usize) -> OerResult<BitStringObject> {
    if bits == 0 {
        return Ok((i, BitStringObject::new(0, &[])));
    }
    parse_oer_bitstring_object(i, &SizeBounds::fixed(bits))
}

/// Parse a SEQUENCE object
///
/// The preamble holds the extension bit (if the type is extensible), then one presence
/// bit per optional root field, in declaration order. Absent optional fields are not
/// part of the result.
///
/// Extension additions are wrapped in open types. Additions unknown to the schema are
/// skipped.
pub fn parse_oer_sequence<'a>(
    i: &'a [u8],
    schema: &SequenceSchema<'_>,
    ctx: &mut DecodingContext<'_>,
) -> OerResult<'a> {
    let optional_count = schema.optional_root_count();
    custom_check!(
        i,
        optional_count > MAX_OPTIONAL_FIELDS,
        OerError::TooManyOptionalFields
    )?;
    let ext_bits = if schema.extensible { 1 } else { 0 };
    let (mut i, preamble) = parse_oer_preamble(i, ext_bits + optional_count)?;
    let mut seq = OerSequence::new();
    let mut bit = ext_bits;
    for field in schema.root_fields() {
        if field.is_optional() {
            let present = preamble.is_set(bit);
            bit += 1;
            if !present {
                continue;
            }
        }
        let (rem, value) = parse_oer_with_schema(i, &field.schema, ctx)?;
        seq.push(field.key, value);
        i = rem;
    }
    if schema.extensible && preamble.is_set(0) {
        let (rem, additions) = parse_oer_bitstring_object(i, &NO_BOUND)?;
        i = rem;
        let mut known = schema.additions();
        for idx in 0..additions.bit_len() {
            let field = known.next();
            if !additions.is_set(idx) {
                continue;
            }
            match field {
                Some(field) => {
                    let (rem, value) = parse_oer_open_type_with(|content| {
                        parse_oer_with_schema(content, &field.schema, ctx)
                    })(i)?;
                    seq.push(field.key, value);
                    i = rem;
                }
                None => {
                    let (rem, skipped) = parse_oer_length_prefixed(i)?;
                    debug!(index = idx, len = skipped.len(), "skipping unknown extension addition");
                    i = rem;
                }
            }
        }
    }
    Ok((i, OerValue::Sequence(seq)))
}
