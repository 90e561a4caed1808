use crate::context::DecodingContext;
use crate::error::*;
use crate::oer::*;
use nom::number::complete::be_u8;
use rusticata_macros::custom_check;
use tracing::debug;

/// Read the tag of a CHOICE value (X.696 8.7)
///
/// The two high-order bits of the first octet hold the class. The six low-order bits
/// hold the tag number, unless they are all set: the number then follows in one or more
/// octets, 7 bits each, high bit set on all octets but the last.
///
/// ```rust
/// # use oer_parser::oer::{parse_oer_tag, OerTag};
/// let empty = &b""[..];
/// assert_eq!(parse_oer_tag(&[0x82]), Ok((empty, OerTag::context(2))));
/// assert_eq!(parse_oer_tag(&[0xbf, 0x81, 0x00]), Ok((empty, OerTag::context(128))));
/// ```
pub fn parse_oer_tag(i: &[u8]) -> OerResult<OerTag> {
    let (mut rem, b) = be_u8(i)?;
    let class = Class::from_tag_octet(b);
    let mut number = u64::from(b & 0b0011_1111);
    if number == 0x3f {
        number = 0;
        loop {
            let (r, c) = be_u8(rem)?;
            rem = r;
            // u64 holds at most 9 groups of 7 bits
            custom_check!(i, number >> 57 != 0, OerError::UnsupportedChoiceTag)?;
            number = (number << 7) | u64::from(c & 0x7f);
            if c & 0x80 == 0 {
                break;
            }
        }
    }
    Ok((rem, OerTag::new(class, number)))
}

/// Parse a CHOICE object
///
/// The tag is matched against the alternatives by number. Extension additions are
/// wrapped in an open type, root alternatives are not.
///
/// An unknown tag is not an error: the value is read as an open type and kept raw, with
/// `name` set to `None`.
pub fn parse_oer_choice<'a>(
    i: &'a [u8],
    schema: &ChoiceSchema<'_>,
    ctx: &mut DecodingContext<'_>,
) -> OerResult<'a> {
    let (i, tag) = parse_oer_tag(i)?;
    let (rem, name, value) = match schema.find(tag.number) {
        Some(alt) if alt.field.is_addition() => {
            let (rem, value) = parse_oer_open_type_with(|content| {
                parse_oer_with_schema(content, &alt.field.schema, ctx)
            })(i)?;
            (rem, Some(alt.field.key), value)
        }
        Some(alt) => {
            let (rem, value) = parse_oer_with_schema(i, &alt.field.schema, ctx)?;
            (rem, Some(alt.field.key), value)
        }
        None => {
            let (rem, value) = parse_oer_open_type(i)?;
            debug!(%tag, "unknown choice alternative, keeping raw content");
            (rem, None, value)
        }
    };
    let choice = OerChoice {
        tag,
        name,
        value: Box::new(value),
    };
    Ok((rem, OerValue::Choice(choice)))
}
