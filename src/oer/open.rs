use crate::context::DecodingContext;
use crate::error::*;
use crate::oer::*;
use nom::combinator::{map, map_parser};
use tracing::debug;

/// Read an open type, keeping its content undecoded
///
/// ```rust
/// # use oer_parser::oer::{parse_oer_open_type, OerValue};
/// let (rem, v) = parse_oer_open_type(&[0x02, 0xca, 0xfe, 0x01]).expect("parsing failed");
/// assert_eq!(rem, &[0x01]);
/// assert_eq!(v.as_slice(), Ok(&[0xca, 0xfe][..]));
/// ```
pub fn parse_oer_open_type(i: &[u8]) -> OerResult {
    map(parse_oer_length_prefixed, |data| {
        OerValue::OpenType(OerOpenType::raw(data))
    })(i)
}

/// Read an open type, decoding its content with `f`
///
/// `f` only sees the content octets: it cannot read past the open type, and octets it
/// leaves unread are ignored.
pub fn parse_oer_open_type_with<'a, O, F>(f: F) -> impl FnMut(&'a [u8]) -> OerResult<'a, O>
where
    F: FnMut(&'a [u8]) -> OerResult<'a, O>,
{
    map_parser(parse_oer_length_prefixed, f)
}

/// Parse an open type described by a schema
///
/// The content is decoded with the static decoder if there is one. Otherwise, if the
/// schema is bound to a registry domain, the handler registered for the current
/// discriminant is used. If neither applies, the content is kept raw.
pub fn parse_oer_open_type_schema<'a>(
    i: &'a [u8],
    schema: &OpenTypeSchema,
    ctx: &mut DecodingContext<'_>,
) -> OerResult<'a> {
    let (rem, data) = parse_oer_length_prefixed(i)?;
    let decoded = if let Some(decoder) = schema.decoder {
        Some(decoder(data, ctx)?.1)
    } else {
        match (schema.domain, ctx.discriminant(), ctx.registry()) {
            (Some(domain), Some(key), Some(registry)) => {
                match registry.dispatch_with(domain, key, data, ctx) {
                    Some(res) => Some(res?.1),
                    None => {
                        debug!(%domain, key, "no handler registered, keeping raw content");
                        None
                    }
                }
            }
            _ => None,
        }
    };
    let open = OerOpenType {
        data,
        decoded: decoded.map(Box::new),
    };
    Ok((rem, OerValue::OpenType(open)))
}
