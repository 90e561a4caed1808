#[macro_use]
extern crate pretty_assertions;

#[macro_use]
extern crate hex_literal;
extern crate nom;
extern crate oer_parser;

use nom::Err;
use oer_parser::error::*;
use oer_parser::oer::*;
use oer_parser::oid::Oid;
use oer_parser::parse_oer_at;
use test_case::test_case;

const U8: Schema = Schema::Primitive(Primitive::Integer(IntegerBounds::new(0, 255)));
const U16: Schema = Schema::Primitive(Primitive::Integer(IntegerBounds::new(0, 65535)));
const NULL: Schema = Schema::Primitive(Primitive::Null);

#[test]
fn test_bounded_integer_end_to_end() {
    assert_eq!(
        parse_oer_at(&[0x05], 0, &U8, None),
        Ok((OerValue::from_u64(5, 1), 1))
    );
}

#[test_case(&hex!("00"), 0 ; "zero")]
#[test_case(&hex!("01"), 1 ; "one")]
#[test_case(&hex!("ff"), 255 ; "max")]
fn test_uint8_width_is_fixed(bytes: &[u8], expected: u64) {
    let mut buffer = bytes.to_vec();
    buffer.extend_from_slice(&hex!("aabb"));
    let (value, offset) = parse_oer_at(&buffer, 0, &U8, None).expect("decoding failed");
    assert_eq!(value.as_u64(), Ok(expected));
    assert_eq!(offset, 1);
}

#[test]
fn test_uint16_width_is_fixed() {
    // small values still take 2 octets
    let (value, offset) = parse_oer_at(&hex!("0001 ff"), 0, &U16, None).expect("decoding failed");
    assert_eq!(value, OerValue::from_u64(1, 2));
    assert_eq!(offset, 2);
}

#[test_case(0 ; "zero")]
#[test_case(5 ; "short")]
#[test_case(127 ; "short max")]
fn test_length_short_form(n: u8) {
    let empty = &b""[..];
    assert_eq!(parse_oer_length(&[n]), Ok((empty, u32::from(n))));
}

#[test_case(128 ; "long min")]
#[test_case(200 ; "long")]
#[test_case(255 ; "long one octet max")]
fn test_length_long_form(n: u8) {
    let empty = &b""[..];
    assert_eq!(parse_oer_length(&[0x81, n]), Ok((empty, u32::from(n))));
}

#[test]
fn test_signed_integers() {
    let i8_bounds = IntegerBounds::new(-128, 127);
    let i32_bounds = IntegerBounds::new(-2_147_483_648, 2_147_483_647);
    let empty = &b""[..];
    assert_eq!(
        parse_oer_integer(&hex!("80"), &i8_bounds),
        Ok((empty, OerValue::from_i64(-128, 1)))
    );
    assert_eq!(
        parse_oer_integer(&hex!("fffffffe"), &i32_bounds),
        Ok((empty, OerValue::from_i64(-2, 4)))
    );
    assert_eq!(
        parse_oer_integer(&hex!("00"), &IntegerBounds::new(-1, 100_000_000_000)),
        Err(Err::Error(OerError::UnsupportedIntegerEncoding))
    );
}

#[test]
fn test_native_integers() {
    let empty = &b""[..];
    assert_eq!(parse_oer_u16(&hex!("0102")), Ok((empty, 0x0102)));
    assert_eq!(parse_oer_u32(&hex!("01020304")), Ok((empty, 0x0102_0304)));
    assert_eq!(
        parse_oer_u64(&hex!("0102030405060708")),
        Ok((empty, 0x0102_0304_0506_0708))
    );
    assert_eq!(parse_oer_u32(&hex!("010203")), Err(Err::Error(OerError::TruncatedInput)));
}

#[test]
fn test_null_consumes_nothing() {
    assert_eq!(parse_oer_at(&[0x00], 0, &NULL, None), Ok((OerValue::Null, 0)));
    assert_eq!(parse_oer_at(&[0x00], 1, &NULL, None), Ok((OerValue::Null, 1)));
}

#[test]
fn test_truncated_input() {
    assert_eq!(parse_oer_at(&[], 0, &U8, None), Err(OerError::TruncatedInput));
    assert_eq!(parse_oer_at(&[0x00], 0, &U16, None), Err(OerError::TruncatedInput));
    let octets = Schema::Primitive(Primitive::OctetString(NO_BOUND));
    assert_eq!(
        parse_oer_at(&hex!("05 0102"), 0, &octets, None),
        Err(OerError::TruncatedInput)
    );
    assert_eq!(parse_oer_at(&[0x05], 2, &U8, None), Err(OerError::TruncatedInput));
}

#[test]
fn test_enumerated_not_range_checked() {
    let schema = Schema::Primitive(Primitive::Enumerated);
    assert_eq!(
        parse_oer_at(&[0x7e], 0, &schema, None),
        Ok((OerValue::Enumerated(126), 1))
    );
    assert_eq!(
        parse_oer_at(&hex!("82 03e8"), 0, &schema, None),
        Ok((OerValue::Enumerated(1000), 3))
    );
}

#[test]
fn test_octetstring_span_borrows_input() {
    let bytes = hex!("03 616263 00");
    let schema = Schema::Primitive(Primitive::OctetString(SizeBounds::new(1, 32)));
    let (value, offset) = parse_oer_at(&bytes, 0, &schema, None).expect("decoding failed");
    assert_eq!(offset, 4);
    let s = value.as_slice().expect("not a string");
    assert_eq!(s, b"abc");
    assert_eq!(s.as_ptr(), bytes[1..].as_ptr());
}

#[test]
fn test_bitstring_padding_is_cleared() {
    let schema = Schema::Primitive(Primitive::BitString(NO_BOUND));
    let (value, offset) = parse_oer_at(&hex!("02 03 ff"), 0, &schema, None).expect("decoding failed");
    assert_eq!(offset, 3);
    let b = value.as_bitstring().expect("not a bitstring");
    assert_eq!(b.bit_len(), 5);
    assert_eq!(b.as_ref(), &[0xf8]);
    assert!(b.is_set(4));
    assert!(!b.is_set(5));
}

#[test]
fn test_character_strings() {
    let ia5 = Schema::Primitive(Primitive::CharacterString(StringType::Ia5String, NO_BOUND));
    let (value, _) = parse_oer_at(b"\x05hello", 0, &ia5, None).expect("decoding failed");
    assert_eq!(value.as_str(), Ok("hello"));

    let fixed = Schema::Primitive(Primitive::CharacterString(
        StringType::PrintableString,
        SizeBounds::fixed(2),
    ));
    let (value, offset) = parse_oer_at(b"FR", 0, &fixed, None).expect("decoding failed");
    assert_eq!(offset, 2);
    assert_eq!(value.as_str(), Ok("FR"));
}

#[test]
fn test_oid() {
    let schema = Schema::Primitive(Primitive::ObjectIdentifier);
    let (value, offset) =
        parse_oer_at(&hex!("06 2a 81 7a 01 10 09"), 0, &schema, None).expect("decoding failed");
    assert_eq!(offset, 7);
    let oid = value.as_oid().expect("not an oid");
    assert_eq!(oid, &Oid::from(&[1, 2, 250, 1, 16, 9]));
    assert_eq!(oid.to_id_string(), "1.2.250.1.16.9");
    assert_eq!(
        parse_oer_at(&hex!("02 2a 81"), 0, &schema, None),
        Err(OerError::InvalidOid)
    );
}

#[test]
fn test_boolean() {
    let schema = Schema::Primitive(Primitive::Boolean);
    let (value, offset) = parse_oer_at(&hex!("00 ff"), 1, &schema, None).expect("decoding failed");
    assert_eq!(value.as_bool(), Ok(true));
    assert_eq!(offset, 2);
}
