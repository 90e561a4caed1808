#[macro_use]
extern crate pretty_assertions;

#[macro_use]
extern crate hex_literal;
extern crate oer_parser;

use oer_parser::context::DecodingContext;
use oer_parser::error::*;
use oer_parser::oer::*;
use oer_parser::registry::{DomainId, OerRegistry};
use oer_parser::parse_oer_at;
use std::sync::Arc;
use std::thread;

const PAYLOAD: DomainId = DomainId("test.payload");
const PERMISSIONS: DomainId = DomainId("test.permissions");

const PSID: Schema = Schema::Primitive(Primitive::Integer(IntegerBounds::at_least(0)));
const SIGNED: Schema = Schema::Primitive(Primitive::Integer(IntegerBounds::unbounded()));
const U16: Schema = Schema::Primitive(Primitive::Integer(IntegerBounds::new(0, 65535)));

fn decode_position<'a>(i: &'a [u8], ctx: &mut DecodingContext<'_>) -> OerResult<'a> {
    static FIELDS: [FieldDescriptor; 2] = [
        FieldDescriptor::required("lat", U16),
        FieldDescriptor::required("lon", U16),
    ];
    parse_oer_sequence(i, &SequenceSchema::new(&FIELDS), ctx)
}

fn decode_flag<'a>(i: &'a [u8], _ctx: &mut DecodingContext<'_>) -> OerResult<'a> {
    parse_oer_bool(i)
}

fn build_registry() -> OerRegistry {
    let mut registry = OerRegistry::new();
    registry.register(PAYLOAD, 0x20, decode_position);
    registry.register(PERMISSIONS, 0x20, decode_flag);
    registry
}

// Message ::= SEQUENCE { psid Psid, data OpenType }
static MESSAGE_FIELDS: [FieldDescriptor; 2] = [
    FieldDescriptor::required("psid", Schema::Discriminant(&PSID)),
    FieldDescriptor::required(
        "data",
        Schema::OpenType(OpenTypeSchema::dispatched(PAYLOAD)),
    ),
];
static MESSAGE: Schema = Schema::Sequence(SequenceSchema::new(&MESSAGE_FIELDS));

// Reversed ::= SEQUENCE { data OpenType, psid Psid }
static REVERSED_FIELDS: [FieldDescriptor; 2] = [
    FieldDescriptor::required("data", Schema::OpenType(OpenTypeSchema::raw())),
    FieldDescriptor::required("psid", Schema::Discriminant(&PSID)),
];
static REVERSED: Schema = Schema::Sequence(SequenceSchema::new(&REVERSED_FIELDS));

#[test]
fn test_discriminant_before_payload() {
    let registry = build_registry();
    let bytes = hex!("01 20  04 0102 0304");
    let (value, offset) = parse_oer_at(&bytes, 0, &MESSAGE, Some(&registry)).expect("decoding failed");
    assert_eq!(offset, bytes.len());
    let msg = value.as_sequence().expect("not a sequence");
    let data = msg["data"].as_open_type().expect("not an open type");
    assert!(data.is_decoded());
    let position = msg["data"].innermost().as_sequence().expect("not a sequence");
    assert_eq!(position["lat"].as_u64(), Ok(0x0102));
    assert_eq!(position["lon"].as_u64(), Ok(0x0304));
}

#[test]
fn test_without_registry_payload_is_raw() {
    let bytes = hex!("01 20  04 0102 0304");
    let (value, _) = parse_oer_at(&bytes, 0, &MESSAGE, None).expect("decoding failed");
    let msg = value.as_sequence().expect("not a sequence");
    assert_eq!(msg["data"].as_slice(), Ok(&hex!("01020304")[..]));
}

#[test]
fn test_unknown_discriminant_is_not_an_error() {
    let registry = build_registry();
    let bytes = hex!("02 0123  01 ff");
    let (value, offset) = parse_oer_at(&bytes, 0, &MESSAGE, Some(&registry)).expect("decoding failed");
    assert_eq!(offset, bytes.len());
    let msg = value.as_sequence().expect("not a sequence");
    assert_eq!(msg["psid"].as_u64(), Ok(0x0123));
    assert!(!msg["data"].as_open_type().expect("not an open type").is_decoded());
}

// Rekeyed ::= SEQUENCE { psid Psid, key INTEGER, data OpenType }
static REKEYED_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor::required("psid", Schema::Discriminant(&PSID)),
    FieldDescriptor::required("key", Schema::Discriminant(&SIGNED)),
    FieldDescriptor::required(
        "data",
        Schema::OpenType(OpenTypeSchema::dispatched(PAYLOAD)),
    ),
];
static REKEYED: Schema = Schema::Sequence(SequenceSchema::new(&REKEYED_FIELDS));

#[test]
fn test_negative_discriminant_clears_previous_key() {
    let registry = build_registry();
    // psid 0x20 has a handler, but the negative key replaces it
    let bytes = hex!("01 20  01 ff  04 0102 0304");
    let (value, offset) = parse_oer_at(&bytes, 0, &REKEYED, Some(&registry)).expect("decoding failed");
    assert_eq!(offset, bytes.len());
    let msg = value.as_sequence().expect("not a sequence");
    assert_eq!(msg["key"].as_u64(), Err(OerError::IntegerTooLarge));
    assert!(!msg["data"].as_open_type().expect("not an open type").is_decoded());
}

#[test]
fn test_handler_failure_aborts_decode() {
    let registry = build_registry();
    // position needs 4 octets
    let bytes = hex!("01 20  02 0102");
    assert_eq!(
        parse_oer_at(&bytes, 0, &MESSAGE, Some(&registry)),
        Err(OerError::TruncatedInput)
    );
}

#[test]
fn test_retry_dispatch_after_discriminant() {
    let registry = build_registry();
    let bytes = hex!("04 0102 0304  01 20");
    let (value, _) = parse_oer_at(&bytes, 0, &REVERSED, Some(&registry)).expect("decoding failed");
    let msg = value.as_sequence().expect("not a sequence");
    let psid = msg["psid"].as_u64().expect("psid is not an integer");
    let data = msg["data"].as_slice().expect("data is not raw");

    // the caller knows the discriminant now, and dispatches the raw content again
    let (position, offset) = registry
        .dispatch(PAYLOAD, psid, data, 0)
        .expect("decoding failed")
        .expect("no handler");
    assert_eq!(offset, 4);
    assert_eq!(position.as_sequence().map(|s| s.len()), Ok(2));

    // the same key in another domain selects another handler
    assert_eq!(
        registry.dispatch(PERMISSIONS, psid, &bytes, 5),
        Ok(Some((OerValue::Boolean(true), 6)))
    );
    assert_eq!(registry.dispatch(PAYLOAD, psid + 1, data, 0), Ok(None));
}

#[test]
fn test_concurrent_decodes_share_registry() {
    let registry = Arc::new(build_registry());
    let handles: Vec<_> = (0..4u8)
        .map(|n| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let bytes = [0x01, 0x20, 0x04, 0x00, n, 0x00, n];
                let (value, _) =
                    parse_oer_at(&bytes, 0, &MESSAGE, Some(&*registry)).expect("decoding failed");
                let msg = value.as_sequence().expect("not a sequence");
                let position = msg["data"].innermost().as_sequence().expect("not a sequence");
                position["lat"].as_u64().expect("not an integer")
            })
        })
        .collect();
    let results: Vec<u64> = handles
        .into_iter()
        .map(|h| h.join().expect("thread panicked"))
        .collect();
    assert_eq!(results, vec![0, 1, 2, 3]);
}
