//! Decode an IEEE 1609.2 `Ieee1609Dot2Data` (reduced schema) and print it
//!
//! Usage: `cargo run --example dump-oer [FILE]`, where `FILE` holds the PDU as hex text.
//! Without argument, a built-in sample is decoded. Set `RUST_LOG=oer_parser=trace` to
//! see the decoder events.

use oer_parser::context::DecodingContext;
use oer_parser::error::{OerError, OerResult};
use oer_parser::oer::*;
use oer_parser::registry::{DomainId, OerRegistry};
use oer_parser::parse_oer_at;
use std::env;
use std::error::Error;
use std::fs;
use tracing_subscriber::EnvFilter;

/// Application payloads, keyed by PSID
const APPLICATION: DomainId = DomainId("ieee1609dot2.application");

const UINT8: Schema = Schema::Primitive(Primitive::Integer(IntegerBounds::new(0, 255)));
const UINT16: Schema = Schema::Primitive(Primitive::Integer(IntegerBounds::new(0, 65535)));
const UINT32: Schema = Schema::Primitive(Primitive::Integer(IntegerBounds::new(0, 4_294_967_295)));
const TIME64: Schema = Schema::Primitive(Primitive::Integer(IntegerBounds::new(
    0,
    18_446_744_073_709_551_615,
)));
const PSID: Schema = Schema::Primitive(Primitive::Integer(IntegerBounds::at_least(0)));
const OPAQUE: Schema = Schema::Primitive(Primitive::OctetString(NO_BOUND));
const HASHED_ID3: Schema = Schema::Primitive(Primitive::OctetString(SizeBounds::fixed(3)));
const HASHED_ID8: Schema = Schema::Primitive(Primitive::OctetString(SizeBounds::fixed(8)));
const OCTETS32: Schema = Schema::Primitive(Primitive::OctetString(SizeBounds::fixed(32)));
const HASH_ALGORITHM: Schema = Schema::Primitive(Primitive::Enumerated);
const NULL: Schema = Schema::Primitive(Primitive::Null);

const CURVE_POINT_ALTERNATIVES: [ChoiceAlternative; 4] = [
    ChoiceAlternative::new(0, FieldDescriptor::required("x-only", OCTETS32)),
    ChoiceAlternative::new(1, FieldDescriptor::required("fill", NULL)),
    ChoiceAlternative::new(2, FieldDescriptor::required("compressed-y-0", OCTETS32)),
    ChoiceAlternative::new(3, FieldDescriptor::required("compressed-y-1", OCTETS32)),
];
const ECC_P256_CURVE_POINT: Schema = Schema::Choice(ChoiceSchema::new(&CURVE_POINT_ALTERNATIVES));

const ECDSA_P256_SIGNATURE_FIELDS: [FieldDescriptor; 2] = [
    FieldDescriptor::required("rSig", ECC_P256_CURVE_POINT),
    FieldDescriptor::required("sSig", OCTETS32),
];
const ECDSA_P256_SIGNATURE: Schema =
    Schema::Sequence(SequenceSchema::new(&ECDSA_P256_SIGNATURE_FIELDS));

const SIGNATURE_ALTERNATIVES: [ChoiceAlternative; 2] = [
    ChoiceAlternative::new(
        0,
        FieldDescriptor::required("ecdsaNistP256Signature", ECDSA_P256_SIGNATURE).root(),
    ),
    ChoiceAlternative::new(
        1,
        FieldDescriptor::required("ecdsaBrainpoolP256r1Signature", ECDSA_P256_SIGNATURE).root(),
    ),
];
const SIGNATURE: Schema = Schema::Choice(ChoiceSchema::new(&SIGNATURE_ALTERNATIVES));

const SIGNER_ALTERNATIVES: [ChoiceAlternative; 3] = [
    ChoiceAlternative::new(0, FieldDescriptor::required("digest", HASHED_ID8).root()),
    // certificates are kept opaque
    ChoiceAlternative::new(
        1,
        FieldDescriptor::required("certificate", Schema::SequenceOf(&OPAQUE)).root(),
    ),
    ChoiceAlternative::new(2, FieldDescriptor::required("self", NULL).root()),
];
const SIGNER_IDENTIFIER: Schema = Schema::Choice(ChoiceSchema::new(&SIGNER_ALTERNATIVES));

const HASHED_DATA_ALTERNATIVES: [ChoiceAlternative; 1] = [ChoiceAlternative::new(
    0,
    FieldDescriptor::required("sha256HashedData", OCTETS32).root(),
)];
const HASHED_DATA: Schema = Schema::Choice(ChoiceSchema::new(&HASHED_DATA_ALTERNATIVES));

const HEADER_INFO_FIELDS: [FieldDescriptor; 6] = [
    FieldDescriptor::required("psid", Schema::Discriminant(&PSID)).root(),
    FieldDescriptor::optional("generationTime", TIME64).root(),
    FieldDescriptor::optional("expiryTime", TIME64).root(),
    FieldDescriptor::optional("p2pcdLearningRequest", HASHED_ID3).root(),
    FieldDescriptor::optional("inlineP2pcdRequest", Schema::SequenceOf(&HASHED_ID3)).addition(),
    FieldDescriptor::optional("requestedCertificate", OPAQUE).addition(),
];
const HEADER_INFO: Schema = Schema::Sequence(SequenceSchema::new(&HEADER_INFO_FIELDS));

/// A signed payload can itself be signed data
const NESTED_DATA: Schema = Schema::Recursive(RecursiveRef {
    weight: 5,
    resolve: ieee1609dot2_data,
});

const SIGNED_DATA_PAYLOAD_FIELDS: [FieldDescriptor; 2] = [
    FieldDescriptor::optional("data", NESTED_DATA).root(),
    FieldDescriptor::optional("extDataHash", HASHED_DATA).root(),
];
const SIGNED_DATA_PAYLOAD: Schema =
    Schema::Sequence(SequenceSchema::new(&SIGNED_DATA_PAYLOAD_FIELDS).extensible());

const TO_BE_SIGNED_DATA_FIELDS: [FieldDescriptor; 2] = [
    FieldDescriptor::required("payload", SIGNED_DATA_PAYLOAD),
    FieldDescriptor::required("headerInfo", HEADER_INFO),
];
const TO_BE_SIGNED_DATA: Schema = Schema::Sequence(SequenceSchema::new(&TO_BE_SIGNED_DATA_FIELDS));

const SIGNED_DATA_FIELDS: [FieldDescriptor; 4] = [
    FieldDescriptor::required("hashId", HASH_ALGORITHM),
    FieldDescriptor::required("tbsData", TO_BE_SIGNED_DATA),
    FieldDescriptor::required("signer", SIGNER_IDENTIFIER),
    FieldDescriptor::required("signature", SIGNATURE),
];
const SIGNED_DATA: Schema = Schema::Sequence(SequenceSchema::new(&SIGNED_DATA_FIELDS));

const CONTENT_ALTERNATIVES: [ChoiceAlternative; 4] = [
    ChoiceAlternative::new(0, FieldDescriptor::required("unsecuredData", OPAQUE).root()),
    ChoiceAlternative::new(1, FieldDescriptor::required("signedData", SIGNED_DATA).root()),
    // recipient info and ciphertext are kept opaque
    ChoiceAlternative::new(2, FieldDescriptor::required("encryptedData", OPAQUE).root()),
    ChoiceAlternative::new(
        3,
        FieldDescriptor::required("signedCertificateRequest", OPAQUE).root(),
    ),
];
const IEEE1609DOT2_CONTENT: Schema = Schema::Choice(ChoiceSchema::new(&CONTENT_ALTERNATIVES));

const IEEE1609DOT2_DATA_FIELDS: [FieldDescriptor; 2] = [
    FieldDescriptor::required("protocolVersion", UINT8),
    FieldDescriptor::required("content", IEEE1609DOT2_CONTENT),
];
static IEEE1609DOT2_DATA: Schema = Schema::Sequence(SequenceSchema::new(&IEEE1609DOT2_DATA_FIELDS));

fn ieee1609dot2_data() -> &'static Schema<'static> {
    &IEEE1609DOT2_DATA
}

/// PSID 0x20: reduced station status message
fn decode_station_status<'a>(i: &'a [u8], ctx: &mut DecodingContext<'_>) -> OerResult<'a> {
    const FIELDS: [FieldDescriptor; 3] = [
        FieldDescriptor::required("stationId", UINT32),
        FieldDescriptor::required("speed", UINT16),
        FieldDescriptor::optional("heading", UINT16),
    ];
    parse_oer_sequence(i, &SequenceSchema::new(&FIELDS), ctx)
}

/// PSID 0x23: free text
fn decode_text<'a>(i: &'a [u8], _ctx: &mut DecodingContext<'_>) -> OerResult<'a> {
    parse_oer_string(i, StringType::Utf8String, &NO_BOUND)
}

const SAMPLE: &str = "
    03 81 00
    40 03 80 09 80 000004d2 01f4 0e10
    40 0120 000000057a3b1c00
    82
    80 80
    1111111111111111111111111111111111111111111111111111111111111111
    2222222222222222222222222222222222222222222222222222222222222222
";

fn field<'v, 'a>(value: &'v OerValue<'a>, key: &str) -> Result<&'v OerValue<'a>, OerError> {
    value.as_sequence()?.get(key).ok_or(OerError::TypeError)
}

/// Dispatch the unsecured payloads of signed data, once the PSID is known
///
/// The PSID is in the header, which follows the payload: the payload cannot be
/// decoded by the registry while the PDU is parsed.
fn dispatch_payloads(data: &OerValue, registry: &OerRegistry) -> Result<(), OerError> {
    let content = field(data, "content")?.as_choice()?;
    if content.name != Some("signedData") {
        return Ok(());
    }
    let tbs = field(&content.value, "tbsData")?;
    let psid = field(field(tbs, "headerInfo")?, "psid")?.as_u64()?;
    let inner = match field(tbs, "payload")?.as_sequence()?.get("data") {
        Some(inner) => inner,
        None => return Ok(()),
    };
    let inner_content = field(inner, "content")?.as_choice()?;
    if inner_content.name == Some("unsecuredData") {
        let raw = inner_content.value.as_slice()?;
        match registry.dispatch(APPLICATION, psid, raw, 0)? {
            Some((payload, _)) => {
                println!("payload for PSID {:#x}:", psid);
                println!("{:?}", payload.as_pretty(2, 2));
            }
            None => println!("no handler for PSID {:#x}", psid),
        }
    }
    dispatch_payloads(inner, registry)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let input = match env::args().nth(1) {
        Some(path) => fs::read_to_string(path)?,
        None => SAMPLE.to_string(),
    };
    let hex_input: String = input.split_whitespace().collect();
    let bytes = hex::decode(hex_input)?;

    let mut registry = OerRegistry::new();
    registry.register(APPLICATION, 0x20, decode_station_status);
    registry.register(APPLICATION, 0x23, decode_text);

    let (value, offset) = parse_oer_at(&bytes, 0, &IEEE1609DOT2_DATA, Some(&registry))?;
    println!("decoded {} of {} octets", offset, bytes.len());
    println!("{:?}", value.as_pretty(0, 2));
    dispatch_payloads(&value, &registry)?;
    Ok(())
}
