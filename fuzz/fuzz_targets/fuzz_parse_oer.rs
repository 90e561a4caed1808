#![no_main]
use libfuzzer_sys::fuzz_target;
use oer_parser::context::DecodingContext;
use oer_parser::error::OerResult;
use oer_parser::oer::*;
use oer_parser::registry::{DomainId, OerRegistry};
use oer_parser::parse_oer_at;

const DOMAIN: DomainId = DomainId("fuzz");

const ANY_INT: Schema = Schema::Primitive(Primitive::Integer(IntegerBounds::unbounded()));
const BITS: Schema = Schema::Primitive(Primitive::BitString(NO_BOUND));
const TEXT: Schema = Schema::Primitive(Primitive::CharacterString(StringType::Utf8String, NO_BOUND));
const OID: Schema = Schema::Primitive(Primitive::ObjectIdentifier);

const NODE: Schema = Schema::Recursive(RecursiveRef {
    weight: 1,
    resolve: tree,
});

const FIELDS: [FieldDescriptor; 5] = [
    FieldDescriptor::required("key", Schema::Discriminant(&ANY_INT)).root(),
    FieldDescriptor::optional("bits", BITS).root(),
    FieldDescriptor::optional("children", Schema::SequenceOf(&NODE)).root(),
    FieldDescriptor::required("payload", Schema::OpenType(OpenTypeSchema::dispatched(DOMAIN))).root(),
    FieldDescriptor::optional("late", OID).addition(),
];

const ALTERNATIVES: [ChoiceAlternative; 3] = [
    ChoiceAlternative::new(0, FieldDescriptor::required("node", Schema::Sequence(SequenceSchema::new(&FIELDS)))),
    ChoiceAlternative::new(1, FieldDescriptor::required("text", TEXT).root()),
    ChoiceAlternative::new(2, FieldDescriptor::required("more", NODE).addition()),
];

static TREE: Schema = Schema::Choice(ChoiceSchema::new(&ALTERNATIVES));

fn tree() -> &'static Schema<'static> {
    &TREE
}

fn decode_node<'a>(i: &'a [u8], ctx: &mut DecodingContext<'_>) -> OerResult<'a> {
    parse_oer_with_schema(i, &NODE, ctx)
}

fuzz_target!(|data: &[u8]| {
    let mut registry = OerRegistry::new();
    registry.register(DOMAIN, 1, decode_node);
    let _ = parse_oer_at(data, 0, &TREE, Some(&registry));
});
