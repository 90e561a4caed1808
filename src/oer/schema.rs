//! Schema descriptors
//!
//! Descriptors are plain `Copy` data, so generated schema tables can be declared as
//! `static` items and shared by every decode call.

use crate::context::DecodingContext;
use crate::error::OerResult;
use crate::oer::StringType;
use crate::registry::DomainId;
use std::fmt;

/// Decode one item from the input, given the per-PDU decoding context
pub type ItemDecoder =
    for<'a, 'c, 'r> fn(&'a [u8], &'c mut DecodingContext<'r>) -> OerResult<'a>;

/// Extensibility marker of a field or CHOICE alternative
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extensibility {
    /// The enclosing type has no extension marker
    NotExtensible,
    /// Field defined before the extension marker of an extensible type
    ExtensionRoot,
    /// Field defined after the extension marker
    ExtensionAddition,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Optionality {
    Required,
    Optional,
}

/// Static bounds of an INTEGER type. `None` means no bound on that side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntegerBounds {
    pub min: Option<i128>,
    pub max: Option<i128>,
}

impl IntegerBounds {
    /// `INTEGER (min..max)`
    pub const fn new(min: i128, max: i128) -> Self {
        IntegerBounds {
            min: Some(min),
            max: Some(max),
        }
    }

    /// `INTEGER (min..MAX)`
    pub const fn at_least(min: i128) -> Self {
        IntegerBounds {
            min: Some(min),
            max: None,
        }
    }

    /// `INTEGER`
    pub const fn unbounded() -> Self {
        IntegerBounds {
            min: None,
            max: None,
        }
    }
}

/// Size constraint of a string type (bits for BIT STRING, characters for character
/// strings, octets otherwise)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeBounds {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

/// No size constraint: always length-prefixed
pub const NO_BOUND: SizeBounds = SizeBounds {
    min: None,
    max: None,
};

impl SizeBounds {
    pub const fn new(min: usize, max: usize) -> Self {
        SizeBounds {
            min: Some(min),
            max: Some(max),
        }
    }

    /// `SIZE (n)`
    pub const fn fixed(n: usize) -> Self {
        SizeBounds::new(n, n)
    }

    /// Size of a fixed-size type, if both bounds are known and equal
    pub fn fixed_size(&self) -> Option<usize> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min == max => Some(max),
            _ => None,
        }
    }
}

/// Leaf types
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    Boolean,
    Integer(IntegerBounds),
    Enumerated,
    Null,
    OctetString(SizeBounds),
    BitString(SizeBounds),
    CharacterString(StringType, SizeBounds),
    ObjectIdentifier,
}

/// One field of a SEQUENCE, or the content of a CHOICE alternative
#[derive(Clone, Copy, Debug)]
pub struct FieldDescriptor<'s> {
    pub key: &'static str,
    pub extensibility: Extensibility,
    pub optionality: Optionality,
    pub schema: Schema<'s>,
}

impl<'s> FieldDescriptor<'s> {
    pub const fn required(key: &'static str, schema: Schema<'s>) -> Self {
        FieldDescriptor {
            key,
            extensibility: Extensibility::NotExtensible,
            optionality: Optionality::Required,
            schema,
        }
    }

    pub const fn optional(key: &'static str, schema: Schema<'s>) -> Self {
        FieldDescriptor {
            key,
            extensibility: Extensibility::NotExtensible,
            optionality: Optionality::Optional,
            schema,
        }
    }

    /// Mark as part of the extension root of an extensible type
    pub const fn root(self) -> Self {
        FieldDescriptor {
            extensibility: Extensibility::ExtensionRoot,
            ..self
        }
    }

    /// Mark as an extension addition
    pub const fn addition(self) -> Self {
        FieldDescriptor {
            extensibility: Extensibility::ExtensionAddition,
            ..self
        }
    }

    #[inline]
    pub fn is_optional(&self) -> bool {
        self.optionality == Optionality::Optional
    }

    #[inline]
    pub fn is_addition(&self) -> bool {
        self.extensibility == Extensibility::ExtensionAddition
    }
}

/// SEQUENCE: fields in declaration order
#[derive(Clone, Copy, Debug)]
pub struct SequenceSchema<'s> {
    pub fields: &'s [FieldDescriptor<'s>],
    /// The type has an extension marker (extension bit present in the preamble)
    pub extensible: bool,
}

impl<'s> SequenceSchema<'s> {
    /// Build a sequence schema. The type is extensible if any field carries an
    /// extensibility marker.
    pub const fn new(fields: &'s [FieldDescriptor<'s>]) -> Self {
        let mut extensible = false;
        let mut idx = 0;
        while idx < fields.len() {
            if !matches!(fields[idx].extensibility, Extensibility::NotExtensible) {
                extensible = true;
            }
            idx += 1;
        }
        SequenceSchema { fields, extensible }
    }

    /// Force the extension marker, e.g. for `SEQUENCE { ... }`
    pub const fn extensible(self) -> Self {
        SequenceSchema {
            extensible: true,
            ..self
        }
    }

    pub fn root_fields(&self) -> impl Iterator<Item = &FieldDescriptor<'s>> {
        self.fields.iter().filter(|f| !f.is_addition())
    }

    pub fn additions(&self) -> impl Iterator<Item = &FieldDescriptor<'s>> {
        self.fields.iter().filter(|f| f.is_addition())
    }

    /// Number of optional fields in the extension root (size of the presence bitmap)
    pub fn optional_root_count(&self) -> usize {
        self.root_fields().filter(|f| f.is_optional()).count()
    }
}

/// One alternative of a CHOICE
#[derive(Clone, Copy, Debug)]
pub struct ChoiceAlternative<'s> {
    pub tag: u64,
    pub field: FieldDescriptor<'s>,
}

impl<'s> ChoiceAlternative<'s> {
    pub const fn new(tag: u64, field: FieldDescriptor<'s>) -> Self {
        ChoiceAlternative { tag, field }
    }
}

/// CHOICE: alternatives matched in order by tag number
#[derive(Clone, Copy, Debug)]
pub struct ChoiceSchema<'s> {
    pub alternatives: &'s [ChoiceAlternative<'s>],
}

impl<'s> ChoiceSchema<'s> {
    pub const fn new(alternatives: &'s [ChoiceAlternative<'s>]) -> Self {
        ChoiceSchema { alternatives }
    }

    pub fn find(&self, tag: u64) -> Option<&ChoiceAlternative<'s>> {
        self.alternatives.iter().find(|alt| alt.tag == tag)
    }
}

/// Open type: length-prefixed content, decoded by a static callback or by a registry
/// handler selected from the context discriminant
#[derive(Clone, Copy)]
pub struct OpenTypeSchema {
    pub decoder: Option<ItemDecoder>,
    pub domain: Option<DomainId>,
}

impl OpenTypeSchema {
    /// Content is kept undecoded
    pub const fn raw() -> Self {
        OpenTypeSchema {
            decoder: None,
            domain: None,
        }
    }

    /// Content type is known when writing the schema
    pub const fn with_decoder(decoder: ItemDecoder) -> Self {
        OpenTypeSchema {
            decoder: Some(decoder),
            domain: None,
        }
    }

    /// Content is decoded by the handler registered for the current discriminant
    pub const fn dispatched(domain: DomainId) -> Self {
        OpenTypeSchema {
            decoder: None,
            domain: Some(domain),
        }
    }
}

impl fmt::Debug for OpenTypeSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenTypeSchema")
            .field("decoder", &self.decoder.map(|_| "fn"))
            .field("domain", &self.domain)
            .finish()
    }
}

/// Lazy reference to a (possibly self-referential) schema
///
/// Decoding through this reference costs `weight` units of recursion depth.
#[derive(Clone, Copy)]
pub struct RecursiveRef {
    pub weight: usize,
    pub resolve: fn() -> &'static Schema<'static>,
}

impl fmt::Debug for RecursiveRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecursiveRef(weight={})", self.weight)
    }
}

/// Description of the expected encoding
#[derive(Clone, Copy)]
pub enum Schema<'s> {
    Primitive(Primitive),
    Sequence(SequenceSchema<'s>),
    SequenceOf(&'s Schema<'s>),
    Choice(ChoiceSchema<'s>),
    OpenType(OpenTypeSchema),
    /// Integer whose value selects registry handlers for later open types
    Discriminant(&'s Schema<'s>),
    Recursive(RecursiveRef),
    /// Caller-supplied decoding function
    Item(ItemDecoder),
}

impl<'s> fmt::Debug for Schema<'s> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Primitive(p) => write!(f, "Primitive({:?})", p),
            Schema::Sequence(s) => write!(f, "Sequence({:?})", s),
            Schema::SequenceOf(s) => write!(f, "SequenceOf({:?})", s),
            Schema::Choice(c) => write!(f, "Choice({:?})", c),
            Schema::OpenType(o) => write!(f, "OpenType({:?})", o),
            Schema::Discriminant(s) => write!(f, "Discriminant({:?})", s),
            Schema::Recursive(r) => write!(f, "Recursive({:?})", r),
            Schema::Item(_) => write!(f, "Item(fn)"),
        }
    }
}
