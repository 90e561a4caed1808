//! # OER Parser
//!
//! A schema-driven decoder for the Octet Encoding Rules (OER [[X.696]]) of ASN.1, implemented
//! with the [nom](https://github.com/Geal/nom) parser combinator framework.
//!
//! # Parser design
//!
//! OER values are not self-describing: the length, width and presence of every value is
//! determined by the ASN.1 type being decoded. Decoding is therefore driven by a
//! [`Schema`](oer/enum.Schema.html), a plain `Copy` description of the expected type that can
//! be declared in `static` tables.
//!
//! ```rust
//! use oer_parser::oer::*;
//! use oer_parser::parse_oer_at;
//!
//! const U8: Schema = Schema::Primitive(Primitive::Integer(IntegerBounds::new(0, 255)));
//! static FIELDS: [FieldDescriptor; 2] = [
//!     FieldDescriptor::required("version", U8),
//!     FieldDescriptor::optional("flags", Schema::Primitive(Primitive::BitString(SizeBounds::fixed(8)))),
//! ];
//! static HEADER: Schema = Schema::Sequence(SequenceSchema::new(&FIELDS));
//!
//! let bytes = [0x80, 0x03, 0xa5];
//! let (value, offset) = parse_oer_at(&bytes, 0, &HEADER, None).expect("decoding failed");
//! assert_eq!(offset, 3);
//! let header = value.as_sequence().expect("not a sequence");
//! assert_eq!(header["version"].as_u64(), Ok(3));
//! ```
//!
//! Each codec is also available as a nom parser working on the remaining input, for
//! example [`parse_oer_length`](oer/fn.parse_oer_length.html) or
//! [`parse_oer_sequence_of_v`](oer/fn.parse_oer_sequence_of_v.html). All functions return
//! an [`OerResult`](error/type.OerResult.html): the remaining input and the parsed value,
//! or an error.
//!
//! Note that this type is also a `Result`, so usual functions (`map`, `unwrap` etc.) are available.
//!
//! # Open types and registries
//!
//! Open types carry a value whose type is not known by the enclosing schema. It can be
//! decoded by a static callback, or by a handler of an
//! [`OerRegistry`](registry/struct.OerRegistry.html) selected from a discriminant decoded
//! earlier in the same PDU (for example, a PSID). Open types that cannot be decoded are
//! kept as raw octets: this is not an error.
//!
//! # Notes
//!
//! - Decoded values borrow the input buffer, nothing is copied except bit strings whose
//!   padding bits had to be cleared.
//! - Recursive schemas go through a [`RecursiveRef`](oer/struct.RecursiveRef.html). Each
//!   recursion costs a weight, and decoding fails with `RecursionLimitExceeded` when the
//!   total exceeds the context limit.
//! - Unbounded integers are limited to 4 octets, unless the `bigint` feature is enabled.
//!
//! # References
//!
//! - [[X.680]] Abstract Syntax Notation One (ASN.1): Specification of basic notation.
//! - [[X.696]] ASN.1 encoding rules: Specification of Octet Encoding Rules (OER).
//!
//! [X.680]: http://www.itu.int/rec/T-REC-X.680/en "Abstract Syntax Notation One (ASN.1):
//!   Specification of basic notation."
//! [X.696]: https://www.itu.int/rec/T-REC-X.696/en "ASN.1 encoding rules: Specification of
//!   Octet Encoding Rules (OER)."

#![deny(/*missing_docs,*/unsafe_code,
        unstable_features,
        unused_import_braces, unused_qualifications)]

pub mod context;
pub mod error;
pub mod oer;
pub mod oid;
pub mod registry;

// re-export at crate root
pub use context::DecodingContext;
pub use oer::{parse_oer_at, parse_oer_with_context};
pub use registry::{DomainId, OerRegistry};

#[cfg(feature = "bigint")]
extern crate num_bigint;
