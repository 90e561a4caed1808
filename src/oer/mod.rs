//! Octet Encoding Rules (OER) values, schema descriptors and parser

mod class;
mod integer;
mod length;
#[allow(clippy::module_inception)]
mod oer;
mod open;
mod multi;
mod parser;
mod print;
mod schema;
mod tagged;

pub use crate::oer::class::*;
pub use crate::oer::integer::{integer_encoding, IntegerEncoding};
pub use crate::oer::length::*;
pub use crate::oer::multi::*;
pub use crate::oer::oer::*;
pub use crate::oer::open::*;
pub use crate::oer::parser::*;
pub use crate::oer::print::*;
pub use crate::oer::schema::*;
pub use crate::oer::tagged::*;
