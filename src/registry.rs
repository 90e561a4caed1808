//! Discriminant-keyed handlers for open types
//!
//! Some protocols carry a numeric identifier (for example an IEEE 1609.2 PSID) that
//! selects how another part of the message must be decoded. Handlers are registered
//! per `(domain, key)` once at startup, then looked up while decoding.
//!
//! ```rust
//! use oer_parser::context::DecodingContext;
//! use oer_parser::error::OerResult;
//! use oer_parser::oer::{parse_oer_bool, OerValue};
//! use oer_parser::registry::{DomainId, OerRegistry};
//!
//! const PAYLOAD: DomainId = DomainId("demo.payload");
//!
//! fn decode_flag<'a>(i: &'a [u8], _ctx: &mut DecodingContext<'_>) -> OerResult<'a> {
//!     parse_oer_bool(i)
//! }
//!
//! let mut registry = OerRegistry::new();
//! registry.register(PAYLOAD, 32, decode_flag);
//!
//! let res = registry.dispatch(PAYLOAD, 32, &[0x00, 0xff], 1).expect("decoding failed");
//! assert_eq!(res, Some((OerValue::Boolean(true), 2)));
//! // no handler: not an error
//! assert_eq!(registry.dispatch(PAYLOAD, 33, &[0xff], 0), Ok(None));
//! ```

use crate::context::DecodingContext;
use crate::error::{flatten_error, OerError, OerResult};
use crate::oer::{ItemDecoder, OerValue};
use std::collections::HashMap;
use std::fmt;
use tracing::trace;

/// Name of an independent handler table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DomainId(pub &'static str);

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Handler tables, keyed by domain and discriminant value
#[derive(Default)]
pub struct OerRegistry {
    handlers: HashMap<(DomainId, u64), ItemDecoder>,
}

impl OerRegistry {
    pub fn new() -> Self {
        OerRegistry::default()
    }

    /// Register `handler` for `key` in `domain`, returning the handler it replaces
    pub fn register(
        &mut self,
        domain: DomainId,
        key: u64,
        handler: ItemDecoder,
    ) -> Option<ItemDecoder> {
        self.handlers.insert((domain, key), handler)
    }

    /// Handler registered for `key` in `domain`
    pub fn lookup(&self, domain: DomainId, key: u64) -> Option<ItemDecoder> {
        self.handlers.get(&(domain, key)).copied()
    }

    /// Decode `buffer[offset..]` with the handler registered for `(domain, key)`
    ///
    /// This is the entry point for callers that learn the discriminant only after the
    /// content was decoded (and kept as raw octets). A fresh context is used.
    ///
    /// Returns `Ok(None)` if no handler is registered, otherwise the decoded value and
    /// the absolute offset after it.
    pub fn dispatch<'a>(
        &self,
        domain: DomainId,
        key: u64,
        buffer: &'a [u8],
        offset: usize,
    ) -> Result<Option<(OerValue<'a>, usize)>, OerError> {
        let input = buffer.get(offset..).ok_or(OerError::TruncatedInput)?;
        let mut ctx = DecodingContext::with_registry(self);
        ctx.set_discriminant(key);
        match self.dispatch_with(domain, key, input, &mut ctx) {
            Some(res) => {
                let (rem, value) = res.map_err(flatten_error)?;
                Ok(Some((value, buffer.len() - rem.len())))
            }
            None => Ok(None),
        }
    }

    /// Decode `i` with the handler registered for `(domain, key)`, within an ongoing decode
    pub fn dispatch_with<'a>(
        &self,
        domain: DomainId,
        key: u64,
        i: &'a [u8],
        ctx: &mut DecodingContext<'_>,
    ) -> Option<OerResult<'a>> {
        let handler = self.lookup(domain, key)?;
        trace!(%domain, key, "dispatching to registered handler");
        Some(handler(i, ctx))
    }
}

impl fmt::Debug for OerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oer::parse_oer_null;

    const D1: DomainId = DomainId("test.one");
    const D2: DomainId = DomainId("test.two");

    fn null_handler<'a>(i: &'a [u8], _ctx: &mut DecodingContext<'_>) -> OerResult<'a> {
        parse_oer_null(i)
    }

    #[test]
    fn test_domains_are_independent() {
        let mut registry = OerRegistry::new();
        assert!(registry.register(D1, 1, null_handler).is_none());
        assert!(registry.lookup(D1, 1).is_some());
        assert!(registry.lookup(D2, 1).is_none());
        assert!(registry.register(D1, 1, null_handler).is_some());
    }

    #[test]
    fn test_dispatch_offset() {
        let mut registry = OerRegistry::new();
        registry.register(D1, 7, null_handler);
        assert_eq!(
            registry.dispatch(D1, 7, &[1, 2, 3], 2),
            Ok(Some((OerValue::Null, 2)))
        );
        assert_eq!(registry.dispatch(D2, 7, &[1, 2, 3], 2), Ok(None));
        assert_eq!(
            registry.dispatch(D1, 7, &[1, 2, 3], 4),
            Err(OerError::TruncatedInput)
        );
    }
}
