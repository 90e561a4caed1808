//! Per-PDU decoding state

use crate::error::OerError;
use crate::oer::MAX_SEQUENCE_OF_ITEMS;
use crate::registry::OerRegistry;
use std::ops::{Deref, DerefMut};
use tracing::warn;

/// Maximum recursion limit
pub const MAX_RECURSION: usize = 50;

/// Mutable state of one top-level decode
///
/// A context is created for each PDU and dropped when the decode ends. It is never
/// shared between PDUs: concurrent decodes each own their own context.
#[derive(Debug)]
pub struct DecodingContext<'r> {
    depth: usize,
    max_depth: usize,
    max_items: usize,
    discriminant: Option<u64>,
    registry: Option<&'r OerRegistry>,
}

impl<'r> Default for DecodingContext<'r> {
    fn default() -> Self {
        DecodingContext::new()
    }
}

impl<'r> DecodingContext<'r> {
    /// Context without registry, with the default recursion limit
    pub fn new() -> Self {
        DecodingContext {
            depth: 0,
            max_depth: MAX_RECURSION,
            max_items: MAX_SEQUENCE_OF_ITEMS,
            discriminant: None,
            registry: None,
        }
    }

    /// Context dispatching open types through `registry`
    pub fn with_registry(registry: &'r OerRegistry) -> Self {
        DecodingContext {
            registry: Some(registry),
            ..DecodingContext::new()
        }
    }

    /// Update the maximum recursion depth
    pub fn with_max_depth(self, max_depth: usize) -> Self {
        DecodingContext { max_depth, ..self }
    }

    /// Update the maximum number of SEQUENCE OF items
    ///
    /// Counts up to the length of the remaining input are accepted whatever the limit.
    pub fn with_max_items(self, max_items: usize) -> Self {
        DecodingContext { max_items, ..self }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    #[inline]
    pub fn max_items(&self) -> usize {
        self.max_items
    }

    #[inline]
    pub fn registry(&self) -> Option<&'r OerRegistry> {
        self.registry
    }

    /// Last discriminant decoded in this PDU, if any
    #[inline]
    pub fn discriminant(&self) -> Option<u64> {
        self.discriminant
    }

    pub fn set_discriminant(&mut self, key: u64) {
        self.discriminant = Some(key);
    }

    pub fn clear_discriminant(&mut self) {
        self.discriminant = None;
    }

    /// Account for a recursive call of cost `weight`
    ///
    /// The depth is restored when the returned guard is dropped.
    pub fn enter(&mut self, weight: usize) -> Result<RecursionGuard<'_, 'r>, OerError> {
        let depth = self.depth.saturating_add(weight);
        if depth > self.max_depth {
            warn!(depth, max_depth = self.max_depth, "recursion limit exceeded");
            return Err(OerError::RecursionLimitExceeded);
        }
        self.depth = depth;
        Ok(RecursionGuard { ctx: self, weight })
    }
}

/// Scope of one recursive call, see [`DecodingContext::enter`]
///
/// The guard dereferences to the context, so nested decoders run through it.
#[derive(Debug)]
pub struct RecursionGuard<'c, 'r> {
    ctx: &'c mut DecodingContext<'r>,
    weight: usize,
}

impl<'c, 'r> Deref for RecursionGuard<'c, 'r> {
    type Target = DecodingContext<'r>;

    fn deref(&self) -> &DecodingContext<'r> {
        self.ctx
    }
}

impl<'c, 'r> DerefMut for RecursionGuard<'c, 'r> {
    fn deref_mut(&mut self) -> &mut DecodingContext<'r> {
        self.ctx
    }
}

impl<'c, 'r> Drop for RecursionGuard<'c, 'r> {
    fn drop(&mut self) {
        self.ctx.depth -= self.weight;
    }
}
