//! Block id minting.
//!
//! Every creation path (add, duplicate, pattern expansion, inner add) draws
//! ids through [`mint_unique`], which retries until the candidate is absent
//! from the set of ids already taken and then records it there.

use super::block::BlockId;
use std::collections::HashSet;
use uuid::Uuid;

/// Source of candidate block ids.
pub trait IdGenerator {
    fn next_id(&mut self) -> BlockId;
}

/// Random ids of the form `block-<32 hex digits>`.
#[derive(Debug, Default, Clone)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> BlockId {
        BlockId::new(format!("block-{}", Uuid::new_v4().simple()))
    }
}

/// Deterministic ids of the form `<prefix>-<n>`, counting up from 1.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> BlockId {
        let id = BlockId::new(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

/// Draws an id from `ids` that is not in `taken`, and adds it to `taken`.
pub fn mint_unique(ids: &mut dyn IdGenerator, taken: &mut HashSet<BlockId>) -> BlockId {
    loop {
        let candidate = ids.next_id();
        if taken.insert(candidate.clone()) {
            return candidate;
        }
    }
}
