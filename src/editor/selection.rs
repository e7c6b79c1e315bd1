//! Active block tracking.
//!
//! The selection holds at most one block id for the whole tree. It refers to
//! the block by id only and is resolved against the current tree on demand.

use crate::document::block::{Block, BlockId};
use crate::document::tree::{contains_id, find_block};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    active: Option<BlockId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&BlockId> {
        self.active.as_ref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.active.as_ref().is_some_and(|active| active == id)
    }

    pub fn select(&mut self, id: BlockId) {
        self.active = Some(id);
    }

    pub fn set(&mut self, id: Option<BlockId>) {
        self.active = id;
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    /// The selected block in `blocks`, if it is still there.
    pub fn resolve<'a>(&self, blocks: &'a [Block]) -> Option<&'a Block> {
        find_block(blocks, self.active.as_ref()?.as_str())
    }

    /// Clears the selection if its block is no longer in `blocks`.
    ///
    /// Returns true if the selection was cleared.
    pub fn retain_in(&mut self, blocks: &[Block]) -> bool {
        match &self.active {
            Some(id) if !contains_id(blocks, id.as_str()) => {
                self.active = None;
                true
            }
            _ => false,
        }
    }
}
