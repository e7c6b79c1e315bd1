//! Content generation hand-off.
//!
//! Code blocks can ask an external service to write their content from a short
//! prompt. The service sits behind [`ContentGenerator`]; its transport, auth and
//! error kinds stay on its side of the trait. Whatever it returns is turned into
//! plain text here (a failure becomes a visible placeholder) and written into
//! the block's `content` attribute like any other edit.
//!
//! A request may still be in flight when the user asks again for the same block.
//! Each request gets a [`GenerationTicket`] with a per-block sequence number,
//! and only the newest ticket for a block may write its result.

use crate::document::block::{Block, BlockId};
use crate::document::tree::contains_id;
use std::collections::HashMap;
use thiserror::Error;

/// Content written when the service returns nothing.
pub const GENERATION_FAILED: &str = "// Failed to generate code";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("{0}")]
    Service(String),

    #[error("content generation is not configured")]
    Unavailable,
}

/// External content-generation collaborator.
pub trait ContentGenerator {
    /// Generates code for `prompt` in `language`.
    fn generate_code(&self, prompt: &str, language: &str) -> Result<String, GenerationError>;

    /// Suggests a short follow-up for `context`.
    fn suggest(&self, _context: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Unavailable)
    }
}

/// Turns a generation result into the text stored in the block.
pub fn content_from_result(result: Result<String, GenerationError>) -> String {
    match result {
        Ok(text) if text.is_empty() => GENERATION_FAILED.to_string(),
        Ok(text) => text,
        Err(err) => format!("// Error: {}", err),
    }
}

/// A suggestion, or an empty string if the service failed.
pub fn suggestion_or_empty(generator: &dyn ContentGenerator, context: &str) -> String {
    generator.suggest(context).unwrap_or_else(|err| {
        tracing::debug!("suggestion failed: {}", err);
        String::new()
    })
}

/// Handle for one outstanding generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTicket {
    pub block_id: BlockId,
    pub seq: u64,
}

/// Issues tickets and remembers the newest one per block.
#[derive(Debug, Default)]
pub struct GenerationTracker {
    next_seq: u64,
    latest: HashMap<BlockId, u64>,
}

impl GenerationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request for `block_id`, superseding any earlier one.
    pub fn issue(&mut self, block_id: BlockId) -> GenerationTicket {
        self.next_seq += 1;
        self.latest.insert(block_id.clone(), self.next_seq);
        GenerationTicket {
            block_id,
            seq: self.next_seq,
        }
    }

    pub fn is_current(&self, ticket: &GenerationTicket) -> bool {
        self.latest.get(&ticket.block_id) == Some(&ticket.seq)
    }

    /// Number of blocks with a request in flight.
    pub fn pending(&self) -> usize {
        self.latest.len()
    }

    /// Forgets requests for blocks that are no longer in `blocks`; their
    /// results will be dropped as stale.
    pub fn forget_missing(&mut self, blocks: &[Block]) {
        self.latest
            .retain(|block_id, _| contains_id(blocks, block_id.as_str()));
    }

    /// Retires `ticket`. Returns true if it was the newest for its block, in
    /// which case its result should be applied.
    pub fn settle(&mut self, ticket: &GenerationTicket) -> bool {
        if self.is_current(ticket) {
            self.latest.remove(&ticket.block_id);
            true
        } else {
            false
        }
    }
}
