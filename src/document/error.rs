//! Error types for document loading and validation.

use super::block::BlockId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Duplicate block id: {0}")]
    DuplicateId(BlockId),

    #[error("Block {0} is not a columns block but has inner blocks")]
    UnexpectedChildren(BlockId),

    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
