//! Lookup and navigation over block trees.
//!
//! A block tree is an ordered list of root blocks; columns blocks nest further
//! lists below them. Nodes are addressed either by id or by path, a sequence of
//! child indices from the root list down to the node (`[1, 0]` is the first
//! child of the second root block).
//!
//! # Example
//!
//! ```
//! use blockquill::document::block::{Attributes, Block, BlockType};
//! use blockquill::document::tree::{block_at, find_block, find_path};
//!
//! let blocks = vec![
//!     Block::new("1", BlockType::Heading, Attributes::new()),
//!     Block::columns(
//!         "2",
//!         Attributes::new(),
//!         vec![Block::new("3", BlockType::Paragraph, Attributes::new())],
//!     ),
//! ];
//!
//! assert_eq!(find_path(&blocks, "3"), Some(vec![1, 0]));
//! assert_eq!(block_at(&blocks, &[1, 0]).unwrap().id(), "3");
//! assert!(find_block(&blocks, "9").is_none());
//! ```

use super::block::{Attributes, Block, BlockId, BlockType};
use super::error::DocumentError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Child indices from the root list down to a block.
pub type BlockPath = Vec<usize>;

/// Version tag written into exported documents by default.
pub const DEFAULT_VERSION: &str = "1.2.0";

/// A versioned document: the exported form of the editor's block tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub version: String,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(version: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            version: version.into(),
            blocks,
        }
    }

    /// Checks the tree invariants, see [`validate`].
    pub fn validate(&self) -> Result<(), DocumentError> {
        validate(&self.blocks)
    }

    /// Starter document: a heading over a 70-30 split of text and image.
    pub fn sample() -> Self {
        let blocks = vec![
            Block::new(
                "initial-1",
                BlockType::Heading,
                Attributes::new()
                    .with("level", 2)
                    .with("content", "Professional layout design"),
            ),
            Block::columns(
                "initial-2",
                Attributes::new()
                    .with("columns", 2)
                    .with("gap", 32)
                    .with("layout", "70-30")
                    .with("verticalAlign", "center"),
                vec![
                    Block::new(
                        "inner-1",
                        BlockType::Paragraph,
                        Attributes::new()
                            .with(
                                "content",
                                "This column takes 70% of the width. Change the ratio in the inspector.",
                            )
                            .with("backgroundColor", "#eff6ff")
                            .with("padding", 24)
                            .with("borderRadius", 12),
                    ),
                    Block::new(
                        "inner-2",
                        BlockType::Image,
                        Attributes::new()
                            .with("url", "https://picsum.photos/400/300")
                            .with("borderRadius", 12),
                    ),
                ],
            ),
        ];
        Self::new(DEFAULT_VERSION, blocks)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DEFAULT_VERSION, Vec::new())
    }
}

/// Finds the first block with `id`, depth-first in document order.
pub fn find_block<'a>(blocks: &'a [Block], id: &str) -> Option<&'a Block> {
    for block in blocks {
        if block.id() == id {
            return Some(block);
        }
        if let Some(found) = block.inner_blocks().and_then(|inner| find_block(inner, id)) {
            return Some(found);
        }
    }
    None
}

/// Returns the path of the block with `id`, if present.
pub fn find_path(blocks: &[Block], id: &str) -> Option<BlockPath> {
    for (index, block) in blocks.iter().enumerate() {
        if block.id() == id {
            return Some(vec![index]);
        }
        if let Some(mut rest) = block.inner_blocks().and_then(|inner| find_path(inner, id)) {
            rest.insert(0, index);
            return Some(rest);
        }
    }
    None
}

/// Resolves a path to a block.
///
/// Returns `None` for an empty path, an out-of-range index, or a path that
/// continues below a block without children.
pub fn block_at<'a>(blocks: &'a [Block], path: &[usize]) -> Option<&'a Block> {
    let (&first, rest) = path.split_first()?;
    let mut current = blocks.get(first)?;
    for &index in rest {
        current = current.inner_blocks()?.get(index)?;
    }
    Some(current)
}

/// Resolves a path to the child list it points into.
///
/// An empty path is the root list; otherwise the path must address a columns
/// block and its children are returned.
pub fn list_at<'a>(blocks: &'a [Block], path: &[usize]) -> Option<&'a [Block]> {
    if path.is_empty() {
        return Some(blocks);
    }
    block_at(blocks, path)?.inner_blocks()
}

pub fn contains_id(blocks: &[Block], id: &str) -> bool {
    find_block(blocks, id).is_some()
}

/// Every id in the tree.
pub fn collect_ids(blocks: &[Block]) -> HashSet<BlockId> {
    walk(blocks).map(|(_, block)| block.id().clone()).collect()
}

pub fn count_blocks(blocks: &[Block]) -> usize {
    walk(blocks).count()
}

/// Depth-first iterator over `(path, block)` in document order.
pub fn walk(blocks: &[Block]) -> Walk<'_> {
    Walk {
        stack: vec![(Vec::new(), blocks, 0)],
    }
}

pub struct Walk<'a> {
    stack: Vec<(BlockPath, &'a [Block], usize)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (BlockPath, &'a Block);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (prefix, list, index) = self.stack.last_mut()?;
            let list: &'a [Block] = *list;
            let Some(block) = list.get(*index) else {
                self.stack.pop();
                continue;
            };
            let mut path = prefix.clone();
            path.push(*index);
            *index += 1;

            if let Some(inner) = block.inner_blocks() {
                self.stack.push((path.clone(), inner, 0));
            }
            return Some((path, block));
        }
    }
}

/// Checks that ids are unique and that only columns blocks have children.
pub fn validate(blocks: &[Block]) -> Result<(), DocumentError> {
    let mut seen = HashSet::new();
    for (_, block) in walk(blocks) {
        if !seen.insert(block.id().clone()) {
            return Err(DocumentError::DuplicateId(block.id().clone()));
        }
        if block.inner_blocks().is_some() && !block.is_container() {
            return Err(DocumentError::UnexpectedChildren(block.id().clone()));
        }
    }
    Ok(())
}
