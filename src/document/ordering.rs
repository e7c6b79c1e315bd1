//! Sibling reordering.
//!
//! Drag-and-drop delivers a completed move as a pair of ids: the block that was
//! dragged and the block it was dropped onto. The dragged block takes the drop
//! target's position and the blocks in between shift by one.

use super::block::Block;
use super::mutations::replace_inner;
use super::tree::find_block;

/// Moves the element at `from` to index `to` (remove, then insert at `to`).
///
/// Out-of-range indices leave the list unchanged.
pub fn array_move<T: Clone>(list: &[T], from: usize, to: usize) -> Vec<T> {
    let mut moved = list.to_vec();
    if from >= moved.len() || to >= moved.len() {
        return moved;
    }
    let item = moved.remove(from);
    moved.insert(to, item);
    moved
}

fn move_within(list: &[Block], source: &str, target: &str) -> Option<Vec<Block>> {
    if source == target {
        return None;
    }
    let from = list.iter().position(|b| b.id() == source)?;
    let to = list.iter().position(|b| b.id() == target)?;
    Some(array_move(list, from, to))
}

/// Moves root block `source` to where root block `target` currently is.
///
/// Only the root list is searched: if either id is not a root block, or the
/// ids are equal, the tree is returned unchanged.
pub fn move_root(blocks: &[Block], source: &str, target: &str) -> Vec<Block> {
    move_within(blocks, source, target).unwrap_or_else(|| blocks.to_vec())
}

/// Reorders two children of the columns block `parent_id` the same way
/// [`move_root`] reorders the root list, then splices the new child list back
/// with [`replace_inner`].
pub fn move_inner(blocks: &[Block], parent_id: &str, source: &str, target: &str) -> Vec<Block> {
    let reordered = find_block(blocks, parent_id)
        .and_then(Block::inner_blocks)
        .and_then(|children| move_within(children, source, target));
    match reordered {
        Some(children) => replace_inner(blocks, parent_id, children),
        None => blocks.to_vec(),
    }
}
