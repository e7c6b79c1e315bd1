//! Pure tree transforms.
//!
//! Every function here takes a block tree by reference and returns a new tree.
//! The input is never modified, so a caller holding the previous tree can
//! compare, keep it for undo, or discard it.
//!
//! Nested edits are applied top-down: the target's path is resolved from the
//! root, the list containing the target is rewritten, and every ancestor on the
//! path is rebuilt around the new list. No node keeps a reference to its parent.
//!
//! A target that cannot be found (unknown id, out-of-range path, path through a
//! non-columns block) is not an error: the returned tree equals the input.

use super::block::{Attributes, Block, BlockId};
use super::ids::{mint_unique, IdGenerator};
use super::tree::{collect_ids, find_block, find_path};
use std::collections::HashSet;

/// Rewrites the child list at `parent_path` (empty path = root list) with `f`
/// and rebuilds every ancestor. Returns `None` if the path does not resolve to
/// a list or `f` declines.
fn rewrite_list<F>(blocks: &[Block], parent_path: &[usize], f: F) -> Option<Vec<Block>>
where
    F: FnOnce(&[Block]) -> Option<Vec<Block>>,
{
    match parent_path.split_first() {
        None => f(blocks),
        Some((&index, rest)) => {
            let node = blocks.get(index)?;
            let new_inner = rewrite_list(node.inner_blocks()?, rest, f)?;
            let mut rebuilt = blocks.to_vec();
            rebuilt[index] = node.with_inner_blocks(new_inner);
            Some(rebuilt)
        }
    }
}

/// Applies `f` to the block at `path`, leaving its siblings in place.
fn rewrite_block<F>(blocks: &[Block], path: &[usize], f: F) -> Option<Vec<Block>>
where
    F: FnOnce(&Block) -> Option<Block>,
{
    let (&index, parent_path) = path.split_last()?;
    rewrite_list(blocks, parent_path, |list| {
        let replacement = f(list.get(index)?)?;
        let mut rebuilt = list.to_vec();
        rebuilt[index] = replacement;
        Some(rebuilt)
    })
}

/// Merges `patch` into the attributes of the block at `path`.
pub fn update_at_path(blocks: &[Block], path: &[usize], patch: &Attributes) -> Vec<Block> {
    rewrite_block(blocks, path, |block| {
        Some(block.with_attributes(block.attributes().merged(patch)))
    })
    .unwrap_or_else(|| blocks.to_vec())
}

/// Removes the block at `path` together with its subtree.
pub fn remove_at_path(blocks: &[Block], path: &[usize]) -> Vec<Block> {
    let Some((&index, parent_path)) = path.split_last() else {
        return blocks.to_vec();
    };
    rewrite_list(blocks, parent_path, |list| {
        if index >= list.len() {
            return None;
        }
        let mut rebuilt = list.to_vec();
        rebuilt.remove(index);
        Some(rebuilt)
    })
    .unwrap_or_else(|| blocks.to_vec())
}

/// Replaces the children of the columns block at `path`.
pub fn replace_inner_at_path(blocks: &[Block], path: &[usize], new_inner: Vec<Block>) -> Vec<Block> {
    if path.is_empty() {
        return blocks.to_vec();
    }
    rewrite_list(blocks, path, |_| Some(new_inner)).unwrap_or_else(|| blocks.to_vec())
}

/// Shallow-merges `patch` into the attributes of the block with `id`, at any
/// depth. Keys in `patch` overwrite; every other key is kept.
pub fn update_attributes(blocks: &[Block], id: &str, patch: &Attributes) -> Vec<Block> {
    match find_path(blocks, id) {
        Some(path) => update_at_path(blocks, &path, patch),
        None => blocks.to_vec(),
    }
}

/// Removes the block with `id` and its subtree from wherever it occurs.
pub fn remove(blocks: &[Block], id: &str) -> Vec<Block> {
    match find_path(blocks, id) {
        Some(path) => remove_at_path(blocks, &path),
        None => blocks.to_vec(),
    }
}

/// Deep copy of `block` with a fresh id on the copy and every descendant.
pub fn copy_with_fresh_ids(
    block: &Block,
    ids: &mut dyn IdGenerator,
    taken: &mut HashSet<BlockId>,
) -> Block {
    let id = mint_unique(ids, taken);
    let inner = block.inner_blocks().map(|children| {
        children
            .iter()
            .map(|child| copy_with_fresh_ids(child, ids, taken))
            .collect()
    });
    Block::from_parts(id, block.block_type(), block.attributes().clone(), inner)
}

/// Copies the block with `id` (and its subtree, under fresh ids) and inserts
/// the copy right after the original in the same list.
///
/// Returns the new tree and the copy's id, or the unchanged tree and `None`
/// if `id` is not present.
pub fn duplicate(
    blocks: &[Block],
    id: &str,
    ids: &mut dyn IdGenerator,
) -> (Vec<Block>, Option<BlockId>) {
    let Some(path) = find_path(blocks, id) else {
        return (blocks.to_vec(), None);
    };
    let Some(original) = find_block(blocks, id) else {
        return (blocks.to_vec(), None);
    };

    let mut taken = collect_ids(blocks);
    let copy = copy_with_fresh_ids(original, ids, &mut taken);
    let copy_id = copy.id().clone();

    let Some((&index, parent_path)) = path.split_last() else {
        return (blocks.to_vec(), None);
    };
    match rewrite_list(blocks, parent_path, |list| {
        let mut rebuilt = list.to_vec();
        rebuilt.insert(index + 1, copy);
        Some(rebuilt)
    }) {
        Some(rebuilt) => (rebuilt, Some(copy_id)),
        None => (blocks.to_vec(), None),
    }
}

/// Appends `block` to the end of the root list.
pub fn append_top_level(blocks: &[Block], block: Block) -> Vec<Block> {
    let mut rebuilt = blocks.to_vec();
    rebuilt.push(block);
    rebuilt
}

/// Replaces the children of the columns block `parent_id`, at any depth.
///
/// This is how a container's own editing surface commits a locally computed
/// child list back into the document.
pub fn replace_inner(blocks: &[Block], parent_id: &str, new_inner: Vec<Block>) -> Vec<Block> {
    match find_path(blocks, parent_id) {
        Some(path) => replace_inner_at_path(blocks, &path, new_inner),
        None => blocks.to_vec(),
    }
}

/// Appends `block` to the children of the columns block `parent_id`.
///
/// Returns `false` (and the unchanged tree) if the parent is missing, is not a
/// columns block, or already holds `max_children` children.
pub fn append_inner(
    blocks: &[Block],
    parent_id: &str,
    block: Block,
    max_children: usize,
) -> (Vec<Block>, bool) {
    let Some(children) = find_block(blocks, parent_id).and_then(Block::inner_blocks) else {
        return (blocks.to_vec(), false);
    };
    if children.len() >= max_children {
        return (blocks.to_vec(), false);
    }
    let mut new_inner = children.to_vec();
    new_inner.push(block);
    (replace_inner(blocks, parent_id, new_inner), true)
}
