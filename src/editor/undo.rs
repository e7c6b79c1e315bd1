//! Undo/redo system with branching undo tree.
//!
//! This module implements vim-style undo/redo with a branching tree structure
//! that preserves edit history. When you undo then make a new edit, the old
//! "future" is preserved as a branch that can still be reached with redo until
//! it is pruned.
//!
//! # Architecture
//!
//! - `EditorSnapshot`: Captures the block tree and selection at a point in time
//! - `UndoNode`: Tree node containing snapshot, parent, children, and metadata
//! - `UndoTree`: Manages the tree structure, navigation and pruning

use crate::document::block::{Block, BlockId};
use std::time::SystemTime;

/// Snapshot of editor state at a specific point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSnapshot {
    pub blocks: Vec<Block>,
    pub selection: Option<BlockId>,
}

/// A node in the undo tree.
#[derive(Debug, Clone)]
pub struct UndoNode {
    pub snapshot: EditorSnapshot,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub timestamp: SystemTime,
    pub seq: u64,
}

impl UndoNode {
    pub fn new(snapshot: EditorSnapshot, parent: Option<usize>, seq: u64) -> Self {
        Self {
            snapshot,
            parent,
            children: Vec::new(),
            timestamp: SystemTime::now(),
            seq,
        }
    }
}

/// Branching undo tree for managing edit history.
///
/// Node 0 is always the oldest state still kept. Children are always stored
/// after their parent, so indices grow along every branch.
///
/// ```text
///     0 (initial)
///     |
///     1 (edit A)
///    / \
///   2   3 (branching: undo, then two different edits)
///   |
///   4
/// ```
#[derive(Debug)]
pub struct UndoTree {
    pub nodes: Vec<UndoNode>,
    current: usize,
    next_seq: u64,
    limit: usize,
}

impl UndoTree {
    /// Creates a new undo tree with an initial snapshot.
    ///
    /// `limit` is the most nodes kept; values below 1 are treated as 1.
    pub fn new(initial_snapshot: EditorSnapshot, limit: usize) -> Self {
        let root = UndoNode::new(initial_snapshot, None, 0);
        Self {
            nodes: vec![root],
            current: 0,
            next_seq: 1,
            limit: limit.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Adds a new checkpoint as a child of the current node and moves to it.
    ///
    /// Prunes the oldest history once the tree holds more than `limit` nodes.
    pub fn add_checkpoint(&mut self, snapshot: EditorSnapshot) {
        let seq = self.next_seq;
        self.next_seq += 1;

        let new_node = UndoNode::new(snapshot, Some(self.current), seq);
        let new_index = self.nodes.len();

        self.nodes[self.current].children.push(new_index);
        self.nodes.push(new_node);
        self.current = new_index;

        self.prune();
    }

    /// Drops the root and every branch that does not lead to the current node,
    /// until the tree fits within the limit or the current node is the root.
    fn prune(&mut self) {
        while self.nodes.len() > self.limit && self.current != 0 {
            // The root's child on the way to the current node becomes the new root.
            let mut keep = self.current;
            while let Some(parent) = self.nodes[keep].parent {
                if parent == 0 {
                    break;
                }
                keep = parent;
            }

            let mut retained = Vec::new();
            let mut stack = vec![keep];
            while let Some(index) = stack.pop() {
                retained.push(index);
                stack.extend(self.nodes[index].children.iter().copied());
            }
            retained.sort_unstable();

            let mut remap = vec![None; self.nodes.len()];
            for (new_index, &old_index) in retained.iter().enumerate() {
                remap[old_index] = Some(new_index);
            }

            let mut old_nodes: Vec<Option<UndoNode>> =
                std::mem::take(&mut self.nodes).into_iter().map(Some).collect();
            self.nodes = retained
                .iter()
                .filter_map(|&old_index| old_nodes[old_index].take())
                .map(|mut node| {
                    node.parent = node.parent.and_then(|p| remap[p]);
                    node.children = node.children.iter().filter_map(|&c| remap[c]).collect();
                    node
                })
                .collect();
            self.current = remap[self.current].unwrap_or(0);
        }
    }

    /// Undoes to the parent node.
    ///
    /// Returns the snapshot to restore, or None if already at root.
    pub fn undo(&mut self) -> Option<EditorSnapshot> {
        let parent_idx = self.nodes[self.current].parent?;
        self.current = parent_idx;
        Some(self.nodes[parent_idx].snapshot.clone())
    }

    /// Redoes to a child node.
    ///
    /// Follows the newest branch (child with highest sequence number).
    /// Returns the snapshot to restore, or None if no children exist.
    pub fn redo(&mut self) -> Option<EditorSnapshot> {
        let newest_child_idx = self.nodes[self.current]
            .children
            .iter()
            .max_by_key(|&&child_idx| self.nodes[child_idx].seq)
            .copied()?;

        self.current = newest_child_idx;
        Some(self.nodes[newest_child_idx].snapshot.clone())
    }
}
