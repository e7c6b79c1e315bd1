//! Editor state management.
//!
//! This module provides the `EditorState` struct that owns all runtime state
//! of the editor: the block tree, the selection, the undo history, the dirty
//! flag (unsaved changes) and the optional filename.
//!
//! The tree is only ever changed through [`EditorState::apply`], which takes an
//! [`EditAction`], runs the matching pure transform from
//! [`crate::document`], and commits the result. Views read the tree through
//! [`EditorState::blocks`] and never get mutable access to it.
//!
//! # Example
//!
//! ```
//! use blockquill::config::Config;
//! use blockquill::document::block::BlockType;
//! use blockquill::document::tree::Document;
//! use blockquill::editor::state::{ActionOutcome, EditAction, EditorState};
//!
//! let mut state = EditorState::new(Document::default(), &Config::default());
//! assert!(!state.is_dirty());
//!
//! let outcome = state.apply(EditAction::AddBlock(BlockType::Spacer));
//! let ActionOutcome::Created(id) = outcome else { panic!("spacer not created") };
//!
//! assert!(state.is_dirty());
//! assert_eq!(state.selection().active(), Some(&id));
//! assert_eq!(state.selected_block().unwrap().attributes().height(), Some(40.0));
//! ```

use super::generation::{
    content_from_result, suggestion_or_empty, ContentGenerator, GenerationError,
    GenerationTicket, GenerationTracker,
};
use super::selection::Selection;
use super::undo::{EditorSnapshot, UndoTree};
use crate::config::Config;
use crate::document::block::{Attributes, Block, BlockId, BlockType};
use crate::document::ids::{mint_unique, IdGenerator, UuidIds};
use crate::document::mutations;
use crate::document::ordering;
use crate::document::pattern::{expand_pattern, Pattern};
use crate::document::tree::{collect_ids, find_block, Document};

/// Content of a paragraph added through a columns block's own "add" button.
pub const NEW_INNER_CONTENT: &str = "<p>New column content...</p>";

/// A user-initiated change, as delivered by the editing surface.
#[derive(Debug, Clone, PartialEq)]
pub enum EditAction {
    /// Append a block of this type with default attributes to the root.
    AddBlock(BlockType),

    /// Expand a pattern and append its blocks to the root.
    InsertPattern(Pattern),

    /// Shallow-merge attributes into a block at any depth.
    UpdateAttributes { id: BlockId, patch: Attributes },

    /// Remove a block and its subtree.
    Remove { id: BlockId },

    /// Copy a block (fresh ids throughout) right after itself.
    Duplicate { id: BlockId },

    /// Drag-and-drop completion at root level.
    MoveRoot { source: BlockId, target: BlockId },

    /// Commit a child list computed by a columns block's own surface.
    ReplaceInner {
        parent_id: BlockId,
        blocks: Vec<Block>,
    },

    /// Add a placeholder paragraph to a columns block.
    AddInner { parent_id: BlockId },

    /// Reorder two children of a columns block.
    MoveInner {
        parent_id: BlockId,
        source: BlockId,
        target: BlockId,
    },

    /// Change or clear the active block.
    Select(Option<BlockId>),
}

/// What an action did to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Nothing changed (target missing, container full, or a no-op edit).
    Unchanged,
    /// The tree or selection changed.
    Changed,
    /// A block was created; its id is now selected.
    Created(BlockId),
}

/// Manages the complete runtime state of the editor.
///
/// `EditorState` is the single owner of the block tree. It holds:
/// - The root block list
/// - The selection (at most one block id)
/// - The branching undo history
/// - A dirty flag indicating unsaved changes
/// - An optional filename for the document
/// - The id source used for every new block
/// - Outstanding content-generation tickets
pub struct EditorState {
    blocks: Vec<Block>,
    version: String,
    selection: Selection,
    dirty: bool,
    filename: Option<String>,
    undo_tree: UndoTree,
    ids: Box<dyn IdGenerator>,
    generations: GenerationTracker,
    max_inner_blocks: usize,
    default_language: String,
}

impl EditorState {
    /// Creates an editor over `document` with random block ids.
    pub fn new(document: Document, config: &Config) -> Self {
        Self::with_id_generator(document, config, Box::new(UuidIds))
    }

    /// Creates an editor that draws new block ids from `ids`.
    ///
    /// The exported version tag is taken from `config`; the document's own tag
    /// is only kept if the config leaves it empty.
    pub fn with_id_generator(
        document: Document,
        config: &Config,
        ids: Box<dyn IdGenerator>,
    ) -> Self {
        let Document { version, blocks } = document;
        let version = if config.export_version.is_empty() {
            version
        } else {
            config.export_version.clone()
        };

        let initial_snapshot = EditorSnapshot {
            blocks: blocks.clone(),
            selection: None,
        };

        Self {
            blocks,
            version,
            selection: Selection::new(),
            dirty: false,
            filename: None,
            undo_tree: UndoTree::new(initial_snapshot, config.undo_limit),
            ids,
            generations: GenerationTracker::new(),
            max_inner_blocks: config.max_inner_blocks,
            default_language: config.default_language.clone(),
        }
    }

    /// Read-only view of the root block list.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The selected block, resolved against the current tree.
    pub fn selected_block(&self) -> Option<&Block> {
        self.selection.resolve(&self.blocks)
    }

    pub fn find(&self, id: &str) -> Option<&Block> {
        find_block(&self.blocks, id)
    }

    /// Versioned snapshot of the current tree for export.
    pub fn document(&self) -> Document {
        Document::new(self.version.clone(), self.blocks.clone())
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn set_filename(&mut self, filename: String) {
        self.filename = Some(filename);
    }

    /// Applies one action and reports what changed.
    ///
    /// Actions whose target no longer exists are silent no-ops: the editing
    /// surface may have queued them against an older tree.
    pub fn apply(&mut self, action: EditAction) -> ActionOutcome {
        tracing::debug!("applying {:?}", action);

        match action {
            EditAction::AddBlock(block_type) => {
                let mut taken = collect_ids(&self.blocks);
                let id = mint_unique(self.ids.as_mut(), &mut taken);
                let block = Block::with_defaults(id.clone(), block_type);
                let blocks = mutations::append_top_level(&self.blocks, block);
                self.commit(blocks, Some(id.clone()));
                ActionOutcome::Created(id)
            }

            EditAction::InsertPattern(pattern) => {
                let mut taken = collect_ids(&self.blocks);
                let created = expand_pattern(&pattern, self.ids.as_mut(), &mut taken);
                let Some(first) = created.first().map(|b| b.id().clone()) else {
                    tracing::debug!("pattern {} has no blocks", pattern.id);
                    return ActionOutcome::Unchanged;
                };
                let mut blocks = self.blocks.clone();
                blocks.extend(created);
                self.commit(blocks, Some(first.clone()));
                ActionOutcome::Created(first)
            }

            EditAction::UpdateAttributes { id, patch } => {
                let blocks = mutations::update_attributes(&self.blocks, id.as_str(), &patch);
                self.commit_if_changed(blocks)
            }

            EditAction::Remove { id } => {
                let blocks = mutations::remove(&self.blocks, id.as_str());
                self.commit_if_changed(blocks)
            }

            EditAction::Duplicate { id } => {
                let (blocks, copy_id) =
                    mutations::duplicate(&self.blocks, id.as_str(), self.ids.as_mut());
                match copy_id {
                    Some(copy_id) => {
                        self.commit(blocks, Some(copy_id.clone()));
                        ActionOutcome::Created(copy_id)
                    }
                    None => self.unchanged("duplicate", &id),
                }
            }

            EditAction::MoveRoot { source, target } => {
                let blocks = ordering::move_root(&self.blocks, source.as_str(), target.as_str());
                self.commit_if_changed(blocks)
            }

            EditAction::ReplaceInner { parent_id, blocks } => {
                let blocks = mutations::replace_inner(&self.blocks, parent_id.as_str(), blocks);
                self.commit_if_changed(blocks)
            }

            EditAction::AddInner { parent_id } => {
                let mut taken = collect_ids(&self.blocks);
                let id = mint_unique(self.ids.as_mut(), &mut taken);
                let block = Block::new(
                    id.clone(),
                    BlockType::Paragraph,
                    Attributes::new().with("content", NEW_INNER_CONTENT),
                );
                let (blocks, added) = mutations::append_inner(
                    &self.blocks,
                    parent_id.as_str(),
                    block,
                    self.max_inner_blocks,
                );
                if !added {
                    return self.unchanged("add inner", &parent_id);
                }
                let selection = self.selection.active().cloned();
                self.commit(blocks, selection);
                ActionOutcome::Created(id)
            }

            EditAction::MoveInner {
                parent_id,
                source,
                target,
            } => {
                let blocks = ordering::move_inner(
                    &self.blocks,
                    parent_id.as_str(),
                    source.as_str(),
                    target.as_str(),
                );
                self.commit_if_changed(blocks)
            }

            EditAction::Select(id) => {
                let id = id.filter(|id| self.find(id.as_str()).is_some());
                if self.selection.active() == id.as_ref() {
                    return ActionOutcome::Unchanged;
                }
                self.selection.set(id);
                ActionOutcome::Changed
            }
        }
    }

    fn unchanged(&self, what: &str, id: &BlockId) -> ActionOutcome {
        tracing::debug!("{} on {} changed nothing", what, id);
        ActionOutcome::Unchanged
    }

    fn commit_if_changed(&mut self, blocks: Vec<Block>) -> ActionOutcome {
        if blocks == self.blocks {
            tracing::debug!("action left the document unchanged");
            return ActionOutcome::Unchanged;
        }
        let selection = self.selection.active().cloned();
        self.commit(blocks, selection);
        ActionOutcome::Changed
    }

    /// Installs a new tree, reconciles the selection and records a checkpoint.
    fn commit(&mut self, blocks: Vec<Block>, selection: Option<BlockId>) {
        self.blocks = blocks;
        self.selection.set(selection);
        if self.selection.retain_in(&self.blocks) {
            tracing::debug!("selected block left the document; selection cleared");
        }
        self.generations.forget_missing(&self.blocks);
        self.mark_dirty();
        self.checkpoint();
    }

    /// Captures the current editor state as an undo checkpoint.
    fn checkpoint(&mut self) {
        let snapshot = EditorSnapshot {
            blocks: self.blocks.clone(),
            selection: self.selection.active().cloned(),
        };
        self.undo_tree.add_checkpoint(snapshot);
    }

    fn restore(&mut self, snapshot: EditorSnapshot) {
        self.blocks = snapshot.blocks;
        self.selection.set(snapshot.selection);
        self.generations.forget_missing(&self.blocks);
        self.mark_dirty();
    }

    /// Undoes the last change. Returns false if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.undo_tree.undo() {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    /// Redoes the last undone change, following the newest branch. Returns
    /// false if there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.undo_tree.redo() {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    /// Starts a content-generation request for `block_id`.
    ///
    /// Returns `None` if the block is not in the document. Any earlier request
    /// for the same block is superseded.
    pub fn begin_generation(&mut self, block_id: &str) -> Option<GenerationTicket> {
        self.find(block_id)?;
        let ticket = self.generations.issue(BlockId::from(block_id));
        tracing::debug!("generation {} started for {}", ticket.seq, block_id);
        Some(ticket)
    }

    /// Applies the result of a generation request to the block's `content`.
    ///
    /// Results of superseded requests are dropped. Returns the outcome of the
    /// attribute update, or `Unchanged` for a stale ticket.
    pub fn finish_generation(
        &mut self,
        ticket: &GenerationTicket,
        result: Result<String, GenerationError>,
    ) -> ActionOutcome {
        if !self.generations.settle(ticket) {
            tracing::warn!(
                "dropping stale generation {} for {}",
                ticket.seq,
                ticket.block_id
            );
            return ActionOutcome::Unchanged;
        }
        let content = content_from_result(result);
        self.apply(EditAction::UpdateAttributes {
            id: ticket.block_id.clone(),
            patch: Attributes::new().with("content", content),
        })
    }

    /// Generates content for a code block and writes it, in one step.
    ///
    /// The language hint is the block's `language` attribute, falling back to
    /// the configured default. An empty prompt does nothing.
    pub fn run_generation(
        &mut self,
        block_id: &str,
        prompt: &str,
        generator: &dyn ContentGenerator,
    ) -> ActionOutcome {
        if prompt.trim().is_empty() {
            return ActionOutcome::Unchanged;
        }
        let Some(block) = self.find(block_id) else {
            return ActionOutcome::Unchanged;
        };
        let language = block
            .attributes()
            .language()
            .unwrap_or(&self.default_language)
            .to_string();

        let Some(ticket) = self.begin_generation(block_id) else {
            return ActionOutcome::Unchanged;
        };
        let result = generator.generate_code(prompt, &language);
        self.finish_generation(&ticket, result)
    }

    /// Asks the generator for a follow-up to `context`; empty on failure.
    pub fn suggest_content(&self, context: &str, generator: &dyn ContentGenerator) -> String {
        suggestion_or_empty(generator, context)
    }

    /// Number of content-generation requests still in flight.
    pub fn pending_generations(&self) -> usize {
        self.generations.pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ids::SequentialIds;

    fn state_with(blocks: Vec<Block>) -> EditorState {
        EditorState::with_id_generator(
            Document::new("1.2.0", blocks),
            &Config::default(),
            Box::new(SequentialIds::new("t")),
        )
    }

    #[test]
    fn test_select_missing_block_clears() {
        let mut state = state_with(vec![Block::with_defaults("a", BlockType::Heading)]);
        assert_eq!(
            state.apply(EditAction::Select(Some(BlockId::from("a")))),
            ActionOutcome::Changed
        );
        assert_eq!(
            state.apply(EditAction::Select(Some(BlockId::from("zzz")))),
            ActionOutcome::Changed
        );
        assert_eq!(state.selection().active(), None);
    }

    #[test]
    fn test_selection_does_not_dirty() {
        let mut state = state_with(vec![Block::with_defaults("a", BlockType::Heading)]);
        state.apply(EditAction::Select(Some(BlockId::from("a"))));
        assert!(!state.is_dirty());
        assert!(!state.undo());
    }

    #[test]
    fn test_add_inner_keeps_selection() {
        let mut state = state_with(vec![Block::columns("c", Attributes::new(), vec![])]);
        state.apply(EditAction::Select(Some(BlockId::from("c"))));
        let outcome = state.apply(EditAction::AddInner {
            parent_id: BlockId::from("c"),
        });
        assert_eq!(outcome, ActionOutcome::Created(BlockId::from("t-1")));
        assert!(state.selection().is_selected("c"));
        let child = state.find("t-1").unwrap();
        assert_eq!(child.attributes().content(), Some(NEW_INNER_CONTENT));
    }

    #[test]
    fn test_config_version_wins() {
        let config = Config {
            export_version: "2.0.0".to_string(),
            ..Config::default()
        };
        let state = EditorState::new(Document::new("1.0.0", vec![]), &config);
        assert_eq!(state.document().version, "2.0.0");
    }
}
