//! Editor state and history.
//!
//! This module provides the editor controller that owns the block tree and
//! applies every change to it.
//!
//! # Modules
//!
//! - `state`: Editor controller (tree, selection, dirty flag, actions)
//! - `selection`: The single active block
//! - `undo`: Branching undo history
//! - `generation`: Content-generation hand-off and request tickets
//!
//! # Example
//!
//! ```
//! use blockquill::config::Config;
//! use blockquill::document::pattern::find_pattern;
//! use blockquill::document::tree::Document;
//! use blockquill::editor::state::{EditAction, EditorState};
//!
//! let mut state = EditorState::new(Document::default(), &Config::default());
//! let pattern = find_pattern("feature-grid").unwrap();
//! state.apply(EditAction::InsertPattern(pattern));
//! assert_eq!(state.blocks().len(), 2);
//! ```

pub mod generation;
pub mod selection;
pub mod state;
pub mod undo;
