//! BlockQuill - a block-based content editor core.
//!
//! Documents are ordered trees of typed blocks (headings, paragraphs, images,
//! code, spacers and column containers). Every change is a pure transform that
//! returns a new tree; the editor controller in [`editor::state`] applies them,
//! tracks the selection and keeps undo history. Documents are exported to and
//! imported from versioned JSON.

pub mod config;
pub mod document;
pub mod editor;
pub mod file;
pub mod ui;
