//! Plain-text views of the document.
//!
//! - `outline`: indented one-line-per-block summary of the tree

pub mod outline;
