//! Block document model.
//!
//! - `block`: block, type and attribute definitions
//! - `ids`: fresh id minting
//! - `tree`: lookup, paths, traversal and validation
//! - `mutations`: pure tree transforms (update, remove, duplicate, append, replace)
//! - `ordering`: sibling reordering for drag-and-drop
//! - `pattern`: block templates and their expansion
//! - `error`: document errors

pub mod block;
pub mod error;
pub mod ids;
pub mod mutations;
pub mod ordering;
pub mod pattern;
pub mod tree;
