//! File I/O for block documents.
//!
//! This module exports documents to JSON files with atomic writes and optional
//! backups, and loads exported documents back from disk or stdin.

pub mod loader;
pub mod saver;
