//! Text outline of a block tree.
//!
//! This module provides:
//! - `OutlineLine`: one displayable line per block, in document order
//! - `build_outline`: flattens a tree into lines
//! - `render_outline`: formats the lines as indented plain text

use crate::document::block::{Block, BlockId, BlockType};
use crate::document::tree::{walk, BlockPath};
use crate::editor::state::EditorState;

/// Longest preview shown for a block's text.
pub const PREVIEW_CHARS: usize = 48;

/// A single line in the outline.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineLine {
    /// Path to this block (indices at each level)
    pub path: BlockPath,
    /// Indentation depth (0 for root level)
    pub depth: usize,
    pub id: BlockId,
    pub block_type: BlockType,
    /// Short summary of the block's attributes
    pub preview: String,
    pub selected: bool,
}

/// Flattens `blocks` into outline lines, marking `selected` if present.
pub fn build_outline(blocks: &[Block], selected: Option<&BlockId>) -> Vec<OutlineLine> {
    walk(blocks)
        .map(|(path, block)| OutlineLine {
            depth: path.len().saturating_sub(1),
            path,
            id: block.id().clone(),
            block_type: block.block_type(),
            preview: block_preview(block, PREVIEW_CHARS),
            selected: selected.is_some_and(|id| id == block.id()),
        })
        .collect()
}

/// Outline of everything the editor currently holds.
pub fn outline_for(state: &EditorState) -> Vec<OutlineLine> {
    build_outline(state.blocks(), state.selection().active())
}

/// Formats outline lines, one per block, two spaces per level.
///
/// ```
/// use blockquill::document::block::{Attributes, Block, BlockType};
/// use blockquill::ui::outline::{build_outline, render_outline};
///
/// let blocks = vec![Block::new(
///     "intro",
///     BlockType::Heading,
///     Attributes::new().with("content", "Hello").with("level", 1),
/// )];
/// let text = render_outline(&build_outline(&blocks, None));
/// assert_eq!(text, "  heading intro: H1 Hello\n");
/// ```
pub fn render_outline(lines: &[OutlineLine]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(if line.selected { "> " } else { "  " });
        out.push_str(&"  ".repeat(line.depth));
        out.push_str(line.block_type.as_str());
        out.push(' ');
        out.push_str(line.id.as_str());
        if !line.preview.is_empty() {
            out.push_str(": ");
            out.push_str(&line.preview);
        }
        out.push('\n');
    }
    out
}

/// Short summary of a block, at most `max_chars` characters of its text.
pub fn block_preview(block: &Block, max_chars: usize) -> String {
    let attrs = block.attributes();
    let text = attrs
        .content()
        .map(|c| truncate(&strip_tags(c), max_chars))
        .unwrap_or_default();

    match block.block_type() {
        BlockType::Heading => {
            let level = attrs.level().unwrap_or(2);
            format!("H{} {}", level, text).trim_end().to_string()
        }
        BlockType::Paragraph => text,
        BlockType::Code => {
            let first_line = attrs
                .content()
                .and_then(|c| c.lines().next())
                .map(|l| truncate(l, max_chars))
                .unwrap_or_default();
            match attrs.language() {
                Some(lang) => format!("[{}] {}", lang, first_line).trim_end().to_string(),
                None => first_line,
            }
        }
        BlockType::Image => match (attrs.url(), attrs.caption()) {
            (Some(url), Some(caption)) if !caption.is_empty() => {
                format!("{} ({})", truncate(url, max_chars), caption)
            }
            (Some(url), _) => truncate(url, max_chars),
            (None, _) => "(no image)".to_string(),
        },
        BlockType::Spacer => format!("{}px", format_number(attrs.height().unwrap_or(0.0))),
        BlockType::Columns => {
            let children = block.inner_blocks().map_or(0, <[Block]>::len);
            let mut parts = vec![attrs.layout().as_str().to_string()];
            if let Some(gap) = attrs.gap() {
                parts.push(format!("gap {}", format_number(gap)));
            }
            parts.push(format!(
                "{} {}",
                children,
                if children == 1 { "block" } else { "blocks" }
            ));
            parts.join(", ")
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Drops anything between `<` and `>`.
fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.trim().to_string()
}

// Char-based to stay on UTF-8 boundaries.
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}
