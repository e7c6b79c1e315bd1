//! Block representation for block documents.
//!
//! This module provides the core data structures for representing documents in
//! blockquill. A document is an ordered list of `Block`s; a block of type
//! `Columns` carries an ordered list of child blocks, which may themselves be
//! columns, so the model is a tree of unbounded depth.
//!
//! Attributes are stored in a single ordered map shared by every block type.
//! Which keys are meaningful depends on the type (see [`Attributes`]); keys a
//! type does not use are preserved on export and ignored by the typed readers.
//!
//! # Example
//!
//! ```
//! use blockquill::document::block::{Attributes, Block, BlockType};
//!
//! let heading = Block::new(
//!     "intro",
//!     BlockType::Heading,
//!     Attributes::new().with("level", 2).with("content", "Hello"),
//! );
//! assert_eq!(heading.attributes().level(), Some(2));
//! assert!(heading.inner_blocks().is_none());
//!
//! let columns = Block::columns("grid", Attributes::new(), vec![heading]);
//! assert_eq!(columns.inner_blocks().map(|c| c.len()), Some(1));
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier of a block. Unique across the whole tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for BlockId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for BlockId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// The closed set of block types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Heading,
    Paragraph,
    Image,
    Code,
    Spacer,
    Columns,
}

impl BlockType {
    pub const ALL: [BlockType; 6] = [
        BlockType::Heading,
        BlockType::Paragraph,
        BlockType::Image,
        BlockType::Code,
        BlockType::Spacer,
        BlockType::Columns,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Heading => "heading",
            BlockType::Paragraph => "paragraph",
            BlockType::Image => "image",
            BlockType::Code => "code",
            BlockType::Spacer => "spacer",
            BlockType::Columns => "columns",
        }
    }

    /// Parses a lowercase type name as used in exported documents.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// Only columns blocks may carry children.
    pub fn is_container(&self) -> bool {
        matches!(self, BlockType::Columns)
    }

    /// Attributes a freshly added block of this type starts with.
    pub fn default_attributes(&self) -> Attributes {
        match self {
            BlockType::Code => Attributes::new()
                .with("content", "// Code here...")
                .with("language", "javascript"),
            BlockType::Heading => Attributes::new().with("content", "").with("level", 2),
            BlockType::Spacer => Attributes::new().with("content", "").with("height", 40),
            BlockType::Columns => Attributes::new()
                .with("content", "")
                .with("columns", 2)
                .with("gap", 24)
                .with("layout", Layout::Equal.as_str())
                .with("verticalAlign", VerticalAlign::Start.as_str()),
            BlockType::Paragraph | BlockType::Image => Attributes::new().with("content", ""),
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column width ratio of a columns block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Equal,
    SeventyThirty,
    ThirtySeventy,
    QuarterHalfQuarter,
    WideCenter,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Equal => "equal",
            Layout::SeventyThirty => "70-30",
            Layout::ThirtySeventy => "30-70",
            Layout::QuarterHalfQuarter => "25-50-25",
            Layout::WideCenter => "wide-center",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "equal" => Some(Layout::Equal),
            "70-30" => Some(Layout::SeventyThirty),
            "30-70" => Some(Layout::ThirtySeventy),
            "25-50-25" => Some(Layout::QuarterHalfQuarter),
            "wide-center" => Some(Layout::WideCenter),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlign {
    Start,
    Center,
    End,
}

impl VerticalAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerticalAlign::Start => "start",
            VerticalAlign::Center => "center",
            VerticalAlign::End => "end",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "start" => Some(VerticalAlign::Start),
            "center" => Some(VerticalAlign::Center),
            "end" => Some(VerticalAlign::End),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    Small,
    Medium,
    Large,
    XLarge,
}

impl FontSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
            FontSize::XLarge => "xlarge",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "small" => Some(FontSize::Small),
            "medium" => Some(FontSize::Medium),
            "large" => Some(FontSize::Large),
            "xlarge" => Some(FontSize::XLarge),
            _ => None,
        }
    }
}

/// Open attribute map of a block.
///
/// Keys keep insertion order so exported documents are stable. The typed
/// readers below cover the recognized keys:
///
/// * `content`: heading, paragraph and code text (paragraph markup is opaque)
/// * `language`: code
/// * `level` (1-4): heading
/// * `url`, `caption`: image
/// * `height`: spacer, in pixels
/// * `columns`, `gap`, `layout`, `verticalAlign`: columns
/// * `backgroundColor`, `textColor`, `padding`, `borderRadius`, `fontSize`: any type
///
/// A reader returns `None` when the key is missing or holds a value of the
/// wrong shape. Values are never validated on write.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(IndexMap<String, Value>);

impl Attributes {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Shallow merge: keys of `patch` overwrite, all other keys are kept.
    pub fn merged(&self, patch: &Attributes) -> Attributes {
        let mut merged = self.0.clone();
        for (key, value) in &patch.0 {
            merged.insert(key.clone(), value.clone());
        }
        Attributes(merged)
    }

    fn str_of(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    fn f64_of(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    fn u64_of(&self, key: &str) -> Option<u64> {
        self.0.get(key).and_then(Value::as_u64)
    }

    pub fn content(&self) -> Option<&str> {
        self.str_of("content")
    }

    pub fn language(&self) -> Option<&str> {
        self.str_of("language")
    }

    /// Heading level, only when it is within 1-4.
    pub fn level(&self) -> Option<u8> {
        self.u64_of("level")
            .filter(|l| (1..=4).contains(l))
            .map(|l| l as u8)
    }

    pub fn url(&self) -> Option<&str> {
        self.str_of("url")
    }

    pub fn caption(&self) -> Option<&str> {
        self.str_of("caption")
    }

    pub fn height(&self) -> Option<f64> {
        self.f64_of("height")
    }

    pub fn columns(&self) -> Option<u64> {
        self.u64_of("columns")
    }

    pub fn gap(&self) -> Option<f64> {
        self.f64_of("gap")
    }

    /// Column layout; missing or unrecognized values read as `Layout::Equal`.
    pub fn layout(&self) -> Layout {
        self.str_of("layout")
            .and_then(Layout::parse)
            .unwrap_or_default()
    }

    pub fn vertical_align(&self) -> Option<VerticalAlign> {
        self.str_of("verticalAlign").and_then(VerticalAlign::parse)
    }

    pub fn background_color(&self) -> Option<&str> {
        self.str_of("backgroundColor")
    }

    pub fn text_color(&self) -> Option<&str> {
        self.str_of("textColor")
    }

    pub fn padding(&self) -> Option<f64> {
        self.f64_of("padding")
    }

    pub fn border_radius(&self) -> Option<f64> {
        self.f64_of("borderRadius")
    }

    pub fn font_size(&self) -> Option<FontSize> {
        self.str_of("fontSize").and_then(FontSize::parse)
    }
}

impl FromIterator<(String, Value)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Attributes(iter.into_iter().collect())
    }
}

/// A node in the document tree.
///
/// `inner_blocks` is `Some` (possibly empty) for columns blocks and `None`
/// for every other type. The id and type are fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BlockRecord")]
pub struct Block {
    id: BlockId,
    #[serde(rename = "type")]
    block_type: BlockType,
    #[serde(default)]
    attributes: Attributes,
    #[serde(
        rename = "innerBlocks",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    inner_blocks: Option<Vec<Block>>,
}

/// Wire form of a block. A columns block written without `innerBlocks` is
/// read as having an empty child list.
#[derive(Deserialize)]
struct BlockRecord {
    id: BlockId,
    #[serde(rename = "type")]
    block_type: BlockType,
    #[serde(default)]
    attributes: Attributes,
    #[serde(rename = "innerBlocks", default)]
    inner_blocks: Option<Vec<Block>>,
}

impl From<BlockRecord> for Block {
    fn from(record: BlockRecord) -> Self {
        Block::from_parts(
            record.id,
            record.block_type,
            record.attributes,
            record.inner_blocks,
        )
    }
}

impl Block {
    /// Creates a block; columns blocks start with an empty child list.
    pub fn new(id: impl Into<BlockId>, block_type: BlockType, attributes: Attributes) -> Self {
        let inner_blocks = block_type.is_container().then(Vec::new);
        Self {
            id: id.into(),
            block_type,
            attributes,
            inner_blocks,
        }
    }

    /// Creates a columns block with the given children.
    pub fn columns(id: impl Into<BlockId>, attributes: Attributes, children: Vec<Block>) -> Self {
        Self {
            id: id.into(),
            block_type: BlockType::Columns,
            attributes,
            inner_blocks: Some(children),
        }
    }

    /// Creates a block of `block_type` with that type's default attributes.
    pub fn with_defaults(id: impl Into<BlockId>, block_type: BlockType) -> Self {
        Self::new(id, block_type, block_type.default_attributes())
    }

    pub(crate) fn from_parts(
        id: BlockId,
        block_type: BlockType,
        attributes: Attributes,
        inner_blocks: Option<Vec<Block>>,
    ) -> Self {
        let inner_blocks = inner_blocks.or_else(|| block_type.is_container().then(Vec::new));
        Self {
            id,
            block_type,
            attributes,
            inner_blocks,
        }
    }

    pub fn id(&self) -> &BlockId {
        &self.id
    }

    pub fn block_type(&self) -> BlockType {
        self.block_type
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn inner_blocks(&self) -> Option<&[Block]> {
        self.inner_blocks.as_deref()
    }

    pub fn is_container(&self) -> bool {
        self.block_type.is_container()
    }

    /// Returns a copy with `attributes` replaced.
    pub fn with_attributes(&self, attributes: Attributes) -> Block {
        Block {
            attributes,
            ..self.clone()
        }
    }

    /// Returns a copy with the child list replaced.
    ///
    /// Non-container blocks never gain children; they are returned unchanged.
    pub fn with_inner_blocks(&self, children: Vec<Block>) -> Block {
        if !self.is_container() {
            return self.clone();
        }
        Block {
            inner_blocks: Some(children),
            ..self.clone()
        }
    }
}
