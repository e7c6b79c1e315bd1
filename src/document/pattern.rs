//! Reusable block templates.
//!
//! A pattern is a named list of template blocks. Template blocks have the
//! shape of real blocks minus the id; ids are assigned when the pattern is
//! expanded into a document.

use super::block::{Attributes, Block, BlockId, BlockType};
use super::ids::{mint_unique, IdGenerator};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A block template without identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternBlock {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(
        rename = "innerBlocks",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub inner_blocks: Option<Vec<PatternBlock>>,
}

impl PatternBlock {
    pub fn new(block_type: BlockType, attributes: Attributes) -> Self {
        Self {
            block_type,
            attributes,
            inner_blocks: block_type.is_container().then(Vec::new),
        }
    }

    pub fn columns(attributes: Attributes, children: Vec<PatternBlock>) -> Self {
        Self {
            block_type: BlockType::Columns,
            attributes,
            inner_blocks: Some(children),
        }
    }

    /// Builds a real block, minting an id for this node and every descendant.
    pub fn instantiate(&self, ids: &mut dyn IdGenerator, taken: &mut HashSet<BlockId>) -> Block {
        let id = mint_unique(ids, taken);
        let inner = self.inner_blocks.as_ref().map(|children| {
            children
                .iter()
                .map(|child| child.instantiate(ids, taken))
                .collect()
        });
        Block::from_parts(id, self.block_type, self.attributes.clone(), inner)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: String,
    pub label: String,
    pub description: String,
    pub blocks: Vec<PatternBlock>,
}

/// Instantiates every template block of `pattern`, in template order.
///
/// `taken` must hold every id already in the document; the minted ids are
/// added to it, so they are unique among themselves and against the document.
pub fn expand_pattern(
    pattern: &Pattern,
    ids: &mut dyn IdGenerator,
    taken: &mut HashSet<BlockId>,
) -> Vec<Block> {
    pattern
        .blocks
        .iter()
        .map(|template| template.instantiate(ids, taken))
        .collect()
}

/// The patterns offered in the editor's pattern library.
pub fn builtin_patterns() -> Vec<Pattern> {
    vec![
        Pattern {
            id: "feature-grid".to_string(),
            label: "Feature Grid".to_string(),
            description: "2 Columns feature list".to_string(),
            blocks: vec![
                PatternBlock::new(
                    BlockType::Heading,
                    Attributes::new()
                        .with("level", 2)
                        .with("content", "Key features"),
                ),
                PatternBlock::columns(
                    Attributes::new()
                        .with("columns", 2)
                        .with("layout", "equal")
                        .with("gap", 30),
                    vec![
                        PatternBlock::new(
                            BlockType::Paragraph,
                            Attributes::new().with(
                                "content",
                                "Outstanding speed with AI built right into the editor.",
                            ),
                        ),
                        PatternBlock::new(
                            BlockType::Paragraph,
                            Attributes::new().with(
                                "content",
                                "An intuitive interface that keeps you focused on content, not mechanics.",
                            ),
                        ),
                    ],
                ),
            ],
        },
        Pattern {
            id: "hero-with-image".to_string(),
            label: "Hero Image Split".to_string(),
            description: "Image left, Text right".to_string(),
            blocks: vec![PatternBlock::columns(
                Attributes::new()
                    .with("columns", 2)
                    .with("layout", "equal")
                    .with("gap", 40),
                vec![
                    PatternBlock::new(
                        BlockType::Image,
                        Attributes::new()
                            .with("url", "https://picsum.photos/600/400")
                            .with("caption", "Product Shot"),
                    ),
                    PatternBlock::new(
                        BlockType::Heading,
                        Attributes::new()
                            .with("level", 2)
                            .with("content", "Elevate your creativity"),
                    ),
                ],
            )],
        },
    ]
}

/// Looks up a built-in pattern by id.
pub fn find_pattern(id: &str) -> Option<Pattern> {
    builtin_patterns().into_iter().find(|p| p.id == id)
}
