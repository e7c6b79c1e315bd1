//! Integration tests for the block model and tree traversal.

use blockquill::document::block::{Attributes, Block, BlockId, BlockType, FontSize, Layout};
use blockquill::document::error::DocumentError;
use blockquill::document::tree::{
    block_at, collect_ids, count_blocks, find_block, find_path, list_at, validate, walk,
    Document,
};
use serde_json::json;

fn heading_and_columns() -> Vec<Block> {
    vec![
        Block::new(
            "1",
            BlockType::Heading,
            Attributes::new().with("content", "Title").with("level", 2),
        ),
        Block::columns(
            "2",
            Attributes::new().with("layout", "30-70"),
            vec![Block::new(
                "3",
                BlockType::Paragraph,
                Attributes::new().with("content", "<p>Body</p>"),
            )],
        ),
    ]
}

#[test]
fn test_block_serializes_with_wire_names() {
    let blocks = heading_and_columns();
    let value = serde_json::to_value(&blocks).unwrap();

    assert_eq!(
        value,
        json!([
            {
                "id": "1",
                "type": "heading",
                "attributes": { "content": "Title", "level": 2 }
            },
            {
                "id": "2",
                "type": "columns",
                "attributes": { "layout": "30-70" },
                "innerBlocks": [
                    {
                        "id": "3",
                        "type": "paragraph",
                        "attributes": { "content": "<p>Body</p>" }
                    }
                ]
            }
        ])
    );
}

#[test]
fn test_empty_columns_keeps_inner_blocks_key() {
    let block = Block::with_defaults("c", BlockType::Columns);
    let value = serde_json::to_value(&block).unwrap();
    assert_eq!(value["innerBlocks"], json!([]));
    assert_eq!(value["attributes"]["verticalAlign"], "start");
}

#[test]
fn test_unknown_attributes_survive_round_trip() {
    let text = r#"{"id":"x","type":"image","attributes":{"url":"a.png","alt":"logo","level":"two"}}"#;
    let block: Block = serde_json::from_str(text).unwrap();

    assert_eq!(block.attributes().get("alt"), Some(&json!("logo")));
    // Wrong shape reads as absent, but is kept.
    assert_eq!(block.attributes().level(), None);
    assert_eq!(
        serde_json::to_value(&block).unwrap()["attributes"]["level"],
        "two"
    );
}

#[test]
fn test_typed_readers() {
    let attrs = Attributes::new()
        .with("level", 5)
        .with("layout", "diagonal")
        .with("fontSize", "xlarge")
        .with("padding", 12.5);

    assert_eq!(attrs.level(), None);
    assert_eq!(attrs.layout(), Layout::Equal);
    assert_eq!(attrs.font_size(), Some(FontSize::XLarge));
    assert_eq!(attrs.padding(), Some(12.5));
}

#[test]
fn test_default_attributes_per_type() {
    let code = Block::with_defaults("c", BlockType::Code);
    assert_eq!(code.attributes().content(), Some("// Code here..."));
    assert_eq!(code.attributes().language(), Some("javascript"));

    let heading = Block::with_defaults("h", BlockType::Heading);
    assert_eq!(heading.attributes().level(), Some(2));

    let spacer = Block::with_defaults("s", BlockType::Spacer);
    assert_eq!(spacer.attributes().height(), Some(40.0));

    let columns = Block::with_defaults("k", BlockType::Columns);
    assert_eq!(columns.attributes().columns(), Some(2));
    assert_eq!(columns.attributes().gap(), Some(24.0));
    assert_eq!(columns.inner_blocks(), Some(&[][..]));

    let image = Block::with_defaults("i", BlockType::Image);
    assert!(image.inner_blocks().is_none());
}

#[test]
fn test_lookup_at_every_depth() {
    let blocks = heading_and_columns();

    assert_eq!(find_block(&blocks, "3").unwrap().block_type(), BlockType::Paragraph);
    assert_eq!(find_path(&blocks, "2"), Some(vec![1]));
    assert_eq!(block_at(&blocks, &[1, 0]).unwrap().id(), "3");
    assert!(block_at(&blocks, &[0, 0]).is_none());
    assert_eq!(list_at(&blocks, &[1]).unwrap().len(), 1);
    assert_eq!(list_at(&blocks, &[]).unwrap().len(), 2);
    assert!(find_block(&blocks, "missing").is_none());
}

#[test]
fn test_walk_is_document_order() {
    let blocks = heading_and_columns();
    let order: Vec<(Vec<usize>, String)> = walk(&blocks)
        .map(|(path, block)| (path, block.id().to_string()))
        .collect();

    assert_eq!(
        order,
        vec![
            (vec![0], "1".to_string()),
            (vec![1], "2".to_string()),
            (vec![1, 0], "3".to_string()),
        ]
    );
    assert_eq!(count_blocks(&blocks), 3);
    assert!(collect_ids(&blocks).contains(&BlockId::from("3")));
}

#[test]
fn test_validate_rejects_duplicate_ids() {
    let blocks = vec![
        Block::new("same", BlockType::Paragraph, Attributes::new()),
        Block::columns(
            "c",
            Attributes::new(),
            vec![Block::new("same", BlockType::Paragraph, Attributes::new())],
        ),
    ];
    match validate(&blocks) {
        Err(DocumentError::DuplicateId(id)) => assert_eq!(id, "same"),
        other => panic!("expected duplicate id error, got {:?}", other),
    }
}

#[test]
fn test_validate_rejects_children_on_leaf() {
    let text = r#"[{"id":"p","type":"paragraph","attributes":{},"innerBlocks":[]}]"#;
    let blocks: Vec<Block> = serde_json::from_str(text).unwrap();
    assert!(matches!(
        validate(&blocks),
        Err(DocumentError::UnexpectedChildren(_))
    ));
}

#[test]
fn test_sample_document_is_valid() {
    let document = Document::sample();
    assert!(document.validate().is_ok());
    assert_eq!(document.blocks.len(), 2);
    assert_eq!(
        find_block(&document.blocks, "initial-2").unwrap().attributes().layout(),
        Layout::SeventyThirty
    );
}
