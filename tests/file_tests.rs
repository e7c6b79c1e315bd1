//! Integration tests for document export and import.

use blockquill::config::Config;
use blockquill::document::block::{Attributes, Block, BlockType};
use blockquill::document::tree::Document;
use blockquill::file::loader::{load_document_file, parse_document};
use blockquill::file::saver::{save_document_file, to_json_string};
use flate2::read::GzDecoder;
use std::fs;
use std::io::Read;
use tempfile::TempDir;

fn document() -> Document {
    Document::new(
        "1.2.0",
        vec![
            Block::new(
                "h",
                BlockType::Heading,
                Attributes::new().with("content", "Title").with("level", 1),
            ),
            Block::columns(
                "c",
                Attributes::new().with("layout", "wide-center"),
                vec![Block::new(
                    "p",
                    BlockType::Paragraph,
                    Attributes::new().with("content", "<p><b>Bold</b> text</p>"),
                )],
            ),
        ],
    )
}

#[test]
fn test_export_format() {
    let json = to_json_string(&document(), 2).unwrap();

    assert!(json.starts_with("{\n  \"version\": \"1.2.0\",\n  \"blocks\": ["));
    assert!(json.contains("\"type\": \"columns\""));
    assert!(json.contains("\"innerBlocks\": ["));
    // Leaf blocks carry no child list.
    assert_eq!(json.matches("innerBlocks").count(), 1);
    // Keys keep the order they were written in.
    let content = json.find("\"content\": \"Title\"").unwrap();
    let level = json.find("\"level\": 1").unwrap();
    assert!(content < level);
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("page.json");

    save_document_file(&path, &document(), &Config::default()).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.ends_with("}\n"));

    let loaded = load_document_file(&path).unwrap();
    assert_eq!(loaded, document());
}

#[test]
fn test_gzip_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("page.json.gz");

    save_document_file(&path, &document(), &Config::default()).unwrap();

    let mut decoded = String::new();
    GzDecoder::new(fs::File::open(&path).unwrap())
        .read_to_string(&mut decoded)
        .unwrap();
    assert!(decoded.contains("\"version\": \"1.2.0\""));

    assert_eq!(load_document_file(&path).unwrap(), document());
}

#[test]
fn test_backup_created_when_enabled() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("page.json");
    fs::write(&path, "old contents").unwrap();

    let config = Config {
        create_backup: true,
        ..Config::default()
    };
    save_document_file(&path, &document(), &config).unwrap();

    let backup = dir.path().join("page.json.bak");
    assert_eq!(fs::read_to_string(backup).unwrap(), "old contents");
    assert!(load_document_file(&path).is_ok());
}

#[test]
fn test_no_backup_by_default() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("page.json");
    fs::write(&path, "old contents").unwrap();

    save_document_file(&path, &document(), &Config::default()).unwrap();
    assert!(!dir.path().join("page.json.bak").exists());
    assert!(!dir.path().join("page.tmp").exists());
}

#[test]
fn test_indent_size_from_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("page.json");
    let config = Config {
        indent_size: 4,
        ..Config::default()
    };

    save_document_file(&path, &document(), &config).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("{\n    \"version\""));
}

#[test]
fn test_columns_without_child_list_exports_empty_list() {
    let json = r#"{"version":"1.2.0","blocks":[{"id":"c","type":"columns","attributes":{}}]}"#;
    let document = parse_document(json).unwrap();
    assert_eq!(document.blocks[0].inner_blocks(), Some(&[][..]));

    let exported: serde_json::Value =
        serde_json::from_str(&to_json_string(&document, 2).unwrap()).unwrap();
    assert_eq!(exported["blocks"][0]["innerBlocks"], serde_json::json!([]));
}

#[test]
fn test_import_rejects_duplicate_ids() {
    let json = r#"{"version":"1.2.0","blocks":[
        {"id":"a","type":"heading","attributes":{}},
        {"id":"k","type":"columns","attributes":{},"innerBlocks":[
            {"id":"a","type":"paragraph","attributes":{}}
        ]}
    ]}"#;
    let err = parse_document(json).unwrap_err();
    assert!(format!("{:#}", err).contains("Duplicate block id: a"));
}

#[test]
fn test_import_rejects_unknown_type() {
    let json = r#"{"version":"1.2.0","blocks":[{"id":"a","type":"table","attributes":{}}]}"#;
    assert!(parse_document(json).is_err());
}

#[test]
fn test_load_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    assert!(load_document_file(dir.path().join("absent.json")).is_err());
}
