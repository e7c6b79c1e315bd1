//! Integration tests for the editor controller.

use blockquill::config::Config;
use blockquill::document::block::{Attributes, Block, BlockId, BlockType};
use blockquill::document::ids::SequentialIds;
use blockquill::document::pattern::find_pattern;
use blockquill::document::tree::{collect_ids, count_blocks, find_block, Document};
use blockquill::editor::state::{ActionOutcome, EditAction, EditorState, NEW_INNER_CONTENT};
use blockquill::file::saver::to_json_string;

fn editor(blocks: Vec<Block>) -> EditorState {
    EditorState::with_id_generator(
        Document::new("1.2.0", blocks),
        &Config::default(),
        Box::new(SequentialIds::new("b")),
    )
}

fn scenario_tree() -> Vec<Block> {
    vec![
        Block::with_defaults("1", BlockType::Heading),
        Block::columns(
            "2",
            Attributes::new(),
            vec![Block::new(
                "3",
                BlockType::Paragraph,
                Attributes::new().with("content", "<p>Hi</p>"),
            )],
        ),
    ]
}

fn created(outcome: ActionOutcome) -> BlockId {
    match outcome {
        ActionOutcome::Created(id) => id,
        other => panic!("expected a created block, got {:?}", other),
    }
}

#[test]
fn test_new_editor_is_clean() {
    let state = editor(scenario_tree());
    assert!(!state.is_dirty());
    assert!(state.selected_block().is_none());
    assert_eq!(state.blocks().len(), 2);
    assert_eq!(state.filename(), None);
}

#[test]
fn test_add_block_selects_it() {
    let mut state = editor(vec![]);
    let id = created(state.apply(EditAction::AddBlock(BlockType::Code)));

    assert_eq!(id, "b-1");
    assert!(state.is_dirty());
    let selected = state.selected_block().unwrap();
    assert_eq!(selected.id(), &id);
    assert_eq!(selected.attributes().language(), Some("javascript"));
}

#[test]
fn test_spacer_height_shows_in_export() {
    let mut state = editor(vec![]);
    let id = created(state.apply(EditAction::AddBlock(BlockType::Spacer)));
    assert_eq!(state.find(id.as_str()).unwrap().attributes().height(), Some(40.0));

    let outcome = state.apply(EditAction::UpdateAttributes {
        id: id.clone(),
        patch: Attributes::new().with("height", 100),
    });
    assert_eq!(outcome, ActionOutcome::Changed);

    let json = to_json_string(&state.document(), 2).unwrap();
    let exported: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(exported["version"], "1.2.0");
    assert_eq!(exported["blocks"][0]["id"], id.as_str());
    assert_eq!(exported["blocks"][0]["attributes"]["height"], 100);
}

#[test]
fn test_insert_pattern_appends_and_selects_first() {
    let mut state = editor(scenario_tree());
    let pattern = find_pattern("feature-grid").unwrap();

    let first = created(state.apply(EditAction::InsertPattern(pattern)));

    assert_eq!(state.blocks().len(), 4);
    assert_eq!(state.blocks()[2].id(), &first);
    assert_eq!(state.selection().active(), Some(&first));
    assert_eq!(count_blocks(state.blocks()), 7);
    assert_eq!(collect_ids(state.blocks()).len(), 7);
}

#[test]
fn test_duplicate_nested_selects_copy() {
    let mut state = editor(scenario_tree());
    let copy = created(state.apply(EditAction::Duplicate { id: "3".into() }));

    let inner = state.find("2").unwrap().inner_blocks().unwrap();
    assert_eq!(inner.len(), 2);
    assert_eq!(inner[1].id(), &copy);
    assert_eq!(inner[1].attributes(), inner[0].attributes());
    assert!(state.selection().is_selected(copy.as_str()));
}

#[test]
fn test_remove_selected_clears_selection() {
    let mut state = editor(scenario_tree());
    state.apply(EditAction::Select(Some("3".into())));
    assert_eq!(state.selected_block().unwrap().id(), "3");

    assert_eq!(
        state.apply(EditAction::Remove { id: "2".into() }),
        ActionOutcome::Changed
    );
    assert!(state.find("3").is_none());
    assert_eq!(state.selection().active(), None);
}

#[test]
fn test_remove_other_block_keeps_selection() {
    let mut state = editor(scenario_tree());
    state.apply(EditAction::Select(Some("3".into())));
    state.apply(EditAction::Remove { id: "1".into() });
    assert!(state.selection().is_selected("3"));
}

#[test]
fn test_missing_targets_are_noops() {
    let mut state = editor(scenario_tree());
    let before = state.blocks().to_vec();

    let actions = vec![
        EditAction::Remove { id: "x".into() },
        EditAction::Duplicate { id: "x".into() },
        EditAction::UpdateAttributes {
            id: "x".into(),
            patch: Attributes::new().with("content", "?"),
        },
        EditAction::MoveRoot {
            source: "1".into(),
            target: "x".into(),
        },
        EditAction::AddInner {
            parent_id: "1".into(),
        },
        EditAction::ReplaceInner {
            parent_id: "x".into(),
            blocks: vec![],
        },
    ];
    for action in actions {
        assert_eq!(state.apply(action), ActionOutcome::Unchanged);
    }
    assert_eq!(state.blocks(), before.as_slice());
    assert!(!state.is_dirty());
}

#[test]
fn test_empty_patch_does_not_dirty() {
    let mut state = editor(scenario_tree());
    let outcome = state.apply(EditAction::UpdateAttributes {
        id: "3".into(),
        patch: Attributes::new(),
    });
    assert_eq!(outcome, ActionOutcome::Unchanged);
    assert!(!state.is_dirty());
}

#[test]
fn test_move_root_and_inner() {
    let mut state = editor(scenario_tree());
    state.apply(EditAction::MoveRoot {
        source: "1".into(),
        target: "2".into(),
    });
    assert_eq!(state.blocks()[0].id(), "2");

    state.apply(EditAction::AddInner {
        parent_id: "2".into(),
    });
    let outcome = state.apply(EditAction::MoveInner {
        parent_id: "2".into(),
        source: "b-1".into(),
        target: "3".into(),
    });
    assert_eq!(outcome, ActionOutcome::Changed);
    let inner = state.find("2").unwrap().inner_blocks().unwrap();
    assert_eq!(inner[0].id(), "b-1");
    assert_eq!(inner[0].attributes().content(), Some(NEW_INNER_CONTENT));
}

#[test]
fn test_add_inner_respects_configured_cap() {
    let config = Config {
        max_inner_blocks: 2,
        ..Config::default()
    };
    let mut state = EditorState::with_id_generator(
        Document::new("1.2.0", scenario_tree()),
        &config,
        Box::new(SequentialIds::new("b")),
    );
    let add = || EditAction::AddInner {
        parent_id: "2".into(),
    };

    assert!(matches!(state.apply(add()), ActionOutcome::Created(_)));
    assert_eq!(state.apply(add()), ActionOutcome::Unchanged);
    assert_eq!(state.find("2").unwrap().inner_blocks().unwrap().len(), 2);
}

#[test]
fn test_replace_inner_from_container_surface() {
    let mut state = editor(scenario_tree());
    let children = vec![
        Block::new("left", BlockType::Image, Attributes::new().with("url", "a.png")),
        Block::new("right", BlockType::Paragraph, Attributes::new()),
    ];
    state.apply(EditAction::ReplaceInner {
        parent_id: "2".into(),
        blocks: children.clone(),
    });
    assert_eq!(state.find("2").unwrap().inner_blocks().unwrap(), children.as_slice());
    assert!(find_block(state.blocks(), "3").is_none());
}

#[test]
fn test_ids_stay_unique_over_many_actions() {
    let mut state = editor(scenario_tree());
    for block_type in BlockType::ALL {
        state.apply(EditAction::AddBlock(block_type));
    }
    state.apply(EditAction::InsertPattern(find_pattern("hero-with-image").unwrap()));
    state.apply(EditAction::Duplicate { id: "2".into() });
    state.apply(EditAction::Duplicate { id: "3".into() });

    let total = count_blocks(state.blocks());
    assert_eq!(collect_ids(state.blocks()).len(), total);
    assert!(state.document().validate().is_ok());
}

#[test]
fn test_clear_dirty_after_save() {
    let mut state = editor(vec![]);
    state.apply(EditAction::AddBlock(BlockType::Paragraph));
    state.set_filename("page.json".to_string());
    state.clear_dirty();
    assert!(!state.is_dirty());
    assert_eq!(state.filename(), Some("page.json"));
}
