//! Document command tests

use reportkit_blocks::{BlockId, BlockKind, BlockType, ValidationError};
use reportkit_editor::{Document, EditorError, MutationError};
use serde_json::json;

fn ids(doc: &Document) -> Vec<BlockId> {
    doc.blocks().iter().map(|b| b.id.clone()).collect()
}

#[test]
fn test_add_uses_type_defaults() {
    let mut doc = Document::new("report");
    let id = doc.add(BlockType::Chart).unwrap();

    let block = doc.find(&id).unwrap();
    match &block.kind {
        BlockKind::Chart(chart) => {
            assert_eq!(chart.data_keys, vec!["value".to_string()]);
            assert_eq!(chart.colors.len(), 3);
        }
        other => panic!("expected chart, got {:?}", other),
    }
}

#[test]
fn test_update_deep_merges_into_group_child() {
    let mut doc = Document::new("report");
    let group = doc.add(BlockType::Group).unwrap();
    let metric = doc.add_to_group(&group, BlockType::Metric).unwrap();

    doc.update(&metric, json!({"title": "Patients", "metric": "patients"}))
        .unwrap();

    let block = doc.find(&metric).unwrap();
    assert_eq!(block.title.as_deref(), Some("Patients"));
    match &block.kind {
        BlockKind::Metric(m) => {
            assert_eq!(m.metric, Some(reportkit_blocks::MetricKey::Patients));
            assert!(m.currency, "untouched fields survive the merge");
        }
        other => panic!("expected metric, got {:?}", other),
    }
}

#[test]
fn test_update_rejects_invalid_without_mutating() {
    let mut doc = Document::new("report");
    let metric = doc.add(BlockType::Metric).unwrap();
    let before = doc.snapshot();
    let version = doc.version;

    let err = doc.update(&metric, json!({"metric": null})).unwrap_err();

    assert!(matches!(
        err,
        EditorError::Mutation(MutationError::Validation(ValidationError::MissingField { .. }))
    ));
    assert_eq!(doc.snapshot(), before);
    assert_eq!(doc.version, version);
}

#[test]
fn test_update_patch_cannot_smuggle_duplicate_ids() {
    let mut doc = Document::new("report");
    let text = doc.add(BlockType::Text).unwrap();
    let group = doc.add(BlockType::Group).unwrap();

    let err = doc
        .update(
            &group,
            json!({"children": [{"id": text.as_str(), "type": "text", "content": "copy"}]}),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        EditorError::Mutation(MutationError::Validation(ValidationError::DuplicateId(_)))
    ));
}

#[test]
fn test_duplicate_inserts_after_source() {
    let mut doc = Document::new("report");
    let a = doc.add(BlockType::Text).unwrap();
    let b = doc.add(BlockType::Metric).unwrap();

    let copy = doc.duplicate(&a).unwrap();

    assert_eq!(ids(&doc), vec![a.clone(), copy.clone(), b]);
    assert_ne!(copy, a);
    assert_eq!(doc.find(&copy).unwrap().kind, doc.find(&a).unwrap().kind);
}

#[test]
fn test_duplicate_group_child_stays_in_group() {
    let mut doc = Document::new("report");
    let group = doc.add(BlockType::Group).unwrap();
    let child = doc.add_to_group(&group, BlockType::Metric).unwrap();

    let copy = doc.duplicate(&child).unwrap();

    let location = doc.locate(&copy).unwrap();
    assert_eq!(location.parent, Some(group));
    assert_eq!(location.index, 1);
    assert_eq!(doc.len(), 1);
}

#[test]
fn test_delete_cascades_to_children() {
    let mut doc = Document::new("report");
    let group = doc.add(BlockType::Group).unwrap();
    let child = doc.add_to_group(&group, BlockType::Text).unwrap();

    doc.delete(&group).unwrap();

    assert!(doc.find(&child).is_none());
    assert!(doc.is_empty());
}

#[test]
fn test_delete_missing_is_not_found() {
    let mut doc = Document::new("report");
    let err = doc.delete(&BlockId::from("ghost")).unwrap_err();

    assert!(err.is_not_found());
}

#[test]
fn test_move_up_first_and_move_down_last_are_noops() {
    let mut doc = Document::new("report");
    let a = doc.add(BlockType::Text).unwrap();
    let b = doc.add(BlockType::Metric).unwrap();
    let c = doc.add(BlockType::Chart).unwrap();
    let before = ids(&doc);

    assert!(!doc.move_up(&a).unwrap());
    assert!(!doc.move_down(&c).unwrap());
    assert_eq!(ids(&doc), before);

    assert!(doc.move_down(&a).unwrap());
    assert_eq!(ids(&doc), vec![b, a, c]);
}

#[test]
fn test_move_unknown_id_is_noop() {
    let mut doc = Document::new("report");
    doc.add(BlockType::Text).unwrap();

    assert!(!doc.move_up(&BlockId::from("ghost")).unwrap());
}

#[test]
fn test_reorder_is_array_move() {
    let mut doc = Document::new("report");
    let blocks: Vec<BlockId> = (0..4).map(|_| doc.add(BlockType::Text).unwrap()).collect();

    doc.reorder(0, 2).unwrap();
    assert_eq!(
        ids(&doc),
        vec![blocks[1].clone(), blocks[2].clone(), blocks[0].clone(), blocks[3].clone()]
    );

    doc.reorder(2, 0).unwrap();
    assert_eq!(ids(&doc), blocks);
}

#[test]
fn test_reorder_within_group() {
    let mut doc = Document::new("report");
    let group = doc.add(BlockType::Group).unwrap();
    let first = doc.add_to_group(&group, BlockType::Text).unwrap();
    let second = doc.add_to_group(&group, BlockType::Metric).unwrap();

    assert!(doc.reorder_in(Some(&group), 1, 0).unwrap());

    let children: Vec<BlockId> = doc.find(&group).unwrap().children().unwrap().iter().map(|b| b.id.clone()).collect();
    assert_eq!(children, vec![second, first]);
}

#[test]
fn test_add_page_break_to_group_rejected() {
    let mut doc = Document::new("report");
    let group = doc.add(BlockType::Group).unwrap();

    let err = doc.add_to_group(&group, BlockType::PageBreak).unwrap_err();
    assert!(matches!(
        err,
        EditorError::Mutation(MutationError::Validation(ValidationError::InvalidGroupChild { .. }))
    ));
}

#[test]
fn test_add_to_non_group_parent_fails() {
    let mut doc = Document::new("report");
    let text = doc.add(BlockType::Text).unwrap();

    let err = doc.add_to_group(&text, BlockType::Metric).unwrap_err();
    assert!(matches!(err, EditorError::Mutation(MutationError::ParentNotFound(_))));
}
