//! Session-level tests: pointer and keyboard reordering, export gate

use reportkit_blocks::{BlockId, BlockType};
use reportkit_editor::{
    Direction, Document, DragSource, DropOutcome, DropTarget, EditorError, ReorderProtocol,
    ReportSession,
};

fn doc_with(count: usize) -> (Document, Vec<BlockId>) {
    let mut doc = Document::new("integration");
    let ids = (0..count).map(|_| doc.add(BlockType::Text).unwrap()).collect();
    (doc, ids)
}

fn order(doc: &Document) -> Vec<BlockId> {
    doc.blocks().iter().map(|b| b.id.clone()).collect()
}

#[test]
fn test_pointer_and_keyboard_produce_same_move() {
    let (mut pointer_doc, ids) = doc_with(4);
    let mut keyboard_doc = pointer_doc.clone();

    // Pointer: drag block 2 onto block 1
    let mut pointer = ReorderProtocol::new();
    pointer.start(DragSource::Existing(ids[2].clone())).unwrap();
    let pointer_outcome = pointer
        .drop_on(DropTarget::Block(ids[1].clone()), &mut pointer_doc)
        .unwrap();

    // Keyboard: pick up block 2, one step up, commit
    let mut keyboard = ReorderProtocol::new();
    let keyboard_outcome = keyboard
        .keyboard_move(&ids[2], Direction::Up, &mut keyboard_doc)
        .unwrap();

    assert_eq!(
        pointer_outcome,
        DropOutcome::Moved { parent: None, from: 2, to: 1 }
    );
    assert_eq!(pointer_outcome, keyboard_outcome);
    assert_eq!(order(&pointer_doc), order(&keyboard_doc));
}

#[test]
fn test_keyboard_multi_step_matches_pointer_drop() {
    let (mut pointer_doc, ids) = doc_with(5);
    let mut keyboard_doc = pointer_doc.clone();

    let mut pointer = ReorderProtocol::new();
    pointer.start(DragSource::Existing(ids[0].clone())).unwrap();
    pointer
        .drop_on(DropTarget::Block(ids[3].clone()), &mut pointer_doc)
        .unwrap();

    let mut keyboard = ReorderProtocol::new();
    keyboard.pick_up(&ids[0], &keyboard_doc).unwrap();
    for _ in 0..3 {
        keyboard.step(Direction::Down, &keyboard_doc).unwrap();
    }
    keyboard.commit(&mut keyboard_doc).unwrap();

    assert_eq!(order(&pointer_doc), order(&keyboard_doc));
    assert_eq!(order(&pointer_doc)[3], ids[0]);
}

#[test]
fn test_keyboard_commit_in_place_is_unchanged() {
    let (mut doc, ids) = doc_with(3);
    let before = order(&doc);
    let mut protocol = ReorderProtocol::new();

    let outcome = protocol.keyboard_move(&ids[0], Direction::Up, &mut doc).unwrap();

    assert_eq!(outcome, DropOutcome::Unchanged);
    assert_eq!(order(&doc), before);
    assert!(!protocol.is_dragging());
}

#[test]
fn test_drop_across_lists_is_noop() {
    let mut doc = Document::new("integration");
    let group = doc.add(BlockType::Group).unwrap();
    let child = doc.add_to_group(&group, BlockType::Metric).unwrap();
    let root_text = doc.add(BlockType::Text).unwrap();
    let before = doc.snapshot();

    let mut protocol = ReorderProtocol::new();
    protocol.start(DragSource::Existing(child)).unwrap();
    let outcome = protocol
        .drop_on(DropTarget::Block(root_text), &mut doc)
        .unwrap();

    assert_eq!(outcome, DropOutcome::Unchanged);
    assert_eq!(doc.snapshot(), before);
}

#[test]
fn test_drop_on_self_is_noop() {
    let (mut doc, ids) = doc_with(2);
    let version = doc.version;
    let mut protocol = ReorderProtocol::new();

    protocol.start(DragSource::Existing(ids[1].clone())).unwrap();
    let outcome = protocol
        .drop_on(DropTarget::Block(ids[1].clone()), &mut doc)
        .unwrap();

    assert_eq!(outcome, DropOutcome::Unchanged);
    assert_eq!(doc.version, version);
}

#[test]
fn test_session_keyboard_move_is_undoable() {
    let (doc, ids) = doc_with(3);
    let mut session = ReportSession::new("kb", doc);

    session.keyboard_move(&ids[0], Direction::Down).unwrap();
    assert_eq!(session.document().blocks()[1].id, ids[0]);

    session.undo().unwrap();
    assert_eq!(order(session.document()), ids);
}

#[test]
fn test_session_template_drop_on_canvas() {
    let mut session = ReportSession::new("drag", Document::new("integration"));
    session.add(BlockType::Text).unwrap();

    session.start_drag(DragSource::Template(BlockType::Image)).unwrap();
    let outcome = session.drop_on(DropTarget::Canvas).unwrap();

    let DropOutcome::Added(id) = outcome else {
        panic!("expected add, got {:?}", outcome);
    };
    assert_eq!(session.document().blocks().last().unwrap().id, id);
    assert_eq!(session.document().find(&id).unwrap().block_type(), BlockType::Image);
}

#[test]
fn test_export_snapshot_is_isolated_from_later_edits() {
    let mut session = ReportSession::new("export", Document::new("integration"));
    let text = session.add(BlockType::Text).unwrap();

    let ticket = session.begin_export().unwrap();
    assert!(session.is_exporting());
    assert!(matches!(
        session.keyboard_move(&text, Direction::Down),
        Err(EditorError::ExportInProgress)
    ));
    let snapshot = ticket.blocks.clone();
    drop(ticket);

    assert!(!session.is_exporting());
    session.delete(&text).unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, text);
}
