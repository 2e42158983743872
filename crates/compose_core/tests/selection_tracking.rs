use compose_core::{
    bind, ComposeArea, MirrorSurface, NativeSelection, NodeId, SelectionRange, StructuralAddress,
};

fn area_with(mount: &str, text: &str) -> ComposeArea<MirrorSurface> {
    let mut area = bind(mount, MirrorSurface::new()).expect("bind should succeed");
    area.insert_text(text).expect("seed text");
    area
}

#[test]
fn repeated_store_without_host_changes_is_stable() {
    let mut area = area_with("tracking-stable", "abcdef");
    let node = area.surface().child_id(0).expect("text node");
    area.surface_mut().set_native_selection(NativeSelection::new(
        StructuralAddress::offset(node, 1),
        StructuralAddress::offset(node, 4),
    ));

    assert!(area.store_selection_range());
    let first = area.fetch_range();
    assert!(area.store_selection_range());
    assert_eq!(area.fetch_range(), first);
    assert_eq!(first, SelectionRange::new(1, 4));
}

#[test]
fn backward_selection_keeps_direction_but_edits_use_ordered_range() {
    let mut area = area_with("tracking-backward", "abcdef");
    let node = area.surface().child_id(0).expect("text node");
    area.surface_mut().set_native_selection(NativeSelection::new(
        StructuralAddress::offset(node, 5),
        StructuralAddress::offset(node, 2),
    ));

    assert!(area.store_selection_range());
    let range = area.fetch_range();
    assert!(range.is_backward());
    assert_eq!(range.as_range(), 2..5);

    area.insert_text("_").expect("replace selection");
    assert_eq!(area.get_text(), "ab_f");
    assert_eq!(area.fetch_range(), SelectionRange::caret(3));
}

#[test]
fn foreign_node_after_known_content_resolves_to_its_end() {
    let mut area = area_with("tracking-drift-after", "abcd");
    let foreign = area.surface_mut().insert_foreign_text(1, "zz");
    area.surface_mut()
        .set_native_selection(NativeSelection::caret(StructuralAddress::offset(foreign, 1)));

    assert!(area.store_selection_range());
    assert_eq!(area.fetch_range(), SelectionRange::caret(4));
}

#[test]
fn foreign_node_before_known_content_resolves_to_its_start() {
    let mut area = area_with("tracking-drift-before", "abcd");
    let foreign = area.surface_mut().insert_foreign_text(0, "zz");
    area.surface_mut()
        .set_native_selection(NativeSelection::caret(StructuralAddress::after(foreign)));

    assert!(area.store_selection_range());
    assert_eq!(area.fetch_range(), SelectionRange::caret(0));
}

#[test]
fn node_missing_from_host_tree_clamps_to_document_end() {
    let mut area = area_with("tracking-drift-missing", "abc");
    area.surface_mut().set_native_selection(NativeSelection::caret(
        StructuralAddress::offset(NodeId(987_654), 2),
    ));

    assert!(area.store_selection_range());
    assert_eq!(area.fetch_range(), SelectionRange::caret(3));
}

#[test]
fn text_offset_past_node_end_is_clamped() {
    let mut area = area_with("tracking-overshoot", "ab\ncd");
    let first_line = area.surface().child_id(0).expect("first text node");
    area.surface_mut()
        .set_native_selection(NativeSelection::caret(StructuralAddress::offset(first_line, 9)));

    assert!(area.store_selection_range());
    assert_eq!(area.fetch_range(), SelectionRange::caret(2));
}

#[test]
fn stored_range_is_clamped_after_document_shrinks() {
    let mut area = area_with("tracking-shrink", "abcdef");
    area.set_selection_range(6, 6).expect("caret at end");

    area.delete_range(1..6).expect("delete tail");

    assert_eq!(area.get_text(), "a");
    let range = area.fetch_range();
    assert!(range.anchor <= 1 && range.focus <= 1);
}

#[test]
fn restore_pushes_the_stored_range_back_to_host() {
    let mut area = area_with("tracking-restore", "abcd");
    area.set_selection_range(1, 3).expect("select");
    area.surface_mut().clear_native_selection();

    area.restore_selection().expect("restore");

    let native = *area.surface().native_selection().expect("selection restored");
    let mapper = area.engine().mapper();
    assert_eq!(mapper.to_logical(&native.anchor), 1);
    assert_eq!(mapper.to_logical(&native.focus), 3);
}

#[test]
fn host_reported_child_order_places_unrendered_nodes() {
    let mut area = area_with("tracking-reported-order", "ab\ncd");
    let rendered = area.surface().tree().ids();
    assert_eq!(rendered.len(), 3);

    let foreign = NodeId(u64::MAX - 42);
    let surface = area.surface_mut();
    surface.set_native_selection(NativeSelection::caret(StructuralAddress::offset(foreign, 1)));
    surface.set_live_children(vec![rendered[0], foreign, rendered[1], rendered[2]]);

    assert!(area.store_selection_range());
    assert_eq!(area.fetch_range(), SelectionRange::caret(2));
}
