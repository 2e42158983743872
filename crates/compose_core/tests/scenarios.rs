use compose_core::{
    bind, ComposeArea, MirrorSurface, NativeSelection, SelectionRange, StructuralAddress,
    OBJECT_PLACEHOLDER,
};

fn area(mount: &str) -> ComposeArea<MirrorSurface> {
    bind(mount, MirrorSurface::new()).expect("bind should succeed")
}

#[test]
fn scenario_a_insert_into_empty_document() {
    let mut area = area("scenario-a");
    area.insert_text("hi").expect("insert text");

    assert_eq!(area.get_text(), "hi");
    assert_eq!(area.fetch_range(), SelectionRange::caret(2));
}

#[test]
fn scenario_b_object_between_text() {
    let mut area = area("scenario-b");
    area.insert_text("ab").expect("insert text");
    area.set_selection_range(1, 1).expect("place caret");

    area.insert_image("x.png", "😀", "emoji").expect("insert object");

    let text = area.get_text();
    assert_eq!(text.chars().count(), 3);
    assert_eq!(text, format!("a{OBJECT_PLACEHOLDER}b"));
    assert_eq!(area.fetch_range(), SelectionRange::caret(2));

    let mapper = area.engine().mapper();
    let object_node = area.surface().child_id(1).expect("object node");
    assert_eq!(
        mapper.to_structural(1).expect("offset 1"),
        StructuralAddress::before(object_node)
    );
    assert_eq!(
        mapper.to_structural(2).expect("offset 2"),
        StructuralAddress::after(object_node)
    );
}

#[test]
fn scenario_c_replace_selected_range() {
    let mut area = area("scenario-c");
    area.insert_text("abcd").expect("insert text");
    area.set_selection_range(1, 3).expect("select [1,3)");

    area.insert_text("Z").expect("replace selection");

    assert_eq!(area.get_text(), "aZd");
    assert_eq!(area.fetch_range(), SelectionRange::caret(2));
}

#[test]
fn scenario_d_store_without_native_selection_keeps_previous() {
    let mut area = area("scenario-d");
    area.insert_text("abcd").expect("insert text");
    area.set_selection_range(3, 1).expect("select backwards");

    area.surface_mut().clear_native_selection();
    assert!(!area.store_selection_range());
    assert_eq!(area.fetch_range(), SelectionRange::new(3, 1));
}

#[test]
fn native_selection_is_captured_after_user_moves_caret() {
    let mut area = area("scenario-user-caret");
    area.insert_text("hello").expect("insert text");
    let node = area.surface().child_id(0).expect("text node");

    area.surface_mut()
        .set_native_selection(NativeSelection::caret(StructuralAddress::offset(node, 2)));
    assert!(area.store_selection_range());
    area.insert_text("XY").expect("insert at caret");

    assert_eq!(area.get_text(), "heXYllo");
    assert_eq!(area.fetch_range(), SelectionRange::caret(4));
}

#[test]
fn image_replaces_selection_spanning_object() {
    let mut area = area("scenario-replace-object");
    area.insert_text("ab").expect("insert text");
    let first = area.insert_image("img.jpg", "😀", "em").expect("first object");
    area.set_selection_range(1, 3).expect("select b + object");

    let second = area.insert_image("img.jpg", "🍻", "em").expect("second object");

    assert_eq!(area.get_text(), format!("a{OBJECT_PLACEHOLDER}"));
    assert!(area.engine().registry().resolve(first).is_err());
    assert_eq!(
        area.engine()
            .registry()
            .resolve(second)
            .expect("second object is live")
            .alt_text,
        "🍻"
    );
    assert_eq!(
        area.surface().tree().html(),
        r#"a<img src="img.jpg" alt="🍻" class="em">"#
    );
}

#[test]
fn extract_text_uses_alt_text_and_trims() {
    let mut area = area("scenario-extract");
    area.insert_text(" hi ").expect("insert text");
    area.insert_image("beer.png", "🍻", "emoji").expect("insert object");
    area.insert_text("\n").expect("insert break");

    assert_eq!(area.extract_text().expect("extract"), "hi 🍻");
    assert_eq!(
        area.extract_text_with(true).expect("extract untrimmed"),
        " hi 🍻\n"
    );
}
