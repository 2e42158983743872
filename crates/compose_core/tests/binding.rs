use compose_core::{
    bind, bind_with_config, is_bound, ComposeConfig, ComposeError, LineBreakMode, MirrorSurface,
};

#[test]
fn second_bind_to_same_mount_is_rejected() {
    let first = bind("binding-duplicate", MirrorSurface::new()).expect("first bind");
    let err = match bind("binding-duplicate", MirrorSurface::new()) {
        Ok(_) => panic!("second bind must fail"),
        Err(err) => err,
    };
    assert_eq!(err, ComposeError::AlreadyBound("binding-duplicate".to_string()));
    assert_eq!(err.code(), "already_bound");
    drop(first);
}

#[test]
fn mount_can_be_rebound_after_handle_is_dropped() {
    {
        let mut area = bind("binding-rebind", MirrorSurface::new()).expect("first bind");
        area.insert_text("first life").expect("insert");
    }
    assert!(!is_bound("binding-rebind"));

    let area = bind("binding-rebind", MirrorSurface::new()).expect("rebind");
    assert!(area.get_text().is_empty());
    assert_eq!(area.mount_point(), "binding-rebind");
}

#[test]
fn malformed_mount_points_are_rejected() {
    for mount in ["", "   ", "9lives", "has space", "#hash"] {
        match bind(mount, MirrorSurface::new()) {
            Ok(_) => panic!("`{mount}` must be rejected"),
            Err(err) => assert!(matches!(err, ComposeError::InvalidMountPoint(_))),
        }
    }
}

#[test]
fn explicit_config_is_used_by_the_engine() {
    let config = ComposeConfig::default().with_line_breaks(LineBreakMode::Inline);
    let mut area =
        bind_with_config("binding-inline", MirrorSurface::new(), config).expect("bind");
    area.insert_text("a\nb").expect("insert");

    assert_eq!(area.engine().config().line_breaks, LineBreakMode::Inline);
    assert_eq!(area.surface().tree().len(), 1);
}

#[test]
fn independent_mounts_do_not_share_state() {
    let mut left = bind("binding-left", MirrorSurface::new()).expect("bind left");
    let right = bind("binding-right", MirrorSurface::new()).expect("bind right");

    left.insert_text("only left").expect("insert");

    assert_eq!(left.get_text(), "only left");
    assert!(right.get_text().is_empty());
}
