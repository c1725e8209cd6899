use softring::{
    apply_profile_to_selection, create_soft_body, Bone, BuildError, Diagnostic, EdgeKind,
    InstanceId, MemoryBackend, NoOpObserver, NullBackend, Owner, Profile, Sprite, Vec2,
};

/// Six bones in a loop around the sprite centre, each child of the root.
fn hexagon_sprite() -> Sprite<f32> {
    let bones = (0..6)
        .map(|i| {
            let a = i as f32 / 6.0 * core::f32::consts::TAU;
            Bone::from_parent_index(Vec2::new(a.cos(), a.sin()), 0.0, -1)
        })
        .collect();
    Sprite::new(InstanceId(3), "Slime", Vec2::new(1.0, 1.2), bones)
        .with_position(Vec2::new(10.0, 5.0))
}

#[test]
fn create_from_sprite() {
    let sprite = hexagon_sprite();
    let mut backend = MemoryBackend::new();
    let instance =
        create_soft_body(Some(&sprite), Some(&Profile::new()), false, &mut backend, &mut NoOpObserver).unwrap();

    assert!(instance.is_built());
    assert_eq!(instance.name(), "Slime");
    assert_eq!(instance.id(), InstanceId(3));
    assert_eq!(instance.node_count(), 6);
    assert_eq!(instance.edge_count(), 31);
    assert_eq!(instance.node(2).unwrap().name, "Bone_2");
    assert_eq!(instance.root().position, Vec2::new(10.0, 5.0));
    assert!((instance.position_of(Owner::Node(0)).unwrap().x - 11.0).abs() < 1e-6);
    assert!((instance.shape(Owner::Root).unwrap().radius - 1.08).abs() < 1e-6);
    assert_eq!(backend.edge_count(), 31);
}

#[test]
fn create_with_hub() {
    let mut sprite = hexagon_sprite();
    sprite.bones.insert(0, Bone::new(Vec2::new(0.0, 0.0), 0.0, None).with_name("Centre"));
    let instance =
        create_soft_body(Some(&sprite), Some(&Profile::new()), true, &mut NullBackend, &mut NoOpObserver).unwrap();
    assert_eq!(instance.node(0).unwrap().name, "Centre");
    assert_eq!(instance.edge(Owner::Node(4), EdgeKind::Diametric).unwrap().target, Owner::Node(0));
}

#[test]
fn create_reports_missing_inputs() {
    let sprite = hexagon_sprite();
    let err = create_soft_body::<f32, _, _>(None, Some(&Profile::new()), false, &mut NullBackend, &mut NoOpObserver)
        .unwrap_err();
    assert_eq!(err, Diagnostic::MissingSprite);
    assert_eq!(err.to_string(), "Please assign a Sprite.");

    let mut backend = MemoryBackend::new();
    let err = create_soft_body(Some(&sprite), None, false, &mut backend, &mut NoOpObserver).unwrap_err();
    assert_eq!(err.to_string(), "Assign a Physics Profile.");
    assert!(backend.is_empty());
}

#[test]
fn create_without_bones() {
    let sprite: Sprite<f32> = Sprite::new(InstanceId(4), "Empty", Vec2::new(1.0, 1.0), Vec::new());
    let mut backend = MemoryBackend::new();
    let err = create_soft_body(Some(&sprite), Some(&Profile::new()), false, &mut backend, &mut NoOpObserver)
        .unwrap_err();
    assert_eq!(err, Diagnostic::Build(BuildError::NoBonesAssigned));
    assert!(backend.is_empty());
}

#[test]
fn create_rejects_bad_parent_order() {
    let bones = vec![
        Bone::new(Vec2::new(1.0f32, 0.0), 0.0, Some(1)),
        Bone::new(Vec2::new(0.0, 1.0), 0.0, None),
        Bone::new(Vec2::new(-1.0, 0.0), 0.0, None),
    ];
    let sprite = Sprite::new(InstanceId(5), "Tangled", Vec2::new(1.0, 1.0), bones);
    let err = create_soft_body(Some(&sprite), Some(&Profile::new()), false, &mut NullBackend, &mut NoOpObserver)
        .unwrap_err();
    assert!(matches!(err, Diagnostic::Build(BuildError::Import(_))));
}

#[test]
fn apply_to_selection() {
    let sprite = hexagon_sprite();
    let mut backend = MemoryBackend::new();
    let mut instance =
        create_soft_body(Some(&sprite), Some(&Profile::new()), false, &mut backend, &mut NoOpObserver).unwrap();

    let heavy = Profile::new().with_body_mass(4.0);
    let report =
        apply_profile_to_selection(&mut [&mut instance], Some(&heavy), &mut backend, &mut NoOpObserver).unwrap();
    assert_eq!(report.bodies, 6);
    assert_eq!(backend.body(InstanceId(3), Owner::Node(5)).unwrap().mass, 4.0);

    let err = apply_profile_to_selection(&mut [&mut instance], None, &mut backend, &mut NoOpObserver).unwrap_err();
    assert_eq!(err, Diagnostic::MissingProfile);

    let err = apply_profile_to_selection::<f32, _, _>(&mut [], Some(&heavy), &mut backend, &mut NoOpObserver)
        .unwrap_err();
    assert_eq!(err, Diagnostic::NoValidSelection);
}
