use softring::{
    BuildRequest, CollisionEvent, ControlPointRelaxation, FeedbackConfig, InstanceId, MemoryBackend, Node,
    NoOpObserver, Profile, RelaxationConfig, SoftbodyInstance, TopologyBuilder, Vec2,
    WobbleFeedback,
};

#[test]
fn feedback_deterministic() {
    let results: Vec<_> = (0..10).map(|_| {
        let mut fx = WobbleFeedback::new(FeedbackConfig::new().with_frequency(3.0).with_damping(1.0));
        for frame in 0..500 {
            if frame % 90 == 0 {
                fx.on_collision(&CollisionEvent::new(Vec2::new(0.6, 0.8), 30.0));
            }
            fx.step(1.0f32 / 60.0);
        }
        fx.params()
    }).collect();

    for r in &results[1..] {
        assert_eq!(results[0], *r);
    }
}

#[test]
fn relaxation_deterministic() {
    let results: Vec<_> = (0..5).map(|_| {
        let offsets = [Vec2::new(1.0f32, 0.0), Vec2::new(0.0, 1.0), Vec2::new(-1.0, 0.0)];
        let mut relax = ControlPointRelaxation::new(&offsets, RelaxationConfig::new());
        relax.nudge(Vec2::new(-1.0, 0.0), 0.4);
        for _ in 0..120 {
            relax.step(1.0 / 60.0);
        }
        relax.offsets()
    }).collect();

    for r in &results[1..] {
        assert_eq!(results[0], *r);
    }
}

#[test]
fn build_deterministic() {
    let results: Vec<_> = (0..5).map(|_| {
        let nodes = (0..9)
            .map(|i| Node::at(format!("n{}", i), Vec2::new(i as f32, (i * i % 7) as f32)))
            .collect();
        let mut instance = SoftbodyInstance::new(InstanceId(1), nodes);
        let mut backend = MemoryBackend::new();
        let request = BuildRequest::new().with_profile(Profile::new());
        let diff = TopologyBuilder::build(&mut instance, &request, &mut backend, &mut NoOpObserver).unwrap();
        (instance, diff)
    }).collect();

    for r in &results[1..] {
        assert_eq!(results[0], *r);
    }
}
