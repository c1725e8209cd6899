//! Benchmarks for softring graph synthesis and feedback stepping.

use criterion::{criterion_group, criterion_main, Criterion};
use softring::*;

fn ring(n: usize) -> SoftbodyInstance<f32> {
    let nodes = (0..n)
        .map(|i| {
            let a = i as f32 / n as f32 * core::f32::consts::TAU;
            Node::at(format!("n{}", i), Vec2::new(a.cos() * 4.0, a.sin() * 4.0))
        })
        .collect();
    SoftbodyInstance::new(InstanceId(n as u32), nodes).with_bound_radius(4.0)
}

fn bench_build(c: &mut Criterion) {
    let request = BuildRequest::new().with_profile(Profile::new());
    c.bench_function("build_64_node_ring", |b| {
        b.iter(|| {
            let mut instance = ring(64);
            let mut backend = MemoryBackend::new();
            TopologyBuilder::build(&mut instance, &request, &mut backend, &mut NoOpObserver).map(|diff| diff.len())
        });
    });

    let mut built = ring(64);
    TopologyBuilder::build(&mut built, &request, &mut NullBackend, &mut NoOpObserver).ok();
    c.bench_function("rebuild_64_node_ring_noop", |b| {
        b.iter(|| TopologyBuilder::plan(&built, &request).map(|(_, diff)| diff.len()));
    });

    let stiff = Profile::new().with_spring_frequency(12.0);
    c.bench_function("tweak_64_node_ring", |b| {
        b.iter(|| {
            let mut instance = built.clone();
            TweakEngine::apply(&mut [&mut instance], Some(&stiff), &mut NullBackend, &mut NoOpObserver)
        });
    });
}

fn bench_feedback(c: &mut Criterion) {
    c.bench_function("wobble_feedback_1000_steps", |b| {
        b.iter(|| {
            let mut fx = WobbleFeedback::new(FeedbackConfig::new().with_integrator(Integrator::Analytic));
            fx.on_collision(&CollisionEvent::new(Vec2::new(0.0f32, 1.0), 40.0));
            for _ in 0..1000 {
                fx.step(1.0 / 60.0);
            }
            fx.params()
        });
    });
}

fn bench_relaxation(c: &mut Criterion) {
    let offsets: std::vec::Vec<Vec2<f32>> = (0..32)
        .map(|i| {
            let a = i as f32 / 32.0 * core::f32::consts::TAU;
            Vec2::new(a.cos(), a.sin())
        })
        .collect();
    c.bench_function("relaxation_32_points_600_steps", |b| {
        b.iter(|| {
            let mut relax = ControlPointRelaxation::new(&offsets, RelaxationConfig::new());
            relax.nudge_default(Vec2::new(1.0, 0.0));
            for _ in 0..600 {
                relax.step(1.0 / 60.0);
            }
            relax.offsets()
        });
    });
}

criterion_group!(benches, bench_build, bench_feedback, bench_relaxation);
criterion_main!(benches);
