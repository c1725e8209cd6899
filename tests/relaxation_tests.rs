use softring::{ControlPointRelaxation, RelaxationConfig, Vec2};
use softring::Vec as _;

fn diamond() -> ControlPointRelaxation<f32> {
    let offsets = [
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(-1.0, 0.0),
        Vec2::new(0.0, -1.0),
    ];
    ControlPointRelaxation::new(&offsets, RelaxationConfig::new())
}

#[test]
fn nudge_moves_only_points_facing_the_hit() {
    let mut relax = diamond();
    relax.nudge(Vec2::new(1.0, 0.0), 0.2);

    assert_eq!(relax.point(0).unwrap().velocity, Vec2::new(0.0, 0.0));
    assert_eq!(relax.point(1).unwrap().velocity.length(), 0.0);
    assert!((relax.point(2).unwrap().velocity.x + 0.2).abs() < 1e-6);
    assert_eq!(relax.point(3).unwrap().velocity.length(), 0.0);
}

#[test]
fn diagonal_nudge_is_weighted() {
    let mut relax = diamond();
    let n = Vec2::new(-1.0f32, -1.0).normalize();
    relax.nudge_default(n);
    let expected = 0.2 * core::f32::consts::FRAC_1_SQRT_2;
    assert!((relax.point(0).unwrap().velocity.length() - expected).abs() < 1e-5);
    assert!((relax.point(1).unwrap().velocity.length() - expected).abs() < 1e-5);
    assert_eq!(relax.point(2).unwrap().velocity.length(), 0.0);
}

#[test]
fn points_relax_back_to_rest() {
    let mut relax = diamond();
    relax.set_offset(0, Vec2::new(1.5, 0.3));
    relax.nudge(Vec2::new(0.0, 1.0), 0.5);
    for _ in 0..600 {
        relax.step(1.0 / 60.0);
    }
    for p in relax.points() {
        assert!(p.offset.distance(p.rest_offset) < 1e-3, "{:?}", p);
    }
}

#[test]
fn non_positive_dt_changes_nothing() {
    let mut relax = diamond();
    relax.set_offset(1, Vec2::new(0.0, 2.0));
    let before = relax.offsets();
    relax.step(0.0);
    relax.step(-0.5);
    assert_eq!(relax.offsets(), before);
}

#[test]
fn reset_and_out_of_range() {
    let mut relax = diamond();
    relax.set_offset(9, Vec2::new(5.0, 5.0));
    relax.set_offset(2, Vec2::new(-3.0, 0.0));
    relax.nudge(Vec2::new(1.0, 0.0), 1.0);
    relax.reset();
    for p in relax.points() {
        assert_eq!(p.offset, p.rest_offset);
        assert_eq!(p.velocity, Vec2::new(0.0, 0.0));
    }
    assert_eq!(relax.len(), 4);
}

#[test]
fn stiffer_config_recovers_faster() {
    let soft = RelaxationConfig::new().with_stiffness(4.0);
    let hard = RelaxationConfig::new().with_stiffness(16.0);
    let start = [Vec2::new(1.0f32, 0.0)];
    let mut a = ControlPointRelaxation::new(&start, soft);
    let mut b = ControlPointRelaxation::new(&start, hard);
    a.set_offset(0, Vec2::new(2.0, 0.0));
    b.set_offset(0, Vec2::new(2.0, 0.0));
    for _ in 0..10 {
        a.step(1.0 / 60.0);
        b.step(1.0 / 60.0);
    }
    assert!(b.point(0).unwrap().offset.x < a.point(0).unwrap().offset.x);
}
