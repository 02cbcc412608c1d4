use approx::assert_abs_diff_eq;
use common::camera::{FlyCamera, Viewport};
use glam::{Vec2, Vec3};
use gravity_sandbox::physics::{merge_bodies, pairwise_force, SOFTENING};
use gravity_sandbox::{
    Body, BodyId, CollisionMode, GravityConfig, GravityError, Preset, ScenarioConfig, Simulation,
};
use proptest::prelude::*;

fn head_on_pair() -> Vec<Body> {
    vec![
        Body::new(
            BodyId(0),
            Vec3::new(-50.0, 0.0, 0.0),
            Vec3::new(5.0, 0.0, 0.0),
            100.0,
            10.0,
        ),
        Body::new(
            BodyId(0),
            Vec3::new(50.0, 0.0, 0.0),
            Vec3::new(-5.0, 0.0, 0.0),
            100.0,
            10.0,
        ),
    ]
}

#[test]
fn equal_masses_head_on_merge_at_origin() {
    let mut sim = Simulation::new(GravityConfig::default());
    sim.replace_bodies(head_on_pair());

    for _ in 0..30 {
        sim.step();
    }

    assert_eq!(sim.bodies().len(), 1);
    let merged = &sim.bodies()[0];
    assert_abs_diff_eq!(merged.mass, 200.0, epsilon = 1e-3);
    assert!(merged.velocity.length() < 1e-3, "velocity {:?}", merged.velocity);
    assert!(merged.position.length() < 1e-2, "position {:?}", merged.position);
    assert_abs_diff_eq!(merged.radius, 200f32.cbrt() * 2.5, epsilon = 1e-4);
}

#[test]
fn head_on_pair_bounces_apart() {
    let mut sim = Simulation::new(GravityConfig {
        collision_mode: CollisionMode::Bounce,
        ..Default::default()
    });
    sim.replace_bodies(head_on_pair());

    for _ in 0..60 {
        sim.step();
    }

    assert_eq!(sim.bodies().len(), 2);
    let [a, b] = [&sim.bodies()[0], &sim.bodies()[1]];
    assert!(a.velocity.x < 0.0 && b.velocity.x > 0.0);
    assert!(a.position.x < b.position.x);
    assert_abs_diff_eq!(sim.total_momentum().length(), 0.0, epsilon = 1e-3);
}

#[test]
fn softened_force_approaches_limit() {
    let limit = 0.8 * 3.0 * 7.0 / SOFTENING;
    let mut previous = 0.0;
    for d in [10.0f32, 1.0, 0.1, 0.001, 0.0] {
        let f = pairwise_force(0.8, 3.0, 7.0, d * d, SOFTENING);
        assert!(f.is_finite());
        assert!(f >= previous);
        previous = f;
    }
    assert_abs_diff_eq!(previous, limit, epsilon = 1e-6);
}

#[test]
fn presets_load_by_name() {
    let mut sim = Simulation::default();
    sim.load_preset_named("binary").unwrap();
    assert_eq!(sim.bodies().len(), 3);
    sim.load_preset(Preset::Chaos);
    assert_eq!(sim.bodies().len(), 15);
    assert!(matches!(
        sim.load_preset_named("nebula"),
        Err(GravityError::UnknownPreset(_))
    ));
    // A failed load leaves the previous bodies in place
    assert_eq!(sim.bodies().len(), 15);
}

#[test]
fn reset_restores_default_scenario() {
    let mut sim = Simulation::default();
    sim.load_preset(Preset::Solar);
    for _ in 0..20 {
        sim.step();
    }
    sim.reset();

    assert_eq!(sim.frame(), 0);
    assert_eq!(sim.bodies().len(), 5);
    assert!(sim.history().is_empty());
    assert!(sim.bodies().iter().all(|b| sim.trail(b.id).is_none()));
}

#[test]
fn ids_stay_unique_after_merges_and_launches() {
    let mut sim = Simulation::default();
    let launched = sim.launch_body(&Default::default(), Vec3::new(0.0, 0.0, -900.0), Vec3::Z);
    sim.replace_bodies(head_on_pair());
    for _ in 0..30 {
        sim.step();
    }
    let mut ids: Vec<BodyId> = sim.bodies().iter().map(|b| b.id).collect();
    let count = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), count);
    assert!(sim.body(launched).is_none() || ids.contains(&launched));
}

#[test]
fn picking_prefers_nearest_body() {
    let camera = FlyCamera::new(Vec3::ZERO, 0.0, 0.0, 800.0);
    let viewport = Viewport::new(800, 600);
    let mut sim = Simulation::new(GravityConfig::default());
    let far = sim.add_body(Body::new(BodyId(0), Vec3::new(0.0, 0.0, 800.0), Vec3::ZERO, 10.0, 10.0));
    let near = sim.add_body(Body::new(BodyId(0), Vec3::new(0.0, 0.0, 200.0), Vec3::ZERO, 10.0, 10.0));

    assert_eq!(sim.pick_body(&camera, viewport, viewport.center()), Some(near));
    assert_ne!(sim.pick_body(&camera, viewport, viewport.center()), Some(far));
    assert_eq!(sim.pick_body(&camera, viewport, Vec2::new(10.0, 10.0)), None);
}

#[test]
fn scenario_yaml_loads_into_simulation() {
    let yaml = "bodies:\n  - position: [0, 0, 0]\n    mass: 500\n    radius: 20\n    kind: star\n";
    let scenario: ScenarioConfig = serde_yaml::from_str(yaml).unwrap();
    let mut sim = Simulation::new(GravityConfig::default());
    sim.load_scenario(scenario);
    assert_eq!(sim.bodies().len(), 1);
    assert_abs_diff_eq!(sim.center_of_mass().length(), 0.0);
}

fn arb_body() -> impl Strategy<Value = Body> {
    (
        prop::array::uniform3(-500.0f32..500.0),
        prop::array::uniform3(-10.0f32..10.0),
        1.0f32..3000.0,
        1.0f32..60.0,
    )
        .prop_map(|(p, v, mass, radius)| {
            Body::new(BodyId(0), Vec3::from(p), Vec3::from(v), mass, radius)
        })
}

proptest! {
    #[test]
    fn merge_conserves_mass_and_momentum(a in arb_body(), b in arb_body()) {
        let merged = merge_bodies(&a, &b, BodyId(99));
        let total = a.mass + b.mass;
        let expected = (a.velocity * a.mass + b.velocity * b.mass) / total;

        prop_assert!((merged.mass - total).abs() <= total * 1e-6);
        prop_assert!((merged.velocity - expected).length() <= 1e-3);
        prop_assert!(merged.radius > 0.0);
    }

    #[test]
    fn masses_stay_positive(
        bodies in prop::collection::vec(arb_body(), 1..12),
        bounce in any::<bool>(),
        steps in 1usize..40,
    ) {
        let mode = if bounce { CollisionMode::Bounce } else { CollisionMode::Merge };
        let mut sim = Simulation::new(GravityConfig { collision_mode: mode, ..Default::default() });
        sim.replace_bodies(bodies);
        let mass_before = sim.total_mass();

        for _ in 0..steps {
            sim.step();
            prop_assert!(sim.bodies().iter().all(|b| b.mass > 0.0 && b.radius > 0.0));
            prop_assert!(sim.bodies().iter().all(|b| b.position.is_finite() && b.velocity.is_finite()));
        }
        prop_assert!((sim.total_mass() - mass_before).abs() <= mass_before * 1e-4);
    }
}
