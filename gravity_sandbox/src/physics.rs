//! 3D N-body gravitational physics with collisions
//!
//! Each step accumulates softened pairwise Newtonian attraction, integrates
//! with semi-implicit Euler, records decimated trails, and then resolves
//! collisions. Merges found during the collision pass are staged in a removal
//! set and an addition list and applied together once the pass finishes, so a
//! body consumed by one merge is never looked at again in the same step.

use common::camera::{FlyCamera, Viewport};
use common::config::clamp_logged;
use common::history::BoundedHistory;
use common::raster::{color_from_hex, Color};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::body::{Body, BodyId, BodyKind, MIN_MASS};
use crate::presets::Preset;
use crate::scenario::ScenarioConfig;
use crate::GravityError;

/// Added to r² so the force stays finite as separation goes to zero
pub const SOFTENING: f32 = 100.0;
/// Frame time scale is divided by this to get the integration step
pub const TIME_STEP_DIVISOR: f32 = 2.0;
/// Trails record every Nth step
pub const TRAIL_INTERVAL: u64 = 3;
pub const TRAIL_LENGTH: usize = 80;
/// Kinetic energy is sampled every Nth step
pub const ENERGY_SAMPLE_INTERVAL: u64 = 15;
pub const HISTORY_LENGTH: usize = 50;
/// Bodies collide when closer than this fraction of their summed radii
pub const COLLISION_FACTOR: f32 = 0.85;
pub const MERGED_RADIUS_FACTOR: f32 = 2.5;
/// Merged bodies heavier than this become stars
pub const STAR_MASS_THRESHOLD: f32 = 2000.0;
pub const MERGED_STAR_TEMPERATURE: f32 = 5000.0;
/// Extra pick tolerance around a body's projected disc, in pixels
pub const PICK_TOLERANCE: f32 = 10.0;

pub type Trail = BoundedHistory<Vec3>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionMode {
    #[default]
    Merge,
    Bounce,
}

impl fmt::Display for CollisionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionMode::Merge => f.write_str("merge"),
            CollisionMode::Bounce => f.write_str("bounce"),
        }
    }
}

impl FromStr for CollisionMode {
    type Err = GravityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "merge" => Ok(CollisionMode::Merge),
            "bounce" => Ok(CollisionMode::Bounce),
            other => Err(GravityError::UnknownCollisionMode(other.to_string())),
        }
    }
}

/// Engine parameters set from the control panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityConfig {
    pub g_constant: f32,
    pub time_scale: f32,
    pub collision_mode: CollisionMode,
    pub record_trails: bool,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            g_constant: 0.8,
            time_scale: 1.0,
            collision_mode: CollisionMode::Merge,
            record_trails: true,
        }
    }
}

impl GravityConfig {
    pub fn clamped(self) -> Self {
        Self {
            g_constant: clamp_logged("g_constant", self.g_constant, 0.1, 5.0),
            time_scale: clamp_logged("time_scale", self.time_scale, 0.0, 5.0),
            ..self
        }
    }
}

/// Parameters for bodies fired from the camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    pub mass: f32,
    pub radius: f32,
    pub speed: f32,
    pub color: Color,
    pub kind: BodyKind,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            mass: 50.0,
            radius: 12.0,
            speed: 8.0,
            color: color_from_hex("#06b6d4").unwrap_or([0.02, 0.71, 0.83, 1.0]),
            kind: BodyKind::Planet,
        }
    }
}

impl LaunchConfig {
    pub fn clamped(self) -> Self {
        Self {
            mass: clamp_logged("launch mass", self.mass, 10.0, 3000.0),
            radius: clamp_logged("launch radius", self.radius, 3.0, 80.0),
            speed: clamp_logged("launch speed", self.speed, 0.0, 30.0),
            ..self
        }
    }
}

/// One periodic energy reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergySample {
    /// Step counter at which the sample was taken
    pub time: u64,
    pub kinetic: f32,
    /// Reserved; always zero
    pub potential: f32,
    pub total: f32,
}

/// Softened Newtonian force magnitude between two masses
pub fn pairwise_force(g: f32, m1: f32, m2: f32, dist_sq: f32, softening: f32) -> f32 {
    g * m1 * m2 / (dist_sq + softening)
}

/// Acceleration on every body from every other body, O(n²)
pub fn accelerations(bodies: &[Body], g: f32, softening: f32) -> Vec<Vec3> {
    let mut acc = vec![Vec3::ZERO; bodies.len()];

    for (i, a) in bodies.iter().enumerate() {
        for (j, b) in bodies.iter().enumerate() {
            if i == j {
                continue;
            }
            let r = b.position - a.position;
            let dist_sq = r.length_squared();
            if dist_sq <= f32::EPSILON {
                // Coincident centres: force is finite but has no direction
                continue;
            }
            let force = pairwise_force(g, a.mass, b.mass, dist_sq, softening);
            acc[i] += r / dist_sq.sqrt() * (force / a.mass);
        }
    }

    acc
}

/// Combine two bodies, conserving mass and momentum
pub fn merge_bodies(a: &Body, b: &Body, id: BodyId) -> Body {
    let total_mass = a.mass + b.mass;
    let position = (a.position * a.mass + b.position * b.mass) / total_mass;
    let velocity = (a.velocity * a.mass + b.velocity * b.mass) / total_mass;
    let heavier = if a.mass > b.mass { a } else { b };

    let mut merged = Body::new(
        id,
        position,
        velocity,
        total_mass,
        total_mass.cbrt() * MERGED_RADIUS_FACTOR,
    )
    .with_color(heavier.color);

    if total_mass > STAR_MASS_THRESHOLD {
        merged = merged
            .with_kind(BodyKind::Star)
            .with_temperature(MERGED_STAR_TEMPERATURE);
    } else {
        merged = merged.with_kind(heavier.kind);
    }
    merged
}

/// Elastic bounce: swap velocities and push both bodies apart by half the overlap
pub fn bounce_bodies(a: &mut Body, b: &mut Body) {
    let r = b.position - a.position;
    let dist = r.length();
    let normal = if dist > f32::EPSILON { r / dist } else { Vec3::X };

    std::mem::swap(&mut a.velocity, &mut b.velocity);

    let overlap = (a.radius + b.radius) - dist;
    if overlap > 0.0 {
        a.position -= normal * overlap * 0.5;
        b.position += normal * overlap * 0.5;
    }
}

fn colliding(a: &Body, b: &Body) -> bool {
    a.position.distance(b.position) < (a.radius + b.radius) * COLLISION_FACTOR
}

/// The N-body simulation state
pub struct Simulation {
    bodies: Vec<Body>,
    trails: HashMap<BodyId, Trail>,
    history: BoundedHistory<EnergySample>,
    config: GravityConfig,
    pub paused: bool,
    frame: u64,
    next_id: u64,
}

impl Simulation {
    /// Empty simulation with the given configuration
    pub fn new(config: GravityConfig) -> Self {
        Self {
            bodies: Vec::new(),
            trails: HashMap::new(),
            history: BoundedHistory::new(HISTORY_LENGTH),
            config: config.clamped(),
            paused: false,
            frame: 0,
            next_id: 1,
        }
    }

    /// Simulation loaded with the default scenario
    pub fn with_default_scenario(config: GravityConfig) -> Self {
        let mut sim = Self::new(config);
        sim.reset();
        sim
    }

    pub fn configure(&mut self, g_constant: f32, time_scale: f32, collision_mode: CollisionMode) {
        self.set_config(GravityConfig {
            g_constant,
            time_scale,
            collision_mode,
            ..self.config
        });
    }

    pub fn set_config(&mut self, config: GravityConfig) {
        let config = config.clamped();
        if config != self.config {
            log::debug!(
                "Gravity configured: G={} time_scale={} collisions={}",
                config.g_constant,
                config.time_scale,
                config.collision_mode
            );
        }
        if !config.record_trails {
            self.trails.clear();
        }
        self.config = config;
    }

    pub fn config(&self) -> &GravityConfig {
        &self.config
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn trail(&self, id: BodyId) -> Option<&Trail> {
        self.trails.get(&id)
    }

    pub fn history(&self) -> &BoundedHistory<EnergySample> {
        &self.history
    }

    /// Number of steps taken since the last reset
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Copy of the body list for display
    pub fn snapshot(&self) -> Vec<Body> {
        self.bodies.clone()
    }

    fn allocate_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Restore the default scenario and clear all derived state
    pub fn reset(&mut self) {
        self.replace_bodies(Preset::Default.bodies());
        self.frame = 0;
        log::info!("Gravity sandbox reset ({} bodies)", self.bodies.len());
    }

    pub fn load_preset(&mut self, preset: Preset) {
        self.replace_bodies(preset.bodies());
        log::debug!("Loaded preset {} ({} bodies)", preset, self.bodies.len());
    }

    pub fn load_preset_named(&mut self, name: &str) -> Result<(), GravityError> {
        let preset: Preset = name.parse()?;
        self.load_preset(preset);
        Ok(())
    }

    pub fn load_scenario(&mut self, scenario: ScenarioConfig) {
        let name = scenario.name.clone().unwrap_or_else(|| "custom".into());
        self.replace_bodies(scenario.into_bodies());
        log::debug!("Loaded scenario {} ({} bodies)", name, self.bodies.len());
    }

    /// Replace the body list; ids are reassigned so they stay unique
    pub fn replace_bodies(&mut self, bodies: Vec<Body>) {
        self.bodies.clear();
        self.trails.clear();
        self.history.clear();
        self.next_id = 1;
        for mut body in bodies {
            body.id = self.allocate_id();
            self.bodies.push(body);
        }
    }

    /// Add a body, assigning it a fresh id
    pub fn add_body(&mut self, mut body: Body) -> BodyId {
        body.id = self.allocate_id();
        let id = body.id;
        self.bodies.push(body);
        id
    }

    /// Fire a body from `origin` along `direction`
    pub fn launch_body(&mut self, launch: &LaunchConfig, origin: Vec3, direction: Vec3) -> BodyId {
        let launch = launch.clamped();
        let velocity = direction.normalize_or_zero() * launch.speed;
        let id = self.allocate_id();
        let body = Body::new(id, origin, velocity, launch.mass.max(MIN_MASS), launch.radius)
            .with_color(launch.color)
            .with_kind(launch.kind)
            .with_rotation(0.05);
        self.bodies.push(body);
        log::debug!("Launched body {id} with mass {}", launch.mass);
        id
    }

    pub fn delete_body(&mut self, id: BodyId) -> Result<Body, GravityError> {
        let index = self
            .bodies
            .iter()
            .position(|b| b.id == id)
            .ok_or(GravityError::UnknownBody(id))?;
        self.trails.remove(&id);
        let body = self.bodies.remove(index);
        log::debug!("Deleted body {id}");
        Ok(body)
    }

    /// Advance one frame; does nothing while paused
    pub fn step(&mut self) {
        if self.paused {
            return;
        }

        let dt = self.config.time_scale / TIME_STEP_DIVISOR;

        let acc = accelerations(&self.bodies, self.config.g_constant, SOFTENING);
        for (body, a) in self.bodies.iter_mut().zip(&acc) {
            body.velocity += *a * dt;
            body.position += body.velocity * dt;
        }

        if self.config.record_trails && self.frame % TRAIL_INTERVAL == 0 {
            for body in &self.bodies {
                self.trails
                    .entry(body.id)
                    .or_insert_with(|| Trail::new(TRAIL_LENGTH))
                    .push(body.position);
            }
        }

        self.resolve_collisions();

        if self.frame % ENERGY_SAMPLE_INTERVAL == 0 {
            let kinetic = self.kinetic_energy();
            self.history.push(EnergySample {
                time: self.frame,
                kinetic,
                potential: 0.0,
                total: kinetic,
            });
        }

        self.frame += 1;
    }

    fn resolve_collisions(&mut self) {
        let mut removed: HashSet<BodyId> = HashSet::new();
        let mut added: Vec<Body> = Vec::new();
        let n = self.bodies.len();

        for i in 0..n {
            for j in (i + 1)..n {
                if removed.contains(&self.bodies[i].id) {
                    break;
                }
                if removed.contains(&self.bodies[j].id) {
                    continue;
                }
                if !colliding(&self.bodies[i], &self.bodies[j]) {
                    continue;
                }

                match self.config.collision_mode {
                    CollisionMode::Merge => {
                        let id = self.allocate_id();
                        let merged = merge_bodies(&self.bodies[i], &self.bodies[j], id);
                        log::debug!(
                            "Merged {} and {} into {} (mass {})",
                            self.bodies[i].id,
                            self.bodies[j].id,
                            id,
                            merged.mass
                        );
                        removed.insert(self.bodies[i].id);
                        removed.insert(self.bodies[j].id);
                        added.push(merged);
                    }
                    CollisionMode::Bounce => {
                        let (left, right) = self.bodies.split_at_mut(j);
                        bounce_bodies(&mut left[i], &mut right[0]);
                    }
                }
            }
        }

        if removed.is_empty() {
            return;
        }
        self.bodies.retain(|b| !removed.contains(&b.id));
        self.trails.retain(|id, _| !removed.contains(id));
        self.bodies.extend(added);
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    pub fn total_mass(&self) -> f32 {
        self.bodies.iter().map(|b| b.mass).sum()
    }

    pub fn total_momentum(&self) -> Vec3 {
        self.bodies.iter().map(Body::momentum).sum()
    }

    pub fn center_of_mass(&self) -> Vec3 {
        let total_mass = self.total_mass();
        if total_mass > 0.0 {
            self.bodies
                .iter()
                .map(|b| b.position * b.mass)
                .sum::<Vec3>()
                / total_mass
        } else {
            Vec3::ZERO
        }
    }

    /// Body under the pointer; the nearest one wins when discs overlap
    pub fn pick_body(&self, camera: &FlyCamera, viewport: Viewport, pointer: Vec2) -> Option<BodyId> {
        self.bodies
            .iter()
            .filter_map(|body| {
                let proj = camera.project(body.position, viewport)?;
                let radius = (body.radius * proj.scale).max(5.0);
                (proj.screen.distance(pointer) < radius + PICK_TOLERANCE)
                    .then_some((body.id, proj.depth))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::with_default_scenario(GravityConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn body(id: u64, position: Vec3, velocity: Vec3, mass: f32, radius: f32) -> Body {
        Body::new(BodyId(id), position, velocity, mass, radius)
    }

    #[test]
    fn softened_force_is_finite_at_zero_distance() {
        let f = pairwise_force(0.8, 100.0, 200.0, 0.0, SOFTENING);
        assert!(f.is_finite());
        assert_relative_eq!(f, 0.8 * 100.0 * 200.0 / SOFTENING);
    }

    #[test]
    fn coincident_bodies_have_no_nan_acceleration() {
        let bodies = vec![
            body(1, Vec3::ONE, Vec3::ZERO, 10.0, 1.0),
            body(2, Vec3::ONE, Vec3::ZERO, 20.0, 1.0),
        ];
        let acc = accelerations(&bodies, 0.8, SOFTENING);
        assert!(acc.iter().all(|a| a.is_finite()));
    }

    #[test]
    fn accelerations_obey_third_law() {
        let bodies = vec![
            body(1, Vec3::new(-30.0, 0.0, 0.0), Vec3::ZERO, 10.0, 1.0),
            body(2, Vec3::new(30.0, 5.0, 0.0), Vec3::ZERO, 40.0, 1.0),
        ];
        let acc = accelerations(&bodies, 0.8, SOFTENING);
        let net = acc[0] * 10.0 + acc[1] * 40.0;
        assert!(net.length() < 1e-4);
        assert!(acc[0].x > 0.0 && acc[1].x < 0.0);
    }

    #[test]
    fn merge_conserves_mass_and_momentum() {
        let a = body(1, Vec3::new(0.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 1.0), 30.0, 5.0);
        let b = body(2, Vec3::new(4.0, 0.0, 0.0), Vec3::new(-1.0, 2.0, 0.0), 10.0, 5.0);
        let merged = merge_bodies(&a, &b, BodyId(9));

        assert_relative_eq!(merged.mass, 40.0);
        let expected_v = (a.velocity * 30.0 + b.velocity * 10.0) / 40.0;
        assert!((merged.velocity - expected_v).length() < 1e-6);
        assert!((merged.position - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);
        assert_relative_eq!(merged.radius, 40f32.cbrt() * MERGED_RADIUS_FACTOR);
        assert_eq!(merged.color, a.color);
        assert_eq!(merged.id, BodyId(9));
    }

    #[test]
    fn heavy_merge_becomes_star() {
        let a = body(1, Vec3::ZERO, Vec3::ZERO, 1500.0, 5.0).with_kind(BodyKind::Planet);
        let b = body(2, Vec3::ZERO, Vec3::ZERO, 600.0, 5.0).with_kind(BodyKind::Moon);
        let merged = merge_bodies(&a, &b, BodyId(3));
        assert_eq!(merged.kind, BodyKind::Star);
        assert_eq!(merged.temperature, Some(MERGED_STAR_TEMPERATURE));

        let light = merge_bodies(
            &body(1, Vec3::ZERO, Vec3::ZERO, 10.0, 1.0).with_kind(BodyKind::Moon),
            &body(2, Vec3::ZERO, Vec3::ZERO, 20.0, 1.0).with_kind(BodyKind::Asteroid),
            BodyId(3),
        );
        assert_eq!(light.kind, BodyKind::Asteroid);
        assert_eq!(light.temperature, None);
    }

    #[test]
    fn bounce_swaps_velocities_and_separates() {
        let mut a = body(1, Vec3::new(-2.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), 10.0, 5.0);
        let mut b = body(2, Vec3::new(2.0, 0.0, 0.0), Vec3::new(-3.0, 0.0, 0.0), 10.0, 5.0);
        bounce_bodies(&mut a, &mut b);

        assert_eq!(a.velocity, Vec3::new(-3.0, 0.0, 0.0));
        assert_eq!(b.velocity, Vec3::new(1.0, 0.0, 0.0));
        // Overlap was 10 - 4 = 6, so each moves 3 along the normal
        assert_relative_eq!(a.position.x, -5.0);
        assert_relative_eq!(b.position.x, 5.0);
    }

    #[test]
    fn triple_overlap_merges_each_body_once() {
        let mut sim = Simulation::new(GravityConfig {
            time_scale: 0.0,
            ..Default::default()
        });
        sim.replace_bodies(vec![
            body(0, Vec3::ZERO, Vec3::ZERO, 10.0, 10.0),
            body(0, Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO, 10.0, 10.0),
            body(0, Vec3::new(2.0, 0.0, 0.0), Vec3::ZERO, 10.0, 10.0),
        ]);
        let mass_before = sim.total_mass();
        sim.step();

        assert_relative_eq!(sim.total_mass(), mass_before);
        // The first two merge; the third survives this step untouched
        assert_eq!(sim.bodies().len(), 2);
    }

    #[test]
    fn trails_are_decimated_and_bounded() {
        let mut sim = Simulation::new(GravityConfig::default());
        let id = sim.add_body(body(0, Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 10.0, 1.0));
        for _ in 0..6 {
            sim.step();
        }
        // Steps 0 and 3 record
        assert_eq!(sim.trail(id).map(|t| t.len()), Some(2));

        for _ in 0..(TRAIL_INTERVAL as usize * TRAIL_LENGTH * 2) {
            sim.step();
        }
        assert_eq!(sim.trail(id).map(|t| t.len()), Some(TRAIL_LENGTH));
    }

    #[test]
    fn energy_history_is_sampled_and_bounded() {
        let mut sim = Simulation::new(GravityConfig::default());
        sim.add_body(body(0, Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 10.0, 1.0));
        for _ in 0..16 {
            sim.step();
        }
        assert_eq!(sim.history().len(), 2);
        let first = sim.history().iter().next().copied().unwrap();
        assert_eq!(first.time, 0);
        assert_relative_eq!(first.kinetic, 0.5 * 10.0 * 4.0);
        assert_eq!(first.potential, 0.0);
        assert_eq!(first.total, first.kinetic);

        for _ in 0..(ENERGY_SAMPLE_INTERVAL as usize * (HISTORY_LENGTH + 5)) {
            sim.step();
        }
        assert_eq!(sim.history().len(), HISTORY_LENGTH);
    }

    #[test]
    fn paused_simulation_does_not_move() {
        let mut sim = Simulation::default();
        sim.paused = true;
        let before = sim.snapshot();
        sim.step();
        assert_eq!(sim.snapshot(), before);
        assert_eq!(sim.frame(), 0);
    }

    #[test]
    fn delete_unknown_body_is_error() {
        let mut sim = Simulation::default();
        assert!(matches!(
            sim.delete_body(BodyId(999)),
            Err(GravityError::UnknownBody(BodyId(999)))
        ));
        let first = sim.bodies()[0].id;
        assert!(sim.delete_body(first).is_ok());
        assert!(sim.body(first).is_none());
    }

    #[test]
    fn launch_uses_direction_and_clamped_mass() {
        let mut sim = Simulation::new(GravityConfig::default());
        let launch = LaunchConfig {
            mass: 0.0,
            speed: 10.0,
            ..Default::default()
        };
        let id = sim.launch_body(&launch, Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.0, 5.0));
        let body = sim.body(id).unwrap();
        assert_relative_eq!(body.mass, 10.0);
        assert_eq!(body.position, Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(body.velocity.z, 10.0);
    }

    #[test]
    fn configure_clamps_out_of_range_values() {
        let mut sim = Simulation::new(GravityConfig::default());
        sim.configure(-3.0, 99.0, CollisionMode::Bounce);
        assert_relative_eq!(sim.config().g_constant, 0.1);
        assert_relative_eq!(sim.config().time_scale, 5.0);
        assert_eq!(sim.config().collision_mode, CollisionMode::Bounce);
    }

    #[test]
    fn collision_mode_parses() {
        assert_eq!("Bounce".parse::<CollisionMode>().unwrap(), CollisionMode::Bounce);
        assert!("explode".parse::<CollisionMode>().is_err());
    }
}
