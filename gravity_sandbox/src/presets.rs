//! Named starting configurations

use common::raster::hsl_to_rgb;
use glam::Vec3;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

use crate::body::{Body, BodyId, BodyKind};
use crate::GravityError;

pub const CHAOS_BODY_COUNT: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// The reset scenario: one star, three planets and a moon
    #[default]
    Default,
    Solar,
    Binary,
    Chaos,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Default, Preset::Solar, Preset::Binary, Preset::Chaos];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Default => "default",
            Preset::Solar => "solar",
            Preset::Binary => "binary",
            Preset::Chaos => "chaos",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Preset::Default => "Default",
            Preset::Solar => "Solar System",
            Preset::Binary => "Binary Stars",
            Preset::Chaos => "Chaos",
        }
    }

    /// Bodies for this preset; ids are placeholders reassigned on load
    pub fn bodies(&self) -> Vec<Body> {
        match self {
            Preset::Default => init_default(),
            Preset::Solar => init_solar_system(),
            Preset::Binary => init_binary_stars(),
            Preset::Chaos => init_chaos(&mut rand::thread_rng()),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = GravityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GravityError::UnknownPreset(s.to_string()))
    }
}

fn body(index: u64, position: Vec3, velocity: Vec3, mass: f32, radius: f32, hex: &str) -> Body {
    Body::new(BodyId(index), position, velocity, mass, radius).with_hex_color(hex)
}

fn planet(index: u64, x: f32, speed: f32, mass: f32, radius: f32, hex: &str) -> Body {
    body(
        index,
        Vec3::new(x, 0.0, 0.0),
        Vec3::new(0.0, 0.0, speed),
        mass,
        radius,
        hex,
    )
}

pub fn init_default() -> Vec<Body> {
    vec![
        body(1, Vec3::ZERO, Vec3::ZERO, 5000.0, 50.0, "#fbbf24")
            .with_kind(BodyKind::Star)
            .with_temperature(5500.0)
            .with_rotation(0.01),
        planet(2, 300.0, 3.2, 30.0, 8.0, "#94a3b8").with_rotation(0.05),
        planet(3, 500.0, 2.5, 80.0, 14.0, "#3b82f6").with_rotation(0.03),
        body(
            4,
            Vec3::new(-700.0, 50.0, 0.0),
            Vec3::new(0.0, 0.0, -2.0),
            150.0,
            20.0,
            "#f97316",
        )
        .with_rotation(0.02),
        planet(5, 530.0, 3.8, 5.0, 4.0, "#a1a1aa")
            .with_kind(BodyKind::Moon)
            .with_rotation(0.1),
    ]
}

pub fn init_solar_system() -> Vec<Body> {
    vec![
        body(1, Vec3::ZERO, Vec3::ZERO, 8000.0, 60.0, "#fbbf24")
            .with_kind(BodyKind::Star)
            .with_temperature(5778.0),
        planet(2, 200.0, 4.5, 10.0, 5.0, "#9ca3af"),
        planet(3, 350.0, 3.5, 25.0, 8.0, "#fcd34d"),
        planet(4, 500.0, 2.8, 40.0, 12.0, "#3b82f6"),
        planet(5, 700.0, 2.3, 35.0, 10.0, "#ef4444"),
    ]
}

pub fn init_binary_stars() -> Vec<Body> {
    vec![
        planet(1, -150.0, 1.5, 3000.0, 40.0, "#fbbf24")
            .with_kind(BodyKind::Star)
            .with_temperature(6000.0),
        planet(2, 150.0, -1.5, 3000.0, 35.0, "#f97316")
            .with_kind(BodyKind::Star)
            .with_temperature(4500.0),
        planet(3, 600.0, 2.8, 50.0, 10.0, "#06b6d4"),
    ]
}

/// Random asteroid swarm
pub fn init_chaos<R: Rng>(rng: &mut R) -> Vec<Body> {
    (0..CHAOS_BODY_COUNT as u64)
        .map(|i| {
            let position = Vec3::new(
                (rng.gen::<f32>() - 0.5) * 800.0,
                (rng.gen::<f32>() - 0.5) * 400.0,
                (rng.gen::<f32>() - 0.5) * 800.0,
            );
            let velocity = Vec3::new(
                (rng.gen::<f32>() - 0.5) * 2.0,
                (rng.gen::<f32>() - 0.5) * 2.0,
                (rng.gen::<f32>() - 0.5) * 2.0,
            );
            let mass = rng.gen::<f32>() * 200.0 + 20.0;
            let radius = rng.gen::<f32>() * 15.0 + 5.0;
            let color = hsl_to_rgb(rng.gen::<f32>(), 0.7, 0.6);

            Body::new(BodyId(i + 1), position, velocity, mass, radius)
                .with_color(color)
                .with_kind(BodyKind::Asteroid)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn preset_names_round_trip() {
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
        assert!(matches!(
            "galaxy".parse::<Preset>(),
            Err(GravityError::UnknownPreset(_))
        ));
    }

    #[test]
    fn default_scenario_layout() {
        let bodies = init_default();
        assert_eq!(bodies.len(), 5);
        assert_eq!(bodies[0].kind, BodyKind::Star);
        assert_eq!(bodies[0].temperature, Some(5500.0));
        assert_eq!(bodies[4].kind, BodyKind::Moon);
        assert_eq!(bodies[3].position, Vec3::new(-700.0, 50.0, 0.0));
    }

    #[test]
    fn binary_stars_have_zero_net_momentum_before_planet() {
        let bodies = init_binary_stars();
        let stars: Vec3 = bodies[..2].iter().map(Body::momentum).sum();
        assert!(stars.length() < 1e-3);
    }

    #[test]
    fn chaos_bodies_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let bodies = init_chaos(&mut rng);
        assert_eq!(bodies.len(), CHAOS_BODY_COUNT);
        for b in &bodies {
            assert_eq!(b.kind, BodyKind::Asteroid);
            assert!(b.position.x.abs() <= 400.0 && b.position.y.abs() <= 200.0);
            assert!((20.0..=220.0).contains(&b.mass));
            assert!((5.0..=20.0).contains(&b.radius));
        }
    }
}
