//! Bodies taking part in the N-body simulation

use common::raster::{color_from_hex, Color};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::GravityError;

/// Smallest mass a body can be created with
pub const MIN_MASS: f32 = 0.01;

/// Smallest radius a body can be created with
pub const MIN_RADIUS: f32 = 0.5;

/// Stable identity of a body; never reused within a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u64);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Display category; only affects rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    Star,
    #[default]
    Planet,
    Moon,
    Asteroid,
}

impl BodyKind {
    pub const ALL: [BodyKind; 4] = [
        BodyKind::Star,
        BodyKind::Planet,
        BodyKind::Moon,
        BodyKind::Asteroid,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BodyKind::Star => "star",
            BodyKind::Planet => "planet",
            BodyKind::Moon => "moon",
            BodyKind::Asteroid => "asteroid",
        }
    }
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BodyKind {
    type Err = GravityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BodyKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GravityError::UnknownBodyKind(s.to_string()))
    }
}

/// A body with mass, position and velocity
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub id: BodyId,
    pub position: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
    pub radius: f32,
    pub color: Color,
    pub kind: BodyKind,
    /// Surface temperature in kelvin, for stars
    pub temperature: Option<f32>,
    pub rotation_speed: Option<f32>,
}

impl Body {
    /// Mass and radius are clamped to their positive minimums
    pub fn new(id: BodyId, position: Vec3, velocity: Vec3, mass: f32, radius: f32) -> Self {
        Self {
            id,
            position,
            velocity,
            mass: positive_or(mass, MIN_MASS),
            radius: positive_or(radius, MIN_RADIUS),
            color: [0.58, 0.64, 0.72, 1.0],
            kind: BodyKind::Planet,
            temperature: None,
            rotation_speed: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Falls back to the current color if `hex` does not parse
    pub fn with_hex_color(mut self, hex: &str) -> Self {
        if let Some(color) = color_from_hex(hex) {
            self.color = color;
        }
        self
    }

    pub fn with_kind(mut self, kind: BodyKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_rotation(mut self, rotation_speed: f32) -> Self {
        self.rotation_speed = Some(rotation_speed);
        self
    }

    pub fn momentum(&self) -> Vec3 {
        self.velocity * self.mass
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.velocity.length_squared()
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

fn positive_or(value: f32, min: f32) -> f32 {
    if value.is_finite() && value >= min {
        value
    } else {
        log::warn!("Non-positive or tiny body parameter {value}, using {min}");
        min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mass_and_radius_are_clamped_positive() {
        let body = Body::new(BodyId(1), Vec3::ZERO, Vec3::ZERO, -5.0, 0.0);
        assert!(body.mass > 0.0);
        assert!(body.radius > 0.0);

        let body = Body::new(BodyId(2), Vec3::ZERO, Vec3::ZERO, f32::NAN, f32::INFINITY);
        assert_eq!(body.mass, MIN_MASS);
        assert_eq!(body.radius, MIN_RADIUS);
    }

    #[test]
    fn kinds_parse_case_insensitively() {
        assert_eq!("Star".parse::<BodyKind>().unwrap(), BodyKind::Star);
        assert_eq!(" asteroid ".parse::<BodyKind>().unwrap(), BodyKind::Asteroid);
        assert!("comet".parse::<BodyKind>().is_err());
    }

    #[test]
    fn invalid_hex_keeps_previous_color() {
        let body = Body::new(BodyId(1), Vec3::ZERO, Vec3::ZERO, 1.0, 1.0)
            .with_color([1.0, 0.0, 0.0, 1.0])
            .with_hex_color("not-a-color");
        assert_eq!(body.color, [1.0, 0.0, 0.0, 1.0]);
    }
}
