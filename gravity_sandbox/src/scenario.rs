//! YAML scenario files describing a custom body list
//!
//! ```yaml
//! name: two-body
//! bodies:
//!   - position: [-50, 0, 0]
//!     velocity: [5, 0, 0]
//!     mass: 100
//!     radius: 10
//!     kind: planet
//! ```

use common::config::load_yaml;
use common::raster::Color;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::body::{Body, BodyId, BodyKind};
use crate::GravityError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    pub position: Vec3,
    #[serde(default)]
    pub velocity: Vec3,
    pub mass: f32,
    pub radius: f32,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub kind: BodyKind,
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl BodyConfig {
    pub fn into_body(self, id: BodyId) -> Body {
        let mut body =
            Body::new(id, self.position, self.velocity, self.mass, self.radius).with_kind(self.kind);
        if let Some(color) = self.color {
            body = body.with_color(color);
        }
        if let Some(temperature) = self.temperature {
            body = body.with_temperature(temperature);
        }
        body
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub bodies: Vec<BodyConfig>,
}

impl ScenarioConfig {
    pub fn load(path: &Path) -> Result<Self, GravityError> {
        Ok(load_yaml(path)?)
    }

    pub fn into_bodies(self) -> Vec<Body> {
        self.bodies
            .into_iter()
            .zip(1..)
            .map(|(config, id)| config.into_body(BodyId(id)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_scenario() {
        let yaml = r#"
name: pair
bodies:
  - position: [-50, 0, 0]
    velocity: [5, 0, 0]
    mass: 100
    radius: 10
  - position: [50, 0, 0]
    mass: -4
    radius: 10
    kind: moon
    color: [1.0, 0.0, 0.0, 1.0]
"#;
        let scenario: ScenarioConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(scenario.name.as_deref(), Some("pair"));

        let bodies = scenario.into_bodies();
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[0].kind, BodyKind::Planet);
        assert_eq!(bodies[1].velocity, Vec3::ZERO);
        assert_eq!(bodies[1].kind, BodyKind::Moon);
        assert_eq!(bodies[1].color, [1.0, 0.0, 0.0, 1.0]);
        assert!(bodies[1].mass > 0.0);
    }

    #[test]
    fn missing_file_is_scenario_error() {
        let err = ScenarioConfig::load(Path::new("/no/such/scenario.yaml")).unwrap_err();
        assert!(matches!(err, GravityError::Scenario(_)));
    }
}
