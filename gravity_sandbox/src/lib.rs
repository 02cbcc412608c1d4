//! 3D N-body gravity sandbox
//!
//! Bodies attract each other through softened Newtonian gravity and either
//! merge or bounce when they touch. The engine is a plain owned value with no
//! rendering dependencies; [`renderer`] draws a snapshot of it each frame.

pub mod body;
pub mod equations_ui;
pub mod physics;
pub mod presets;
pub mod renderer;
pub mod scenario;

use common::config::ConfigError;
use thiserror::Error;

pub use body::{Body, BodyId, BodyKind};
pub use physics::{CollisionMode, EnergySample, GravityConfig, LaunchConfig, Simulation};
pub use presets::Preset;
pub use scenario::{BodyConfig, ScenarioConfig};

#[derive(Debug, Error)]
pub enum GravityError {
    #[error("unknown preset '{0}' (expected default, solar, binary or chaos)")]
    UnknownPreset(String),

    #[error("no body with id {0}")]
    UnknownBody(BodyId),

    #[error("unknown body kind '{0}'")]
    UnknownBodyKind(String),

    #[error("unknown collision mode '{0}' (expected merge or bounce)")]
    UnknownCollisionMode(String),

    #[error(transparent)]
    Scenario(#[from] ConfigError),
}
