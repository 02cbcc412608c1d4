//! Wave optics visualizer
//!
//! Coherent point sources are laid out according to a [`SimMode`] and their
//! waves are superposed per pixel into a [`ScalarField`]. Color mapping,
//! closed-form diffraction curves and the measurement tool are separate pure
//! functions over the same inputs. [`WaveOptics`] holds the configuration,
//! the animation clock and the measurement log.

pub mod colormap;
pub mod diffraction;
pub mod equations_ui;
pub mod field;
pub mod measurement;
pub mod optics;
pub mod presets;
pub mod renderer;

use thiserror::Error;

pub use colormap::ColorMode;
pub use diffraction::DiffractionSample;
pub use field::{ScalarField, SimMode, WaveConfig, WaveSource};
pub use measurement::{MeasurementLog, MeasurementPoint};
pub use optics::{DerivedStats, InterferenceKind, WaveOptics};
pub use presets::Preset;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WaveError {
    #[error("unknown simulation mode '{0}' (expected double-slit, single-slit, grating or circular)")]
    UnknownMode(String),

    #[error("unknown color mode '{0}' (expected interference, heatmap, rainbow or mono)")]
    UnknownColorMode(String),

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
}
