//! Named experiment setups

use std::fmt;
use std::str::FromStr;

use crate::field::{SimMode, WaveConfig};
use crate::WaveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Young's double slit
    Young,
    /// Wide slits driven in antiphase
    Wide,
    High,
    Grating,
    Single,
    Circular,
    Laser,
}

impl Preset {
    pub const ALL: [Preset; 7] = [
        Preset::Young,
        Preset::Wide,
        Preset::High,
        Preset::Grating,
        Preset::Single,
        Preset::Circular,
        Preset::Laser,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Young => "young",
            Preset::Wide => "wide",
            Preset::High => "high",
            Preset::Grating => "grating",
            Preset::Single => "single",
            Preset::Circular => "circular",
            Preset::Laser => "laser",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Preset::Young => "Young's Experiment",
            Preset::Wide => "Wide Slits",
            Preset::High => "High Frequency",
            Preset::Grating => "Grating",
            Preset::Single => "Single Slit",
            Preset::Circular => "Circular Wave",
            Preset::Laser => "Laser Beam",
        }
    }

    /// Overwrite the fields this preset controls; the rest are kept
    pub fn apply(&self, config: &mut WaveConfig) {
        match self {
            Preset::Young => {
                config.frequency = 15.0;
                config.separation = 40.0;
                config.phase_deg = 0.0;
                config.amplitude = 1.2;
                config.mode = SimMode::DoubleSlit;
                config.source_count = 2;
            }
            Preset::Wide => {
                config.frequency = 10.0;
                config.separation = 120.0;
                config.phase_deg = 180.0;
                config.amplitude = 1.0;
                config.mode = SimMode::DoubleSlit;
            }
            Preset::High => {
                config.frequency = 45.0;
                config.separation = 80.0;
                config.phase_deg = 0.0;
                config.amplitude = 0.8;
                config.mode = SimMode::DoubleSlit;
            }
            Preset::Grating => {
                config.frequency = 25.0;
                config.separation = 30.0;
                config.source_count = 5;
                config.mode = SimMode::Grating;
            }
            Preset::Single => {
                config.frequency = 20.0;
                config.slit_width = 20.0;
                config.mode = SimMode::SingleSlit;
            }
            Preset::Circular => {
                config.frequency = 15.0;
                config.mode = SimMode::Circular;
            }
            Preset::Laser => {
                config.frequency = 50.0;
                config.separation = 50.0;
                config.phase_deg = 0.0;
                config.amplitude = 1.5;
                config.mode = SimMode::DoubleSlit;
            }
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = WaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| WaveError::UnknownPreset(s.to_string()))
    }
}
