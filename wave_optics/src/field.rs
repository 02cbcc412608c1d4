//! Source layout and per-pixel superposition

use common::config::clamp_logged;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::colormap::ColorMode;
use crate::WaveError;

/// Width and height of the simulation canvas
pub const CANVAS_SIZE: u32 = 400;
/// Frequency is divided by this to get the spatial wave number
pub const WAVE_NUMBER_DIVISOR: f32 = 150.0;
/// Sources used to approximate a finite single slit
pub const SINGLE_SLIT_SOURCES: usize = 5;
/// Pixels per wavelength at frequency 1
pub const WAVELENGTH_SCALE: f32 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimMode {
    #[default]
    DoubleSlit,
    SingleSlit,
    Grating,
    Circular,
}

impl SimMode {
    pub const ALL: [SimMode; 4] = [
        SimMode::DoubleSlit,
        SimMode::SingleSlit,
        SimMode::Grating,
        SimMode::Circular,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SimMode::DoubleSlit => "double-slit",
            SimMode::SingleSlit => "single-slit",
            SimMode::Grating => "grating",
            SimMode::Circular => "circular",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SimMode::DoubleSlit => "Double Slit",
            SimMode::SingleSlit => "Single Slit",
            SimMode::Grating => "Grating",
            SimMode::Circular => "Circular",
        }
    }
}

impl fmt::Display for SimMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SimMode {
    type Err = WaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("diffraction-grating") {
            return Ok(SimMode::Grating);
        }
        SimMode::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| WaveError::UnknownMode(s.to_string()))
    }
}

/// Everything the sampler and the diffraction formulas depend on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    pub mode: SimMode,
    pub frequency: f32,
    /// Slit spacing in pixels (double slit and grating)
    pub separation: f32,
    /// Phase offset of the second double-slit source, in degrees
    pub phase_deg: f32,
    pub amplitude: f32,
    /// Number of grating slits
    pub source_count: u32,
    /// Single slit aperture in pixels
    pub slit_width: f32,
    pub color_mode: ColorMode,
    /// Animation speed multiplier
    pub speed: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            mode: SimMode::DoubleSlit,
            frequency: 20.0,
            separation: 60.0,
            phase_deg: 0.0,
            amplitude: 1.0,
            source_count: 2,
            slit_width: 10.0,
            color_mode: ColorMode::Interference,
            speed: 1.0,
        }
    }
}

impl WaveConfig {
    pub fn clamped(self) -> Self {
        Self {
            frequency: clamp_logged("frequency", self.frequency, 5.0, 100.0),
            separation: clamp_logged("separation", self.separation, 10.0, 200.0),
            phase_deg: clamp_logged("phase_deg", self.phase_deg, 0.0, 360.0),
            amplitude: clamp_logged("amplitude", self.amplitude, 0.1, 2.0),
            source_count: clamp_logged("source_count", self.source_count, 2, 10),
            slit_width: clamp_logged("slit_width", self.slit_width, 5.0, 50.0),
            speed: clamp_logged("speed", self.speed, 0.0, 3.0),
            ..self
        }
    }

    /// Wavelength in pixels
    pub fn wavelength(&self) -> f32 {
        WAVELENGTH_SCALE / self.frequency
    }

    /// Spatial wave number used by the sampler
    pub fn wave_number(&self) -> f32 {
        self.frequency / WAVE_NUMBER_DIVISOR
    }

    /// How many sources the current mode emits from
    pub fn emitter_count(&self) -> usize {
        match self.mode {
            SimMode::DoubleSlit => 2,
            SimMode::SingleSlit => SINGLE_SLIT_SOURCES,
            SimMode::Grating => self.source_count as usize,
            SimMode::Circular => 1,
        }
    }
}

/// A coherent point emitter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveSource {
    pub position: Vec2,
    /// Phase offset in radians
    pub phase: f32,
}

impl WaveSource {
    pub fn new(position: Vec2, phase: f32) -> Self {
        Self { position, phase }
    }
}

/// Sources for the configured mode, centred on `center`
pub fn layout_sources(config: &WaveConfig, center: Vec2) -> Vec<WaveSource> {
    let at = |dx: f32, phase: f32| WaveSource::new(center + Vec2::new(dx, 0.0), phase);

    match config.mode {
        SimMode::DoubleSlit => vec![
            at(-config.separation / 2.0, 0.0),
            at(config.separation / 2.0, config.phase_deg.to_radians()),
        ],
        SimMode::SingleSlit => {
            let mid = (SINGLE_SLIT_SOURCES - 1) as f32 / 2.0;
            (0..SINGLE_SLIT_SOURCES)
                .map(|i| at((i as f32 - mid) * config.slit_width / 4.0, 0.0))
                .collect()
        }
        SimMode::Grating => {
            let n = config.source_count.max(1);
            let mid = (n - 1) as f32 / 2.0;
            (0..n)
                .map(|i| at((i as f32 - mid) * config.separation, 0.0))
                .collect()
        }
        SimMode::Circular => vec![at(0.0, 0.0)],
    }
}

/// Superposed displacement at `point`, in [-amplitude, amplitude]
pub fn sample_at(sources: &[WaveSource], config: &WaveConfig, point: Vec2, time: f32) -> f32 {
    if sources.is_empty() {
        return 0.0;
    }
    let k = config.wave_number();
    let weight = config.amplitude / sources.len() as f32;
    sources
        .iter()
        .map(|src| (point.distance(src.position) * k - time + src.phase).sin() * weight)
        .sum()
}

/// Row-major grid of sampled displacements
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl ScalarField {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.values
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn row(&self, y: u32) -> Option<&[f32]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.width as usize;
        self.values.get(start..start + self.width as usize)
    }
}

/// Sample every pixel of a `width` x `height` canvas at integer coordinates
pub fn sample_field(
    sources: &[WaveSource],
    config: &WaveConfig,
    time: f32,
    width: u32,
    height: u32,
) -> ScalarField {
    let mut values = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            values.push(sample_at(sources, config, Vec2::new(x as f32, y as f32), time));
        }
    }
    ScalarField {
        width,
        height,
        values,
    }
}
