//! Interactive wave optics state: configuration, clock and probes

use glam::Vec2;
use std::f32::consts::FRAC_PI_6;

use crate::diffraction::{self, DiffractionSample};
use crate::field::{self, ScalarField, SimMode, WaveConfig, WaveSource, CANVAS_SIZE};
use crate::measurement::{MeasurementLog, MeasurementPoint};
use crate::presets::Preset;

/// Phase advance per frame at speed 1
pub const TIME_STEP: f32 = 0.15;
/// Screen distance used for the fringe spacing estimate
pub const SCREEN_DISTANCE: f32 = 200.0;
/// The intensity line samples the row at this fraction of the height
pub const INTENSITY_ROW_FRACTION: f32 = 0.8;

/// How the second double-slit source's phase combines with the first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterferenceKind {
    Constructive,
    Destructive,
    Mixed,
}

impl InterferenceKind {
    pub fn from_phase(phase_deg: f32) -> Self {
        let phase = phase_deg.rem_euclid(360.0);
        if phase.abs() < 1e-3 || (phase - 360.0).abs() < 1e-3 {
            InterferenceKind::Constructive
        } else if (phase - 180.0).abs() < 1e-3 {
            InterferenceKind::Destructive
        } else {
            InterferenceKind::Mixed
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InterferenceKind::Constructive => "Constructive",
            InterferenceKind::Destructive => "Destructive",
            InterferenceKind::Mixed => "Mixed Phase",
        }
    }
}

/// Read-only numbers derived from the configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedStats {
    pub wavelength: f32,
    /// Path difference at 30°
    pub path_difference: f32,
    /// Only defined for the double slit
    pub fringe_spacing: Option<f32>,
    /// Double-slit maxima angles in degrees
    pub maxima_deg: Vec<f32>,
    pub interference: InterferenceKind,
}

#[derive(Debug, Clone)]
pub struct WaveOptics {
    config: WaveConfig,
    sources: Vec<WaveSource>,
    width: u32,
    height: u32,
    time: f32,
    pub paused: bool,
    measurements: MeasurementLog,
}

impl Default for WaveOptics {
    fn default() -> Self {
        Self::new(WaveConfig::default())
    }
}

impl WaveOptics {
    pub fn new(config: WaveConfig) -> Self {
        Self::with_canvas(config, CANVAS_SIZE, CANVAS_SIZE)
    }

    pub fn with_canvas(config: WaveConfig, width: u32, height: u32) -> Self {
        let mut optics = Self {
            config: config.clamped(),
            sources: Vec::new(),
            width: width.max(1),
            height: height.max(1),
            time: 0.0,
            paused: false,
            measurements: MeasurementLog::default(),
        };
        optics.relayout();
        optics
    }

    fn relayout(&mut self) {
        self.sources = field::layout_sources(&self.config, self.center());
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    /// Apply a new configuration. Switching modes clears the measurements.
    pub fn configure(&mut self, config: WaveConfig) {
        let config = config.clamped();
        if config == self.config {
            return;
        }
        if config.mode != self.config.mode {
            log::debug!("Mode {} -> {}", self.config.mode, config.mode);
            self.measurements.clear();
        }
        self.config = config;
        self.relayout();
    }

    pub fn set_mode(&mut self, mode: SimMode) {
        self.configure(WaveConfig { mode, ..self.config });
    }

    pub fn apply_preset(&mut self, preset: Preset) {
        let mut config = self.config;
        preset.apply(&mut config);
        self.configure(config);
        self.measurements.clear();
        log::debug!("Applied preset {preset}");
    }

    pub fn sources(&self) -> &[WaveSource] {
        &self.sources
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advance the animation clock by one frame unless paused
    pub fn advance(&mut self) {
        if !self.paused {
            self.time += TIME_STEP * self.config.speed;
        }
    }

    pub fn sample_field(&self, time: f32) -> ScalarField {
        field::sample_field(&self.sources, &self.config, time, self.width, self.height)
    }

    pub fn sample_diffraction(&self) -> Vec<DiffractionSample> {
        diffraction::diffraction_curve(&self.config)
    }

    /// Probe the field at `point` at the current time and log the result
    pub fn measure_at(&mut self, point: Vec2) -> MeasurementPoint {
        let value = field::sample_at(&self.sources, &self.config, point, self.time);
        let measurement = MeasurementPoint::new(point, value, self.config.amplitude);
        self.measurements.record(measurement);
        log::debug!(
            "Measured {:.3} at ({:.0}, {:.0})",
            value,
            point.x,
            point.y
        );
        measurement
    }

    pub fn measurements(&self) -> &MeasurementLog {
        &self.measurements
    }

    pub fn clear_measurements(&mut self) {
        self.measurements.clear();
    }

    /// Row sampled by the intensity line
    pub fn intensity_row(&self) -> u32 {
        ((self.height as f32 * INTENSITY_ROW_FRACTION) as u32).min(self.height - 1)
    }

    /// Field values along the intensity line
    pub fn intensity_line(&self, field: &ScalarField) -> Vec<f32> {
        field
            .row(self.intensity_row())
            .map(<[f32]>::to_vec)
            .unwrap_or_default()
    }

    pub fn stats(&self) -> DerivedStats {
        let wavelength = self.config.wavelength();
        let separation = self.config.separation;
        let double_slit = self.config.mode == SimMode::DoubleSlit;

        DerivedStats {
            wavelength,
            path_difference: separation * FRAC_PI_6.sin(),
            fringe_spacing: double_slit.then(|| wavelength * SCREEN_DISTANCE / separation),
            maxima_deg: if double_slit {
                diffraction::maxima_angles(f64::from(separation), f64::from(wavelength))
                    .into_iter()
                    .map(|a| a as f32)
                    .collect()
            } else {
                Vec::new()
            },
            interference: InterferenceKind::from_phase(self.config.phase_deg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn clock_respects_speed_and_pause() {
        let mut optics = WaveOptics::new(WaveConfig {
            speed: 2.0,
            ..Default::default()
        });
        optics.advance();
        assert_abs_diff_eq!(optics.time(), 0.3);
        optics.paused = true;
        optics.advance();
        assert_abs_diff_eq!(optics.time(), 0.3);
    }

    #[test]
    fn mode_change_clears_measurements() {
        let mut optics = WaveOptics::default();
        optics.measure_at(Vec2::new(10.0, 10.0));
        optics.configure(WaveConfig {
            frequency: 40.0,
            ..*optics.config()
        });
        assert_eq!(optics.measurements().len(), 1);

        optics.set_mode(SimMode::Circular);
        assert!(optics.measurements().is_empty());
        assert_eq!(optics.sources().len(), 1);
    }

    #[test]
    fn stats_for_default_double_slit() {
        let stats = WaveOptics::default().stats();
        assert_abs_diff_eq!(stats.wavelength, 50.0);
        assert_abs_diff_eq!(stats.path_difference, 30.0, epsilon = 1e-4);
        assert_abs_diff_eq!(stats.fringe_spacing.unwrap(), 50.0 * 200.0 / 60.0, epsilon = 1e-4);
        assert_eq!(stats.maxima_deg.len(), 3);
        assert_eq!(stats.interference, InterferenceKind::Constructive);
    }

    #[test]
    fn interference_kind_by_phase() {
        assert_eq!(InterferenceKind::from_phase(360.0), InterferenceKind::Constructive);
        assert_eq!(InterferenceKind::from_phase(180.0), InterferenceKind::Destructive);
        assert_eq!(InterferenceKind::from_phase(45.0), InterferenceKind::Mixed);
    }

    #[test]
    fn intensity_line_is_the_sampled_row() {
        let optics = WaveOptics::with_canvas(WaveConfig::default(), 40, 30);
        let field = optics.sample_field(0.0);
        assert_eq!(optics.intensity_row(), 24);
        assert_eq!(optics.intensity_line(&field), field.row(24).unwrap().to_vec());
    }
}
