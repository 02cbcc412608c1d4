//! Closed-form far-field intensity curves
//!
//! These are independent of the per-pixel sampler and evaluated over a sweep
//! of observation angles. Intensities are normalised to a peak of 1.

use serde::Serialize;
use std::f64::consts::PI;

use crate::field::{SimMode, WaveConfig};

pub const SWEEP_MIN_DEG: i32 = -90;
pub const SWEEP_MAX_DEG: i32 = 90;

/// Below this the sinc and grating quotients use their limit value
const SINGULAR_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiffractionSample {
    pub angle_deg: f64,
    pub intensity: f64,
}

/// Two-slit interference, `cos²(π d sinθ / λ)`
pub fn double_slit(theta: f64, separation: f64, wavelength: f64) -> f64 {
    let delta = PI * separation * theta.sin() / wavelength;
    delta.cos().powi(2)
}

/// Single-slit envelope, `sinc²(π w sinθ / λ)`, equal to 1 at θ = 0
pub fn single_slit(theta: f64, slit_width: f64, wavelength: f64) -> f64 {
    let beta = PI * slit_width * theta.sin() / wavelength;
    if beta.abs() < SINGULAR_EPSILON {
        return 1.0;
    }
    (beta.sin() / beta).powi(2)
}

/// N-slit grating, `[sin Nδ / sin δ]² / N²`, equal to 1 where sin δ = 0
pub fn grating(theta: f64, separation: f64, wavelength: f64, slits: u32) -> f64 {
    let n = f64::from(slits.max(1));
    let delta = PI * separation * theta.sin() / wavelength;
    let denominator = delta.sin();
    if denominator.abs() < SINGULAR_EPSILON {
        return 1.0;
    }
    ((n * delta).sin() / denominator).powi(2) / (n * n)
}

/// Normalised intensity at `theta` (radians) for the configured mode.
/// Circular waves have no slit pattern and always give 0.
pub fn intensity(config: &WaveConfig, theta: f64) -> f64 {
    let wavelength = f64::from(config.wavelength());
    let separation = f64::from(config.separation);
    let value = match config.mode {
        SimMode::DoubleSlit => double_slit(theta, separation, wavelength),
        SimMode::SingleSlit => single_slit(theta, f64::from(config.slit_width), wavelength),
        SimMode::Grating => grating(theta, separation, wavelength, config.source_count),
        SimMode::Circular => 0.0,
    };
    value.min(1.0)
}

/// Intensity at every whole degree from -90 to 90
pub fn diffraction_curve(config: &WaveConfig) -> Vec<DiffractionSample> {
    (SWEEP_MIN_DEG..=SWEEP_MAX_DEG)
        .map(|deg| {
            let angle_deg = f64::from(deg);
            DiffractionSample {
                angle_deg,
                intensity: intensity(config, angle_deg.to_radians()),
            }
        })
        .collect()
}

/// Double-slit maxima angles in degrees for orders -5..=5 that exist
pub fn maxima_angles(separation: f64, wavelength: f64) -> Vec<f64> {
    (-5..=5)
        .filter_map(|m| {
            let s = f64::from(m) * wavelength / separation;
            (s.abs() <= 1.0).then(|| s.asin().to_degrees())
        })
        .collect()
}
