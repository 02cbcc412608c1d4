//! Scalar field to RGBA color mapping

use common::raster::{hsl_to_rgb, to_rgba8, PixelBuffer};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::field::ScalarField;
use crate::WaveError;

/// Values closer to zero than this render as the dark background in
/// interference mode
pub const NODE_THRESHOLD: f32 = 0.05;

const NODE_COLOR: [u8; 4] = [8, 12, 24, 255];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Signed duotone: cyan crests, blue troughs
    #[default]
    Interference,
    Heatmap,
    Rainbow,
    Mono,
}

impl ColorMode {
    pub const ALL: [ColorMode; 4] = [
        ColorMode::Interference,
        ColorMode::Heatmap,
        ColorMode::Rainbow,
        ColorMode::Mono,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ColorMode::Interference => "interference",
            ColorMode::Heatmap => "heatmap",
            ColorMode::Rainbow => "rainbow",
            ColorMode::Mono => "mono",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ColorMode::Interference => "Cyan",
            ColorMode::Heatmap => "Heat",
            ColorMode::Rainbow => "Rainbow",
            ColorMode::Mono => "Mono",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorMode {
    type Err = WaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorMode::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| WaveError::UnknownColorMode(s.to_string()))
    }
}

/// Truncate to a byte, saturating outside [0, 255]
fn channel(x: f32) -> u8 {
    x.floor().clamp(0.0, 255.0) as u8
}

/// Color for one field value. Values outside [-1, 1] (amplitude above 1)
/// saturate.
pub fn map_value(mode: ColorMode, value: f32) -> [u8; 4] {
    match mode {
        ColorMode::Interference => {
            if value.abs() < NODE_THRESHOLD {
                return NODE_COLOR;
            }
            let intensity = value.abs();
            let (r, g) = if value > 0.0 {
                (0.0, intensity * 255.0)
            } else {
                (intensity * 100.0, intensity * 50.0)
            };
            [channel(r), channel(g), channel(intensity * 255.0), 255]
        }
        ColorMode::Heatmap => {
            let norm = (value + 1.0) / 2.0;
            [
                channel(norm * 255.0),
                channel((norm * PI).sin() * 150.0),
                channel((1.0 - norm) * 255.0),
                255,
            ]
        }
        ColorMode::Rainbow => {
            let hue = (value + 1.0) / 2.0 * 270.0;
            to_rgba8(hsl_to_rgb(hue / 360.0, 0.8, 0.5))
        }
        ColorMode::Mono => {
            let gray = channel((value + 1.0) / 2.0 * 255.0);
            [gray, gray, gray, 255]
        }
    }
}

/// Paint `field` into `frame`, resizing the frame to match
pub fn colorize(field: &ScalarField, mode: ColorMode, frame: &mut PixelBuffer) {
    if frame.width() != field.width() || frame.height() != field.height() {
        frame.resize(field.width(), field.height());
    }
    for (px, &value) in frame
        .as_bytes_mut()
        .chunks_exact_mut(4)
        .zip(field.values())
    {
        px.copy_from_slice(&map_value(mode, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interference_duotone() {
        assert_eq!(map_value(ColorMode::Interference, 0.01), NODE_COLOR);
        assert_eq!(map_value(ColorMode::Interference, -0.04), NODE_COLOR);
        assert_eq!(map_value(ColorMode::Interference, 1.0), [0, 255, 255, 255]);
        assert_eq!(map_value(ColorMode::Interference, -1.0), [100, 50, 255, 255]);
        // Amplitude 2 saturates instead of wrapping
        assert_eq!(map_value(ColorMode::Interference, 2.0), [0, 255, 255, 255]);
    }

    #[test]
    fn heatmap_runs_blue_to_red() {
        assert_eq!(map_value(ColorMode::Heatmap, -1.0), [0, 0, 255, 255]);
        assert_eq!(map_value(ColorMode::Heatmap, 1.0)[0], 255);
        assert_eq!(map_value(ColorMode::Heatmap, 1.0)[2], 0);
        assert!(map_value(ColorMode::Heatmap, 0.0)[1] >= 149);
    }

    #[test]
    fn mono_and_rainbow_endpoints() {
        assert_eq!(map_value(ColorMode::Mono, -1.0), [0, 0, 0, 255]);
        assert_eq!(map_value(ColorMode::Mono, 1.0), [255, 255, 255, 255]);
        // Hue 0 is red
        let red = map_value(ColorMode::Rainbow, -1.0);
        assert!(red[0] > 200 && red[1] < 40 && red[2] < 40, "{red:?}");
    }

    #[test]
    fn color_mode_names_round_trip() {
        for mode in ColorMode::ALL {
            assert_eq!(mode.name().parse::<ColorMode>(), Ok(mode));
        }
        assert!("sepia".parse::<ColorMode>().is_err());
    }
}
