//! Field image plus overlays

use common::raster::{color_from_hex, with_alpha, Color, PixelBuffer, WHITE};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::colormap;
use crate::field::ScalarField;
use crate::optics::WaveOptics;

/// Wavefront rings are tested every this many pixels of radius
pub const WAVEFRONT_STEP: usize = 30;
pub const WAVEFRONT_MAX_RADIUS: usize = 400;
/// Phase window around a crest that counts as a wavefront
pub const WAVEFRONT_TOLERANCE: f32 = 0.3;
pub const RULER_TICK_SPACING: f32 = 50.0;

const YELLOW: Color = [1.0, 1.0, 0.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayOptions {
    pub show_wavefronts: bool,
    pub show_ruler: bool,
    pub show_intensity_line: bool,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            show_wavefronts: false,
            show_ruler: false,
            show_intensity_line: true,
        }
    }
}

pub struct WaveRenderer {
    frame: PixelBuffer,
}

impl Default for WaveRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveRenderer {
    pub fn new() -> Self {
        Self {
            frame: PixelBuffer::new(1, 1),
        }
    }

    pub fn frame(&self) -> &PixelBuffer {
        &self.frame
    }

    pub fn render(&mut self, optics: &WaveOptics, field: &ScalarField, overlays: &OverlayOptions) {
        colormap::colorize(field, optics.config().color_mode, &mut self.frame);

        if overlays.show_wavefronts {
            self.draw_wavefronts(optics);
        }
        if overlays.show_ruler {
            self.draw_ruler(optics.center());
        }

        for source in optics.sources() {
            self.frame.fill_circle(source.position, 4.0, WHITE);
        }
        for point in optics.measurements().iter() {
            self.frame.stroke_circle(point.position, 8.0, 2.0, YELLOW, None);
        }

        if overlays.show_intensity_line {
            let y = optics.intensity_row() as f32;
            let width = self.frame.width() as f32;
            self.frame.draw_line(
                Vec2::new(0.0, y),
                Vec2::new(width, y),
                2.0,
                with_alpha(YELLOW, 0.5),
            );
        }
    }

    /// Rings at radii whose phase sits on a crest
    fn draw_wavefronts(&mut self, optics: &WaveOptics) {
        let k = optics.config().wave_number();
        let color = with_alpha(WHITE, 0.2);
        for source in optics.sources() {
            for r in (0..WAVEFRONT_MAX_RADIUS).step_by(WAVEFRONT_STEP) {
                let radius = r as f32;
                let phase = (radius * k - optics.time()) % TAU;
                if phase.abs() < WAVEFRONT_TOLERANCE || (phase - TAU).abs() < WAVEFRONT_TOLERANCE {
                    self.frame.stroke_circle(source.position, radius, 1.0, color, None);
                }
            }
        }
    }

    fn draw_ruler(&mut self, center: Vec2) {
        let color = with_alpha(YELLOW, 0.5);
        let tick = color_from_hex("#ffff00b3").unwrap_or(YELLOW);
        let (width, height) = (self.frame.width() as f32, self.frame.height() as f32);

        self.frame.draw_dashed_line(
            Vec2::new(0.0, center.y),
            Vec2::new(width, center.y),
            1.0,
            color,
            Some(5.0),
        );
        self.frame.draw_dashed_line(
            Vec2::new(center.x, 0.0),
            Vec2::new(center.x, height),
            1.0,
            color,
            Some(5.0),
        );

        for i in (-4..=4).filter(|&i| i != 0) {
            let x = center.x + i as f32 * RULER_TICK_SPACING;
            self.frame.draw_line(
                Vec2::new(x, center.y - 5.0),
                Vec2::new(x, center.y + 5.0),
                1.0,
                tick,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::WaveConfig;
    use crate::ColorMode;

    fn mono_optics() -> WaveOptics {
        WaveOptics::with_canvas(
            WaveConfig {
                color_mode: ColorMode::Mono,
                ..Default::default()
            },
            120,
            100,
        )
    }

    #[test]
    fn frame_follows_field_size_and_marks_sources() {
        let optics = mono_optics();
        let field = optics.sample_field(0.0);
        let mut renderer = WaveRenderer::new();
        renderer.render(&optics, &field, &OverlayOptions::default());

        assert_eq!(renderer.frame().width(), 120);
        assert_eq!(renderer.frame().height(), 100);
        let src = optics.sources()[0].position;
        assert_eq!(
            renderer.frame().pixel(src.x as u32, src.y as u32),
            Some([255, 255, 255, 255])
        );
    }

    #[test]
    fn untouched_pixels_show_the_colormap() {
        let optics = mono_optics();
        let field = optics.sample_field(0.0);
        let mut renderer = WaveRenderer::new();
        let overlays = OverlayOptions {
            show_intensity_line: false,
            ..Default::default()
        };
        renderer.render(&optics, &field, &overlays);

        let expected = colormap::map_value(ColorMode::Mono, field.get(3, 3).unwrap());
        assert_eq!(renderer.frame().pixel(3, 3), Some(expected));
    }
}
