//! Side-view trajectory plot of a reentry profile

use common::raster::{color_from_hex, with_alpha, Color, PixelBuffer, WHITE};
use glam::Vec2;

use crate::profile::{FlightStatus, ReentryStep, SPACE_ALTITUDE, START_ALTITUDE};

pub const CANVAS_WIDTH: u32 = 800;
pub const CANVAS_HEIGHT: u32 = 256;

/// Samples hotter than this get a heat marker
pub const HEAT_MARKER_TEMPERATURE: f64 = 1_000.0;

const HEAT_COLOR: Color = [1.0, 69.0 / 255.0, 0.0, 1.0];

/// Badge color for a flight status
pub fn status_color(status: FlightStatus) -> Color {
    let hex = match status {
        FlightStatus::Space => "#94a3b8",
        FlightStatus::Reentry => "#fb923c",
        FlightStatus::Plasma => "#ef4444",
        FlightStatus::Subsonic => "#60a5fa",
        FlightStatus::Landed => "#34d399",
        FlightStatus::Crashed => "#dc2626",
        FlightStatus::Burned => "#ea580c",
    };
    color_from_hex(hex).unwrap_or(WHITE)
}

pub struct ReentryRenderer {
    frame: PixelBuffer,
    atmosphere: Vec<(f32, Color)>,
}

impl Default for ReentryRenderer {
    fn default() -> Self {
        Self::new(CANVAS_WIDTH, CANVAS_HEIGHT)
    }
}

impl ReentryRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        let atmosphere = [
            (0.0, "#020617"),
            (0.3, "#172554"),
            (0.6, "#1e3a8a"),
            (1.0, "#38bdf8"),
        ]
        .into_iter()
        .filter_map(|(offset, hex)| Some((offset, color_from_hex(hex)?)))
        .collect();

        Self {
            frame: PixelBuffer::new(width, height),
            atmosphere,
        }
    }

    pub fn frame(&self) -> &PixelBuffer {
        &self.frame
    }

    /// Screen position of sample `index` out of `len`
    pub fn sample_position(&self, index: usize, len: usize, altitude: f64) -> Vec2 {
        let width = self.frame.width() as f32;
        let height = self.frame.height() as f32;
        Vec2::new(
            index as f32 / len.max(1) as f32 * width,
            height - (altitude / START_ALTITUDE) as f32 * height,
        )
    }

    /// Draw the profile; `cursor` marks the sample currently being played back
    pub fn render(&mut self, profile: &[ReentryStep], cursor: Option<usize>) {
        self.frame.fill_vertical_gradient(&self.atmosphere);

        let width = self.frame.width() as f32;
        let space_y = self.sample_position(0, 1, SPACE_ALTITUDE).y;
        self.frame.draw_dashed_line(
            Vec2::new(0.0, space_y),
            Vec2::new(width, space_y),
            1.0,
            with_alpha(WHITE, 0.15),
            Some(6.0),
        );

        let len = profile.len();
        let path: Vec<Option<Vec2>> = profile
            .iter()
            .enumerate()
            .map(|(i, s)| Some(self.sample_position(i, len, s.altitude)))
            .collect();
        self.frame.draw_polyline(path, 2.0, with_alpha(WHITE, 0.2));

        for (i, step) in profile.iter().enumerate() {
            if step.temperature <= HEAT_MARKER_TEMPERATURE {
                continue;
            }
            let intensity = ((step.temperature - HEAT_MARKER_TEMPERATURE) / 2_000.0).min(1.0) as f32;
            let p = self.sample_position(i, len, step.altitude);
            self.frame
                .fill_circle(p, 2.0 + intensity * 4.0, with_alpha(HEAT_COLOR, intensity));
        }

        if let Some(step) = cursor.and_then(|i| profile.get(i).map(|s| (i, s))) {
            let (i, sample) = step;
            let p = self.sample_position(i, len, sample.altitude);
            self.frame.fill_circle(p, 4.0, WHITE);
            self.frame
                .stroke_circle(p, 8.0, 2.0, status_color(sample.status), None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{compute_profile, ReentryParams};

    #[test]
    fn ground_maps_to_bottom_row() {
        let renderer = ReentryRenderer::default();
        let p = renderer.sample_position(0, 10, 0.0);
        assert_eq!(p, Vec2::new(0.0, CANVAS_HEIGHT as f32));
        let top = renderer.sample_position(5, 10, START_ALTITUDE);
        assert_eq!(top, Vec2::new(CANVAS_WIDTH as f32 / 2.0, 0.0));
    }

    #[test]
    fn cursor_marker_is_white() {
        let profile = compute_profile(&ReentryParams::default());
        let mut renderer = ReentryRenderer::default();
        renderer.render(&profile, Some(0));

        let p = renderer.sample_position(0, profile.len(), profile[0].altitude);
        let px = renderer.frame().pixel(p.x as u32 + 1, p.y as u32 + 1).unwrap();
        assert_eq!(px, [255, 255, 255, 255]);
    }
}
