//! CPU renderer for the gravity sandbox
//!
//! Draws one frame of the simulation into a [`PixelBuffer`]: background,
//! parallax star field, floor grid, then bodies sorted far to near with their
//! trails, glow, shading and selection ring.

use common::camera::{FlyCamera, Viewport};
use common::raster::{color_from_hex, with_alpha, Color, PixelBuffer, TRANSPARENT, WHITE};
use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::body::{Body, BodyId, BodyKind};
use crate::physics::Simulation;

pub const STAR_COUNT: usize = 500;
pub const STAR_FIELD_EXTENT: f32 = 10_000.0;
pub const GRID_EXTENT: f32 = 3000.0;
pub const GRID_STEP: f32 = 400.0;
pub const GRID_FLOOR_Y: f32 = 400.0;

const GRID_COLOR: Color = [30.0 / 255.0, 41.0 / 255.0, 59.0 / 255.0, 0.5];
const LIGHT_DIR: Vec2 = Vec2::new(-0.5, -0.5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderQuality {
    Low,
    #[default]
    Medium,
    High,
}

impl RenderQuality {
    pub const ALL: [RenderQuality; 3] = [RenderQuality::Low, RenderQuality::Medium, RenderQuality::High];

    pub fn name(&self) -> &'static str {
        match self {
            RenderQuality::Low => "low",
            RenderQuality::Medium => "medium",
            RenderQuality::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub show_trails: bool,
    pub show_grid: bool,
    pub show_stars: bool,
    pub quality: RenderQuality,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_trails: true,
            show_grid: true,
            show_stars: true,
            quality: RenderQuality::Medium,
        }
    }
}

/// A fixed background star
#[derive(Debug, Clone, Copy)]
struct BackgroundStar {
    position: Vec3,
    brightness: f32,
}

pub struct GravityRenderer {
    frame: PixelBuffer,
    stars: Vec<BackgroundStar>,
    background: [(f32, Color); 3],
}

impl GravityRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_rng(width, height, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng>(width: u32, height: u32, rng: &mut R) -> Self {
        let stars = (0..STAR_COUNT)
            .map(|_| BackgroundStar {
                position: Vec3::new(
                    (rng.gen::<f32>() - 0.5) * STAR_FIELD_EXTENT,
                    (rng.gen::<f32>() - 0.5) * STAR_FIELD_EXTENT,
                    (rng.gen::<f32>() - 0.5) * STAR_FIELD_EXTENT,
                ),
                brightness: rng.gen::<f32>() * 0.8 + 0.2,
            })
            .collect();

        let deep = color_from_hex("#020617").unwrap_or([0.01, 0.02, 0.09, 1.0]);
        let mid = color_from_hex("#0a0f1a").unwrap_or([0.04, 0.06, 0.1, 1.0]);

        Self {
            frame: PixelBuffer::new(width, height),
            stars,
            background: [(0.0, deep), (0.5, mid), (1.0, deep)],
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.frame.resize(width, height);
    }

    pub fn frame(&self) -> &PixelBuffer {
        &self.frame
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.frame.width(), self.frame.height())
    }

    pub fn render(
        &mut self,
        sim: &Simulation,
        camera: &FlyCamera,
        selected: Option<BodyId>,
        options: &RenderOptions,
    ) {
        let viewport = self.viewport();
        self.frame.fill_vertical_gradient(&self.background);

        if options.show_stars {
            self.draw_star_field(camera, viewport);
        }
        if options.show_grid {
            self.draw_grid(camera, viewport);
        }

        let mut visible: Vec<_> = sim
            .bodies()
            .iter()
            .filter_map(|body| Some((body, camera.project(body.position, viewport)?)))
            .collect();
        visible.sort_by(|a, b| b.1.depth.total_cmp(&a.1.depth));

        for (body, proj) in visible {
            let r = (body.radius * proj.scale).max(2.0);

            if options.show_trails {
                self.draw_trail(sim, body, camera, viewport, proj.scale);
            }
            self.draw_glow(body, proj.screen, r);
            if body.kind == BodyKind::Star && options.quality != RenderQuality::Low {
                self.draw_corona(body, proj.screen, r, sim.frame());
            }
            self.draw_sphere(body, proj.screen, r);

            if body.kind == BodyKind::Planet && r > 8.0 && options.quality == RenderQuality::High {
                self.frame
                    .stroke_circle(proj.screen, r * 1.15, 2.0, with_alpha(body.color, 0.19), None);
            }
            if Some(body.id) == selected {
                self.frame.stroke_circle(proj.screen, r + 8.0, 2.0, WHITE, Some(4.0));
            }
        }

        self.draw_crosshair(viewport.center());
    }

    fn draw_star_field(&mut self, camera: &FlyCamera, viewport: Viewport) {
        for star in &self.stars {
            if let Some(proj) = camera.project(star.position, viewport) {
                let size = (2.0 * proj.scale * star.brightness).max(0.5);
                self.frame
                    .fill_circle(proj.screen, size, with_alpha(WHITE, star.brightness * 0.6));
            }
        }
    }

    fn draw_grid(&mut self, camera: &FlyCamera, viewport: Viewport) {
        let lines = (2.0 * GRID_EXTENT / GRID_STEP) as i32;
        for i in 0..=lines {
            let offset = -GRID_EXTENT + i as f32 * GRID_STEP;
            let segments = [
                (
                    Vec3::new(offset, GRID_FLOOR_Y, -GRID_EXTENT),
                    Vec3::new(offset, GRID_FLOOR_Y, GRID_EXTENT),
                ),
                (
                    Vec3::new(-GRID_EXTENT, GRID_FLOOR_Y, offset),
                    Vec3::new(GRID_EXTENT, GRID_FLOOR_Y, offset),
                ),
            ];
            for (a, b) in segments {
                if let (Some(pa), Some(pb)) = (camera.project(a, viewport), camera.project(b, viewport)) {
                    self.frame.draw_line(pa.screen, pb.screen, 1.0, GRID_COLOR);
                }
            }
        }
    }

    fn draw_trail(
        &mut self,
        sim: &Simulation,
        body: &Body,
        camera: &FlyCamera,
        viewport: Viewport,
        scale: f32,
    ) {
        let Some(trail) = sim.trail(body.id) else {
            return;
        };
        if trail.len() < 2 {
            return;
        }

        let width = (1.5 * scale).max(1.0);
        let len = trail.len() as f32;
        let mut last: Option<Vec2> = None;
        // Older points fade out
        for (i, point) in trail.iter().enumerate() {
            let Some(proj) = camera.project(*point, viewport) else {
                continue;
            };
            if let Some(prev) = last {
                let alpha = i as f32 / len * 0.6;
                self.frame
                    .draw_line(prev, proj.screen, width, with_alpha(body.color, alpha));
            }
            last = Some(proj.screen);
        }
    }

    fn draw_glow(&mut self, body: &Body, center: Vec2, r: f32) {
        let (size, opacity) = match body.kind {
            BodyKind::Star => (r * 5.0, 0.7),
            _ => (r * 2.5, 0.3),
        };
        let stops = [
            (0.0, body.color),
            (0.3, with_alpha(body.color, 0.5)),
            (1.0, TRANSPARENT),
        ];
        self.frame
            .fill_radial_gradient(center, center, r * 0.3, size, &stops, opacity);
    }

    fn draw_corona(&mut self, body: &Body, center: Vec2, r: f32, frame: u64) {
        let t = frame as f32;
        for i in 0..8 {
            let angle = i as f32 / 8.0 * TAU + t * 0.01;
            let ray = r * (1.5 + (t * 0.05 + i as f32).sin() * 0.5);
            let tip = center + Vec2::new(angle.cos(), angle.sin()) * ray;
            self.frame
                .draw_line(center, tip, 2.0, with_alpha(body.color, 0.25));
        }
    }

    fn draw_sphere(&mut self, body: &Body, center: Vec2, r: f32) {
        let (core, edge) = match body.kind {
            BodyKind::Star => (0.2, 0.8),
            _ => (0.15, 0.7),
        };
        let stops = [
            (0.0, WHITE),
            (core, body.color),
            (edge, body.color),
            (1.0, [0.0, 0.0, 0.0, 1.0]),
        ];
        let focus = center + LIGHT_DIR * r * 0.4;
        self.frame
            .fill_radial_gradient(center, focus, r * 0.1, r, &stops, 1.0);
    }

    fn draw_crosshair(&mut self, c: Vec2) {
        let color = with_alpha(WHITE, 0.3);
        for dir in [Vec2::X, -Vec2::X, Vec2::Y, -Vec2::Y] {
            self.frame.draw_line(c + dir * 5.0, c + dir * 15.0, 1.0, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::GravityConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn star_is_drawn_at_its_projection() {
        let sim = Simulation::with_default_scenario(GravityConfig::default());
        let camera = FlyCamera::new(Vec3::new(0.0, 0.0, -1500.0), 0.0, 0.0, 800.0);
        let mut renderer = GravityRenderer::with_rng(320, 240, &mut StdRng::seed_from_u64(1));
        renderer.render(&sim, &camera, None, &RenderOptions::default());

        let proj = camera
            .project(sim.bodies()[0].position, renderer.viewport())
            .unwrap();
        let px = renderer
            .frame()
            .pixel(proj.screen.x as u32, proj.screen.y as u32)
            .unwrap();
        assert!(px[0] > 200, "star pixel too dark: {px:?}");
    }

    #[test]
    fn empty_scene_without_decorations_is_background() {
        let sim = Simulation::new(GravityConfig::default());
        let camera = FlyCamera::default();
        let mut renderer = GravityRenderer::with_rng(64, 64, &mut StdRng::seed_from_u64(1));
        let options = RenderOptions {
            show_trails: false,
            show_grid: false,
            show_stars: false,
            quality: RenderQuality::Low,
        };
        renderer.render(&sim, &camera, None, &options);

        // Top-left corner is untouched by the crosshair
        let px = renderer.frame().pixel(0, 0).unwrap();
        assert_eq!(px, [2, 6, 23, 255]);
    }
}
