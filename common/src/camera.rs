//! Fly camera and perspective projection for 3D sandbox scenes
//!
//! The camera is a free-flying eye with yaw/pitch orientation. Projection
//! maps world points onto a screen-space image plane: translate by the camera
//! position, rotate by -yaw then -pitch, and divide by depth.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use crate::config::clamp_logged;

/// Radians of yaw/pitch per pixel of pointer drag
pub const DRAG_SENSITIVITY: f32 = 0.005;

/// Field-of-view change per unit of scroll delta
pub const ZOOM_SENSITIVITY: f32 = 0.5;

/// Bounds applied whenever the camera is mutated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraLimits {
    pub min_fov: f32,
    pub max_fov: f32,
    pub pitch_limit: f32,
}

impl Default for CameraLimits {
    fn default() -> Self {
        Self {
            min_fov: 400.0,
            max_fov: 1500.0,
            pitch_limit: FRAC_PI_2,
        }
    }
}

/// Dimensions of the image plane in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

/// A world point mapped onto the image plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub screen: Vec2,
    /// Pixels per world unit at this depth (fov / depth)
    pub scale: f32,
    /// Camera-space depth, always positive
    pub depth: f32,
}

/// Movement keys currently held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl MoveInput {
    pub fn any(&self) -> bool {
        self.forward || self.back || self.left || self.right || self.up || self.down
    }
}

/// Free-flying perspective camera with yaw/pitch controls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    #[serde(skip)]
    pub limits: CameraLimits,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 400.0, -1500.0),
            yaw: 0.0,
            pitch: 0.25,
            fov: 800.0,
            limits: CameraLimits::default(),
        }
    }
}

impl FlyCamera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32, fov: f32) -> Self {
        let mut camera = Self {
            position,
            yaw,
            ..Self::default()
        };
        camera.pitch = camera.clamp_pitch(pitch);
        camera.fov = camera.clamp_fov(fov);
        camera
    }

    /// Pull pitch and fov back inside `limits`, e.g. after loading from YAML
    pub fn clamped(self) -> Self {
        let limits = self.limits;
        Self {
            pitch: clamp_logged(
                "camera pitch",
                self.pitch,
                -limits.pitch_limit,
                limits.pitch_limit,
            ),
            fov: clamp_logged("camera fov", self.fov, limits.min_fov, limits.max_fov),
            ..self
        }
    }

    fn clamp_pitch(&self, pitch: f32) -> f32 {
        pitch.clamp(-self.limits.pitch_limit, self.limits.pitch_limit)
    }

    fn clamp_fov(&self, fov: f32) -> f32 {
        fov.clamp(self.limits.min_fov, self.limits.max_fov)
    }

    /// Apply a pointer drag in pixels
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * DRAG_SENSITIVITY;
        self.pitch = self.clamp_pitch(self.pitch + dy * DRAG_SENSITIVITY);
    }

    /// Apply a scroll delta to the field of view
    pub fn zoom(&mut self, delta: f32) {
        self.fov = self.clamp_fov(self.fov + delta * ZOOM_SENSITIVITY);
    }

    /// Translate along the yaw-rotated axes for one frame of held keys
    pub fn translate(&mut self, input: &MoveInput, speed: f32) {
        if !input.any() {
            return;
        }

        let (sin_y, cos_y) = self.yaw.sin_cos();
        let mut step = Vec3::ZERO;

        if input.forward {
            step += Vec3::new(sin_y, 0.0, cos_y);
        }
        if input.back {
            step -= Vec3::new(sin_y, 0.0, cos_y);
        }
        if input.left {
            step += Vec3::new(-cos_y, 0.0, sin_y);
        }
        if input.right {
            step += Vec3::new(cos_y, 0.0, -sin_y);
        }
        // Screen y grows downward, so "up" is -y in world space
        if input.up {
            step.y -= 1.0;
        }
        if input.down {
            step.y += 1.0;
        }

        self.position += step * speed * 2.0;
    }

    /// Unit view direction including pitch
    pub fn forward(&self) -> Vec3 {
        let (sin_y, cos_y) = self.yaw.sin_cos();
        let (sin_p, cos_p) = self.pitch.sin_cos();
        Vec3::new(sin_y * cos_p, sin_p, cos_y * cos_p)
    }

    /// Transform a world point into camera space
    pub fn to_camera_space(&self, point: Vec3) -> Vec3 {
        let rel = point - self.position;

        let (sin_y, cos_y) = self.yaw.sin_cos();
        let x = rel.x * cos_y - rel.z * sin_y;
        let z = rel.z * cos_y + rel.x * sin_y;

        let (sin_p, cos_p) = self.pitch.sin_cos();
        let y = rel.y * cos_p - z * sin_p;
        let depth = z * cos_p + rel.y * sin_p;

        Vec3::new(x, y, depth)
    }

    /// Project a world point, or `None` when it lies behind the camera
    pub fn project(&self, point: Vec3, viewport: Viewport) -> Option<Projection> {
        let cam = self.to_camera_space(point);
        if cam.z <= 0.0 {
            return None;
        }

        let scale = self.fov / cam.z;
        Some(Projection {
            screen: viewport.center() + Vec2::new(cam.x, cam.y) * scale,
            scale,
            depth: cam.z,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn camera_at_origin() -> FlyCamera {
        FlyCamera::new(Vec3::ZERO, 0.0, 0.0, 800.0)
    }

    #[test]
    fn point_ahead_projects_to_center() {
        let camera = camera_at_origin();
        let viewport = Viewport::new(800, 600);
        let p = camera.project(Vec3::new(0.0, 0.0, 100.0), viewport).unwrap();

        assert_abs_diff_eq!(p.screen.x, 400.0, epsilon = 1e-4);
        assert_abs_diff_eq!(p.screen.y, 300.0, epsilon = 1e-4);
        assert_abs_diff_eq!(p.scale, 8.0, epsilon = 1e-5);
        assert_abs_diff_eq!(p.depth, 100.0, epsilon = 1e-4);
    }

    #[test]
    fn point_behind_is_not_visible() {
        let camera = camera_at_origin();
        let viewport = Viewport::new(800, 600);
        assert!(camera.project(Vec3::new(0.0, 0.0, -10.0), viewport).is_none());
        assert!(camera.project(Vec3::ZERO, viewport).is_none());
    }

    #[test]
    fn offset_scales_with_fov_over_depth() {
        let camera = camera_at_origin();
        let viewport = Viewport::new(800, 600);
        let p = camera.project(Vec3::new(10.0, -5.0, 200.0), viewport).unwrap();

        assert_abs_diff_eq!(p.screen.x, 400.0 + 10.0 * 4.0, epsilon = 1e-3);
        assert_abs_diff_eq!(p.screen.y, 300.0 - 5.0 * 4.0, epsilon = 1e-3);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = FlyCamera::default();
        camera.rotate(0.0, 10_000.0);
        assert_abs_diff_eq!(camera.pitch, FRAC_PI_2);
        camera.rotate(0.0, -100_000.0);
        assert_abs_diff_eq!(camera.pitch, -FRAC_PI_2);
    }

    #[test]
    fn fov_is_clamped() {
        let mut camera = FlyCamera::default();
        camera.zoom(10_000.0);
        assert_abs_diff_eq!(camera.fov, 1500.0);
        camera.zoom(-10_000.0);
        assert_abs_diff_eq!(camera.fov, 400.0);
    }

    #[test]
    fn loaded_camera_is_clamped() {
        let camera: FlyCamera = serde_yaml::from_str("fov: 5000\npitch: 4.0").unwrap();
        let camera = camera.clamped();
        assert_abs_diff_eq!(camera.fov, 1500.0);
        assert_abs_diff_eq!(camera.pitch, FRAC_PI_2);

        let camera: FlyCamera = serde_yaml::from_str("fov: 10\npitch: -9.0\nyaw: 2.5").unwrap();
        let camera = camera.clamped();
        assert_abs_diff_eq!(camera.fov, 400.0);
        assert_abs_diff_eq!(camera.pitch, -FRAC_PI_2);
        assert_abs_diff_eq!(camera.yaw, 2.5);
    }

    #[test]
    fn forward_key_moves_along_yaw() {
        let mut camera = camera_at_origin();
        let input = MoveInput {
            forward: true,
            ..Default::default()
        };
        camera.translate(&input, 10.0);
        assert_abs_diff_eq!(camera.position.z, 20.0, epsilon = 1e-5);

        camera.yaw = FRAC_PI_2;
        camera.position = Vec3::ZERO;
        camera.translate(&input, 10.0);
        assert_abs_diff_eq!(camera.position.x, 20.0, epsilon = 1e-4);
        assert_abs_diff_eq!(camera.position.z, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn forward_points_at_projected_center() {
        let camera = FlyCamera::new(Vec3::new(5.0, -3.0, 2.0), 0.7, 0.3, 800.0);
        let viewport = Viewport::new(640, 480);
        let target = camera.position + camera.forward() * 50.0;
        let p = camera.project(target, viewport).unwrap();

        assert_abs_diff_eq!(p.screen.x, 320.0, epsilon = 1e-2);
        assert_abs_diff_eq!(p.screen.y, 240.0, epsilon = 1e-2);
    }

    proptest! {
        #[test]
        fn drags_and_zooms_stay_in_limits(
            moves in prop::collection::vec(
                (-2000.0f32..2000.0, -2000.0f32..2000.0, -3000.0f32..3000.0),
                1..40,
            ),
        ) {
            let mut camera = FlyCamera::default();
            for (dx, dy, scroll) in moves {
                camera.rotate(dx, dy);
                camera.zoom(scroll);
                prop_assert!(camera.pitch.abs() <= FRAC_PI_2);
                prop_assert!((400.0..=1500.0).contains(&camera.fov));
            }
        }

        #[test]
        fn visible_points_have_positive_depth(
            yaw in -6.0f32..6.0,
            pitch in -1.5f32..1.5,
            x in -500.0f32..500.0,
            y in -500.0f32..500.0,
            z in -500.0f32..500.0,
        ) {
            let camera = FlyCamera::new(Vec3::new(10.0, -20.0, 30.0), yaw, pitch, 800.0);
            if let Some(p) = camera.project(Vec3::new(x, y, z), Viewport::new(800, 600)) {
                prop_assert!(p.depth > 0.0);
                prop_assert!(p.scale > 0.0);
            }
        }
    }
}
