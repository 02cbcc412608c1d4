//! CPU rasterization into an RGBA8 pixel buffer
//!
//! Every simulation renders its frame on the CPU into a [`PixelBuffer`], which
//! is then uploaded to the GPU by [`crate::blit::FrameBlitter`]. The drawing
//! primitives here are deliberately small: alpha-blended pixels, filled and
//! stroked circles, radial gradients, and thick/dashed lines.

use glam::Vec2;

/// Linear RGBA color, components in [0, 1]
pub type Color = [f32; 4];

pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];
pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
pub const TRANSPARENT: Color = [0.0, 0.0, 0.0, 0.0];

/// Parse a `#rrggbb` or `#rrggbbaa` hex string
pub fn color_from_hex(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 && digits.len() != 8 {
        return None;
    }

    let channel = |i: usize| -> Option<f32> {
        u8::from_str_radix(digits.get(i..i + 2)?, 16)
            .ok()
            .map(|v| v as f32 / 255.0)
    };

    let alpha = if digits.len() == 8 { channel(6)? } else { 1.0 };
    Some([channel(0)?, channel(2)?, channel(4)?, alpha])
}

/// HSL to RGB, all components in [0, 1]
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Color {
    if s == 0.0 {
        return [l, l, l, 1.0];
    }

    let hue_to_rgb = |p: f32, q: f32, t: f32| -> f32 {
        let t = t.rem_euclid(1.0);
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    [
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
        1.0,
    ]
}

pub fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], alpha]
}

pub fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

/// Sample a piecewise-linear gradient given as `(offset, color)` stops sorted by offset
pub fn sample_gradient(stops: &[(f32, Color)], t: f32) -> Color {
    match stops {
        [] => TRANSPARENT,
        [(_, only)] => *only,
        _ => {
            let (first_offset, first) = stops[0];
            if t <= first_offset {
                return first;
            }
            for pair in stops.windows(2) {
                let (o0, c0) = pair[0];
                let (o1, c1) = pair[1];
                if t <= o1 {
                    let span = (o1 - o0).max(f32::EPSILON);
                    return lerp_color(c0, c1, (t - o0) / span);
                }
            }
            stops[stops.len() - 1].1
        }
    }
}

pub fn to_rgba8(color: Color) -> [u8; 4] {
    [
        (color[0].clamp(0.0, 1.0) * 255.0).round() as u8,
        (color[1].clamp(0.0, 1.0) * 255.0).round() as u8,
        (color[2].clamp(0.0, 1.0) * 255.0).round() as u8,
        (color[3].clamp(0.0, 1.0) * 255.0).round() as u8,
    ]
}

/// Owned RGBA8 frame, row-major, top-left origin
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Reallocate for a new size; contents are cleared
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![0; (width as usize) * (height as usize) * 4];
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(((y as usize) * (self.width as usize) + x as usize) * 4)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let i = self.index(x as i32, y as i32)?;
        let texels: &[[u8; 4]] = bytemuck::cast_slice(&self.pixels);
        Some(texels[i / 4])
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, rgba: [u8; 4]) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i..i + 4].copy_from_slice(&rgba);
        }
    }

    /// Source-over blend using the color's alpha
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        let a = color[3].clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        for c in 0..3 {
            let dst = self.pixels[i + c] as f32 / 255.0;
            let out = color[c].clamp(0.0, 1.0) * a + dst * (1.0 - a);
            self.pixels[i + c] = (out * 255.0).round() as u8;
        }
        self.pixels[i + 3] = 255;
    }

    pub fn clear(&mut self, color: Color) {
        let texels: &mut [[u8; 4]] = bytemuck::cast_slice_mut(&mut self.pixels);
        texels.fill(to_rgba8(color));
    }

    /// Fill the whole frame with a top-to-bottom gradient
    pub fn fill_vertical_gradient(&mut self, stops: &[(f32, Color)]) {
        let height = self.height.max(1) as f32;
        let width = self.width as usize;
        for y in 0..self.height as usize {
            let rgba = to_rgba8(sample_gradient(stops, y as f32 / height));
            let row = &mut self.pixels[y * width * 4..(y + 1) * width * 4];
            for px in row.chunks_exact_mut(4) {
                px.copy_from_slice(&rgba);
            }
        }
    }

    fn circle_bounds(&self, center: Vec2, radius: f32) -> (i32, i32, i32, i32) {
        let x0 = ((center.x - radius).floor() as i32).max(0);
        let y0 = ((center.y - radius).floor() as i32).max(0);
        let x1 = ((center.x + radius).ceil() as i32).min(self.width as i32 - 1);
        let y1 = ((center.y + radius).ceil() as i32).min(self.height as i32 - 1);
        (x0, y0, x1, y1)
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let (x0, y0, x1, y1) = self.circle_bounds(center, radius);
        let r_sq = radius * radius;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center;
                if d.length_squared() <= r_sq {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    /// Fill a disc whose color follows `stops` from `inner` to `outer` radius.
    /// `focus` shifts the gradient origin, for off-center highlights.
    pub fn fill_radial_gradient(
        &mut self,
        center: Vec2,
        focus: Vec2,
        inner: f32,
        outer: f32,
        stops: &[(f32, Color)],
        opacity: f32,
    ) {
        if outer <= 0.0 {
            return;
        }
        let (x0, y0, x1, y1) = self.circle_bounds(center, outer);
        let span = (outer - inner).max(f32::EPSILON);
        let outer_sq = outer * outer;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if (p - center).length_squared() > outer_sq {
                    continue;
                }
                let t = ((p - focus).length() - inner) / span;
                let color = sample_gradient(stops, t);
                self.blend_pixel(x, y, with_alpha(color, color[3] * opacity));
            }
        }
    }

    /// Ring of the given line width; `dash` is the on/off arc length in pixels
    pub fn stroke_circle(
        &mut self,
        center: Vec2,
        radius: f32,
        line_width: f32,
        color: Color,
        dash: Option<f32>,
    ) {
        if radius <= 0.0 {
            return;
        }
        let half = line_width.max(1.0) / 2.0;
        let (x0, y0, x1, y1) = self.circle_bounds(center, radius + half);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center;
                if (d.length() - radius).abs() > half {
                    continue;
                }
                if let Some(dash) = dash {
                    let arc = (d.y.atan2(d.x) + std::f32::consts::PI) * radius;
                    if (arc / dash.max(1.0)) as i32 % 2 == 1 {
                        continue;
                    }
                }
                self.blend_pixel(x, y, color);
            }
        }
    }

    /// Thick line by stamping discs along the segment
    pub fn draw_line(&mut self, from: Vec2, to: Vec2, line_width: f32, color: Color) {
        self.draw_dashed_line(from, to, line_width, color, None);
    }

    pub fn draw_dashed_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        line_width: f32,
        color: Color,
        dash: Option<f32>,
    ) {
        let delta = to - from;
        let length = delta.length();
        if !length.is_finite() {
            return;
        }
        let steps = length.ceil().max(1.0) as usize;
        let half = line_width.max(1.0) / 2.0;
        let thin = half <= 0.5;

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            if let Some(dash) = dash {
                if ((t * length) / dash.max(1.0)) as i32 % 2 == 1 {
                    continue;
                }
            }
            let p = from + delta * t;
            if thin {
                self.blend_pixel(p.x.floor() as i32, p.y.floor() as i32, color);
            } else {
                let r = half.ceil() as i32;
                let (cx, cy) = (p.x.floor() as i32, p.y.floor() as i32);
                for dy in -r..=r {
                    for dx in -r..=r {
                        if ((dx * dx + dy * dy) as f32) <= half * half {
                            self.blend_pixel(cx + dx, cy + dy, color);
                        }
                    }
                }
            }
        }
    }

    /// Connected polyline; `None` entries break the line
    pub fn draw_polyline<I>(&mut self, points: I, line_width: f32, color: Color)
    where
        I: IntoIterator<Item = Option<Vec2>>,
    {
        let mut last: Option<Vec2> = None;
        for point in points {
            if let (Some(a), Some(b)) = (last, point) {
                self.draw_line(a, b, line_width, color);
            }
            last = point;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse() {
        assert_eq!(color_from_hex("#ffffff"), Some(WHITE));
        let c = color_from_hex("#3b82f6").unwrap();
        assert!((c[2] - 246.0 / 255.0).abs() < 1e-6);
        assert_eq!(color_from_hex("#12"), None);
        assert_eq!(color_from_hex("#zzzzzz"), None);
    }

    #[test]
    fn hsl_primaries() {
        let red = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!((red[0] - 1.0).abs() < 1e-6 && red[1].abs() < 1e-6 && red[2].abs() < 1e-6);
        let green = hsl_to_rgb(1.0 / 3.0, 1.0, 0.5);
        assert!((green[1] - 1.0).abs() < 1e-5 && green[0].abs() < 1e-5);
        assert_eq!(hsl_to_rgb(0.7, 0.0, 0.25), [0.25, 0.25, 0.25, 1.0]);
    }

    #[test]
    fn gradient_clamps_and_interpolates() {
        let stops = [(0.0, BLACK), (1.0, WHITE)];
        assert_eq!(sample_gradient(&stops, -1.0), BLACK);
        assert_eq!(sample_gradient(&stops, 2.0), WHITE);
        let mid = sample_gradient(&stops, 0.5);
        assert!((mid[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut frame = PixelBuffer::new(4, 4);
        frame.set_pixel(-1, 0, [255; 4]);
        frame.set_pixel(4, 4, [255; 4]);
        frame.blend_pixel(100, -3, WHITE);
        assert!(frame.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn opaque_blend_replaces_pixel() {
        let mut frame = PixelBuffer::new(2, 2);
        frame.clear(BLACK);
        frame.blend_pixel(1, 1, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(frame.pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn filled_circle_covers_center_only() {
        let mut frame = PixelBuffer::new(20, 20);
        frame.clear(BLACK);
        frame.fill_circle(Vec2::new(10.0, 10.0), 3.0, WHITE);
        assert_eq!(frame.pixel(10, 10), Some([255, 255, 255, 255]));
        assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(frame.pixel(10, 16), Some([0, 0, 0, 255]));
    }

    #[test]
    fn line_reaches_both_endpoints() {
        let mut frame = PixelBuffer::new(10, 10);
        frame.clear(BLACK);
        frame.draw_line(Vec2::new(1.0, 1.0), Vec2::new(8.0, 1.0), 1.0, WHITE);
        assert_eq!(frame.pixel(1, 1), Some([255, 255, 255, 255]));
        assert_eq!(frame.pixel(8, 1), Some([255, 255, 255, 255]));
        assert_eq!(frame.pixel(5, 5), Some([0, 0, 0, 255]));
    }
}
