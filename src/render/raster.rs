use ab_glyph::{FontArc, PxScale};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut,
};
use imageproc::rect::Rect;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::{BoundingBox, Color, Point};
use crate::render::{Canvas, Stroke};

/// Text anchored further than this above or left of the canvas is skipped
const TEXT_REACH: f32 = 1.0e6;

/// Canvas backed by an RGBA pixel buffer
pub struct RasterCanvas {
    buffer: RgbaImage,
    font: Option<FontArc>,
    warned_missing_font: bool,
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: RgbaImage::new(width, height),
            font: None,
            warned_missing_font: false,
        }
    }

    /// Canvas with the same pixel size as `image`
    pub fn for_image(image: &DynamicImage) -> Self {
        Self::new(image.width(), image.height())
    }

    pub fn with_font(mut self, font: Option<FontArc>) -> Self {
        self.font = font;
        self
    }

    pub fn load_font(path: &Path) -> Result<FontArc> {
        let bytes = std::fs::read(path).map_err(|e| Error::FontLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        FontArc::try_from_vec(bytes).map_err(|e| Error::FontLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn image(&self) -> &RgbaImage {
        &self.buffer
    }

    pub fn into_image(self) -> RgbaImage {
        self.buffer
    }

    fn draw_thick_line(&mut self, from: Point, to: Point, stroke: Stroke) {
        let color = stroke.color.to_rgba();
        let passes = stroke.width.round().max(1.0) as i32;
        // Bresenham walks every step of the segment, so cut it to the canvas first
        let Some((from, to)) = clip_segment(from, to, self.size(), passes as f32 + 1.0) else {
            return;
        };
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let length = (dx * dx + dy * dy).sqrt();
        if length == 0.0 {
            return;
        }

        // Offset parallel 1px lines along the normal
        let (nx, ny) = (-dy / length, dx / length);
        for pass in 0..passes {
            let offset = pass as f32 - (passes - 1) as f32 / 2.0;
            draw_line_segment_mut(
                &mut self.buffer,
                (from.x + nx * offset, from.y + ny * offset),
                (to.x + nx * offset, to.y + ny * offset),
                color,
            );
        }
    }

    /// Row-by-row fill for circles much larger than the canvas
    fn fill_circle_rows(&mut self, center: Point, radius: f32, color: Color) {
        let (width, height) = self.size();
        let top = (center.y - radius).max(0.0).floor() as u32;
        let bottom = (center.y + radius).min(height as f32 - 1.0).ceil() as u32;
        for y in top..=bottom {
            let dy = y as f32 - center.y;
            let half = (radius * radius - dy * dy).max(0.0).sqrt();
            let left = (center.x - half).max(0.0);
            let right = (center.x + half).min(width as f32 - 1.0);
            if left <= right {
                draw_line_segment_mut(
                    &mut self.buffer,
                    (left, y as f32),
                    (right, y as f32),
                    color.to_rgba(),
                );
            }
        }
    }
}

/// Clip a segment to the canvas grown by `margin` on every side.
///
/// Returns `None` when nothing of the segment is near the canvas or when a
/// coordinate is not finite. Works in `f64` since far endpoints lose whole
/// pixels of precision in `f32`.
fn clip_segment(from: Point, to: Point, size: (u32, u32), margin: f32) -> Option<(Point, Point)> {
    let (x0, y0) = (from.x as f64, from.y as f64);
    let (dx, dy) = (to.x as f64 - x0, to.y as f64 - y0);
    let margin = margin as f64;
    let (max_x, max_y) = (size.0 as f64 + margin, size.1 as f64 + margin);

    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    let edges = [
        (-dx, x0 + margin),
        (dx, max_x - x0),
        (-dy, y0 + margin),
        (dy, max_y - y0),
    ];
    for (p, q) in edges {
        if !p.is_finite() || !q.is_finite() {
            return None;
        }
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let at = |t: f64| Point::new((x0 + t * dx) as f32, (y0 + t * dy) as f32);
    Some((at(t0), at(t1)))
}

impl Canvas for RasterCanvas {
    fn size(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    fn clear(&mut self) {
        for pixel in self.buffer.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    fn draw_image(&mut self, image: &DynamicImage) {
        image::imageops::replace(&mut self.buffer, &image.to_rgba8(), 0, 0);
    }

    fn stroke_polyline(&mut self, points: &[Point], closed: bool, stroke: Stroke) {
        for pair in points.windows(2) {
            self.draw_thick_line(pair[0], pair[1], stroke);
        }
        if closed && points.len() > 2 {
            self.draw_thick_line(points[points.len() - 1], points[0], stroke);
        }
    }

    fn stroke_rect(&mut self, rect: BoundingBox, stroke: Stroke) {
        let color = stroke.color.to_rgba();
        let passes = stroke.width.round().max(1.0) as i32;
        let (width, height) = self.size();
        let (mut left, mut top) = (rect.x, rect.y);
        let (mut right, mut bottom) = (rect.x + rect.width, rect.y + rect.height);
        if ![left, top, right, bottom].iter().all(|v| v.is_finite()) {
            return;
        }
        if right < 0.0 || bottom < 0.0 || left > width as f32 || top > height as f32 {
            return;
        }

        // Edges past the margin stay invisible after clamping
        let margin = passes as f32 + 1.0;
        left = left.max(-margin);
        top = top.max(-margin);
        right = right.min(width as f32 + margin);
        bottom = bottom.min(height as f32 + margin);

        let (x, y) = (left.round() as i32, top.round() as i32);
        let (w, h) = ((right - left).round() as i32, (bottom - top).round() as i32);
        for inset in 0..passes {
            let (inner_w, inner_h) = (w - 2 * inset, h - 2 * inset);
            if inner_w <= 0 || inner_h <= 0 {
                break;
            }
            draw_hollow_rect_mut(
                &mut self.buffer,
                Rect::at(x + inset, y + inset).of_size(inner_w as u32, inner_h as u32),
                color,
            );
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        if !(center.x.is_finite() && center.y.is_finite() && radius >= 0.0) {
            return;
        }
        let (width, height) = self.size();
        let nearest = Point::new(
            center.x.clamp(0.0, width as f32),
            center.y.clamp(0.0, height as f32),
        );
        if center.distance_to(&nearest) > radius + 1.0 {
            return;
        }

        if radius > (width + height) as f32 {
            self.fill_circle_rows(center, radius, color);
            return;
        }
        draw_filled_circle_mut(
            &mut self.buffer,
            (center.x.round() as i32, center.y.round() as i32),
            radius.round() as i32,
            color.to_rgba(),
        );
    }

    fn fill_text(&mut self, text: &str, at: Point, size: f32, color: Color) {
        let Some(font) = &self.font else {
            if !self.warned_missing_font {
                log::warn!("No font configured, skipping text labels");
                self.warned_missing_font = true;
            }
            return;
        };

        // imageproc positions text by its top edge
        let top = at.y - size;
        let (width, height) = self.size();
        if !(at.x.is_finite() && top.is_finite()) {
            return;
        }
        if at.x > width as f32 || top > height as f32 || at.x < -TEXT_REACH || top < -TEXT_REACH {
            return;
        }
        draw_text_mut(
            &mut self.buffer,
            color.to_rgba(),
            at.x.round() as i32,
            top.round() as i32,
            PxScale::from(size),
            font,
            text,
        );
    }

    fn snapshot(&self) -> Option<DynamicImage> {
        Some(DynamicImage::ImageRgba8(self.buffer.clone()))
    }
}
