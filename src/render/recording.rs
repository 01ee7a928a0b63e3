use image::DynamicImage;

use crate::models::{BoundingBox, Color, Point};
use crate::render::{Canvas, Stroke};

/// A draw call as seen by [`RecordingCanvas`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Image { width: u32, height: u32 },
    Polyline {
        points: Vec<Point>,
        closed: bool,
        stroke: Stroke,
    },
    Rect { rect: BoundingBox, stroke: Stroke },
    Circle {
        center: Point,
        radius: f32,
        color: Color,
    },
    Text {
        text: String,
        at: Point,
        size: f32,
        color: Color,
    },
}

/// Canvas that keeps the list of calls instead of pixels
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn circles(&self) -> Vec<(Point, Color)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Circle { center, color, .. } => Some((*center, *color)),
                _ => None,
            })
            .collect()
    }

    pub fn rects(&self) -> Vec<(BoundingBox, Color)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect { rect, stroke } => Some((*rect, stroke.color)),
                _ => None,
            })
            .collect()
    }

    pub fn polylines(&self) -> Vec<(&[Point], bool)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Polyline { points, closed, .. } => Some((points.as_slice(), *closed)),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn draw_image(&mut self, image: &DynamicImage) {
        self.ops.push(DrawOp::Image {
            width: image.width(),
            height: image.height(),
        });
    }

    fn stroke_polyline(&mut self, points: &[Point], closed: bool, stroke: Stroke) {
        self.ops.push(DrawOp::Polyline {
            points: points.to_vec(),
            closed,
            stroke,
        });
    }

    fn stroke_rect(&mut self, rect: BoundingBox, stroke: Stroke) {
        self.ops.push(DrawOp::Rect { rect, stroke });
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, at: Point, size: f32, color: Color) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            at,
            size,
            color,
        });
    }
}
