use anyhow::Result;
use std::sync::Arc;

use crate::config::Config;
use crate::detection::DetectionReport;
use crate::models::{Color, Point};
use crate::render::{BackgroundLayer, Canvas, RenderContext, RenderLayer, RenderPipeline, Stroke};

/// Boxes and labels for every prediction.
///
/// Colour only reflects whether a rule watches the class; low-confidence
/// hits are drawn the same as confident ones. Box and label always share a
/// colour, so every watched class gets a `watched_color` label, not just
/// `sink`.
pub struct BoundingBoxLayer {
    pub line_width: f32,
    pub label_size: f32,
    pub watched_color: Color,
    pub other_color: Color,
}

impl Default for BoundingBoxLayer {
    fn default() -> Self {
        Self {
            line_width: 2.0,
            label_size: 16.0,
            watched_color: Color::GREEN,
            other_color: Color::RED,
        }
    }
}

impl BoundingBoxLayer {
    pub fn from_config(config: &Config) -> Self {
        Self {
            watched_color: config.watched_color,
            other_color: config.other_color,
            ..Self::default()
        }
    }
}

impl RenderLayer<DetectionReport> for BoundingBoxLayer {
    fn draw(
        &self,
        canvas: &mut dyn Canvas,
        scene: &DetectionReport,
        _context: &RenderContext,
    ) -> Result<()> {
        for prediction in &scene.predictions {
            let bbox = prediction.bounding_box();
            let color = if scene.rules.watches_class(&prediction.class) {
                self.watched_color
            } else {
                self.other_color
            };

            canvas.stroke_rect(
                bbox,
                Stroke {
                    color,
                    width: self.line_width,
                },
            );

            // Keep the label on canvas when the box touches the top edge
            let label_y = if bbox.y > 10.0 { bbox.y - 5.0 } else { 10.0 };
            canvas.fill_text(
                &prediction.label(),
                Point::new(bbox.x, label_y),
                self.label_size,
                color,
            );
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "Bounding Boxes"
    }
}

pub fn detection_pipeline() -> RenderPipeline<DetectionReport> {
    detection_pipeline_with(BoundingBoxLayer::default())
}

pub fn detection_pipeline_with(boxes: BoundingBoxLayer) -> RenderPipeline<DetectionReport> {
    RenderPipeline::<DetectionReport>::new()
        .add_layer(Arc::new(BackgroundLayer))
        .add_layer(Arc::new(boxes))
}
