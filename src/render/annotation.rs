use anyhow::Result;
use image::DynamicImage;
use std::sync::Arc;

use crate::editor::{EditorState, PointRef, PointSetName};
use crate::measure;
use crate::models::Color;
use crate::render::{Backdrop, Canvas, RenderContext, RenderLayer, RenderPipeline, Stroke};

/// Colour of the point under the pointer, whatever its outline
pub const HOVER_COLOR: Color = Color::RED;

impl Backdrop for EditorState {
    fn backdrop(&self) -> Option<&DynamicImage> {
        self.image()
    }
}

/// Clear the canvas and paint the scene's image
pub struct BackgroundLayer;

impl<S: Backdrop> RenderLayer<S> for BackgroundLayer {
    fn draw(&self, canvas: &mut dyn Canvas, scene: &S, _context: &RenderContext) -> Result<()> {
        canvas.clear();
        if let Some(image) = scene.backdrop() {
            canvas.draw_image(image);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "Background"
    }
}

/// Polyline, measurement labels and markers for one outline
pub struct OutlineLayer {
    pub set: PointSetName,
    pub line_width: f32,
    pub label_size: f32,
    pub marker_radius: f32,
}

impl OutlineLayer {
    pub fn new(set: PointSetName) -> Self {
        Self {
            set,
            line_width: 2.0,
            label_size: 60.0,
            marker_radius: 8.0,
        }
    }
}

impl RenderLayer<EditorState> for OutlineLayer {
    fn draw(
        &self,
        canvas: &mut dyn Canvas,
        scene: &EditorState,
        _context: &RenderContext,
    ) -> Result<()> {
        let points = scene.points().get(self.set);
        let color = self.set.color();

        if points.len() >= 2 {
            canvas.stroke_polyline(
                points,
                points.len() > 2,
                Stroke {
                    color,
                    width: self.line_width,
                },
            );
        }

        for segment in measure::segments(points) {
            canvas.fill_text(&segment.label(), segment.midpoint(), self.label_size, color);
        }

        for (index, point) in points.iter().enumerate() {
            let hovered = scene.hover() == Some(PointRef { set: self.set, index });
            let fill = if hovered { HOVER_COLOR } else { color };
            canvas.fill_circle(*point, self.marker_radius, fill);
        }

        Ok(())
    }

    fn name(&self) -> &str {
        match self.set {
            PointSetName::Countertop => "Countertop Outline",
            PointSetName::CreditCard => "Credit Card Outline",
        }
    }
}

/// Image, then each outline in draw order
pub fn annotation_pipeline() -> RenderPipeline<EditorState> {
    let mut pipeline = RenderPipeline::<EditorState>::new().add_layer(Arc::new(BackgroundLayer));
    for set in PointSetName::ALL {
        pipeline = pipeline.add_layer(Arc::new(OutlineLayer::new(set)));
    }
    pipeline
}

/// Redraw the editor onto `canvas`. Does nothing until an image is loaded.
pub fn render_annotations(
    pipeline: &RenderPipeline<EditorState>,
    state: &EditorState,
    canvas: &mut dyn Canvas,
) -> Result<bool> {
    if state.image().is_none() {
        return Ok(false);
    }
    pipeline.run(canvas, state)?;
    Ok(true)
}
