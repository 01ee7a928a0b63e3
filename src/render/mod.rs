pub mod annotation;
pub mod overlay;
pub mod raster;
pub mod recording;

use anyhow::Result;
use image::DynamicImage;
use std::path::PathBuf;
use std::sync::Arc;

use crate::models::{BoundingBox, Color, Point};

pub use annotation::{
    BackgroundLayer, HOVER_COLOR, OutlineLayer, annotation_pipeline, render_annotations,
};
pub use overlay::{BoundingBoxLayer, detection_pipeline, detection_pipeline_with};
pub use raster::RasterCanvas;
pub use recording::{DrawOp, RecordingCanvas};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

/// A 2D immediate-mode drawing surface
pub trait Canvas {
    fn size(&self) -> (u32, u32);

    fn clear(&mut self);

    /// Draw `image` at the origin, unscaled
    fn draw_image(&mut self, image: &DynamicImage);

    fn stroke_polyline(&mut self, points: &[Point], closed: bool, stroke: Stroke);

    fn stroke_rect(&mut self, rect: BoundingBox, stroke: Stroke);

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);

    /// `at` is the left end of the text baseline
    fn fill_text(&mut self, text: &str, at: Point, size: f32, color: Color);

    /// Current pixels, for surfaces that have any
    fn snapshot(&self) -> Option<DynamicImage> {
        None
    }
}

/// Scenes that start from a picture
pub trait Backdrop {
    fn backdrop(&self) -> Option<&DynamicImage>;
}

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Directory that receives one snapshot per layer
    pub output_dir: PathBuf,
}

/// Context available to all layers
#[derive(Clone, Default)]
pub struct RenderContext {
    pub debug: Option<DebugConfig>,
}

/// One pass over the canvas
pub trait RenderLayer<S>: Send + Sync {
    fn draw(&self, canvas: &mut dyn Canvas, scene: &S, context: &RenderContext) -> Result<()>;

    /// Human-readable name (used in logs and debug file names)
    fn name(&self) -> &str;
}

/// Ordered list of layers run over a canvas
pub struct RenderPipeline<S> {
    layers: Vec<Arc<dyn RenderLayer<S>>>,
    context: RenderContext,
}

impl<S> RenderPipeline<S> {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            context: RenderContext::default(),
        }
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.context.debug = Some(DebugConfig { output_dir });

        Ok(self)
    }

    pub fn add_layer(mut self, layer: Arc<dyn RenderLayer<S>>) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn add_layer_boxed(mut self, layer: Box<dyn RenderLayer<S>>) -> Self {
        self.layers.push(Arc::from(layer));
        self
    }

    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.name()).collect()
    }

    pub fn run(&self, canvas: &mut dyn Canvas, scene: &S) -> Result<()> {
        self.save_debug_output(canvas, "00_input.png")?;

        for (idx, layer) in self.layers.iter().enumerate() {
            log::debug!("Running layer {}: {}", idx + 1, layer.name());
            layer.draw(canvas, scene, &self.context)?;

            let filename = format!(
                "{:02}_{}.png",
                idx + 1,
                layer.name().to_lowercase().replace(' ', "_")
            );
            self.save_debug_output(canvas, &filename)?;
        }

        Ok(())
    }

    fn save_debug_output(&self, canvas: &dyn Canvas, filename: &str) -> Result<()> {
        let Some(debug_config) = &self.context.debug else {
            return Ok(());
        };
        // Surfaces without pixels have nothing to save
        let Some(snapshot) = canvas.snapshot() else {
            return Ok(());
        };

        let output_path = debug_config.output_dir.join(filename);
        snapshot
            .save(&output_path)
            .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;
        log::debug!("  Debug: saved {}", filename);
        Ok(())
    }
}

impl<S> Default for RenderPipeline<S> {
    fn default() -> Self {
        Self::new()
    }
}
