pub mod replay;
pub mod rules;

use image::DynamicImage;
use image::imageops::FilterType;
use std::fmt;

use crate::error::{Error, Result};
use crate::models::Prediction;
use crate::render::Backdrop;

pub use replay::{PredictionsFile, ReplayDetector};
pub use rules::{DetectionRule, FlagResult, RuleSet};

/// A loaded object-detection model
#[allow(async_fn_in_trait)]
pub trait Detector {
    /// Predictions in `image` pixel coordinates
    async fn detect(&self, image: &DynamicImage) -> Result<Vec<Prediction>>;
}

/// Produces a [`Detector`], possibly slowly
#[allow(async_fn_in_trait)]
pub trait DetectorLoader {
    type Model: Detector;

    async fn load(&self) -> Result<Self::Model>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelStatus {
    Unloaded,
    Loading,
    Ready,
    Failed,
}

impl fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ModelStatus::Unloaded => "unloaded",
            ModelStatus::Loading => "loading",
            ModelStatus::Ready => "ready",
            ModelStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug)]
pub enum ModelState<M> {
    Unloaded,
    Loading,
    Ready(M),
    Failed(String),
}

impl<M> ModelState<M> {
    pub fn status(&self) -> ModelStatus {
        match self {
            ModelState::Unloaded => ModelStatus::Unloaded,
            ModelState::Loading => ModelStatus::Loading,
            ModelState::Ready(_) => ModelStatus::Ready,
            ModelState::Failed(_) => ModelStatus::Failed,
        }
    }
}

/// Result of one upload: the canvas the detector saw and what it found
#[derive(Debug, Clone)]
pub struct DetectionReport {
    pub canvas_image: DynamicImage,
    pub predictions: Vec<Prediction>,
    pub flags: Vec<FlagResult>,
    pub rules: RuleSet,
}

impl DetectionReport {
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.flags.iter().find(|f| f.flag == name).map(|f| f.detected)
    }
}

impl Backdrop for DetectionReport {
    fn backdrop(&self) -> Option<&DynamicImage> {
        Some(&self.canvas_image)
    }
}

/// Runs uploads through a detector and derives fixture flags
pub struct DetectionOverlay<M> {
    state: ModelState<M>,
    rules: RuleSet,
    display_width: Option<u32>,
}

impl<M: Detector> DetectionOverlay<M> {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            state: ModelState::Unloaded,
            rules,
            display_width: None,
        }
    }

    /// Scale uploads to this width before detection
    pub fn with_display_width(mut self, width: Option<u32>) -> Self {
        self.display_width = width.filter(|w| *w > 0);
        self
    }

    pub fn status(&self) -> ModelStatus {
        self.state.status()
    }

    pub fn can_upload(&self) -> bool {
        matches!(self.state, ModelState::Ready(_))
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn begin_loading(&mut self) {
        log::info!("Loading detector...");
        self.state = ModelState::Loading;
    }

    pub fn finish_loading(&mut self, result: Result<M>) {
        self.state = match result {
            Ok(model) => {
                log::info!("Detector ready");
                ModelState::Ready(model)
            }
            Err(e) => {
                log::error!("Error loading model: {}", e);
                ModelState::Failed(e.to_string())
            }
        };
    }

    /// Load once; failures leave the overlay in [`ModelStatus::Failed`]
    pub async fn load<L: DetectorLoader<Model = M>>(&mut self, loader: &L) {
        self.begin_loading();
        let result = loader.load().await;
        self.finish_loading(result);
    }

    /// Draw the upload onto a canvas of the display width, keeping aspect ratio
    pub fn prepare_canvas(&self, image: &DynamicImage) -> DynamicImage {
        match self.display_width {
            Some(width) if width != image.width() && image.width() > 0 => {
                let scale = width as f32 / image.width() as f32;
                let height = ((image.height() as f32 * scale).round() as u32).max(1);
                image.resize_exact(width, height, FilterType::Triangle)
            }
            _ => image.clone(),
        }
    }

    pub async fn upload(&self, image: &DynamicImage) -> Result<DetectionReport> {
        let model = match &self.state {
            ModelState::Ready(model) => model,
            other => return Err(Error::ModelNotReady(other.status())),
        };

        let canvas_image = self.prepare_canvas(image);
        let predictions = model.detect(&canvas_image).await.inspect_err(|e| {
            log::error!("Detection failed: {}", e);
        })?;
        log::debug!("Detector returned {} predictions", predictions.len());

        let flags = self.rules.evaluate(&predictions);
        Ok(DetectionReport {
            canvas_image,
            predictions,
            flags,
            rules: self.rules.clone(),
        })
    }
}
