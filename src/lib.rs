pub mod config;
pub mod detection;
pub mod editor;
pub mod error;
pub mod measure;
pub mod models;
pub mod render;
pub mod session;
pub mod upload;

pub use config::Config;
pub use detection::{
    DetectionOverlay, DetectionReport, DetectionRule, Detector, DetectorLoader, ModelStatus,
    PredictionsFile, ReplayDetector, RuleSet,
};
pub use editor::{EditorEvent, EditorState, PointRef, PointSetName, SelectionMode, Viewport};
pub use error::{Error, ErrorKind, Result};
pub use models::{BoundingBox, Color, Point, Prediction};
pub use render::{Canvas, RasterCanvas, RecordingCanvas, RenderLayer, RenderPipeline};
pub use session::{ReplayOutcome, Session};
pub use upload::load_image;
