use std::path::PathBuf;
use thiserror::Error;

use crate::detection::ModelStatus;
use crate::editor::PointSetName;

/// Broad classes of failure, used by callers to decide how to surface them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The user did something the current state does not allow. No state changed.
    UserInput,
    /// A model, font or similar resource is missing or unusable.
    Resource,
    /// Anything else: corrupt files, detector crashes, IO.
    Unexpected,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Please select 'Outline Countertop' or 'Outline Credit Card' first")]
    NoSelectionMode,

    #[error("Point {index} does not exist in the {set} outline")]
    PointOutOfRange { set: PointSetName, index: usize },

    #[error("Viewport has no area ({width}x{height})")]
    InvalidViewport { width: f32, height: f32 },

    #[error("Invalid colour '{0}': expected #rrggbb or one of blue, green, red, black, white")]
    InvalidColor(String),

    #[error("Detector is not ready (status: {0})")]
    ModelNotReady(ModelStatus),

    #[error("Failed to load detector: {0}")]
    ModelLoad(String),

    #[error("Failed to load font {path}: {reason}")]
    FontLoad { path: PathBuf, reason: String },

    #[error("Detection failed: {0}")]
    Detection(String),

    #[error("Failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to parse {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NoSelectionMode
            | Error::PointOutOfRange { .. }
            | Error::InvalidViewport { .. }
            | Error::InvalidColor(_) => ErrorKind::UserInput,
            Error::ModelNotReady(_) | Error::ModelLoad(_) | Error::FontLoad { .. } => {
                ErrorKind::Resource
            }
            Error::Detection(_)
            | Error::ImageDecode { .. }
            | Error::JsonParse { .. }
            | Error::Io(_) => ErrorKind::Unexpected,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
