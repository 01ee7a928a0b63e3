use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::detection::RuleSet;
use crate::error::{Error, Result};
use crate::models::Color;

/// Settings read from the optional JSON config file.
///
/// Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fixture flags raised from detector output
    pub rules: RuleSet,
    /// Width of the detection canvas; native width when unset
    pub display_width: Option<u32>,
    /// TTF/OTF font used for canvas labels
    pub font: Option<PathBuf>,
    /// Boxes whose class some rule watches
    pub watched_color: Color,
    /// Every other box
    pub other_color: Color,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules: RuleSet::default(),
            display_width: None,
            font: None,
            watched_color: Color::GREEN,
            other_color: Color::RED,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text).map_err(|source| Error::JsonParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
