use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::editor::{EditorEvent, EditorState, Viewport};
use crate::error::{Error, ErrorKind, Result};

/// A recorded sequence of editor events.
///
/// ```json
/// {
///   "viewport": { "width": 800, "height": 600 },
///   "events": [
///     { "type": "set_mode", "mode": "countertop" },
///     { "type": "click", "x": 120, "y": 80 }
///   ]
/// }
/// ```
///
/// With a viewport, pointer positions are screen coordinates and get mapped
/// onto the image; without one they are already image pixels.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub viewport: Option<Viewport>,
    pub events: Vec<EditorEvent>,
}

#[derive(Debug)]
pub struct ReplayOutcome {
    pub state: EditorState,
    /// Events the editor refused, by position in the session
    pub rejected: Vec<(usize, Error)>,
    /// How many events changed what is on the canvas
    pub redraws: usize,
}

impl Session {
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

    fn to_image_space(&self, event: &EditorEvent, state: &EditorState) -> Result<EditorEvent> {
        let Some(viewport) = &self.viewport else {
            return Ok(event.clone());
        };
        // Without an image the canvas keeps the display size
        let image_size = state.image_size().unwrap_or((
            viewport.width.round() as u32,
            viewport.height.round() as u32,
        ));

        Ok(match event {
            EditorEvent::Click(p) => EditorEvent::Click(viewport.to_image_space(*p, image_size)?),
            EditorEvent::PointerMove(p) => {
                EditorEvent::PointerMove(viewport.to_image_space(*p, image_size)?)
            }
            other => other.clone(),
        })
    }

    /// Apply every event in order.
    ///
    /// User-input rejections are logged and skipped, like a dismissed alert;
    /// anything else aborts the replay.
    pub fn replay(&self, initial: EditorState) -> Result<ReplayOutcome> {
        let mut state = initial;
        let mut rejected = Vec::new();
        let mut redraws = 0;

        for (idx, event) in self.events.iter().enumerate() {
            let result = self
                .to_image_space(event, &state)
                .and_then(|mapped| state.apply(&mapped));

            match result {
                Ok(next) => {
                    if next.needs_redraw(&state) {
                        redraws += 1;
                    }
                    state = next;
                }
                Err(e) if e.kind() == ErrorKind::UserInput => {
                    log::warn!("Event {} rejected: {}", idx + 1, e);
                    rejected.push((idx, e));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(ReplayOutcome {
            state,
            rejected,
            redraws,
        })
    }
}
