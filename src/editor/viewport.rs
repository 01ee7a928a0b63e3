use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Point;

/// Where the canvas is shown on screen.
///
/// The canvas buffer always has the image's pixel size while the display can
/// be any size, so pointer positions have to be rescaled before they are
/// compared against points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    #[serde(default)]
    pub left: f32,
    #[serde(default)]
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Result<Self> {
        let viewport = Self {
            left,
            top,
            width,
            height,
        };
        viewport.validate()?;
        Ok(viewport)
    }

    pub fn validate(&self) -> Result<()> {
        // Also rejects NaN
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(Error::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Map a client (screen) position onto the image buffer
    pub fn to_image_space(&self, client: Point, image_size: (u32, u32)) -> Result<Point> {
        self.validate()?;
        let scale_x = image_size.0 as f32 / self.width;
        let scale_y = image_size.1 as f32 / self.height;
        Ok(Point {
            x: (client.x - self.left) * scale_x,
            y: (client.y - self.top) * scale_y,
        })
    }
}
