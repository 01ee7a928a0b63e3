use image::{DynamicImage, ImageReader};
use std::path::Path;

use crate::error::{Error, Result};

/// Decode the picked file. The format is sniffed from the content, not the
/// extension.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();
    let image = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|source| Error::ImageDecode {
            path: path.to_path_buf(),
            source,
        })?;
    log::debug!(
        "Decoded {}: {}x{}",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}
