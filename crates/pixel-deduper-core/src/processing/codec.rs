use std::path::Path;

use crate::error::Result;
use crate::types::DecodedImage;

/// Turns a file path into raw pixel data
pub trait ImageCodec {
    /// Decode the image at `path` in its native sample layout
    fn decode(&self, path: &Path) -> Result<DecodedImage>;

    /// Native width and height of the image at `path`
    fn dimensions(&self, path: &Path) -> Result<(u32, u32)> {
        self.decode(path).map(|image| image.dimensions())
    }
}

/// Decoder backed by the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateCodec;

impl ImageCodec for ImageCrateCodec {
    fn decode(&self, path: &Path) -> Result<DecodedImage> {
        let img = image::open(path)?;

        Ok(DecodedImage {
            width: img.width(),
            height: img.height(),
            channels: img.color().channel_count(),
            samples: img.into_bytes(),
        })
    }

    fn dimensions(&self, path: &Path) -> Result<(u32, u32)> {
        // Reads the header only
        Ok(image::image_dimensions(path)?)
    }
}
