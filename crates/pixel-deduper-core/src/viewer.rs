//! Side-by-side display of images from one duplicate group.
//!
//! The session only computes what to show and at which size; how it is shown
//! is left to a [`Viewer`] implementation. The library ships
//! [`render_contact_sheet`] for viewers that draw the images into a single
//! picture.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Horizontal gap between images on a contact sheet
pub const SHEET_GAP: u32 = 8;

/// Largest contact sheet that will be allocated, in pixels
pub const MAX_SHEET_PIXELS: u64 = 64 * 1024 * 1024;

/// Size every image is displayed at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSize {
    pub width: u32,
    pub height: u32,
}

/// Scale `native` so its larger side equals `largest`, preserving aspect ratio
pub fn preview_size(native: (u32, u32), largest: u32) -> PreviewSize {
    let (width, height) = native;
    if width == 0 || height == 0 || width == height {
        return PreviewSize {
            width: largest,
            height: largest,
        };
    }

    let ratio = f64::from(width) / f64::from(height);
    if height > width {
        PreviewSize {
            width: ((f64::from(largest) * ratio) as u32).max(1),
            height: largest,
        }
    } else {
        PreviewSize {
            width: largest,
            height: ((f64::from(largest) / ratio) as u32).max(1),
        }
    }
}

/// Images to display, in order, and the size to display them at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRequest {
    pub paths: Vec<PathBuf>,
    pub size: PreviewSize,
}

/// Displays images for manual inspection
pub trait Viewer {
    /// Show every image of the request and block until the user dismisses them
    fn display(&mut self, request: &PreviewRequest) -> Result<()>;
}

/// Draw all requested images side by side at the requested size
pub fn render_contact_sheet(request: &PreviewRequest) -> Result<RgbaImage> {
    if request.paths.is_empty() {
        return Err(Error::Viewer("nothing to display".to_string()));
    }

    let PreviewSize { width, height } = request.size;
    let sheet_width = sheet_width(width, request.paths.len())
        .filter(|w| u64::from(*w) * u64::from(height) <= MAX_SHEET_PIXELS)
        .ok_or_else(|| {
            Error::Viewer(format!(
                "{} image(s) at {}x{} exceed the contact sheet limit of {} pixels",
                request.paths.len(),
                width,
                height,
                MAX_SHEET_PIXELS
            ))
        })?;
    let mut sheet = RgbaImage::from_pixel(sheet_width, height, Rgba([32, 32, 32, 255]));

    for (i, path) in request.paths.iter().enumerate() {
        let img = image::open(path)?;
        let tile = img
            .resize_exact(width, height, FilterType::Nearest)
            .to_rgba8();
        let x = i as i64 * i64::from(width + SHEET_GAP);
        imageops::overlay(&mut sheet, &tile, x, 0);
    }

    Ok(sheet)
}

/// Width of `count` tiles and the gaps between them, `None` on overflow
fn sheet_width(tile_width: u32, count: usize) -> Option<u32> {
    let count = u32::try_from(count).ok()?;
    let gaps = SHEET_GAP.checked_mul(count.checked_sub(1)?)?;
    tile_width.checked_mul(count)?.checked_add(gaps)
}
