#![allow(dead_code)]

use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};

use pixel_deduper_core::viewer::{PreviewRequest, Viewer};

/// Write a single-colour PNG and return its path
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32, rgb: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    RgbImage::from_pixel(width, height, Rgb(rgb))
        .save(&path)
        .unwrap();
    path
}

/// Viewer that only remembers what it was asked to show
#[derive(Debug, Default)]
pub struct CollectingViewer {
    pub shown: Vec<PreviewRequest>,
}

impl Viewer for CollectingViewer {
    fn display(&mut self, request: &PreviewRequest) -> pixel_deduper_core::Result<()> {
        self.shown.push(request.clone());
        Ok(())
    }
}
