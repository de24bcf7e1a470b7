use image::{Rgb, RgbImage};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::processing::ImageCodec;
use crate::safety::{FileRemover, SafetyManager};
use crate::types::DecodedImage;
use crate::viewer::{PreviewRequest, Viewer};

/// Write a single-colour PNG and return its path
pub fn write_solid_png(dir: &Path, name: &str, width: u32, height: u32, rgb: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(width, height, Rgb(rgb))
        .save(&path)
        .unwrap();
    path
}

/// Write a PNG whose first `changed` pixels differ from a solid colour
pub fn write_partly_changed_png(
    dir: &Path,
    name: &str,
    width: u32,
    height: u32,
    rgb: [u8; 3],
    changed: u32,
) -> PathBuf {
    let path = dir.join(name);
    let mut img = RgbImage::from_pixel(width, height, Rgb(rgb));
    for i in 0..changed {
        let pixel = img.get_pixel_mut(i % width, i / width);
        *pixel = Rgb([rgb[0].wrapping_add(1), rgb[1].wrapping_add(1), rgb[2].wrapping_add(1)]);
    }
    img.save(&path).unwrap();
    path
}

/// A decoded grey image whose samples all equal `value`
pub fn grey_image(width: u32, height: u32, value: u8) -> DecodedImage {
    DecodedImage {
        width,
        height,
        channels: 1,
        samples: vec![value; (width * height) as usize],
    }
}

/// Codec serving images from memory; unknown paths fail to decode
#[derive(Debug, Default)]
pub struct MemoryCodec {
    images: HashMap<PathBuf, DecodedImage>,
}

impl MemoryCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<PathBuf>, image: DecodedImage) -> Self {
        self.images.insert(path.into(), image);
        self
    }
}

impl ImageCodec for MemoryCodec {
    fn decode(&self, path: &Path) -> Result<DecodedImage> {
        self.images.get(path).cloned().ok_or_else(|| {
            Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no image for {}", path.display()),
            ))
        })
    }
}

/// Viewer remembering every request it was asked to display
#[derive(Debug, Default)]
pub struct RecordingViewer {
    pub requests: Vec<PreviewRequest>,
    pub fail: bool,
}

impl Viewer for RecordingViewer {
    fn display(&mut self, request: &PreviewRequest) -> Result<()> {
        if self.fail {
            return Err(Error::Viewer("display unavailable".to_string()));
        }
        self.requests.push(request.clone());
        Ok(())
    }
}

/// Remover that fails for selected paths, and otherwise removes for real
#[derive(Debug, Default)]
pub struct FaultyRemover {
    /// Paths refused during the pre-flight check
    pub refuse: HashSet<PathBuf>,
    /// Paths that pass the check but fail on removal
    pub fail: HashSet<PathBuf>,
}

impl FaultyRemover {
    pub fn refusing(path: impl Into<PathBuf>) -> Self {
        Self {
            refuse: HashSet::from([path.into()]),
            ..Default::default()
        }
    }

    pub fn failing(path: impl Into<PathBuf>) -> Self {
        Self {
            fail: HashSet::from([path.into()]),
            ..Default::default()
        }
    }
}

impl FileRemover for FaultyRemover {
    fn check(&self, path: &Path) -> io::Result<()> {
        if self.refuse.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            ));
        }
        SafetyManager.check(path)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        self.check(path)?;
        if self.fail.contains(path) {
            return Err(io::Error::new(io::ErrorKind::Other, "device busy"));
        }
        SafetyManager.remove(path)
    }
}
