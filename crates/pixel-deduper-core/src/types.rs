use std::ops::Index;
use std::path::{Path, PathBuf};

/// Extensions of raster formats considered during discovery (compared case-insensitively)
pub const IMAGE_EXTENSIONS: [&str; 20] = [
    "bmp", "dib", "jpeg", "jpg", "jpe", "jp2", "png", "webp", "pbm", "pgm", "ppm", "pxm", "pnm",
    "sr", "ras", "tiff", "tif", "exr", "hdr", "pic",
];

/// Raw pixel data of one image in its native sample layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub samples: Vec<u8>,
}

impl DecodedImage {
    /// Width and height as a pair
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Outcome of comparing two images
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimilarityResult {
    /// Fraction of byte-identical samples, in `[0.0, 1.0]`
    Score(f64),

    /// Dimensions (or sample layouts) differ, the images are not comparable
    Skipped,

    /// One or both images could not be decoded
    DecodeFailed,
}

impl SimilarityResult {
    /// Score used for thresholding; non-comparable pairs count as zero
    pub fn value(&self) -> f64 {
        match self {
            Self::Score(score) => *score,
            Self::Skipped | Self::DecodeFailed => 0.0,
        }
    }

    /// Whether this result links the pair at the given threshold
    ///
    /// A skipped pair scores zero; a pair that failed to decode never matches.
    pub fn meets(&self, threshold: f64) -> bool {
        match self {
            Self::Score(score) => *score >= threshold,
            Self::Skipped => 0.0 >= threshold,
            Self::DecodeFailed => false,
        }
    }
}

/// An ordered set of two or more paths considered copies of the same image
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateGroup {
    members: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Build a group from its members in order
    pub fn new(members: Vec<PathBuf>) -> Self {
        Self { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// A group of fewer than two members is not a duplicate set
    pub fn is_duplicate_set(&self) -> bool {
        self.members.len() >= 2
    }

    pub fn members(&self) -> &[PathBuf] {
        &self.members
    }

    pub fn get(&self, index: usize) -> Option<&PathBuf> {
        self.members.get(index)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.members.iter().any(|member| member == path)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.members.iter()
    }

    pub(crate) fn remove(&mut self, index: usize) -> PathBuf {
        self.members.remove(index)
    }

    pub(crate) fn retain(&mut self, keep: impl FnMut(&PathBuf) -> bool) {
        self.members.retain(keep)
    }
}

impl Index<usize> for DuplicateGroup {
    type Output = PathBuf;

    fn index(&self, index: usize) -> &Self::Output {
        &self.members[index]
    }
}

impl<'a> IntoIterator for &'a DuplicateGroup {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

/// Per-pair bookkeeping of a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Pairs compared
    pub compared: usize,

    /// Pairs whose score met the threshold
    pub matched: usize,

    /// Pairs skipped because their dimensions differ
    pub skipped: usize,

    /// Pairs where at least one image failed to decode
    pub decode_failures: usize,
}

impl ScanStats {
    /// Record one comparison result
    pub fn record(&mut self, result: &SimilarityResult, matched: bool) {
        self.compared += 1;
        match result {
            SimilarityResult::Skipped => self.skipped += 1,
            SimilarityResult::DecodeFailed => self.decode_failures += 1,
            SimilarityResult::Score(_) => {}
        }
        if matched {
            self.matched += 1;
        }
    }
}

/// Groups found by a scan together with its statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutcome {
    pub groups: Vec<DuplicateGroup>,
    pub stats: ScanStats,
}
