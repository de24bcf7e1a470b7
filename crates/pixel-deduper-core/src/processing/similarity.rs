use std::path::Path;

use crate::logging::log_decode_error;
use crate::processing::codec::ImageCodec;
use crate::types::{DecodedImage, SimilarityResult};

/// Pixel-level comparison of two images
///
/// The score is the fraction of samples that are byte-for-byte identical.
/// Visually identical images that were re-encoded will usually score low.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityScorer<C> {
    codec: C,
}

impl<C: ImageCodec> SimilarityScorer<C> {
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Compare the images stored at two paths
    ///
    /// Decode failures are not errors: the pair is reported as `DecodeFailed`
    /// and treated as a non-match by callers.
    pub fn score(&self, path_a: &Path, path_b: &Path) -> SimilarityResult {
        let image_a = match self.codec.decode(path_a) {
            Ok(image) => image,
            Err(e) => {
                log_decode_error(path_a, &e);
                return SimilarityResult::DecodeFailed;
            }
        };
        let image_b = match self.codec.decode(path_b) {
            Ok(image) => image,
            Err(e) => {
                log_decode_error(path_b, &e);
                return SimilarityResult::DecodeFailed;
            }
        };

        compare_decoded(&image_a, &image_b)
    }
}

/// Compare two decoded images sample by sample
pub fn compare_decoded(a: &DecodedImage, b: &DecodedImage) -> SimilarityResult {
    if a.dimensions() != b.dimensions() {
        return SimilarityResult::Skipped;
    }

    // Same size but different channel count or bit depth
    if a.samples.len() != b.samples.len() {
        return SimilarityResult::Skipped;
    }

    if a.samples.is_empty() {
        return SimilarityResult::Score(1.0);
    }

    let identical = a
        .samples
        .iter()
        .zip(&b.samples)
        .filter(|(x, y)| x.abs_diff(**y) == 0)
        .count();

    SimilarityResult::Score(identical as f64 / a.samples.len() as f64)
}
