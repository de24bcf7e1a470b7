// Core modules
pub mod codec;
pub mod progress;
pub mod similarity;

// Reexport core functionality
pub use codec::{ImageCodec, ImageCrateCodec};
pub use progress::{ProgressSnapshot, ProgressTracker, ScanProgress};
pub use similarity::{compare_decoded, SimilarityScorer};
