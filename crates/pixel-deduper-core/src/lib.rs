//! Core functionality for finding and reviewing pixel-identical duplicate images.
//!
//! This library provides the building blocks of a scan and its review:
//! - Candidate discovery by file extension
//! - Pixel-level similarity scoring and transitive grouping
//! - A mutable store of duplicate groups with safe deletion and export
//! - An interactive console session and a viewer seam

// -- External Dependencies --
use log::info;

// -- Standard Library --
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread;

// -- Internal Modules --
mod error;

// -- Public Re-exports --
pub use config::*;
pub use error::{Error, Result};
pub use session::{Flow, Session, SessionState};
pub use store::{DuplicateStore, GroupChange};
pub use types::*;

// -- Public Modules --
pub mod config;
pub mod deduplication;
pub mod discovery;
pub mod logging;
pub mod persistence;
pub mod processing;
pub mod safety;
pub mod session;
pub mod store;
pub mod types;
pub mod viewer;

// -- Test Modules --
#[cfg(test)]
mod test_utils;

use deduplication::DuplicateGrouper;
use processing::{ImageCrateCodec, ProgressTracker, ScanProgress, SimilarityScorer};

/// Main entry point for a scan
pub struct PixelDeduper {
    config: Config,
    shutdown_requested: Arc<AtomicBool>,
}

impl PixelDeduper {
    /// Create a new PixelDeduper; out-of-range settings are clamped
    pub fn new(config: Config) -> Self {
        Self {
            config: config.normalized(),
            shutdown_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Flag that stops a running scan once set
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown_requested)
    }

    /// Discover candidate images under `root`
    pub fn discover(&self, root: &Path) -> Result<BTreeSet<PathBuf>> {
        info!("Discovering images in {}", root.display());
        let candidates = discovery::discover_images(root, &self.config)?;
        info!("Found {} candidate image(s)", candidates.len());
        Ok(candidates)
    }

    /// Group `candidates` on the calling thread
    pub fn find_duplicates(
        &self,
        candidates: &BTreeSet<PathBuf>,
        progress: &ScanProgress,
    ) -> Result<ScanOutcome> {
        self.grouper()
            .group(candidates, progress, &self.shutdown_requested)
    }

    /// Group `candidates` on a worker thread while `tracker` draws progress
    pub fn run_scan(
        &self,
        candidates: &BTreeSet<PathBuf>,
        tracker: &ProgressTracker,
    ) -> Result<ScanOutcome> {
        let progress = ScanProgress::new();
        info!(
            "Comparing {} image(s) at threshold {}",
            candidates.len(),
            self.config.threshold
        );

        thread::scope(|scope| {
            let worker = thread::Builder::new()
                .name("pixel-compare".to_string())
                .spawn_scoped(scope, || self.find_duplicates(candidates, &progress))?;

            while !worker.is_finished() {
                tracker.update(&progress.snapshot());
                thread::sleep(ProgressTracker::POLL_INTERVAL);
            }
            tracker.update(&progress.snapshot());
            tracker.finish();

            worker
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
        })
    }

    fn grouper(&self) -> DuplicateGrouper<ImageCrateCodec> {
        DuplicateGrouper::new(SimilarityScorer::new(ImageCrateCodec), self.config.threshold)
    }
}
