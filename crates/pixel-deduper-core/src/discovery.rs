use log::{debug, warn};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::IMAGE_EXTENSIONS;

/// Discover candidate images under `directory`
///
/// Only direct children are considered unless `config.recursive` is set. The
/// returned set is ordered by path so that grouping is reproducible.
pub fn discover_images(directory: &Path, config: &Config) -> Result<BTreeSet<PathBuf>> {
    if !directory.is_dir() {
        return Err(Error::DirectoryNotFound(directory.to_path_buf()));
    }

    let max_depth = if config.recursive { usize::MAX } else { 1 };

    let mut candidates = BTreeSet::new();
    for entry in WalkDir::new(directory).max_depth(max_depth) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", directory.display(), e);
                continue;
            }
        };

        if entry.file_type().is_file() && has_image_extension(entry.path()) {
            candidates.insert(entry.into_path());
        }
    }

    debug!(
        "Discovered {} candidate(s) in {}",
        candidates.len(),
        directory.display()
    );
    Ok(candidates)
}

/// Returns if the given path has an image extension
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

// -- Tests --
