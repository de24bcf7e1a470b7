use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Custom error types for the pixel-deduper library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding error
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// Scan root missing or not a directory
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// Invalid configuration error
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Group or member index outside the valid range
    #[error("Invalid selection: index {index} is out of range (0..{len})")]
    OutOfRange { index: usize, len: usize },

    /// Export destination already exists
    #[error("File already exists: {}", .0.display())]
    ExportConflict(PathBuf),

    /// A file could not be removed from disk
    #[error("Failed to delete {}: {source}", path.display())]
    Deletion {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Some members were removed before a later removal failed
    #[error("Deleted {deleted} file(s), then failed to delete {}: {source}", path.display())]
    PartialDeletion {
        deleted: usize,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed interactive command
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Viewer could not display the requested images
    #[error("Viewer error: {0}")]
    Viewer(String),

    /// Scan cancelled before completion
    #[error("Operation interrupted")]
    Interrupted,
}
