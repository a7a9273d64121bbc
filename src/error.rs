//! Error taxonomy for the line-drawing pipeline.
//!
//! Only input and environment problems are errors. Numerical corner cases
//! inside the engines (empty weight sums, zero flow vectors, samples leaving
//! the image) are resolved locally and never surface here.
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq)]
pub enum CldError {
    /// A configuration value is outside its accepted domain.
    InvalidOption { name: &'static str, reason: String },
    /// The input image has no pixels.
    EmptyImage { width: usize, height: usize },
    /// Buffer or grid dimensions disagree.
    SizeMismatch { expected: usize, actual: usize },
    /// Filesystem access failed.
    Io { path: PathBuf, message: String },
    /// Decoding or encoding through the `image` crate failed.
    Image { message: String },
    /// A JSON configuration could not be read or written.
    Config { path: PathBuf, message: String },
}

impl CldError {
    pub(crate) fn io(path: &Path, err: std::io::Error) -> Self {
        CldError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        CldError::InvalidOption {
            name,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for CldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CldError::InvalidOption { name, reason } => {
                write!(f, "invalid option `{name}`: {reason}")
            }
            CldError::EmptyImage { width, height } => {
                write!(f, "image has no pixels ({width}x{height})")
            }
            CldError::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch: expected {expected}, got {actual}")
            }
            CldError::Io { path, message } => write!(f, "{}: {message}", path.display()),
            CldError::Image { message } => write!(f, "image error: {message}"),
            CldError::Config { path, message } => {
                write!(f, "config {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for CldError {}
