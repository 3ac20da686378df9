//! Errors from the high-level preparation API.

use thiserror::Error;

/// Why an image could not be prepared for the frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrepareError {
    /// Source image has a zero dimension
    #[error("source image is empty ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// Target size has a zero dimension
    #[error("invalid target size {width}x{height}")]
    InvalidTarget { width: u32, height: u32 },
}
