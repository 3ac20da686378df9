//! Error types for palette construction.

use thiserror::Error;

/// Error type for palette validation.
///
/// Returned by [`Palette::new`](super::Palette::new) when the color list
/// cannot form a usable display palette.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// No colors provided in palette
    #[error("palette cannot be empty")]
    EmptyPalette,

    /// More colors than an indexed image can address
    #[error("palette has {count} colors (max {max})")]
    TooManyColors {
        /// Number of colors supplied
        count: usize,
        /// Maximum supported palette size
        max: usize,
    },

    /// Duplicate color found at the specified index
    #[error("duplicate color found at index {index}")]
    DuplicateColor {
        /// Index where the duplicate was found
        index: usize,
    },
}
