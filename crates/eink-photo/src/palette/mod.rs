//! Palette types and loading
//!
//! This module provides the validated [`Palette`] type, the built-in
//! 6-color default, and [`load_palette`] for reading palette files with a
//! silent fallback to the default.

mod error;
mod loader;
mod palette;

pub use error::PaletteError;
pub use loader::{load_palette, parse_palette, FallbackReason, PaletteLoad, PaletteOrigin};
pub use palette::{Palette, DEFAULT_PALETTE, MAX_PALETTE_SIZE};
