//! Output types for the dithering pipeline.
//!
//! [`DitheredImage`] stores palette indices with dimension metadata and an
//! owned [`Palette`](crate::palette::Palette), offering indexed and
//! full-color output on demand.

mod dithered_image;

pub use dithered_image::DitheredImage;
