#![allow(clippy::module_inception)]

//! eink-photo: Photo preparation for color e-ink frames
//!
//! This library turns an arbitrary photo into a frame-sized image that uses
//! only the colors a panel can physically show. It is pure and synchronous;
//! decoding, storage and face detection live with the caller.
//!
//! # Quick Start
//!
//! The [`FramePreparer`] builder is the primary entry point:
//!
//! ```
//! use eink_photo::{FaceBox, FramePreparer, Palette};
//! use image::{Rgb, RgbImage};
//!
//! let preparer = FramePreparer::new(Palette::default_eink()).target(80, 48);
//!
//! let photo = RgbImage::from_pixel(120, 80, Rgb([90, 140, 200]));
//! let faces = [FaceBox::new(0.4, 0.2, 0.2, 0.3)];
//! let result = preparer.prepare(&photo, &faces).unwrap();
//!
//! let rgb = result.to_rgb_image();
//! assert_eq!(rgb.dimensions(), (80, 48));
//! assert!(rgb.pixels().all(|p| result.palette().contains(p.0)));
//! ```
//!
//! # Pipeline
//!
//! ```text
//! RgbImage (oriented)
//!     |
//!     v
//! [Smart crop]      target aspect, centered on the union of faces,
//!     |             Lanczos3 resample to the exact target size
//!     v
//! [Tone curve]      build-time LUT: midtone lift, highlight roll-off
//!     |
//!     v
//! [Saturation]      blend away from luminance gray (x1.15)
//!     |
//!     v
//! [Local contrast]  unsharp mask (radius 1, 140%, threshold 2)
//!     |
//!     v
//! [Dither]          Floyd-Steinberg, nearest color by RGB distance
//!     |
//!     v
//! DitheredImage     palette indices + palette
//! ```
//!
//! # Palettes
//!
//! A [`Palette`] holds 1 to 256 distinct colors. Panels are described by a
//! small JSON file; [`load_palette`] reads it and falls back to the built-in
//! 6-color palette (black, white, red, green, blue, yellow as the panel
//! renders them) whenever the file is missing or unusable. The fallback
//! never fails, and [`PaletteLoad::origin`] records what happened.
//!
//! # Dithering
//!
//! Error diffusion works directly on 8-bit channel values. Before each
//! pixel is matched, the pixel plus its accumulated error is clamped to
//! `[0, 255]`.

pub mod api;
pub mod crop;
pub mod dither;
pub mod output;
pub mod palette;
pub mod tone;


pub use api::{FramePreparer, PrepareError, DEFAULT_TARGET_HEIGHT, DEFAULT_TARGET_WIDTH};
pub use crop::{CropRect, FaceBox, SmartCrop, DEFAULT_FACE_MARGIN};
pub use dither::{Dither, FloydSteinberg};
pub use output::DitheredImage;
pub use palette::{
    load_palette, parse_palette, FallbackReason, Palette, PaletteError, PaletteLoad,
    PaletteOrigin, DEFAULT_PALETTE,
};
pub use tone::{ToneAdjuster, ToneOptions};
