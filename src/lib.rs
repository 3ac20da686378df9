//! Inkframe - photo pipeline for color e-ink frames
//!
//! Uploads are deduplicated, cropped around faces, tone-adjusted and
//! dithered to the panel palette, then served back at random.
//! This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
