//! Public API for the eink-photo crate.
//!
//! This module provides the high-level API: the [`FramePreparer`] builder
//! and the [`PrepareError`] type.

mod builder;
mod error;

pub use builder::{FramePreparer, DEFAULT_TARGET_HEIGHT, DEFAULT_TARGET_WIDTH};
pub use error::PrepareError;
