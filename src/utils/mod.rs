//! Utility functions for loading and visualizing images.

pub mod image;
#[cfg(feature = "visualization")]
pub mod visualization;

pub use image::{load_image, load_images};
