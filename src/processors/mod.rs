//! Image and tensor processing around the detector network.
//!
//! - [`letterbox`] turns arbitrary images into the fixed-size model input
//! - [`postprocess`] turns raw head output into boxes on the original image
//! - [`geometry`] holds the box type both sides share

pub mod geometry;
pub mod letterbox;
pub mod postprocess;

pub use geometry::BoundingBox;
pub use letterbox::{LetterBox, LetterboxInfo, PAD_VALUE, to_tensor};
pub use postprocess::{Candidate, YoloPostProcess, scale_boxes};
