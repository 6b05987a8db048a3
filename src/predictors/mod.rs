//! High-level predictors.

pub mod builder;
pub mod world_detector;

pub use builder::{PredictorBuilderState, TaskPredictorBuilder};
pub use world_detector::{WorldDetector, WorldDetectorBuilder};
