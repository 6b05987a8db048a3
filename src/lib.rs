//! # YOLO-World
//!
//! Open-vocabulary object detection with YOLO-World models exported to ONNX.
//!
//! ## Features
//!
//! - Load a detector from an ONNX checkpoint, reading class names and input
//!   size from the exporter's metadata
//! - Restrict detection to a chosen list of class names at runtime
//! - Letterbox preprocessing, confidence filtering and NMS
//! - Annotated rendering, saving and on-screen display of results
//! - ONNX Runtime execution providers selected by feature flags
//!
//! ## Modules
//!
//! * [`core`] - Error handling, configuration and the ONNX Runtime wrapper
//! * [`domain`] - Class vocabularies, class selections and detection results
//! * [`predictors`] - The [`WorldDetector`](predictors::WorldDetector)
//! * [`processors`] - Letterboxing, box geometry and post-processing
//! * [`utils`] - Image loading and visualization
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use yolo_world::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut model = WorldDetector::load("yolov8s-world.onnx")?;
//! model.set_classes(&["bean", "rice"])?;
//!
//! let results = model.predict_path("yemek2.jpg")?;
//! for det in &results[0].detections {
//!     println!("{} {:.2} {:?}", det.class_name, det.confidence, det.bbox);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Models with a text-feature input
//!
//! Some exports take the class text embeddings as a second input instead of
//! baking a vocabulary into the graph. Give those a CLIP text encoder and any
//! class name can be requested:
//!
//! ```rust,no_run
//! use yolo_world::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut model = WorldDetector::builder()
//!     .text_encoder("clip_text.onnx", "clip_tokenizer.json")
//!     .build("yolov8s-world.onnx")?;
//! model.set_classes(&["soup", "pasta"])?;
//! let results = model.predict_path("yemek.jpg")?;
//! println!("{}", results[0].summary());
//! # Ok(())
//! # }
//! ```
//!
//! A precomputed JSON bank mapping class names to embedding vectors works too:
//!
//! ```rust,no_run
//! use yolo_world::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let model = WorldDetector::builder()
//!     .text_embeddings_file("clip_text_embeddings.json")
//!     .classes(["soup", "pasta"])
//!     .conf_threshold(0.1)
//!     .build("yolov8s-worldv2-text.onnx")?;
//! let results = model.predict_path("yemek.jpg")?;
//! println!("{}", results[0].summary());
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod predictors;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// ```rust
/// use yolo_world::prelude::*;
/// ```
///
/// Covers the detector, its configuration, results and errors. Lower-level
/// pieces (letterboxing, post-processing, the ONNX wrapper) are imported from
/// their modules.
pub mod prelude {
    pub use crate::core::{DetectError, DetectResult, OrtSessionConfig, WorldDetectorConfig};
    pub use crate::domain::{Detection, DetectionResult};
    pub use crate::predictors::{WorldDetector, WorldDetectorBuilder};
    pub use crate::processors::BoundingBox;
    pub use crate::utils::{load_image, load_images};

    #[cfg(feature = "visualization")]
    pub use crate::utils::visualization::AnnotateConfig;
}
