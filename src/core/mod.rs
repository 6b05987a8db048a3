//! Core building blocks of the detector.
//!
//! - Configuration of sessions and predictions
//! - Error handling
//! - ONNX Runtime integration
//! - Tensor aliases shared between stages

pub mod config;
pub mod errors;
pub mod inference;
pub mod tensor;

pub use config::{OrtExecutionProvider, OrtSessionConfig, WorldDetectorConfig};
pub use errors::{DetectError, DetectResult, ProcessingStage};
pub use inference::{ModelMetadata, OrtInfer};
pub use tensor::{Tensor3D, Tensor4D};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
