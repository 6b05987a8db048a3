//! Error type definitions.

use thiserror::Error;

/// Stage of the detection pipeline in which a processing error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Letterbox resize and padding.
    Letterbox,
    /// Conversion of pixels into the normalized input tensor.
    Normalization,
    /// Decoding of raw model output, NMS and rescaling.
    PostProcessing,
    /// Drawing, saving or displaying annotated images.
    Visualization,
    /// Generic processing error.
    Generic,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Letterbox => write!(f, "letterbox"),
            ProcessingStage::Normalization => write!(f, "normalization"),
            ProcessingStage::PostProcessing => write!(f, "post-processing"),
            ProcessingStage::Visualization => write!(f, "visualization"),
            ProcessingStage::Generic => write!(f, "processing"),
        }
    }
}

/// Errors that can occur while loading a detector or running a prediction.
#[derive(Error, Debug)]
pub enum DetectError {
    /// Error occurred while loading an image.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// The checkpoint could not be turned into an inference session.
    #[error("failed to load model '{model_path}': {reason}{suggestion}")]
    ModelLoad {
        /// Path of the checkpoint.
        model_path: String,
        /// Why loading failed.
        reason: String,
        /// Optional hint, already formatted with a leading separator.
        suggestion: String,
        /// The underlying error, when there is one.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The forward pass or the extraction of its output failed.
    #[error(
        "model '{model_name}' failed during {operation} (input shape {input_shape:?}): {context}"
    )]
    ModelInference {
        /// Name of the model that failed.
        model_name: String,
        /// Operation that failed.
        operation: String,
        /// Shape of the image tensor fed to the model.
        input_shape: Vec<usize>,
        /// Additional context.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error occurred during processing.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A requested class cannot be represented by the loaded model.
    #[error("unknown class '{name}'; available classes include: {available}")]
    UnknownClass {
        /// The requested class name.
        name: String,
        /// A short, comma separated excerpt of the available names.
        available: String,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error from tensor operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// JSON (de)serialization error.
    #[error("json")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for DetectError {
    fn from(error: image::ImageError) -> Self {
        Self::ImageLoad(error)
    }
}

/// A plain message error used as the `source` of wrapped errors
/// that have no underlying cause of their own.
#[derive(Debug, Clone)]
pub struct OpaqueError(pub String);

impl std::fmt::Display for OpaqueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for OpaqueError {}
