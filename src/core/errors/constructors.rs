//! Error constructor utilities.
//!
//! Helpers for creating [`DetectError`] instances with consistent context so
//! call sites stay short:
//!
//! ```rust
//! use yolo_world::core::errors::DetectError;
//!
//! let error = DetectError::model_load_error(
//!     "yolov8s-world.onnx",
//!     "failed to create ONNX session",
//!     Some("verify the model file exists and is readable"),
//!     None::<std::io::Error>,
//! );
//! assert!(error.to_string().contains("suggested fix"));
//! ```

use super::types::{DetectError, OpaqueError, ProcessingStage};

impl DetectError {
    #[inline]
    fn processing_with_context(
        kind: ProcessingStage,
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates an error for letterbox operations.
    pub fn letterbox_error(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing_with_context(ProcessingStage::Letterbox, context, error)
    }

    /// Creates an error for normalization operations.
    pub fn normalization(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing_with_context(ProcessingStage::Normalization, context, error)
    }

    /// Creates an error for post-processing operations.
    pub fn post_processing(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing_with_context(ProcessingStage::PostProcessing, context, error)
    }

    /// Creates a post-processing error from a message alone.
    pub fn post_processing_message(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::processing_with_context(
            ProcessingStage::PostProcessing,
            message.clone(),
            OpaqueError(message),
        )
    }

    /// Creates an error for drawing, saving or displaying annotated images.
    pub fn visualization(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing_with_context(ProcessingStage::Visualization, context, error)
    }

    /// Creates an error for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an error for configuration problems.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Creates a configuration error naming the offending field.
    pub fn config_error_with_context(field: &str, value: &str, reason: &str) -> Self {
        Self::ConfigError {
            message: format!(
                "Configuration error in field '{field}' with value '{value}': {reason}"
            ),
        }
    }

    /// Creates an error for a class name the model cannot represent.
    ///
    /// Only the first few available names are listed to keep the message readable
    /// for models with large vocabularies.
    pub fn unknown_class<S: AsRef<str>>(name: impl Into<String>, available: &[S]) -> Self {
        const SHOWN: usize = 8;
        let mut excerpt = available
            .iter()
            .take(SHOWN)
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join(", ");
        if available.len() > SHOWN {
            excerpt.push_str(&format!(", ... ({} total)", available.len()));
        }
        if excerpt.is_empty() {
            excerpt.push_str("<none>");
        }
        Self::UnknownClass {
            name: name.into(),
            available: excerpt,
        }
    }

    /// Creates an error for a failed model load.
    pub fn model_load_error(
        model_path: impl AsRef<std::path::Path>,
        reason: impl Into<String>,
        suggestion: Option<&str>,
        source: Option<impl std::error::Error + Send + Sync + 'static>,
    ) -> Self {
        let suggestion = suggestion
            .map(|s| format!("; suggested fix: {}", s))
            .unwrap_or_default();
        Self::ModelLoad {
            model_path: model_path.as_ref().display().to_string(),
            reason: reason.into(),
            suggestion,
            source: source.map(|e| Box::new(e) as _),
        }
    }

    /// Creates an error for a failed forward pass or output extraction.
    pub fn model_inference_error(
        model_name: &str,
        operation: &str,
        input_shape: &[usize],
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ModelInference {
            model_name: model_name.to_string(),
            operation: operation.to_string(),
            input_shape: input_shape.to_vec(),
            context: context.to_string(),
            source: Box::new(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_class_truncates_long_vocabularies() {
        let names: Vec<String> = (0..20).map(|i| format!("c{i}")).collect();
        let err = DetectError::unknown_class("zebra", names.as_slice());
        let msg = err.to_string();
        assert!(msg.contains("'zebra'"));
        assert!(msg.contains("c7"));
        assert!(!msg.contains("c8,"));
        assert!(msg.contains("(20 total)"));
    }

    #[test]
    fn test_unknown_class_with_empty_vocabulary() {
        let err = DetectError::unknown_class("soup", &[] as &[String]);
        assert!(err.to_string().contains("<none>"));
    }

    #[test]
    fn test_model_load_error_without_suggestion() {
        let err = DetectError::model_load_error(
            "missing.onnx",
            "file not found",
            None,
            None::<std::io::Error>,
        );
        assert_eq!(
            err.to_string(),
            "failed to load model 'missing.onnx': file not found"
        );
    }

    #[test]
    fn test_processing_stage_display() {
        let err = DetectError::post_processing_message("bad output");
        assert_eq!(err.to_string(), "post-processing failed: bad output");
    }
}
