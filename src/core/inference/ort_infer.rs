//! ONNX Runtime inference engine for YOLO-World exports.

use super::metadata::ModelMetadata;
use ort::session::Session;
use std::path::PathBuf;
use std::sync::Mutex;

#[path = "ort_infer_builders.rs"]
mod ort_infer_builders;
#[path = "ort_infer_execution.rs"]
mod ort_infer_execution;

pub(crate) use ort_infer_builders::tensor_shape;

/// A loaded detector graph.
///
/// The image tensor is bound to the first graph input. Exports that keep the
/// text-feature input of YOLO-World declare a second input, which receives the
/// class embeddings chosen through `set_classes`.
pub struct OrtInfer {
    pub(super) session: Mutex<Session>,
    pub(super) input_name: String,
    pub(super) input_shape: Option<Vec<i64>>,
    pub(super) text_input_name: Option<String>,
    pub(super) text_dim: Option<usize>,
    pub(super) output_name: String,
    pub(super) metadata: ModelMetadata,
    pub(super) model_path: PathBuf,
    pub(super) model_name: String,
}

impl std::fmt::Debug for OrtInfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtInfer")
            .field("input_name", &self.input_name)
            .field("input_shape", &self.input_shape)
            .field("text_input_name", &self.text_input_name)
            .field("output_name", &self.output_name)
            .field("model_path", &self.model_path)
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl OrtInfer {
    /// Returns the model path associated with this inference engine.
    pub fn model_path(&self) -> &std::path::Path {
        &self.model_path
    }

    /// Returns the model name associated with this inference engine.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Metadata the exporter embedded in the graph.
    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Declared shape of the image input. Dynamic dimensions are `-1`.
    pub fn primary_input_shape(&self) -> Option<&[i64]> {
        self.input_shape.as_deref()
    }

    /// Whether the graph takes class text embeddings as a second input.
    pub fn accepts_text_features(&self) -> bool {
        self.text_input_name.is_some()
    }

    /// Embedding width expected by the text-feature input, if static.
    pub fn text_feature_dim(&self) -> Option<usize> {
        self.text_dim
    }

    /// Input size declared by the graph as (height, width), when both spatial dims are static.
    pub fn static_input_size(&self) -> Option<(u32, u32)> {
        static_spatial_size(self.input_shape.as_deref()?)
    }
}

fn static_spatial_size(shape: &[i64]) -> Option<(u32, u32)> {
    match shape {
        [_, _, h, w] if *h > 0 && *w > 0 => Some((u32::try_from(*h).ok()?, u32::try_from(*w).ok()?)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_spatial_size() {
        assert_eq!(static_spatial_size(&[1, 3, 640, 640]), Some((640, 640)));
        assert_eq!(static_spatial_size(&[1, 3, 480, 640]), Some((480, 640)));
        assert_eq!(static_spatial_size(&[-1, 3, -1, -1]), None);
        assert_eq!(static_spatial_size(&[1, 3, 640]), None);
    }
}
