//! ONNX Runtime integration.
//!
//! [`OrtInfer`] owns the session of an exported YOLO-World graph together with
//! the input/output names and the metadata the exporter embedded.

pub mod metadata;
pub mod ort_infer;

pub use metadata::ModelMetadata;
pub use ort_infer::OrtInfer;
