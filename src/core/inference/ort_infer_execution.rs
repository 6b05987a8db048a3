use super::*;
use crate::core::errors::{DetectError, DetectResult, OpaqueError};
use crate::core::tensor::{Tensor3D, Tensor4D};
use ndarray::ArrayView3;
use ort::value::TensorRef;

impl OrtInfer {
    /// Runs the detector and returns its `[batch, 4 + nc, anchors]` output.
    ///
    /// `text_features` must be `Some([batch, classes, dim])` exactly when the
    /// graph has a text-feature input.
    pub fn infer_3d(
        &self,
        x: &Tensor4D,
        text_features: Option<&Tensor3D>,
    ) -> DetectResult<Tensor3D> {
        let input_shape = x.shape().to_vec();

        let image_tensor = TensorRef::from_array_view(x.view()).map_err(|e| {
            DetectError::model_inference_error(
                &self.model_name,
                "tensor_conversion",
                &input_shape,
                &format!("Failed to convert input tensor with shape {:?}", input_shape),
                e,
            )
        })?;

        let mut session = self.session.lock().map_err(|_| {
            DetectError::model_inference_error(
                &self.model_name,
                "session_lock",
                &input_shape,
                "Failed to acquire session lock",
                OpaqueError("Session lock acquisition failed".to_string()),
            )
        })?;

        let outputs = match (self.text_input_name.as_deref(), text_features) {
            (None, None) => session.run(ort::inputs![self.input_name.as_str() => image_tensor]),
            (Some(text_name), Some(features)) => {
                let text_tensor = TensorRef::from_array_view(features.view()).map_err(|e| {
                    DetectError::model_inference_error(
                        &self.model_name,
                        "tensor_conversion",
                        &input_shape,
                        &format!(
                            "Failed to convert text features with shape {:?}",
                            features.shape()
                        ),
                        e,
                    )
                })?;
                session.run(ort::inputs![
                    self.input_name.as_str() => image_tensor,
                    text_name => text_tensor
                ])
            }
            (Some(text_name), None) => {
                return Err(DetectError::invalid_input(format!(
                    "model '{}' expects class embeddings on input '{}'; set classes from a text embedding bank first",
                    self.model_name, text_name
                )));
            }
            (None, Some(_)) => {
                return Err(DetectError::invalid_input(format!(
                    "model '{}' has no text-feature input; class embeddings cannot be used",
                    self.model_name
                )));
            }
        }
        .map_err(|e| {
            DetectError::model_inference_error(
                &self.model_name,
                "forward_pass",
                &input_shape,
                &format!(
                    "ONNX Runtime inference failed with input '{}' -> output '{}'",
                    self.input_name, self.output_name
                ),
                e,
            )
        })?;

        let (output_shape, output_data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                DetectError::model_inference_error(
                    &self.model_name,
                    "output_extraction",
                    &input_shape,
                    &format!("Failed to extract output tensor '{}' as f32", self.output_name),
                    e,
                )
            })?;
        let output_shape: Vec<i64> = output_shape.iter().copied().collect();

        let dims = match output_shape.as_slice() {
            [b, c, n] if *b > 0 && *c > 0 && *n >= 0 => (*b as usize, *c as usize, *n as usize),
            _ => {
                return Err(DetectError::model_inference_error(
                    &self.model_name,
                    "output_validation",
                    &input_shape,
                    &format!(
                        "expected a 3D [batch, 4 + classes, anchors] output, got shape {:?}",
                        output_shape
                    ),
                    OpaqueError("Invalid output tensor dimensions".to_string()),
                ));
            }
        };

        let array_view = ArrayView3::from_shape(dims, output_data)?;
        Ok(array_view.to_owned())
    }
}
