//! CLIP text encoder for class prompts.
//!
//! YOLO-World scores regions against text embeddings of the class names. Exports
//! that keep the text-feature input accept any names, provided they are embedded
//! with the CLIP text tower the detector was trained with. [`ClipTextEncoder`]
//! runs that tower from ONNX and returns L2-normalized rows.

use crate::core::config::OrtSessionConfig;
use crate::core::errors::{DetectError, DetectResult, OpaqueError};
use crate::core::inference::OrtInfer;
use crate::core::inference::ort_infer::tensor_shape;
use crate::core::tensor::Tensor3D;
use crate::domain::vocabulary::{ClassPrompts, fold_case};
use ndarray::{Array2, Axis};
use ort::session::Session;
use ort::value::TensorRef;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokenizers::Tokenizer;
use tracing::{debug, info};

/// Longest token sequence the CLIP text tower accepts.
pub const CONTEXT_LENGTH: usize = 77;

const END_OF_TEXT: &str = "<|endoftext|>";
const IDS_INPUT: &str = "input_ids";
const MASK_INPUT: &str = "attention_mask";
const EMBEDS_OUTPUT: &str = "text_embeds";

/// CLIP text tower plus its tokenizer.
pub struct ClipTextEncoder {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    ids_input: String,
    mask_input: Option<String>,
    output_name: String,
    pad_id: u32,
    dim: Option<usize>,
    model_path: PathBuf,
}

impl std::fmt::Debug for ClipTextEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipTextEncoder")
            .field("ids_input", &self.ids_input)
            .field("mask_input", &self.mask_input)
            .field("output_name", &self.output_name)
            .field("dim", &self.dim)
            .field("model_path", &self.model_path)
            .finish()
    }
}

impl ClipTextEncoder {
    pub fn new(model_path: impl AsRef<Path>, tokenizer_path: impl AsRef<Path>) -> DetectResult<Self> {
        Self::from_config(model_path, tokenizer_path, None)
    }

    /// Loads the text tower and a `tokenizer.json`, applying the session configuration.
    pub fn from_config(
        model_path: impl AsRef<Path>,
        tokenizer_path: impl AsRef<Path>,
        ort_config: Option<&OrtSessionConfig>,
    ) -> DetectResult<Self> {
        let model_path = model_path.as_ref();
        let tokenizer_path = tokenizer_path.as_ref();

        let tokenizer = Tokenizer::from_file(tokenizer_path).map_err(|err| {
            DetectError::invalid_input(format!(
                "Failed to load tokenizer from {:?}: {}",
                tokenizer_path, err
            ))
        })?;
        let pad_id = tokenizer.token_to_id(END_OF_TEXT).ok_or_else(|| {
            DetectError::invalid_input(format!(
                "tokenizer {:?} has no '{}' token; expected a CLIP tokenizer",
                tokenizer_path, END_OF_TEXT
            ))
        })?;

        let session = OrtInfer::open_session(model_path, ort_config)?;

        let ids_input = session
            .inputs
            .iter()
            .find(|input| input.name == IDS_INPUT)
            .or_else(|| session.inputs.first())
            .map(|input| input.name.clone())
            .ok_or_else(|| {
                DetectError::model_load_error(
                    model_path,
                    "text encoder declares no inputs",
                    None,
                    None::<std::io::Error>,
                )
            })?;
        let mask_input = session
            .inputs
            .iter()
            .find(|input| input.name == MASK_INPUT)
            .map(|input| input.name.clone());

        let output = session
            .outputs
            .iter()
            .find(|output| output.name == EMBEDS_OUTPUT)
            .or_else(|| session.outputs.first())
            .ok_or_else(|| {
                DetectError::model_load_error(
                    model_path,
                    "text encoder declares no outputs",
                    None,
                    None::<std::io::Error>,
                )
            })?;
        let output_name = output.name.clone();
        let dim = tensor_shape(&output.output_type)
            .and_then(|shape| shape.last().copied())
            .and_then(|d| usize::try_from(d).ok())
            .filter(|d| *d > 0);

        info!(
            "Loaded text encoder {:?} (input '{}', output '{}', dim {:?})",
            model_path, ids_input, output_name, dim
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            ids_input,
            mask_input,
            output_name,
            pad_id,
            dim,
            model_path: model_path.to_path_buf(),
        })
    }

    /// Embeds each name as one L2-normalized row of `[names.len(), dim]`.
    pub fn embed(&self, names: &[String]) -> DetectResult<Array2<f32>> {
        let inputs: Vec<&str> = names.iter().map(String::as_str).collect();
        let encodings = self.tokenizer.encode_batch(inputs, true).map_err(|e| {
            DetectError::invalid_input(format!("tokenizer encode failed: {e}"))
        })?;
        let sequences: Vec<Vec<u32>> = encodings.iter().map(|e| e.get_ids().to_vec()).collect();
        let (ids, mask) = pack_tokens(&sequences, self.pad_id);
        let ids_shape = ids.shape().to_vec();
        debug!("Encoding {} prompts as {:?} tokens", names.len(), ids_shape);

        let model_name = self.model_path.display().to_string();
        let mut session = self.session.lock().map_err(|_| {
            DetectError::model_inference_error(
                &model_name,
                "session_lock",
                &ids_shape,
                "Failed to acquire session lock",
                OpaqueError("Session lock acquisition failed".to_string()),
            )
        })?;

        let ids_tensor = TensorRef::from_array_view(ids.view())?;
        let outputs = match self.mask_input.as_deref() {
            Some(mask_name) => {
                let mask_tensor = TensorRef::from_array_view(mask.view())?;
                session.run(ort::inputs![
                    self.ids_input.as_str() => ids_tensor,
                    mask_name => mask_tensor
                ])
            }
            None => session.run(ort::inputs![self.ids_input.as_str() => ids_tensor]),
        }
        .map_err(|e| {
            DetectError::model_inference_error(
                &model_name,
                "text_encoding",
                &ids_shape,
                "ONNX Runtime text encoding failed",
                e,
            )
        })?;

        let (shape, data) = outputs[self.output_name.as_str()].try_extract_tensor::<f32>()?;
        let dims = match shape.iter().copied().collect::<Vec<i64>>().as_slice() {
            [n, d] if *n as usize == names.len() && *d > 0 => (*n as usize, *d as usize),
            other => {
                return Err(DetectError::model_inference_error(
                    &model_name,
                    "output_validation",
                    &ids_shape,
                    &format!(
                        "expected pooled text embeddings [{}, dim], got shape {:?}",
                        names.len(),
                        other
                    ),
                    OpaqueError("Invalid text embedding dimensions".to_string()),
                ));
            }
        };
        let mut features = Array2::from_shape_vec(dims, data.to_vec())?;
        l2_normalize_rows(&mut features);
        Ok(features)
    }
}

impl ClassPrompts for ClipTextEncoder {
    fn dim(&self) -> Option<usize> {
        self.dim
    }

    fn resolve(&self, name: &str) -> Option<String> {
        Some(fold_case(name))
    }

    fn encode(&self, names: &[String]) -> DetectResult<Tensor3D> {
        Ok(self.embed(names)?.insert_axis(Axis(0)))
    }
}

/// Packs token sequences into `[batch, len]` ids and attention mask.
///
/// `len` is the longest sequence, capped at [`CONTEXT_LENGTH`]. Longer sequences
/// are cut and end with `pad_id`, the end-of-text token, so pooling still finds it.
fn pack_tokens(sequences: &[Vec<u32>], pad_id: u32) -> (Array2<i64>, Array2<i64>) {
    let len = sequences
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0)
        .clamp(1, CONTEXT_LENGTH);
    let mut ids = Array2::from_elem((sequences.len(), len), pad_id as i64);
    let mut mask = Array2::zeros((sequences.len(), len));

    for (row, seq) in sequences.iter().enumerate() {
        let kept = seq.len().min(len);
        for (col, &id) in seq.iter().take(kept).enumerate() {
            ids[[row, col]] = id as i64;
            mask[[row, col]] = 1;
        }
        if seq.len() > len {
            ids[[row, len - 1]] = pad_id as i64;
        }
    }
    (ids, mask)
}

fn l2_normalize_rows(features: &mut Array2<f32>) {
    for mut row in features.rows_mut() {
        let norm = row.dot(&row).sqrt();
        if norm > 0.0 {
            row.mapv_inplace(|v| v / norm);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_pack_tokens_pads_to_longest() {
        let (ids, mask) = pack_tokens(&[vec![49406, 1, 49407], vec![49406, 49407]], 49407);
        assert_eq!(ids, array![[49406, 1, 49407], [49406, 49407, 49407]]);
        assert_eq!(mask, array![[1, 1, 1], [1, 1, 0]]);
    }

    #[test]
    fn test_pack_tokens_truncates_to_context_length() {
        let long: Vec<u32> = (0..100).collect();
        let (ids, mask) = pack_tokens(&[long], 49407);
        assert_eq!(ids.dim(), (1, CONTEXT_LENGTH));
        assert_eq!(ids[[0, 0]], 0);
        assert_eq!(ids[[0, CONTEXT_LENGTH - 2]], (CONTEXT_LENGTH - 2) as i64);
        assert_eq!(ids[[0, CONTEXT_LENGTH - 1]], 49407);
        assert!(mask.iter().all(|&m| m == 1));
    }

    #[test]
    fn test_l2_normalize_rows() {
        let mut features = array![[3.0f32, 4.0], [0.0, 0.0]];
        l2_normalize_rows(&mut features);
        assert!((features[[0, 0]] - 0.6).abs() < 1e-6);
        assert!((features[[0, 1]] - 0.8).abs() < 1e-6);
        assert_eq!(features.row(1).to_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_missing_tokenizer_is_rejected() {
        let err = ClipTextEncoder::new("clip_text.onnx", "no/such/tokenizer.json").unwrap_err();
        assert!(matches!(err, DetectError::InvalidInput { .. }));
    }
}
