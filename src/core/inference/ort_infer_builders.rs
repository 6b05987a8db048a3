use super::*;
use crate::core::config::{OrtExecutionProvider, OrtGraphOptimizationLevel, OrtSessionConfig};
use crate::core::errors::{DetectError, DetectResult};
use crate::core::inference::metadata::{parse_imgsz, parse_names};
use ort::execution_providers::ExecutionProviderDispatch;
use ort::logging::LogLevel;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::value::ValueType;
use std::path::Path;
use tracing::{debug, info, warn};

impl OrtInfer {
    /// Loads a model with default ONNX Runtime settings.
    pub fn new(model_path: impl AsRef<Path>) -> DetectResult<Self> {
        Self::from_config(model_path, None)
    }

    /// Loads a model, applying the given session configuration.
    pub fn from_config(
        model_path: impl AsRef<Path>,
        ort_config: Option<&OrtSessionConfig>,
    ) -> DetectResult<Self> {
        let path = model_path.as_ref();
        let session = Self::open_session(path, ort_config)?;

        let mut inputs = session.inputs.iter();
        let image_input = inputs.next().ok_or_else(|| {
            DetectError::model_load_error(
                path,
                "graph declares no inputs",
                None,
                None::<std::io::Error>,
            )
        })?;
        let input_name = image_input.name.clone();
        let input_shape = tensor_shape(&image_input.input_type);

        let text_input = inputs.next();
        let text_input_name = text_input.map(|input| input.name.clone());
        let text_dim = text_input
            .and_then(|input| tensor_shape(&input.input_type))
            .and_then(|shape| shape.last().copied())
            .and_then(|dim| usize::try_from(dim).ok())
            .filter(|dim| *dim > 0);

        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| {
                DetectError::model_load_error(
                    path,
                    "graph declares no outputs",
                    None,
                    None::<std::io::Error>,
                )
            })?;

        let metadata = Self::read_metadata(&session);
        let model_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown_model")
            .to_string();

        info!(
            "Loaded model '{}' (input '{}' {:?}, {} classes in metadata{})",
            model_name,
            input_name,
            input_shape,
            metadata.names.as_ref().map_or(0, |n| n.len()),
            if text_input_name.is_some() {
                ", text-feature input present"
            } else {
                ""
            }
        );

        Ok(OrtInfer {
            session: Mutex::new(session),
            input_name,
            input_shape,
            text_input_name,
            text_dim,
            output_name,
            metadata,
            model_path: path.to_path_buf(),
            model_name,
        })
    }

    /// Creates an ONNX Runtime session for any graph, applying the session configuration.
    pub(crate) fn open_session(
        path: &Path,
        ort_config: Option<&OrtSessionConfig>,
    ) -> DetectResult<Session> {
        if !path.is_file() {
            return Err(DetectError::model_load_error(
                path,
                "model file not found",
                Some("export the checkpoint to ONNX and pass the .onnx path"),
                None::<std::io::Error>,
            ));
        }

        let builder = Session::builder()?.with_log_level(LogLevel::Error)?;
        let builder = match ort_config {
            Some(cfg) => Self::apply_ort_config(builder, cfg)?,
            None => builder,
        };
        builder.commit_from_file(path).map_err(|e| {
            DetectError::model_load_error(
                path,
                "failed to create ONNX session",
                Some("verify model path and compatibility with selected execution providers"),
                Some(e),
            )
        })
    }

    fn read_metadata(session: &Session) -> ModelMetadata {
        let custom = match session.metadata() {
            Ok(meta) => meta,
            Err(e) => {
                warn!("Could not read model metadata: {}", e);
                return ModelMetadata::default();
            }
        };
        let lookup = |key: &str| custom.custom(key).ok().flatten();

        let names = lookup("names").and_then(|raw| {
            let parsed = parse_names(&raw);
            if parsed.is_none() {
                warn!("Ignoring unparsable 'names' metadata: {}", raw);
            }
            parsed
        });
        let imgsz = lookup("imgsz").and_then(|raw| parse_imgsz(&raw));
        let task = lookup("task");
        debug!("Model metadata: imgsz={:?}, task={:?}", imgsz, task);

        ModelMetadata { names, imgsz, task }
    }

    fn apply_ort_config(
        mut builder: SessionBuilder,
        cfg: &OrtSessionConfig,
    ) -> Result<SessionBuilder, ort::Error> {
        if let Some(intra) = cfg.intra_threads {
            builder = builder.with_intra_threads(intra)?;
        }
        if let Some(inter) = cfg.inter_threads {
            builder = builder.with_inter_threads(inter)?;
        }
        if let Some(level) = cfg.optimization_level {
            let mapped = match level {
                OrtGraphOptimizationLevel::DisableAll => GraphOptimizationLevel::Disable,
                OrtGraphOptimizationLevel::Level1 => GraphOptimizationLevel::Level1,
                OrtGraphOptimizationLevel::Level2 => GraphOptimizationLevel::Level2,
                OrtGraphOptimizationLevel::Level3 => GraphOptimizationLevel::Level3,
            };
            builder = builder.with_optimization_level(mapped)?;
        }
        if let Some(eps) = &cfg.execution_providers {
            let providers = Self::build_execution_providers(eps)?;
            if !providers.is_empty() {
                builder = builder.with_execution_providers(providers)?;
            }
        }
        Ok(builder)
    }

    fn build_execution_providers(
        eps: &[OrtExecutionProvider],
    ) -> Result<Vec<ExecutionProviderDispatch>, ort::Error> {
        use OrtExecutionProvider as EP;
        let mut providers = Vec::new();

        for ep in eps {
            match ep {
                EP::CPU => {
                    providers
                        .push(ort::execution_providers::CPUExecutionProvider::default().build());
                }
                #[cfg(feature = "cuda")]
                EP::CUDA { device_id } => {
                    let mut cuda_provider =
                        ort::execution_providers::CUDAExecutionProvider::default();
                    if let Some(id) = device_id {
                        cuda_provider = cuda_provider.with_device_id(*id);
                    }
                    providers.push(cuda_provider.build());
                }
                #[cfg(feature = "tensorrt")]
                EP::TensorRT {
                    device_id,
                    fp16_enable,
                } => {
                    let mut trt_provider =
                        ort::execution_providers::TensorRTExecutionProvider::default();
                    if let Some(id) = device_id {
                        trt_provider = trt_provider.with_device_id(*id);
                    }
                    if let Some(fp16) = fp16_enable {
                        trt_provider = trt_provider.with_fp16(*fp16);
                    }
                    providers.push(trt_provider.build());
                }
                #[cfg(feature = "directml")]
                EP::DirectML { device_id } => {
                    let mut dml_provider =
                        ort::execution_providers::DirectMLExecutionProvider::default();
                    if let Some(id) = device_id {
                        dml_provider = dml_provider.with_device_id(*id);
                    }
                    providers.push(dml_provider.build());
                }
                #[cfg(feature = "coreml")]
                EP::CoreML { subgraphs } => {
                    let mut coreml_provider =
                        ort::execution_providers::CoreMLExecutionProvider::default();
                    if let Some(sub) = subgraphs {
                        coreml_provider = coreml_provider.with_subgraphs(*sub);
                    }
                    providers.push(coreml_provider.build());
                }
                #[cfg(feature = "openvino")]
                EP::OpenVINO { device_type } => {
                    let mut openvino_provider =
                        ort::execution_providers::OpenVINOExecutionProvider::default();
                    if let Some(device) = device_type {
                        openvino_provider = openvino_provider.with_device_type(device.clone());
                    }
                    providers.push(openvino_provider.build());
                }
                #[cfg(not(feature = "cuda"))]
                EP::CUDA { .. } => {
                    return Err(ort::Error::new(
                        "CUDA execution provider requested but cuda feature is not enabled",
                    ));
                }
                #[cfg(not(feature = "tensorrt"))]
                EP::TensorRT { .. } => {
                    return Err(ort::Error::new(
                        "TensorRT execution provider requested but tensorrt feature is not enabled",
                    ));
                }
                #[cfg(not(feature = "directml"))]
                EP::DirectML { .. } => {
                    return Err(ort::Error::new(
                        "DirectML execution provider requested but directml feature is not enabled",
                    ));
                }
                #[cfg(not(feature = "coreml"))]
                EP::CoreML { .. } => {
                    return Err(ort::Error::new(
                        "CoreML execution provider requested but coreml feature is not enabled",
                    ));
                }
                #[cfg(not(feature = "openvino"))]
                EP::OpenVINO { .. } => {
                    return Err(ort::Error::new(
                        "OpenVINO execution provider requested but openvino feature is not enabled",
                    ));
                }
            }
        }

        Ok(providers)
    }
}

/// Declared dimensions of a tensor input or output; dynamic axes are negative.
pub(crate) fn tensor_shape(value_type: &ValueType) -> Option<Vec<i64>> {
    match value_type {
        ValueType::Tensor { shape, .. } => Some(shape.iter().copied().collect()),
        _ => None,
    }
}
