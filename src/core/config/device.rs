//! Device string parsing.

use super::onnx::{OrtExecutionProvider, OrtSessionConfig};
use crate::core::errors::{DetectError, DetectResult};

/// Parses a device string such as `cpu`, `cuda` or `cuda:1` into execution providers.
///
/// GPU providers are always followed by a CPU fallback. Requesting CUDA from a
/// build without the `cuda` feature is a configuration error.
pub fn parse_device(device: &str) -> DetectResult<Vec<OrtExecutionProvider>> {
    let device = device.trim().to_lowercase();

    if device == "cpu" {
        return Ok(vec![OrtExecutionProvider::CPU]);
    }

    let device_id = if device == "cuda" {
        0
    } else if let Some(id) = device.strip_prefix("cuda:") {
        id.parse::<i32>().map_err(|_| {
            DetectError::config_error_with_context("device", &device, "invalid CUDA device id")
        })?
    } else {
        return Err(DetectError::config_error(format!(
            "Unsupported device: {}. Supported devices: cpu, cuda, cuda:N",
            device
        )));
    };

    if cfg!(feature = "cuda") {
        Ok(vec![
            OrtExecutionProvider::CUDA {
                device_id: Some(device_id),
            },
            OrtExecutionProvider::CPU,
        ])
    } else {
        Err(DetectError::config_error_with_context(
            "device",
            &device,
            "CUDA requested but this build lacks the `cuda` feature",
        ))
    }
}

/// Builds an [`OrtSessionConfig`] for a device string, or `None` for plain CPU.
pub fn parse_device_config(device: &str) -> DetectResult<Option<OrtSessionConfig>> {
    let providers = parse_device(device)?;
    if providers == [OrtExecutionProvider::CPU] {
        return Ok(None);
    }
    Ok(Some(
        OrtSessionConfig::new().with_execution_providers(providers),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cpu() {
        assert_eq!(parse_device("CPU").unwrap(), vec![OrtExecutionProvider::CPU]);
        assert!(parse_device_config("cpu").unwrap().is_none());
    }

    #[test]
    fn test_parse_cuda_index() {
        let parsed = parse_device("cuda:1");
        if cfg!(feature = "cuda") {
            let providers = parsed.unwrap();
            assert_eq!(
                providers[0],
                OrtExecutionProvider::CUDA { device_id: Some(1) }
            );
        } else {
            assert!(matches!(parsed, Err(DetectError::ConfigError { .. })));
            assert!(parse_device_config("cuda").is_err());
        }
    }

    #[test]
    fn test_parse_rejects_unknown_devices() {
        assert!(parse_device("tpu").is_err());
        assert!(parse_device("cuda:x").is_err());
    }
}
