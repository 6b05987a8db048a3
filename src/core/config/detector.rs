//! Detector configuration.

use crate::core::errors::{DetectError, DetectResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Stride of the coarsest YOLO feature map; input sizes must be multiples of it.
pub const MODEL_STRIDE: u32 = 32;

/// Input size used when neither the config nor the model specifies one.
pub const DEFAULT_IMGSZ: u32 = 640;

/// Prediction settings for a [`WorldDetector`](crate::predictors::WorldDetector).
///
/// Every field has a default, so a JSON file only needs the keys it overrides:
///
/// ```rust
/// use yolo_world::core::config::WorldDetectorConfig;
///
/// let config: WorldDetectorConfig =
///     serde_json::from_str(r#"{ "conf_threshold": 0.4, "classes": ["soup", "pasta"] }"#).unwrap();
/// assert_eq!(config.conf_threshold, 0.4);
/// assert_eq!(config.max_det, 300);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldDetectorConfig {
    /// Minimum class confidence for a detection (default: 0.25)
    pub conf_threshold: f32,
    /// IoU above which NMS suppresses the lower scoring box (default: 0.7)
    pub iou_threshold: f32,
    /// Maximum detections kept per image (default: 300)
    pub max_det: usize,
    /// Square input size; derived from the model when unset
    pub imgsz: Option<u32>,
    /// Suppress overlapping boxes across classes, not only within a class
    pub agnostic_nms: bool,
    /// Restrict the vocabulary to these classes, in this order
    pub classes: Option<Vec<String>>,
}

impl Default for WorldDetectorConfig {
    fn default() -> Self {
        Self {
            conf_threshold: 0.25,
            iou_threshold: 0.7,
            max_det: 300,
            imgsz: None,
            agnostic_nms: false,
            classes: None,
        }
    }
}

impl WorldDetectorConfig {
    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> DetectResult<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that all values are usable.
    pub fn validate(&self) -> DetectResult<()> {
        if !(0.0..=1.0).contains(&self.conf_threshold) {
            return Err(DetectError::config_error_with_context(
                "conf_threshold",
                &self.conf_threshold.to_string(),
                "must be within [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(DetectError::config_error_with_context(
                "iou_threshold",
                &self.iou_threshold.to_string(),
                "must be within [0, 1]",
            ));
        }
        if self.max_det == 0 {
            return Err(DetectError::config_error_with_context(
                "max_det",
                "0",
                "must be greater than zero",
            ));
        }
        if let Some(imgsz) = self.imgsz
            && (imgsz == 0 || imgsz % MODEL_STRIDE != 0)
        {
            return Err(DetectError::config_error_with_context(
                "imgsz",
                &imgsz.to_string(),
                "must be a positive multiple of 32",
            ));
        }
        if let Some(classes) = &self.classes
            && classes.is_empty()
        {
            return Err(DetectError::config_error_with_context(
                "classes",
                "[]",
                "must name at least one class when set",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = WorldDetectorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.conf_threshold, 0.25);
        assert_eq!(config.iou_threshold, 0.7);
        assert!(config.classes.is_none());
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let mut config = WorldDetectorConfig {
            conf_threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.conf_threshold = 0.5;
        config.imgsz = Some(630);
        assert!(config.validate().is_err());

        config.imgsz = Some(640);
        config.max_det = 0;
        assert!(config.validate().is_err());

        config.max_det = 10;
        config.classes = Some(Vec::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "iou_threshold": 0.5, "imgsz": 320, "classes": ["bean", "rice"] }}"#
        )
        .unwrap();

        let config = WorldDetectorConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.iou_threshold, 0.5);
        assert_eq!(config.imgsz, Some(320));
        assert_eq!(
            config.classes,
            Some(vec!["bean".to_string(), "rice".to_string()])
        );
        assert_eq!(config.conf_threshold, 0.25);
    }

    #[test]
    fn test_from_json_file_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "imgsz": 100 }}"#).unwrap();
        assert!(matches!(
            WorldDetectorConfig::from_json_file(file.path()),
            Err(DetectError::ConfigError { .. })
        ));
    }
}
