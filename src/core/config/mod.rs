//! Configuration types for sessions and predictions.

pub mod detector;
pub mod device;
pub mod onnx;

pub use detector::{DEFAULT_IMGSZ, MODEL_STRIDE, WorldDetectorConfig};
pub use device::{parse_device, parse_device_config};
pub use onnx::*;
