//! Error types for the detector.
//!
//! This module provides the error taxonomy used across model loading,
//! pre-processing, inference, post-processing and visualization, together with
//! helper constructors that attach context to the underlying cause.
//!
//! # Usage
//!
//! ```rust
//! use yolo_world::core::errors::DetectError;
//!
//! let config_error = DetectError::config_error("iou_threshold must be within [0, 1]");
//! let input_error = DetectError::invalid_input("class list must not be empty");
//! assert!(config_error.to_string().contains("iou_threshold"));
//! assert!(input_error.to_string().contains("class list"));
//! ```

pub mod constructors;
pub mod types;

pub use types::{DetectError, OpaqueError, ProcessingStage};

/// Convenient result alias for detector operations.
pub type DetectResult<T> = Result<T, DetectError>;
