//! Shared state for predictor builders.
//!
//! A builder holds a task configuration and an optional `OrtSessionConfig`
//! and offers builder-style setters for both.

use crate::core::config::OrtSessionConfig;

/// Common state for predictor builders.
#[derive(Debug, Clone)]
pub struct PredictorBuilderState<C> {
    config: C,
    ort_config: Option<OrtSessionConfig>,
}

impl<C> PredictorBuilderState<C> {
    /// Creates a new builder state using the provided configuration.
    pub fn new(config: C) -> Self {
        Self {
            config,
            ort_config: None,
        }
    }

    /// Returns a mutable reference to the configuration for in-place updates.
    pub fn config_mut(&mut self) -> &mut C {
        &mut self.config
    }

    /// Overrides the stored configuration.
    pub fn set_config(&mut self, config: C) {
        self.config = config;
    }

    /// Overrides the stored OrtSessionConfig.
    pub fn set_ort_config(&mut self, config: OrtSessionConfig) {
        self.ort_config = Some(config);
    }

    /// Consumes the builder state and returns its parts.
    pub fn into_parts(self) -> (C, Option<OrtSessionConfig>) {
        (self.config, self.ort_config)
    }
}

/// Trait implemented by predictor builders that use `PredictorBuilderState`.
pub trait TaskPredictorBuilder: Sized {
    /// Configuration type associated with the builder.
    type Config: Clone;

    /// Mutable accessor for the underlying builder state.
    fn state_mut(&mut self) -> &mut PredictorBuilderState<Self::Config>;

    /// Replaces the stored configuration.
    fn with_config(mut self, config: Self::Config) -> Self {
        self.state_mut().set_config(config);
        self
    }

    /// Stores the provided `OrtSessionConfig`.
    fn with_ort_config(mut self, config: OrtSessionConfig) -> Self {
        self.state_mut().set_ort_config(config);
        self
    }

    /// Stores the provided `OrtSessionConfig` if present.
    fn with_optional_ort_config(self, config: Option<OrtSessionConfig>) -> Self {
        if let Some(cfg) = config {
            self.with_ort_config(cfg)
        } else {
            self
        }
    }
}
