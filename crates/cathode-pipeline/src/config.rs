//! Pipeline configuration and its validation errors.

use std::error::Error;
use std::fmt;

/// Upper bound on explicit and detected worker counts.
pub const MAX_WORKERS: usize = 64;

/// Default particles per quad.
pub const DEFAULT_QUAD_WIDTH: usize = 4;

// ── PipelineConfig ─────────────────────────────────────────────────

/// Configuration for [`Pipelines`](crate::Pipelines).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Number of pipeline worker threads. `None` = auto-detect
    /// (`available_parallelism`, clamped to `[1, 64]`).
    pub worker_count: Option<usize>,
    /// Particles per quad; workers receive whole quads only. Default: 4.
    pub quad_width: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            worker_count: None,
            quad_width: DEFAULT_QUAD_WIDTH,
        }
    }
}

impl PipelineConfig {
    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::QuadWidthZero`] if `quad_width` is zero.
    /// - [`ConfigError::WorkerCountZero`] if `worker_count` is `Some(0)`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quad_width == 0 {
            return Err(ConfigError::QuadWidthZero);
        }
        if self.worker_count == Some(0) {
            return Err(ConfigError::WorkerCountZero);
        }
        Ok(())
    }

    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// Explicit values are clamped to `[1, 64]`.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(n) => n.clamp(1, MAX_WORKERS),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .clamp(1, MAX_WORKERS),
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected by [`PipelineConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `quad_width` is zero.
    QuadWidthZero,
    /// An explicit worker count of zero.
    WorkerCountZero,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuadWidthZero => write!(f, "quad_width must be at least 1"),
            Self::WorkerCountZero => write!(f, "worker_count must be at least 1"),
        }
    }
}

impl Error for ConfigError {}
