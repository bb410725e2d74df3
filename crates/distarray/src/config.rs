//! Serializable layout descriptions.
//!
//! A [`LayoutConfig`] names everything needed to rebuild a distribution on
//! any process: global shape, per-dimension kinds, optional grid shape and
//! the comm size. It round-trips through JSON:
//!
//! ```json
//! {
//!   "shape": [16, 12],
//!   "dist": { "0": "block", "1": { "block_cyclic": { "block_size": 2 } } },
//!   "grid_shape": [2, 2],
//!   "comm_size": 4
//! }
//! ```

use std::fs;
use std::path::Path;

use distarray_core::{DistSpec, Distribution, FixedComm};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading or applying a layout configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid layout: {0}")]
    Layout(#[from] distarray_core::Error),
}

/// Global layout of a distributed array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutConfig {
    /// Global shape.
    pub shape: Vec<usize>,
    /// Kinds by dimension; defaults to a block distribution of dimension 0.
    #[serde(default)]
    pub dist: DistSpec,
    /// Explicit grid shape; inferred when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_shape: Option<Vec<usize>>,
    /// Number of processes.
    pub comm_size: usize,
}

impl LayoutConfig {
    pub fn new(shape: Vec<usize>, comm_size: usize) -> Self {
        Self {
            shape,
            dist: DistSpec::default(),
            grid_shape: None,
            comm_size,
        }
    }

    pub fn with_dist(mut self, dist: DistSpec) -> Self {
        self.dist = dist;
        self
    }

    pub fn with_grid_shape(mut self, grid_shape: Vec<usize>) -> Self {
        self.grid_shape = Some(grid_shape);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Build the distribution this layout describes.
    pub fn distribution(&self) -> Result<Distribution, ConfigError> {
        let comm = FixedComm::root(self.comm_size);
        Ok(Distribution::from_shape(
            &comm,
            &self.shape,
            &self.dist,
            self.grid_shape.as_deref(),
        )?)
    }
}
