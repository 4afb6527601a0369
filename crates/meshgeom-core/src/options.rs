//! Configuration options for normal synthesis.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default squared distance under which two vertices count as one position.
pub const DEFAULT_DUPLICATE_EPSILON: f32 = 1e-6;

/// Default face-normal length under which a triangle is treated as degenerate.
pub const DEFAULT_DEGENERATE_THRESHOLD: f32 = 1e-5;

/// Tuning knobs for the smooth-normal synthesizer.
///
/// Missing fields fall back to their defaults when deserializing, so a
/// partial JSON document such as `{"duplicate_epsilon": 1e-4}` is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalOptions {
    /// Squared positional distance below which two vertices are merged.
    pub duplicate_epsilon: f32,

    /// Triangles whose unnormalized face normal is shorter than this are skipped.
    pub degenerate_threshold: f32,

    /// Whether vertices sharing a position end up with one shared normal.
    pub coalesce_duplicates: bool,
}

impl Default for NormalOptions {
    fn default() -> Self {
        Self {
            duplicate_epsilon: DEFAULT_DUPLICATE_EPSILON,
            degenerate_threshold: DEFAULT_DEGENERATE_THRESHOLD,
            coalesce_duplicates: true,
        }
    }
}

impl NormalOptions {
    /// Parses options from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the options to a JSON document.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns a copy with a different duplicate epsilon.
    pub fn with_duplicate_epsilon(mut self, epsilon: f32) -> Self {
        self.duplicate_epsilon = epsilon;
        self
    }

    /// Returns a copy with duplicate coalescing switched on or off.
    pub fn with_coalesce_duplicates(mut self, coalesce: bool) -> Self {
        self.coalesce_duplicates = coalesce;
        self
    }
}
