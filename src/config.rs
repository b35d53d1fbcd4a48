//! Configuration for routing passes

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a routing configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Numeric policy knobs shared by all routers
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Directions with both components at or below this magnitude are treated
    /// as "no movement" between coincident points
    pub null_tolerance: f64,

    /// A segment counts as axis-aligned when its off-axis component is below
    /// this value and smaller than the on-axis component
    pub axis_tolerance: f64,

    /// Orientation hints are set for connected endpoints when the minor
    /// component of the entry vector is below this value
    pub orientation_threshold: f64,

    /// Magnitude of the perpendicular detour inserted when an orthogonal
    /// segment overlaps its anchorage outline
    pub bend_offset: f64,

    /// Scene-space distance below which a recomputed reference point is
    /// considered unchanged and the stored parameter left alone
    pub reference_epsilon: f64,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            null_tolerance: 0.05,
            axis_tolerance: 0.5,
            orientation_threshold: 5.0,
            bend_offset: 15.0,
            reference_epsilon: 0.0001,
        }
    }
}

impl RouteConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the null-direction tolerance
    pub fn with_null_tolerance(mut self, tolerance: f64) -> Self {
        self.null_tolerance = tolerance;
        self
    }

    /// Set the axis-alignment tolerance
    pub fn with_axis_tolerance(mut self, tolerance: f64) -> Self {
        self.axis_tolerance = tolerance;
        self
    }

    /// Set the orientation-hint threshold
    pub fn with_orientation_threshold(mut self, threshold: f64) -> Self {
        self.orientation_threshold = threshold;
        self
    }

    /// Set the overlap-detour offset
    pub fn with_bend_offset(mut self, offset: f64) -> Self {
        self.bend_offset = offset;
        self
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
