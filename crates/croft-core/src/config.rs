//! Configuration types for the simulation.

use crate::error::Result;
use crate::types::Color;
use serde::{Deserialize, Serialize};

/// Default field depth when the caller supplies a non-positive value.
pub const DEFAULT_FIELD_DEPTH: i32 = 50;
/// Default field width when the caller supplies a non-positive value.
pub const DEFAULT_FIELD_WIDTH: i32 = 50;

/// Field dimensions used as fallbacks for invalid caller-supplied values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Number of rows in the field grid
    pub depth: i32,
    /// Number of columns in the field grid
    pub width: i32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_FIELD_DEPTH,
            width: DEFAULT_FIELD_WIDTH,
        }
    }
}

/// Per-kind creation probabilities used when seeding the field.
///
/// The three probabilities form cumulative bands checked in a fixed order
/// (farmer, weed, bean). Their sum must not exceed 1.0, otherwise later
/// bands become unreachable for large draws. This is a configuration
/// invariant, not a runtime check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreationConfig {
    pub farmer_prob: f64,
    pub weed_prob: f64,
    pub bean_prob: f64,
}

impl Default for CreationConfig {
    fn default() -> Self {
        Self {
            farmer_prob: 0.01,
            weed_prob: 0.1,
            bean_prob: 0.2,
        }
    }
}

/// Plant lifecycle parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantConfig {
    /// Age at which a weed dies
    pub weed_max_age: u32,
    /// Age from which a weed may start spreading
    pub weed_spreading_age: u32,
    /// Per-step probability that an old-enough weed spreads
    pub weed_spreading_prob: f64,
    /// Age at which a bean plant dies
    pub bean_max_age: u32,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            weed_max_age: 150,
            weed_spreading_age: 20,
            weed_spreading_prob: 0.3,
            bean_max_age: 150,
        }
    }
}

/// Per-kind display colors, registered with the view before a run starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub farmer_color: Color,
    pub weed_color: Color,
    pub bean_color: Color,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            farmer_color: Color::BLACK,
            weed_color: Color::BLUE,
            bean_color: Color::GREEN,
        }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Inter-step pacing delay in milliseconds; 0 disables pacing
    pub step_delay_ms: u64,
    /// Fallback field dimensions
    pub field: FieldConfig,
    /// Seeding probabilities
    pub creation: CreationConfig,
    /// Plant lifecycle parameters
    pub plants: PlantConfig,
    /// Display colors
    pub display: DisplayConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 44,
            step_delay_ms: 50,
            field: FieldConfig::default(),
            creation: CreationConfig::default(),
            plants: PlantConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl SimConfig {
    /// Parse a configuration from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Configuration for headless runs: no pacing delay.
    pub fn headless() -> Self {
        Self {
            step_delay_ms: 0,
            ..Self::default()
        }
    }
}
