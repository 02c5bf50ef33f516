//! Simulation settings
//!
//! Loaded from an optional JSON file; any field left out keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::PhysicsError;

/// Tunable physics parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Gravitational constant used for body-to-body attraction
    pub gravity_constant: f64,
    /// Collision elasticity (1.0 = perfectly elastic)
    pub elasticity: f64,
    /// Gravity is skipped when centroids are closer than this
    pub min_gravity_distance: f64,
    /// Fixed simulation step (seconds)
    pub fixed_dt: f64,
    /// Longest frame the stepper will catch up on (seconds)
    pub max_frame_dt: f64,
    /// Maximum simulation steps per frame
    pub max_substeps: u32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity_constant: GAME_GRAVITY,
            elasticity: DEFAULT_ELASTICITY,
            min_gravity_distance: GRAVITY_MIN_DISTANCE,
            fixed_dt: SIM_DT,
            max_frame_dt: MAX_FRAME_DT,
            max_substeps: MAX_SUBSTEPS,
        }
    }
}

impl PhysicsSettings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, PhysicsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PhysicsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, PhysicsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the stepper or force generators cannot work with
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !(self.fixed_dt.is_finite() && self.fixed_dt > 0.0) {
            return Err(PhysicsError::InvalidConfiguration {
                reason: "fixed_dt must be positive",
            });
        }
        if self.max_substeps == 0 {
            return Err(PhysicsError::InvalidConfiguration {
                reason: "max_substeps must be > 0",
            });
        }
        if !(self.max_frame_dt >= self.fixed_dt) {
            return Err(PhysicsError::InvalidConfiguration {
                reason: "max_frame_dt must be at least fixed_dt",
            });
        }
        if !(self.elasticity.is_finite() && self.elasticity >= 0.0) {
            return Err(PhysicsError::InvalidConfiguration {
                reason: "elasticity must be non-negative",
            });
        }
        if !(self.min_gravity_distance.is_finite() && self.min_gravity_distance >= 0.0) {
            return Err(PhysicsError::InvalidConfiguration {
                reason: "min_gravity_distance must be non-negative",
            });
        }
        if !self.gravity_constant.is_finite() {
            return Err(PhysicsError::InvalidConfiguration {
                reason: "gravity_constant must be finite",
            });
        }
        Ok(())
    }
}
