//! # Configuration
//!
//! Tunables for the simulation, loaded from an optional JSON file. Every field
//! has a default, so a partial file (or none at all) is always valid.
//!
//! ```json
//! { "render_distance": 2, "seed": 1234 }
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Chunk radius (Chebyshev) that gets loaded around the chunk loader.
pub const RENDER_DISTANCE: i32 = 3;
/// Vertical acceleration applied to airborne rigidbodies.
pub const GRAVITY: f32 = -9.8;
/// Fixed simulation step, independent of wall-clock frame time.
pub const FIXED_DT: f32 = 1.0 / 60.0;
/// Colliders farther than this from a rigidbody are ignored.
pub const BROAD_PHASE_RADIUS: f32 = 25.0;

/// Simulation settings shared by every subsystem through the `EngineContext`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Chunks within this many chunks of the loader are generated.
    pub render_distance: i32,
    /// Seed for the terrain noise and tree placement.
    pub seed: u32,
    pub gravity: f32,
    pub fixed_dt: f32,
    pub broad_phase_radius: f32,
    /// Whether loaded chunks register a voxel mesh collider for their surface.
    pub chunk_colliders: bool,
    /// Ticks run by the headless driver.
    pub tick_count: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            render_distance: RENDER_DISTANCE,
            seed: 0,
            gravity: GRAVITY,
            fixed_dt: FIXED_DT,
            broad_phase_radius: BROAD_PHASE_RADIUS,
            chunk_colliders: true,
            tick_count: 600,
        }
    }
}

impl EngineConfig {
    /// Chunks farther than this from the loader get unloaded. The one-chunk gap
    /// between load and unload keeps a loader on a boundary from thrashing.
    pub fn unload_distance(&self) -> i32 {
        self.render_distance + 1
    }

    /// Parses a configuration from JSON text.
    pub fn from_json(text: &str) -> EngineResult<Self> {
        let config: EngineConfig =
            serde_json::from_str(text).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    fn validate(&self) -> EngineResult<()> {
        if self.render_distance < 0 {
            return Err(EngineError::Config(format!(
                "render_distance must not be negative, got {}",
                self.render_distance
            )));
        }
        if self.fixed_dt.is_nan() || self.fixed_dt <= 0.0 {
            return Err(EngineError::Config(format!(
                "fixed_dt must be positive, got {}",
                self.fixed_dt
            )));
        }
        Ok(())
    }
}
