//! Throw settings and persistence
//!
//! Settings are stored as JSON next to the executable's working directory.

use std::fs;
use std::path::Path;

use bevy::log::{info, warn};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SETTINGS_FILE: &str = "throwable_settings.json";

/// Tunables for pointer throwing.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThrowSettings {
    /// Maximum throw force magnitude. `None` leaves throws unbounded.
    #[serde(default)]
    pub max_force: Option<f32>,

    /// Logical pixels the pointer must travel before a press becomes a drag.
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold: f32,

    /// Furthest distance a pointer ray may hit something.
    #[serde(default = "default_max_ray_distance")]
    pub max_ray_distance: f32,
}

fn default_drag_threshold() -> f32 {
    10.0
}

fn default_max_ray_distance() -> f32 {
    100.0
}

impl Default for ThrowSettings {
    fn default() -> Self {
        Self {
            max_force: None,
            drag_threshold: default_drag_threshold(),
            max_ray_distance: default_max_ray_distance(),
        }
    }
}

impl ThrowSettings {
    /// Force limit handed to each `Throwable`.
    pub fn force_limit(&self) -> f32 {
        self.max_force.unwrap_or(f32::INFINITY)
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid throw settings: {}", e))
    }

    /// Load settings from a JSON file, falling back to defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }

        let loaded = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))
            .and_then(|json| Self::from_json(&json));

        match loaded {
            Ok(settings) => {
                info!("Loaded throw settings from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("{}; using default throw settings", e);
                Self::default()
            }
        }
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize throw settings: {}", e))?;
        fs::write(path, json).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
    }
}
