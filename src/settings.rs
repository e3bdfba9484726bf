//! Game settings and preferences
//!
//! Loaded from a JSON file on native builds. Every field has a default,
//! so a settings file only needs the values it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::highscores::sanitize_name;
use crate::persistence::LEADERBOARD_KEY;
use crate::sim::Viewport;
use crate::tuning::Tuning;

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name recorded on the leaderboard
    pub player_name: String,
    /// Fixed RNG seed; random per run when absent
    pub seed: Option<u64>,
    /// Logical screen the geometry is laid out in
    pub viewport: Viewport,
    /// Where the native leaderboard lives
    pub leaderboard_path: PathBuf,
    /// Demo mode: the autopilot drives
    pub autopilot: bool,
    /// Game balance
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: String::new(),
            seed: None,
            viewport: Viewport::default(),
            leaderboard_path: PathBuf::from(format!("{LEADERBOARD_KEY}.json")),
            autopilot: false,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.tuning.validate()?;
        Ok(settings)
    }

    /// Load settings from a file
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any problem
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings ({}: {e})", path.display());
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Name as it will appear on the leaderboard
    pub fn display_name(&self) -> String {
        sanitize_name(&self.player_name)
    }
}
