// ---------------------------------------------------------------------------
// SaveConfig: settings that drive the save/load orchestrator
// ---------------------------------------------------------------------------

use std::path::Path;

use serde::{Deserialize, Serialize};
use simulation::{Version, ENGINE_VERSION};
use tracing::debug;

use crate::save_error::SaveError;

/// Environment variable that switches loads into unattended mode.
pub const UNATTENDED_ENV: &str = "SAVEGAME_UNATTENDED";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    /// Version stamped into new saves and compared against loaded ones.
    pub engine_version: Version,
    /// No operator available to answer prompts (headless host).
    pub unattended: bool,
    /// When false, saves carry only the snapshot and an empty delegate list.
    pub save_delegate_state: bool,
    /// Wrap the container in an LZ4 frame.
    pub compress: bool,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            engine_version: ENGINE_VERSION,
            unattended: false,
            save_delegate_state: true,
            compress: true,
        }
    }
}

impl SaveConfig {
    pub fn from_json_str(json: &str) -> Result<Self, SaveError> {
        serde_json::from_str(json).map_err(|e| SaveError::Config(e.to_string()))
    }

    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, SaveError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        debug!("Loaded save config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Apply `SAVEGAME_UNATTENDED` on top of this config.
    pub fn with_env_overrides(self) -> Self {
        let value = std::env::var(UNATTENDED_ENV).ok();
        self.with_unattended_override(value.as_deref())
    }

    fn with_unattended_override(mut self, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.unattended = matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            );
        }
        self
    }
}
