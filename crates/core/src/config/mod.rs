use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{render::VISIBILITY_CUTOFF, DepthConfig, RepThresholds, Result, SquatError};

/// Top-level configuration structure for the application.
///
/// Every section falls back to its defaults, so a file only needs the keys
/// it wants to change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub counting: RepThresholds,
    pub depth: DepthConfig,
    pub capture: CaptureConfig,
    pub render: RenderConfig,
}

impl AppConfig {
    pub fn live_defaults() -> Self {
        Self::default()
    }

    /// Loads and validates a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.counting.validate()?;
        self.depth.validate()?;
        self.capture.validate()?;
        self.render.validate()
    }
}

/// Frame geometry requested from the camera.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

impl CaptureConfig {
    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SquatError::config(format!(
                "frame size {}x{} must be non-zero",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub visibility_cutoff: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            visibility_cutoff: VISIBILITY_CUTOFF,
        }
    }
}

impl RenderConfig {
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.visibility_cutoff) {
            return Err(SquatError::config(format!(
                "visibility cutoff {} must lie within [0, 1]",
                self.visibility_cutoff
            )));
        }
        Ok(())
    }
}
