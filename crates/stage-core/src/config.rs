use crate::constants::{DEFAULT_THEME, FALLBACK_COLOR, HOVER_SCALE, THEME_TRANSITION_SECS};
use crate::layout::StageLayout;
use crate::theme::ThemeRegistry;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid stage config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Everything a stage is built from. Missing JSON fields fall back to the
/// reference stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub theme: String,
    pub layout: StageLayout,
    pub themes: ThemeRegistry,
    pub transition_secs: f32,
    pub hover_scale: f32,
    pub fallback_color: String,
    pub seed: Option<u64>,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            layout: StageLayout::default(),
            themes: ThemeRegistry::builtin(),
            transition_secs: THEME_TRANSITION_SECS,
            hover_scale: HOVER_SCALE,
            fallback_color: FALLBACK_COLOR.to_string(),
            seed: None,
        }
    }
}

impl StageConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
