use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::{Category, Impact};

pub const DEFAULT_RECENT_LIMIT: usize = 5;
pub const DEFAULT_CUSTOM_IMPACT: Impact = Impact::new(1.0, 0.2, 0.5, 0.3);
pub const DEFAULT_VOICE_DELAY_MS: u64 = 2_000;
pub const DEFAULT_VOICE_TRANSCRIPT: &str = "Used a reusable water bottle today";

/// Tunables for the action dashboard. Every field is optional in JSON.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Size of the recently used list.
    pub recent_limit: usize,
    /// Category preselected in the custom action form.
    pub default_custom_category: String,
    /// Impact preset of the custom action form, also used for voice-logged actions.
    pub default_impact: Impact,
    pub voice: VoiceConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub delay_ms: u64,
    pub transcript: String,
    pub confidence: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            recent_limit: DEFAULT_RECENT_LIMIT,
            default_custom_category: Category::TRANSPORT.to_string(),
            default_impact: DEFAULT_CUSTOM_IMPACT,
            voice: VoiceConfig::default(),
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_VOICE_DELAY_MS,
            transcript: DEFAULT_VOICE_TRANSCRIPT.to_string(),
            confidence: 0.9,
        }
    }
}

impl TrackerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: TrackerConfig = serde_json::from_str(json)?;
        if config.recent_limit == 0 {
            return Err(ConfigError::ZeroRecentLimit);
        }
        Ok(config)
    }

    pub fn default_category(&self) -> Category {
        Category::new(self.default_custom_category.clone())
    }
}

impl VoiceConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
