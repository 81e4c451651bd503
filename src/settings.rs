//! Game settings and preferences
//!
//! Persisted as one JSON blob in the key/value store.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live blood particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 60,
            QualityPreset::Medium => 300,
            QualityPreset::High => 1000,
        }
    }

    /// Whether full-frame distortions (tilt, breathe, warp) are drawn
    pub fn distortions_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Upper bound of the glitch intensity slider
pub const MAX_GLITCH_INTENSITY: f32 = 2.0;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Horror ===
    /// Heartbeat cues as sanity drains
    pub sanity_fx: bool,
    /// Subliminal flashes below 60 sanity
    pub random_scares: bool,
    /// Hallucination / whisper / glitch intensity (0.0 - 2.0)
    pub glitch_intensity: f32,

    // === Audio ===
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            sanity_fx: true,
            random_scares: true,
            glitch_intensity: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Store key
    pub const STORAGE_KEY: &'static str = "snake_horror_settings";

    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Set the intensity slider, clamped to its range
    pub fn set_glitch_intensity(&mut self, value: f32) {
        self.glitch_intensity = if value.is_finite() {
            value.clamp(0.0, MAX_GLITCH_INTENSITY)
        } else {
            1.0
        };
    }

    /// Intensity as used by the horror scheduler
    pub fn effective_intensity(&self) -> f32 {
        self.glitch_intensity.clamp(0.0, MAX_GLITCH_INTENSITY)
    }

    /// Load from the store, falling back to defaults on missing or bad data
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Some(json) => match serde_json::from_str::<Settings>(&json) {
                Ok(mut settings) => {
                    settings.set_glitch_intensity(settings.glitch_intensity);
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Malformed settings ({e}), using defaults");
                    Self::default()
                }
            },
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save to the store (best effort)
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => {
                if let Err(e) = store.set(Self::STORAGE_KEY, &json) {
                    log::warn!("Failed to save settings: {e}");
                } else {
                    log::info!("Settings saved");
                }
            }
            Err(e) => log::warn!("Failed to encode settings: {e}"),
        }
    }
}
