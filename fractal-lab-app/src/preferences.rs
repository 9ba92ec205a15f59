use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use fractal_lab_core::constants::SLOW_RENDER_MS;

// ---------------------------------------------------------------------------
// Application preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppPreferences {
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
    /// Set once the introduction has been completed or skipped.
    #[serde(default)]
    pub has_seen_intro: bool,
    /// Prefix for copied share links. When empty, only the `?query` part is copied.
    #[serde(default)]
    pub share_base_url: String,
    /// Renders slower than this are logged as warnings.
    #[serde(default = "default_slow_render_ms")]
    pub slow_render_ms: u64,
    /// HUD panel background opacity 0.0..=1.0.
    #[serde(default = "default_hud_panel_opacity")]
    pub hud_panel_opacity: f32,
}

fn default_window_width() -> f32 {
    1280.0
}
fn default_window_height() -> f32 {
    720.0
}
fn default_slow_render_ms() -> u64 {
    SLOW_RENDER_MS
}
fn default_hud_panel_opacity() -> f32 {
    0.65
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            has_seen_intro: false,
            share_base_url: String::new(),
            slow_render_ms: default_slow_render_ms(),
            hud_panel_opacity: default_hud_panel_opacity(),
        }
    }
}

impl AppPreferences {
    /// Load preferences from next to the executable, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(json) => match Self::from_json(&json) {
                    Ok(prefs) => {
                        info!("Loaded preferences from {}", path.display());
                        return prefs;
                    }
                    Err(e) => {
                        error!("Failed to parse preferences: {e}");
                    }
                },
                Err(e) => {
                    error!("Failed to read preferences file: {e}");
                }
            }
        } else {
            debug!("No preferences file at {}", path.display());
        }
        Self::default()
    }

    /// Persist preferences to disk.
    pub fn save(&self) {
        let path = config_path();
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(&path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences");
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }

    fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut prefs: Self = serde_json::from_str(json)?;
        prefs.hud_panel_opacity = prefs.hud_panel_opacity.clamp(0.0, 1.0);
        Ok(prefs)
    }

    /// HUD background alpha as a byte.
    pub fn hud_alpha(&self) -> u8 {
        (self.hud_panel_opacity.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

fn config_path() -> PathBuf {
    crate::app_dir::exe_directory().join("preferences.json")
}
