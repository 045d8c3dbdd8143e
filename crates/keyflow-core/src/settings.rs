//! Global settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::sync::OnceLock;
use std::time::Duration;

use serde::Deserialize;

use crate::geometry::PopupGeometry;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub pending_space: PendingSpaceSettings,
    pub gesture: GestureSettings,
    pub popup: PopupSettings,
    pub labels: LabelSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PendingSpaceSettings {
    pub timeout_ms: u64,
    pub context_window: usize,
}

impl PendingSpaceSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GestureSettings {
    pub long_press_ms: u64,
}

impl GestureSettings {
    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PopupSettings {
    pub option_width: f32,
    pub edge_margin: f32,
}

impl PopupSettings {
    /// Geometry with an unknown screen width; the host supplies it later.
    pub fn geometry(&self) -> PopupGeometry {
        PopupGeometry {
            option_width: self.option_width,
            edge_margin: self.edge_margin,
            screen_width: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelSettings {
    #[serde(default)]
    pub join_prefix: String,
    pub space: String,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_positive {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }
    macro_rules! check_finite {
        ($section:ident . $field:ident, $min:expr) => {
            if !s.$section.$field.is_finite() || s.$section.$field < $min {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: format!("must be a finite number >= {}", $min),
                });
            }
        };
    }

    check_positive!(pending_space.timeout_ms);
    check_positive!(pending_space.context_window);
    check_positive!(gesture.long_press_ms);

    check_finite!(popup.option_width, 1.0);
    check_finite!(popup.edge_margin, 0.0);

    if s.labels.space.is_empty() {
        return Err(SettingsError::InvalidValue {
            field: "labels.space".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    Ok(())
}
