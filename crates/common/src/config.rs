//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AirpointError, AirpointResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Gesture thresholds and timing windows.
    pub gesture: GestureConfig,

    /// Target screen the cursor is mapped onto.
    pub screen: ScreenConfig,

    /// Pointer injection backend selection.
    pub injector: InjectorConfig,

    /// Spoken feedback.
    pub notifier: NotifierConfig,

    /// Status overlay.
    pub overlay: OverlayConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Tuning constants for gesture interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Smoothing divisor for the cursor filter. Higher is steadier but laggier.
    pub smoothing: f64,

    /// Normalized thumb/index distance below which the hand is pinching.
    pub click_distance: f64,

    /// Two pinches closer than this become a double click (seconds).
    pub double_click_window_secs: f64,

    /// Scroll speed multiplier.
    pub scroll_mult: f64,

    /// Normalized index/middle distance above which the hand counts as open.
    pub open_hand_threshold: f64,

    /// Minimum interval between right clicks while two fingers stay closed (seconds).
    pub right_click_cooldown_secs: f64,

    /// Vertical travel (screen pixels) ignored before a scroll fires.
    pub scroll_deadzone_px: f64,
}

/// Screen the normalized hand position is projected onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: u32,
    pub height: u32,
}

/// Which injector backend to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InjectorKind {
    /// Pick uinput when writable, then xdotool, then dry run.
    #[default]
    Auto,
    Xdotool,
    Uinput,
    /// Write commands as JSONL instead of touching the desktop.
    Record,
    /// Discard everything.
    None,
}

/// Injector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectorConfig {
    pub backend: InjectorKind,

    /// Path or name of the xdotool executable.
    pub xdotool_path: String,

    /// Name announced by the uinput virtual device.
    pub uinput_device_name: String,
}

/// Spoken feedback configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    pub enabled: bool,

    /// Speech command; the phrase is appended as the last argument.
    pub command: String,

    /// Extra arguments placed before the phrase.
    pub args: Vec<String>,

    /// Phrases waiting beyond this many are dropped.
    pub queue_capacity: usize,
}

/// Status overlay configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Initial value of the overlay toggle.
    pub visible: bool,

    /// Maximum status refreshes per second.
    pub refresh_hz: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "airpoint=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            smoothing: 7.0,
            click_distance: 0.04,
            double_click_window_secs: 0.35,
            scroll_mult: 3.0,
            open_hand_threshold: 0.12,
            right_click_cooldown_secs: 0.7,
            scroll_deadzone_px: 10.0,
        }
    }
}

impl GestureConfig {
    /// Reject values the gesture pipeline cannot work with.
    pub fn validate(&self) -> AirpointResult<()> {
        if !self.smoothing.is_finite() || self.smoothing < 1.0 {
            return Err(AirpointError::config(format!(
                "smoothing must be >= 1.0, got {}",
                self.smoothing
            )));
        }

        let positive = [
            ("click_distance", self.click_distance),
            ("double_click_window_secs", self.double_click_window_secs),
            ("scroll_mult", self.scroll_mult),
            ("open_hand_threshold", self.open_hand_threshold),
            ("right_click_cooldown_secs", self.right_click_cooldown_secs),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(AirpointError::config(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        if self.scroll_deadzone_px.is_nan() || self.scroll_deadzone_px < 0.0 {
            return Err(AirpointError::config(format!(
                "scroll_deadzone_px must be >= 0, got {}",
                self.scroll_deadzone_px
            )));
        }

        Ok(())
    }

    /// Double-click window in nanoseconds.
    pub fn double_click_window_ns(&self) -> u64 {
        crate::clock::SessionClock::secs_to_ns(self.double_click_window_secs)
    }

    /// Right-click cooldown in nanoseconds.
    pub fn right_click_cooldown_ns(&self) -> u64 {
        crate::clock::SessionClock::secs_to_ns(self.right_click_cooldown_secs)
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            backend: InjectorKind::Auto,
            xdotool_path: "xdotool".to_string(),
            uinput_device_name: "airpoint virtual pointer".to_string(),
        }
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "espeak".to_string(),
            args: vec![],
            queue_capacity: 8,
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            visible: true,
            refresh_hz: 2,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load and parse a config file, surfacing any error.
    pub fn load_from(path: impl AsRef<Path>) -> AirpointResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(&config_path, json)?;
        Ok(config_path)
    }

    /// Validate every section that has constraints.
    pub fn validate(&self) -> AirpointResult<()> {
        self.gesture.validate()?;
        if self.screen.width == 0 || self.screen.height == 0 {
            return Err(AirpointError::config(format!(
                "screen size must be non-zero, got {}x{}",
                self.screen.width, self.screen.height
            )));
        }
        if self.notifier.queue_capacity == 0 {
            return Err(AirpointError::config("notifier.queue_capacity must be >= 1"));
        }
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("airpoint").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tuned_constants() {
        let g = GestureConfig::default();
        assert_eq!(g.smoothing, 7.0);
        assert_eq!(g.click_distance, 0.04);
        assert_eq!(g.double_click_window_ns(), 350_000_000);
        assert_eq!(g.right_click_cooldown_ns(), 700_000_000);
        assert_eq!(g.scroll_mult, 3.0);
        assert_eq!(g.open_hand_threshold, 0.12);
        assert_eq!(g.scroll_deadzone_px, 10.0);
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_smoothing_below_one() {
        let g = GestureConfig {
            smoothing: 0.5,
            ..Default::default()
        };
        assert!(matches!(g.validate(), Err(AirpointError::Config { .. })));
    }

    #[test]
    fn test_rejects_nan_threshold() {
        let g = GestureConfig {
            click_distance: f64::NAN,
            ..Default::default()
        };
        assert!(g.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_screen() {
        let config = AppConfig {
            screen: ScreenConfig {
                width: 0,
                height: 1080,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let raw = r#"{"gesture":{"smoothing":4.0},"injector":{"backend":"xdotool"}}"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.gesture.smoothing, 4.0);
        assert_eq!(config.gesture.click_distance, 0.04);
        assert_eq!(config.injector.backend, InjectorKind::Xdotool);
        assert_eq!(config.injector.xdotool_path, "xdotool");
        assert_eq!(config.screen, ScreenConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join("airpoint_test_config");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, r#"{"screen":{"width":2560,"height":1440}}"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.screen.width, 2560);
        assert_eq!(config.screen.height, 1440);

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(AirpointError::Json(_))
        ));

        std::fs::remove_dir_all(&dir).ok();
    }
}
