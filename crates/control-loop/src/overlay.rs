//! Status overlay.

use serde::Serialize;
use tracing::info;

use airpoint_common::clock::{RateController, TimestampNs};
use airpoint_common::config::OverlayConfig;

/// Status shown to the user while the overlay is visible.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayStatus {
    pub timestamp_ns: TimestampNs,
    pub mouse_enabled: bool,
    /// Last discrete action, e.g. "Drag Start", or "Idle".
    pub action: String,
    /// Gesture summary, e.g. "Pinch:true TwoPinch:false", or "No hand".
    pub gesture: String,
    pub fps: f64,
}

impl OverlayStatus {
    /// One-line rendering.
    pub fn line(&self) -> String {
        format!(
            "Mouse: {} | Action: {} | Gesture: {} | FPS: {:.1}",
            if self.mouse_enabled { "ON" } else { "OFF" },
            self.action,
            self.gesture,
            self.fps
        )
    }
}

/// Receives a status every frame the overlay is visible.
pub trait OverlaySink: Send {
    fn render(&mut self, status: &OverlayStatus);
}

/// Ignores every status.
#[derive(Debug, Default)]
pub struct NullOverlay;

impl OverlaySink for NullOverlay {
    fn render(&mut self, _status: &OverlayStatus) {}
}

/// Logs the status line at `info`, at most `refresh_hz` times a second.
#[derive(Debug)]
pub struct TracingOverlay {
    rate: RateController,
    last_action: Option<String>,
}

impl TracingOverlay {
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            rate: RateController::new(config.refresh_hz),
            last_action: None,
        }
    }
}

impl OverlaySink for TracingOverlay {
    fn render(&mut self, status: &OverlayStatus) {
        // A changed action is always shown so short clicks are not lost
        // between refreshes.
        let action_changed = self.last_action.as_deref() != Some(status.action.as_str());
        if self.rate.should_tick(status.timestamp_ns) || action_changed {
            info!(
                mouse_enabled = status.mouse_enabled,
                action = %status.action,
                gesture = %status.gesture,
                fps = format_args!("{:.1}", status.fps),
                "{}",
                status.line()
            );
            self.last_action = Some(status.action.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(action: &str) -> OverlayStatus {
        OverlayStatus {
            timestamp_ns: 0,
            mouse_enabled: true,
            action: action.to_string(),
            gesture: "No hand".to_string(),
            fps: 29.97,
        }
    }

    #[test]
    fn test_status_line() {
        assert_eq!(
            status("Idle").line(),
            "Mouse: ON | Action: Idle | Gesture: No hand | FPS: 30.0"
        );
    }

    #[test]
    fn test_tracing_overlay_tracks_last_action() {
        let mut overlay = TracingOverlay::new(&OverlayConfig::default());
        overlay.render(&status("Idle"));
        overlay.render(&status("Click"));
        assert_eq!(overlay.last_action.as_deref(), Some("Click"));
    }
}
