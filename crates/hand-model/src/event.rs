//! Pointer events and injector commands.
//!
//! The state machine emits [`PointerEvent`]s; the control loop maps each to
//! an [`InjectorCommand`] for the injection backend. Commands can be
//! recorded as JSONL (one [`TimedCommand`] per line) for dry runs.

use serde::{Deserialize, Serialize};

use airpoint_common::clock::TimestampNs;

/// Discrete pointer event produced by gesture interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    /// Move the pointer to screen coordinates.
    Move { x: f64, y: f64 },
    Click,
    DoubleClick,
    RightClick,
    /// Press and hold the primary button.
    DragStart,
    /// Release the primary button.
    DragEnd,
    /// Wheel steps; positive scrolls up.
    Scroll { amount: i32 },
}

impl PointerEvent {
    /// Status text shown for this event. `Move` has none.
    pub fn action_label(&self) -> Option<String> {
        match self {
            Self::Move { .. } => None,
            Self::Click => Some("Click".to_string()),
            Self::DoubleClick => Some("Double Click".to_string()),
            Self::RightClick => Some("Right Click".to_string()),
            Self::DragStart => Some("Drag Start".to_string()),
            Self::DragEnd => Some("Drag End".to_string()),
            Self::Scroll { amount } => Some(format!("Scroll {amount}")),
        }
    }

    /// Phrase announced after the event is injected, if any.
    pub fn spoken_phrase(&self) -> Option<&'static str> {
        match self {
            Self::Click => Some("Click"),
            Self::DoubleClick => Some("Double click"),
            Self::RightClick => Some("Right click"),
            Self::DragStart => Some("Drag"),
            _ => None,
        }
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
}

/// A call on the pointer injector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum InjectorCommand {
    MoveTo { x: f64, y: f64 },
    MouseDown,
    MouseUp,
    Click { button: MouseButton },
    DoubleClick,
    Scroll { amount: i32 },
}

impl From<PointerEvent> for InjectorCommand {
    fn from(event: PointerEvent) -> Self {
        match event {
            PointerEvent::Move { x, y } => Self::MoveTo { x, y },
            PointerEvent::Click => Self::Click {
                button: MouseButton::Left,
            },
            PointerEvent::DoubleClick => Self::DoubleClick,
            PointerEvent::RightClick => Self::Click {
                button: MouseButton::Right,
            },
            PointerEvent::DragStart => Self::MouseDown,
            PointerEvent::DragEnd => Self::MouseUp,
            PointerEvent::Scroll { amount } => Self::Scroll { amount },
        }
    }
}

/// An injector command stamped with the session time it was issued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedCommand {
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    #[serde(flatten)]
    pub command: InjectorCommand,
}

impl TimedCommand {
    pub fn new(timestamp_ns: TimestampNs, command: InjectorCommand) -> Self {
        Self {
            timestamp_ns,
            command,
        }
    }

    /// Timestamp as fractional seconds since session start.
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_ns as f64 / 1_000_000_000.0
    }
}

/// Parse commands from JSONL content (one JSON object per line).
pub fn parse_commands(jsonl: &str) -> Result<Vec<TimedCommand>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_to_command_mapping() {
        assert_eq!(
            InjectorCommand::from(PointerEvent::Move { x: 10.0, y: 20.0 }),
            InjectorCommand::MoveTo { x: 10.0, y: 20.0 }
        );
        assert_eq!(
            InjectorCommand::from(PointerEvent::DragStart),
            InjectorCommand::MouseDown
        );
        assert_eq!(
            InjectorCommand::from(PointerEvent::DragEnd),
            InjectorCommand::MouseUp
        );
        assert_eq!(
            InjectorCommand::from(PointerEvent::Click),
            InjectorCommand::Click {
                button: MouseButton::Left
            }
        );
        assert_eq!(
            InjectorCommand::from(PointerEvent::RightClick),
            InjectorCommand::Click {
                button: MouseButton::Right
            }
        );
        assert_eq!(
            InjectorCommand::from(PointerEvent::Scroll { amount: -4 }),
            InjectorCommand::Scroll { amount: -4 }
        );
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(PointerEvent::Move { x: 0.0, y: 0.0 }.action_label(), None);
        assert_eq!(
            PointerEvent::DoubleClick.action_label().as_deref(),
            Some("Double Click")
        );
        assert_eq!(
            PointerEvent::Scroll { amount: 3 }.action_label().as_deref(),
            Some("Scroll 3")
        );
    }

    #[test]
    fn test_only_discrete_actions_are_spoken() {
        assert_eq!(PointerEvent::DragStart.spoken_phrase(), Some("Drag"));
        assert_eq!(PointerEvent::DragEnd.spoken_phrase(), None);
        assert_eq!(PointerEvent::Scroll { amount: 1 }.spoken_phrase(), None);
    }

    #[test]
    fn test_timed_command_json_shape() {
        let cmd = TimedCommand::new(
            1_500_000_000,
            InjectorCommand::Click {
                button: MouseButton::Right,
            },
        );
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"t\":1500000000"));
        assert!(json.contains("\"op\":\"click\""));
        assert!(json.contains("\"button\":\"right\""));
        assert!((cmd.timestamp_secs() - 1.5).abs() < 1e-9);

        let parsed = parse_commands(&format!("# header\n{json}\n")).unwrap();
        assert_eq!(parsed, vec![cmd]);
    }
}
