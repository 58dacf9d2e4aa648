//! Per-loop session context.
//!
//! Owns everything that changes between frames: the cursor filter, the
//! event state machine, and the two user toggles. Nothing here performs
//! I/O, so a session can be driven frame by frame in tests.

use airpoint_common::clock::TimestampNs;
use airpoint_common::config::{AppConfig, ScreenConfig};
use airpoint_common::error::{AirpointError, AirpointResult};
use airpoint_gesture_core::smoother::screen_target;
use airpoint_gesture_core::{EventStateMachine, GestureClassifier, InteractionState, MotionSmoother};
use airpoint_hand_model::capture::Capture;
use airpoint_hand_model::event::PointerEvent;

pub const IDLE_ACTION: &str = "Idle";
pub const NO_HAND_GESTURE: &str = "No hand";

/// What one frame produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    pub hand_present: bool,
    pub events: Vec<PointerEvent>,
    /// Last discrete action this frame, or "Idle".
    pub action: String,
    /// Gesture summary, or "No hand".
    pub gesture: String,
}

pub struct Session {
    screen: ScreenConfig,
    smoother: MotionSmoother,
    classifier: GestureClassifier,
    machine: EventStateMachine,
    mouse_enabled: bool,
    overlay_visible: bool,
}

impl Session {
    pub fn new(config: &AppConfig) -> AirpointResult<Self> {
        config.validate()?;
        Ok(Self {
            screen: config.screen,
            smoother: MotionSmoother::from_config(&config.gesture)?,
            classifier: GestureClassifier::from_config(&config.gesture),
            machine: EventStateMachine::new(&config.gesture),
            mouse_enabled: true,
            overlay_visible: config.overlay.visible,
        })
    }

    /// Run one capture through smoothing, classification, and the state
    /// machine. Zero frame dimensions fail even when no hand is present.
    pub fn process(&mut self, now: TimestampNs, capture: &Capture) -> AirpointResult<FrameOutcome> {
        if capture.width == 0 || capture.height == 0 {
            return Err(AirpointError::invalid_frame_dimensions(
                capture.width,
                capture.height,
            ));
        }

        let Some(hand) = capture.hand.as_ref() else {
            return Ok(FrameOutcome {
                hand_present: false,
                events: Vec::new(),
                action: IDLE_ACTION.to_string(),
                gesture: NO_HAND_GESTURE.to_string(),
            });
        };

        let target = screen_target(hand.index_tip(), capture.width, capture.height, &self.screen)?;
        let cursor = self.smoother.update(target);
        let signals = self.classifier.classify(hand, capture.width, capture.height)?;
        let step = self.machine.step(now, &signals, cursor);

        Ok(FrameOutcome {
            hand_present: true,
            events: step.events,
            action: step.action.unwrap_or_else(|| IDLE_ACTION.to_string()),
            gesture: signals.label(),
        })
    }

    pub fn mouse_enabled(&self) -> bool {
        self.mouse_enabled
    }

    /// Flip pointer delivery and return the new value.
    pub fn toggle_mouse(&mut self) -> bool {
        self.mouse_enabled = !self.mouse_enabled;
        self.mouse_enabled
    }

    pub fn set_mouse_enabled(&mut self, enabled: bool) {
        self.mouse_enabled = enabled;
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    pub fn toggle_overlay(&mut self) -> bool {
        self.overlay_visible = !self.overlay_visible;
        self.overlay_visible
    }

    pub fn interaction(&self) -> &InteractionState {
        self.machine.state()
    }

    pub fn cursor(&self) -> (f64, f64) {
        self.smoother.smoothed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airpoint_hand_model::landmark::{HandLandmark, HandPose, Point2};

    fn pinching_hand() -> airpoint_hand_model::landmark::LandmarkFrame {
        HandPose::at(Point2::new(320.0, 400.0))
            .with(HandLandmark::IndexTip, Point2::new(320.0, 240.0))
            .with(HandLandmark::ThumbTip, Point2::new(325.0, 240.0))
            .with(HandLandmark::MiddleTip, Point2::new(360.0, 240.0))
            .build()
    }

    #[test]
    fn test_no_hand_is_idle() {
        let mut session = Session::new(&AppConfig::default()).unwrap();
        let outcome = session.process(0, &Capture::no_hand(640, 480)).unwrap();
        assert!(!outcome.hand_present);
        assert!(outcome.events.is_empty());
        assert_eq!(outcome.action, "Idle");
        assert_eq!(outcome.gesture, "No hand");
    }

    #[test]
    fn test_zero_dimensions_fail_fast() {
        let mut session = Session::new(&AppConfig::default()).unwrap();
        let err = session
            .process(0, &Capture::hand(0, 480, pinching_hand()))
            .unwrap_err();
        assert!(matches!(
            err,
            AirpointError::InvalidFrameDimensions { width: 0, height: 480 }
        ));
        assert!(session.process(0, &Capture::no_hand(640, 0)).is_err());
    }

    #[test]
    fn test_pinch_starts_drag_and_moves() {
        let mut session = Session::new(&AppConfig::default()).unwrap();
        let outcome = session
            .process(1_000_000, &Capture::hand(640, 480, pinching_hand()))
            .unwrap();
        assert_eq!(outcome.action, "Drag Start");
        assert_eq!(outcome.gesture, "Pinch:true TwoPinch:false");
        assert_eq!(outcome.events[0], PointerEvent::DragStart);
        // Half the screen width, one seventh of the way from the origin.
        let (x, y) = session.cursor();
        assert!((x - 960.0 / 7.0).abs() < 1e-9);
        assert!((y - 540.0 / 7.0).abs() < 1e-9);
        assert!(session.interaction().pinch.is_dragging());
    }

    #[test]
    fn test_toggles() {
        let mut session = Session::new(&AppConfig::default()).unwrap();
        assert!(session.mouse_enabled());
        assert!(!session.toggle_mouse());
        assert!(session.toggle_mouse());
        assert!(!session.toggle_overlay());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AppConfig::default();
        config.gesture.smoothing = 0.5;
        assert!(Session::new(&config).is_err());
    }
}
