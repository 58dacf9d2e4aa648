//! Pointer event state machine.
//!
//! Consumes one frame of [`GestureSignals`] plus the smoothed cursor and
//! emits zero or more [`PointerEvent`]s. Each frame runs the same fixed
//! sequence of steps:
//!
//! 1. Pinch rising edge: double click if the previous pinch edge is
//!    within the double-click window, otherwise press and start a drag.
//! 2. Pinch falling edge: end the drag and re-anchor the double-click window.
//! 3. Two fingers closed: right click, at most once per cooldown.
//! 4. Open hand: scroll by vertical travel since the anchor.
//! 5. Move to the smoothed cursor.
//!
//! Every pinch that is not a double click starts a drag straight away; a
//! quick pinch is therefore a press/release pair, which the desktop reads
//! as a click.

use airpoint_common::clock::TimestampNs;
use airpoint_common::config::GestureConfig;
use airpoint_hand_model::event::PointerEvent;

use crate::classifier::GestureSignals;

/// Pixels of travel per scroll unit before the multiplier.
const SCROLL_STEP_PX: f64 = 10.0;

/// Largest scroll emitted in one frame.
const MAX_SCROLL_STEPS: f64 = 10.0;

/// Pinch latch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PinchState {
    /// Not pinching.
    #[default]
    Idle,
    /// Pinch held after a double click; no button is down.
    PinchHeld,
    /// Pinch held with the primary button down.
    Dragging,
}

impl PinchState {
    /// Whether a pinch is currently latched.
    pub fn is_latched(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging)
    }
}

/// Memory carried between frames.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InteractionState {
    pub pinch: PinchState,
    /// Anchor for the double-click window. `None` once a double click has
    /// consumed it, and before the first pinch.
    pub last_pinch_time: Option<TimestampNs>,
    pub last_right_click_time: Option<TimestampNs>,
    /// Cursor y when the open hand was armed or last scrolled.
    pub scroll_anchor_y: Option<f64>,
}

/// Result of one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StepOutput {
    /// Events in emission order; always ends with a `Move`.
    pub events: Vec<PointerEvent>,
    /// Label of the last discrete action this frame, if any.
    pub action: Option<String>,
}

impl StepOutput {
    fn push(&mut self, event: PointerEvent) {
        if let Some(label) = event.action_label() {
            self.action = Some(label);
        }
        self.events.push(event);
    }
}

/// The gesture-to-pointer state machine.
#[derive(Debug, Clone)]
pub struct EventStateMachine {
    double_click_window_ns: u64,
    right_click_cooldown_ns: u64,
    scroll_deadzone_px: f64,
    scroll_mult: f64,
    state: InteractionState,
}

impl EventStateMachine {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            double_click_window_ns: config.double_click_window_ns(),
            right_click_cooldown_ns: config.right_click_cooldown_ns(),
            scroll_deadzone_px: config.scroll_deadzone_px,
            scroll_mult: config.scroll_mult,
            state: InteractionState::default(),
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Forget all latches and timers.
    pub fn reset(&mut self) {
        self.state = InteractionState::default();
    }

    /// Advance one frame with a detected hand.
    pub fn step(
        &mut self,
        now: TimestampNs,
        signals: &GestureSignals,
        cursor: (f64, f64),
    ) -> StepOutput {
        let mut out = StepOutput::default();

        self.step_pinch(now, signals.is_pinch, &mut out);
        self.step_right_click(now, signals.is_two_finger, &mut out);
        self.step_scroll(signals.fingers_open, cursor.1, &mut out);

        // Move goes last on purpose: a press this frame lands at the previous
        // frame's cursor, one smoothing step behind.
        out.push(PointerEvent::Move {
            x: cursor.0,
            y: cursor.1,
        });
        out
    }

    fn within_double_click_window(&self, now: TimestampNs) -> bool {
        self.state
            .last_pinch_time
            .is_some_and(|last| now.saturating_sub(last) < self.double_click_window_ns)
    }

    fn step_pinch(&mut self, now: TimestampNs, is_pinch: bool, out: &mut StepOutput) {
        match (self.state.pinch, is_pinch) {
            (PinchState::Idle, true) => {
                if self.within_double_click_window(now) {
                    out.push(PointerEvent::DoubleClick);
                    self.state.last_pinch_time = None;
                    self.state.pinch = PinchState::PinchHeld;
                    tracing::debug!(now, "pinch: double click");
                } else {
                    self.state.last_pinch_time = Some(now);
                    out.push(PointerEvent::DragStart);
                    self.state.pinch = PinchState::Dragging;
                    tracing::debug!(now, "pinch: drag start");
                }
            }
            (PinchState::Dragging, false) => {
                out.push(PointerEvent::DragEnd);
                self.state.last_pinch_time = Some(now);
                self.state.pinch = PinchState::Idle;
                tracing::debug!(now, "pinch: drag end");
            }
            (PinchState::PinchHeld, false) => {
                // Entering PinchHeld clears the anchor, so this click only
                // fires if the window was re-armed while the pinch was held.
                if self.within_double_click_window(now) {
                    out.push(PointerEvent::Click);
                }
                self.state.last_pinch_time = Some(now);
                self.state.pinch = PinchState::Idle;
                tracing::debug!(now, "pinch: released after double click");
            }
            (PinchState::Idle, false) | (PinchState::PinchHeld, true) | (PinchState::Dragging, true) => {}
        }
    }

    fn step_right_click(&mut self, now: TimestampNs, is_two_finger: bool, out: &mut StepOutput) {
        if !is_two_finger {
            return;
        }
        let cooled_down = self
            .state
            .last_right_click_time
            .map_or(true, |last| now.saturating_sub(last) > self.right_click_cooldown_ns);
        if cooled_down {
            out.push(PointerEvent::RightClick);
            self.state.last_right_click_time = Some(now);
            tracing::debug!(now, "two fingers: right click");
        }
    }

    fn step_scroll(&mut self, fingers_open: bool, y: f64, out: &mut StepOutput) {
        if !fingers_open {
            self.state.scroll_anchor_y = None;
            return;
        }
        let Some(anchor) = self.state.scroll_anchor_y else {
            self.state.scroll_anchor_y = Some(y);
            return;
        };

        let dy = anchor - y;
        if dy.abs() > self.scroll_deadzone_px {
            let steps = (dy.abs() / SCROLL_STEP_PX * self.scroll_mult).min(MAX_SCROLL_STEPS);
            let amount = (dy.signum() * steps).trunc() as i32;
            out.push(PointerEvent::Scroll { amount });
            self.state.scroll_anchor_y = Some(y);
        }
    }
}

impl Default for EventStateMachine {
    fn default() -> Self {
        Self::new(&GestureConfig::default())
    }
}
