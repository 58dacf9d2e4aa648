//! Airpoint Control Loop
//!
//! Drives the gesture pipeline one camera frame at a time:
//!
//! 1. Pull a [`Capture`] from the [`LandmarkSource`]
//! 2. Apply any control key from the preview window
//! 3. Smooth, classify, and step the state machine
//! 4. Deliver events to the [`PointerInjector`] and announce them
//! 5. Refresh the status overlay
//!
//! The loop is synchronous; the source's blocking read sets the pace.

pub mod notifier;
pub mod overlay;
pub mod session;
pub mod source;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use airpoint_common::clock::{FpsMeter, SessionClock, TimestampNs};
use airpoint_common::config::AppConfig;
use airpoint_common::error::AirpointResult;
use airpoint_hand_model::capture::{Capture, ControlKey};
use airpoint_hand_model::event::{InjectorCommand, PointerEvent};
use airpoint_pointer_injector::PointerInjector;

pub use notifier::{CollectingNotifier, Notifier, NullNotifier, SpeechNotifier};
pub use overlay::{NullOverlay, OverlaySink, OverlayStatus, TracingOverlay};
pub use session::{FrameOutcome, Session};
pub use source::{JsonlLandmarkSource, LandmarkSource, ScriptedSource};

/// Announced once when the loop starts.
pub const ACTIVATED_PHRASE: &str = "Gesture control activated";

/// Counters reported when the loop ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub frames: u64,
    pub frames_with_hand: u64,
    pub events_emitted: u64,
    pub events_injected: u64,
    pub injection_failures: u64,
}

/// Whether the loop should keep going after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// Where frame timestamps come from. Fixed by the first capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBase {
    /// The captures' own `t` field.
    Recorded,
    /// The session clock.
    Session,
}

/// The frame loop and its collaborators.
pub struct ControlLoop {
    source: Box<dyn LandmarkSource>,
    injector: Box<dyn PointerInjector>,
    notifier: Box<dyn Notifier>,
    overlay: Box<dyn OverlaySink>,
    session: Session,
    clock: SessionClock,
    fps: FpsMeter,
    time_base: Option<TimeBase>,
    last_now: TimestampNs,
    stop_flag: Arc<AtomicBool>,
    summary: SessionSummary,
}

impl ControlLoop {
    /// Create a loop with speech and overlay disabled.
    pub fn new(
        config: &AppConfig,
        source: Box<dyn LandmarkSource>,
        injector: Box<dyn PointerInjector>,
    ) -> AirpointResult<Self> {
        Ok(Self {
            source,
            injector,
            notifier: Box::new(NullNotifier),
            overlay: Box::new(NullOverlay),
            session: Session::new(config)?,
            clock: SessionClock::start(),
            fps: FpsMeter::new(),
            time_base: None,
            last_now: 0,
            stop_flag: Arc::new(AtomicBool::new(false)),
            summary: SessionSummary::default(),
        })
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_overlay(mut self, overlay: Box<dyn OverlaySink>) -> Self {
        self.overlay = overlay;
        self
    }

    /// Start with pointer delivery on or off.
    pub fn with_mouse_enabled(mut self, enabled: bool) -> Self {
        self.session.set_mouse_enabled(enabled);
        self
    }

    /// Share an existing stop flag, e.g. one raised by a signal handler.
    pub fn with_stop_flag(mut self, stop_flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = stop_flag;
        self
    }

    /// Run until the source ends, a quit key arrives, or the stop flag is set.
    pub fn run(&mut self) -> AirpointResult<SessionSummary> {
        info!(
            source = %self.source.name(),
            injector = %self.injector.name(),
            started_at = %self.clock.epoch_wall(),
            "Control loop started"
        );
        self.notifier.notify(ACTIVATED_PHRASE);

        while !self.stop_flag.load(Ordering::Relaxed) {
            if self.tick()? == LoopControl::Stop {
                break;
            }
        }

        info!(
            frames = self.summary.frames,
            frames_with_hand = self.summary.frames_with_hand,
            events_injected = self.summary.events_injected,
            injection_failures = self.summary.injection_failures,
            elapsed_secs = self.clock.elapsed_secs(),
            "Control loop stopped"
        );
        Ok(self.summary.clone())
    }

    /// Process a single frame.
    pub fn tick(&mut self) -> AirpointResult<LoopControl> {
        let Some(capture) = self.source.next_capture()? else {
            info!(source = %self.source.name(), "Landmark stream ended");
            return Ok(LoopControl::Stop);
        };
        let now = self.timestamp_for(&capture);

        if let Some(key) = capture.key {
            if self.handle_key(key) == LoopControl::Stop {
                return Ok(LoopControl::Stop);
            }
        }

        self.process_frame(now, &capture)?;
        Ok(LoopControl::Continue)
    }

    /// Recorded streams hold the last `t` over lines that lack one; live
    /// streams ignore any `t` that shows up later.
    fn timestamp_for(&mut self, capture: &Capture) -> TimestampNs {
        let base = *self.time_base.get_or_insert_with(|| {
            let base = if capture.timestamp_ns.is_some() {
                TimeBase::Recorded
            } else {
                TimeBase::Session
            };
            debug!(?base, "Frame time base chosen");
            base
        });
        let now = match base {
            TimeBase::Recorded => capture.timestamp_ns.unwrap_or(self.last_now),
            TimeBase::Session => self.clock.elapsed_ns(),
        };
        self.last_now = now;
        now
    }

    pub fn time_base(&self) -> Option<TimeBase> {
        self.time_base
    }

    fn handle_key(&mut self, key: ControlKey) -> LoopControl {
        match key {
            ControlKey::Quit => {
                info!("Quit requested");
                return LoopControl::Stop;
            }
            ControlKey::ToggleMouse => {
                let enabled = self.session.toggle_mouse();
                info!(mouse_enabled = enabled, "Pointer control toggled");
                self.notifier
                    .notify(if enabled { "Mouse on" } else { "Mouse off" });
            }
            ControlKey::ToggleOverlay => {
                let visible = self.session.toggle_overlay();
                debug!(overlay_visible = visible, "Overlay toggled");
            }
        }
        LoopControl::Continue
    }

    fn process_frame(&mut self, now: TimestampNs, capture: &Capture) -> AirpointResult<()> {
        let outcome = self.session.process(now, capture)?;

        self.summary.frames += 1;
        if outcome.hand_present {
            self.summary.frames_with_hand += 1;
        }
        self.summary.events_emitted += outcome.events.len() as u64;

        if self.session.mouse_enabled() {
            for event in &outcome.events {
                self.deliver(now, event);
            }
        }

        let fps = self.fps.tick(now);
        if self.session.overlay_visible() {
            self.overlay.render(&OverlayStatus {
                timestamp_ns: now,
                mouse_enabled: self.session.mouse_enabled(),
                action: outcome.action,
                gesture: outcome.gesture,
                fps,
            });
        }
        Ok(())
    }

    fn deliver(&mut self, now: TimestampNs, event: &PointerEvent) {
        let command = InjectorCommand::from(*event);
        match self.injector.inject(now, &command) {
            Ok(()) => {
                self.summary.events_injected += 1;
                if let Some(phrase) = event.spoken_phrase() {
                    self.notifier.notify(phrase);
                }
            }
            Err(e) => {
                self.summary.injection_failures += 1;
                let failures = self.summary.injection_failures;
                // Moves fail every frame when the backend is down.
                if failures == 1 || failures % 100 == 0 {
                    warn!(
                        error = %e,
                        ?command,
                        injector = %self.injector.name(),
                        failures,
                        "Pointer injection failed"
                    );
                } else {
                    debug!(error = %e, ?command, "Pointer injection failed");
                }
            }
        }
    }

    /// Set the stop flag.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    /// Get the stop flag for external coordination.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }
}
