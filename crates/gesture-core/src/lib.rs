//! Airpoint Gesture Core
//!
//! Turns hand landmarks into pointer events, one frame at a time:
//! - **Geometry:** Frame-normalized distances between landmarks
//! - **Smoothing:** Exponential filter from raw hand position to cursor
//! - **Classification:** Pinch, two-finger, and open-hand signals
//! - **State machine:** Click, double-click, drag, right-click, and scroll
//!   detection with latches, cooldowns, and a scroll anchor
//!
//! This crate is pure computation with no I/O and no clocks. Time is passed in
//! by the caller as monotonic nanoseconds.

pub mod classifier;
pub mod geometry;
pub mod smoother;
pub mod state_machine;

pub use classifier::{GestureClassifier, GestureSignals};
pub use smoother::{CursorState, MotionSmoother};
pub use state_machine::{EventStateMachine, InteractionState, PinchState, StepOutput};
