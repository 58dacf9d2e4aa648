//! Airpoint Hand Model
//!
//! Defines the data contracts that flow through the gesture pipeline:
//! - **Landmarks:** One tracked hand as 21 pixel-space points
//! - **Captures:** A single read from the landmark source (frame size,
//!   optional hand, optional control key)
//! - **Events:** Pointer events emitted by the state machine and the
//!   commands handed to the injector
//!
//! Captures and commands have JSONL encodings so live sessions can be
//! piped in from an external detector and replayed later.

pub mod capture;
pub mod event;
pub mod landmark;

pub use capture::*;
pub use event::*;
pub use landmark::*;
