//! Airpoint Common Utilities
//!
//! Shared infrastructure for all Airpoint crates:
//! - Error types and result aliases
//! - Monotonic session clock, rate limiting, and FPS measurement
//! - Tracing/logging initialization
//! - Configuration loading and validation

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
