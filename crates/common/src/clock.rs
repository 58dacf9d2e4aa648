//! Clock and timing utilities for the gesture loop.
//!
//! Gesture timing windows (double click, right-click cooldown) are measured
//! against a monotonic clock anchored at session start, so wall-clock
//! adjustments cannot stretch or collapse them. This module provides:
//! - The session epoch and elapsed-time queries
//! - A rate controller for throttling periodic output
//! - A frames-per-second meter

use std::time::Instant;

/// Monotonic nanoseconds since session start.
pub type TimestampNs = u64;

/// A session clock that provides monotonic timestamps relative to
/// a fixed epoch (the moment the control loop started).
#[derive(Debug, Clone)]
pub struct SessionClock {
    /// The instant the session started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string), for logs only.
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Get nanoseconds elapsed since session start.
    pub fn elapsed_ns(&self) -> TimestampNs {
        self.epoch.elapsed().as_nanos() as u64
    }

    /// Get seconds elapsed since session start.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// Convert an elapsed nanosecond value to seconds.
    pub fn ns_to_secs(ns: u64) -> f64 {
        ns as f64 / 1_000_000_000.0
    }

    /// Convert seconds to nanoseconds.
    pub fn secs_to_ns(secs: f64) -> u64 {
        (secs * 1_000_000_000.0).round() as u64
    }
}

/// Rate controller for throttling periodic work (status refreshes).
#[derive(Debug)]
pub struct RateController {
    target_interval_ns: u64,
    last_tick_ns: Option<u64>,
}

impl RateController {
    /// Create a controller targeting the given Hz rate. Zero is treated as 1 Hz.
    pub fn new(target_hz: u32) -> Self {
        Self {
            target_interval_ns: 1_000_000_000 / target_hz.max(1) as u64,
            last_tick_ns: None,
        }
    }

    /// Check if enough time has passed for the next tick.
    /// Returns true and updates internal state if ready.
    /// The first call always returns true.
    pub fn should_tick(&mut self, current_ns: u64) -> bool {
        match self.last_tick_ns {
            None => {
                self.last_tick_ns = Some(current_ns);
                true
            }
            Some(last) if current_ns >= last + self.target_interval_ns => {
                self.last_tick_ns = Some(current_ns);
                true
            }
            _ => false,
        }
    }

    /// Target interval in nanoseconds.
    pub fn interval_ns(&self) -> u64 {
        self.target_interval_ns
    }
}

/// Instantaneous frame rate from consecutive frame timestamps.
#[derive(Debug, Default)]
pub struct FpsMeter {
    last_frame_ns: Option<u64>,
    fps: f64,
}

impl FpsMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame and return the updated rate. A repeated timestamp
    /// reports 0, as does the very first frame.
    pub fn tick(&mut self, now_ns: u64) -> f64 {
        self.fps = match self.last_frame_ns {
            Some(prev) if now_ns > prev => 1_000_000_000.0 / (now_ns - prev) as f64,
            _ => 0.0,
        };
        self.last_frame_ns = Some(now_ns);
        self.fps
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_elapsed() {
        let clock = SessionClock::start();
        // Should be very small but non-negative
        assert!(clock.elapsed_ns() < 1_000_000_000); // less than 1 second
        assert!(!clock.epoch_wall().is_empty());
    }

    #[test]
    fn test_ns_to_secs_conversion() {
        assert!((SessionClock::ns_to_secs(1_500_000_000) - 1.5).abs() < 1e-9);
        assert_eq!(SessionClock::secs_to_ns(2.0), 2_000_000_000);
        assert_eq!(SessionClock::secs_to_ns(0.35), 350_000_000);
    }

    #[test]
    fn test_rate_controller() {
        let mut ctrl = RateController::new(60);
        assert!(ctrl.should_tick(0)); // first tick always fires
        assert!(!ctrl.should_tick(1_000_000)); // 1ms later, too soon
        assert!(ctrl.should_tick(17_000_000)); // ~17ms later, should fire (60Hz ~ 16.67ms)
    }

    #[test]
    fn test_rate_controller_zero_hz() {
        let ctrl = RateController::new(0);
        assert_eq!(ctrl.interval_ns(), 1_000_000_000);
    }

    #[test]
    fn test_fps_meter() {
        let mut meter = FpsMeter::new();
        assert_eq!(meter.tick(0), 0.0);
        let fps = meter.tick(33_333_333);
        assert!((fps - 30.0).abs() < 0.01);
        assert_eq!(meter.tick(33_333_333), 0.0);
        assert_eq!(meter.fps(), 0.0);
    }
}
