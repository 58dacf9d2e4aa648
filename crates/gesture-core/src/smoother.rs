//! Cursor motion smoothing.
//!
//! The hand position jitters by a few pixels every frame even when held
//! still. A first-order exponential filter pulls the cursor a fixed
//! fraction of the remaining distance toward the raw target each frame:
//!
//! `smoothed = smoothed + (target - smoothed) / factor`
//!
//! With `factor >= 1` the step fraction is in `(0, 1]`, so the cursor never
//! overshoots and converges geometrically on a stationary target.

use airpoint_common::config::{GestureConfig, ScreenConfig};
use airpoint_common::error::{AirpointError, AirpointResult};
use airpoint_hand_model::landmark::Point2;

use crate::geometry::normalize_point;

/// Raw and filtered cursor positions in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CursorState {
    /// Latest unfiltered target.
    pub raw_target: (f64, f64),
    /// Filtered position; the logical pointer location.
    pub smoothed: (f64, f64),
}

/// Exponential cursor smoother. Owns the [`CursorState`].
#[derive(Debug, Clone)]
pub struct MotionSmoother {
    factor: f64,
    state: CursorState,
}

impl MotionSmoother {
    /// Create a smoother starting at the screen origin.
    pub fn new(factor: f64) -> AirpointResult<Self> {
        if !factor.is_finite() || factor < 1.0 {
            return Err(AirpointError::config(format!(
                "smoothing factor must be >= 1.0, got {factor}"
            )));
        }
        Ok(Self {
            factor,
            state: CursorState::default(),
        })
    }

    pub fn from_config(config: &GestureConfig) -> AirpointResult<Self> {
        Self::new(config.smoothing)
    }

    /// Feed one raw target and return the new smoothed position.
    pub fn update(&mut self, raw_target: (f64, f64)) -> (f64, f64) {
        let (sx, sy) = self.state.smoothed;
        let smoothed = (
            sx + (raw_target.0 - sx) / self.factor,
            sy + (raw_target.1 - sy) / self.factor,
        );
        self.state = CursorState {
            raw_target,
            smoothed,
        };
        smoothed
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn smoothed(&self) -> (f64, f64) {
        self.state.smoothed
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }
}

/// Project a frame-space point (the index fingertip) onto the screen.
pub fn screen_target(
    point: Point2,
    frame_w: u32,
    frame_h: u32,
    screen: &ScreenConfig,
) -> AirpointResult<(f64, f64)> {
    let n = normalize_point(point, frame_w, frame_h)?;
    Ok((n.x * screen.width as f64, n.y * screen.height as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_step_moves_one_seventh() {
        let mut smoother = MotionSmoother::new(7.0).unwrap();
        let (x, y) = smoother.update((700.0, 140.0));
        assert!((x - 100.0).abs() < 1e-9);
        assert!((y - 20.0).abs() < 1e-9);
        assert_eq!(smoother.state().raw_target, (700.0, 140.0));
    }

    #[test]
    fn test_factor_one_passes_through() {
        let mut smoother = MotionSmoother::new(1.0).unwrap();
        assert_eq!(smoother.update((42.0, 17.0)), (42.0, 17.0));
    }

    #[test]
    fn test_rejects_factor_below_one() {
        assert!(MotionSmoother::new(0.5).is_err());
        assert!(MotionSmoother::new(f64::NAN).is_err());
    }

    #[test]
    fn test_damps_jitter() {
        let mut smoother = MotionSmoother::new(7.0).unwrap();
        for _ in 0..200 {
            smoother.update((500.0, 500.0));
        }
        let jitter = [(506.0, 495.0), (494.0, 504.0), (503.0, 497.0), (497.0, 502.0)];
        for target in jitter {
            let (x, y) = smoother.update(target);
            assert!((x - 500.0).abs() < 1.0, "x={x} moved too far");
            assert!((y - 500.0).abs() < 1.0, "y={y} moved too far");
        }
    }

    #[test]
    fn test_screen_target_scales_by_screen() {
        let screen = ScreenConfig {
            width: 1920,
            height: 1080,
        };
        let (x, y) = screen_target(Point2::new(320.0, 120.0), 640, 480, &screen).unwrap();
        assert!((x - 960.0).abs() < 1e-9);
        assert!((y - 270.0).abs() < 1e-9);
        assert!(screen_target(Point2::new(1.0, 1.0), 0, 480, &screen).is_err());
    }

    proptest! {
        #[test]
        fn converges_monotonically_without_overshoot(
            factor in 1.0f64..50.0,
            tx in -5000.0f64..5000.0,
            ty in -5000.0f64..5000.0,
        ) {
            let mut smoother = MotionSmoother::new(factor).unwrap();
            let mut prev_dx = tx.abs();
            let mut prev_dy = ty.abs();
            for _ in 0..100 {
                let (x, y) = smoother.update((tx, ty));
                let dx = (tx - x).abs();
                let dy = (ty - y).abs();
                prop_assert!(dx <= prev_dx + 1e-9);
                prop_assert!(dy <= prev_dy + 1e-9);
                // Never crosses the target.
                prop_assert!(tx == 0.0 || x * tx.signum() <= tx.abs() + 1e-9);
                prop_assert!(ty == 0.0 || y * ty.signum() <= ty.abs() + 1e-9);
                prev_dx = dx;
                prev_dy = dy;
            }
        }
    }
}
