//! Per-frame gesture classification from fingertip geometry.
//!
//! Three signals are derived from two distances:
//! - **Pinch:** thumb tip close to index tip
//! - **Two-finger:** index tip close to middle tip
//! - **Open hand:** index tip far from middle tip
//!
//! Two-finger and open hand test the same distance against thresholds
//! `click_distance * 1.1` and `open_hand_threshold`. With the defaults
//! (0.044 vs 0.12) they cannot both hold, but nothing enforces that if the
//! thresholds are retuned.

use airpoint_common::config::GestureConfig;
use airpoint_common::error::AirpointResult;
use airpoint_hand_model::landmark::LandmarkFrame;

use crate::geometry::normalized_distance;

/// Widening applied to `click_distance` for the two-finger gesture.
pub const TWO_FINGER_FACTOR: f64 = 1.1;

/// Gesture signals for one frame. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSignals {
    /// Normalized thumb-tip to index-tip distance.
    pub pinch_distance: f64,
    /// Normalized index-tip to middle-tip distance.
    pub two_finger_distance: f64,
    /// Normalized index-tip to middle-tip distance used for the open-hand test.
    pub index_mid_distance: f64,
    pub is_pinch: bool,
    pub is_two_finger: bool,
    pub fingers_open: bool,
}

impl GestureSignals {
    /// Short status line for the overlay.
    pub fn label(&self) -> String {
        format!("Pinch:{} TwoPinch:{}", self.is_pinch, self.is_two_finger)
    }
}

/// Threshold-based gesture classifier.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    click_distance: f64,
    open_hand_threshold: f64,
}

impl GestureClassifier {
    pub fn new(click_distance: f64, open_hand_threshold: f64) -> Self {
        Self {
            click_distance,
            open_hand_threshold,
        }
    }

    pub fn from_config(config: &GestureConfig) -> Self {
        Self::new(config.click_distance, config.open_hand_threshold)
    }

    /// Classify one hand. Fails only on zero frame dimensions.
    pub fn classify(
        &self,
        hand: &LandmarkFrame,
        frame_w: u32,
        frame_h: u32,
    ) -> AirpointResult<GestureSignals> {
        let pinch_distance =
            normalized_distance(hand.thumb_tip(), hand.index_tip(), frame_w, frame_h)?;
        let two_finger_distance =
            normalized_distance(hand.index_tip(), hand.middle_tip(), frame_w, frame_h)?;
        let index_mid_distance = two_finger_distance;

        Ok(GestureSignals {
            pinch_distance,
            two_finger_distance,
            index_mid_distance,
            is_pinch: pinch_distance < self.click_distance,
            is_two_finger: two_finger_distance < self.click_distance * TWO_FINGER_FACTOR,
            fingers_open: index_mid_distance > self.open_hand_threshold,
        })
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::from_config(&GestureConfig::default())
    }
}
