//! Hand landmark types.
//!
//! A detected hand is 21 points in the order produced by common hand
//! landmark models (wrist first, then four joints per finger from thumb
//! to pinky). Coordinates are in pixels relative to the camera frame.

use serde::{Deserialize, Serialize};

use airpoint_common::error::AirpointError;

/// Number of landmarks in one hand frame.
pub const LANDMARK_COUNT: usize = 21;

/// A 2D point in frame pixel space. Serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point2 {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point2> for [f64; 2] {
    fn from(p: Point2) -> Self {
        [p.x, p.y]
    }
}

/// The 21 tracked hand landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandLandmark {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl HandLandmark {
    /// Position of this landmark within a frame (0-20).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Fingertip landmarks, thumb first.
    pub fn fingertips() -> [HandLandmark; 5] {
        [
            Self::ThumbTip,
            Self::IndexTip,
            Self::MiddleTip,
            Self::RingTip,
            Self::PinkyTip,
        ]
    }
}

/// One detected hand: exactly [`LANDMARK_COUNT`] points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point2>", into = "Vec<Point2>")]
pub struct LandmarkFrame {
    points: Vec<Point2>,
}

impl LandmarkFrame {
    /// Build a frame, rejecting anything but 21 points.
    pub fn new(points: Vec<Point2>) -> Result<Self, AirpointError> {
        if points.len() != LANDMARK_COUNT {
            return Err(AirpointError::invalid_landmarks(format!(
                "expected {LANDMARK_COUNT} points, got {}",
                points.len()
            )));
        }
        Ok(Self { points })
    }

    pub fn get(&self, landmark: HandLandmark) -> Point2 {
        self.points[landmark.index()]
    }

    pub fn thumb_tip(&self) -> Point2 {
        self.get(HandLandmark::ThumbTip)
    }

    pub fn index_tip(&self) -> Point2 {
        self.get(HandLandmark::IndexTip)
    }

    pub fn middle_tip(&self) -> Point2 {
        self.get(HandLandmark::MiddleTip)
    }

    pub fn ring_tip(&self) -> Point2 {
        self.get(HandLandmark::RingTip)
    }

    pub fn pinky_tip(&self) -> Point2 {
        self.get(HandLandmark::PinkyTip)
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }
}

impl TryFrom<Vec<Point2>> for LandmarkFrame {
    type Error = AirpointError;

    fn try_from(points: Vec<Point2>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<LandmarkFrame> for Vec<Point2> {
    fn from(frame: LandmarkFrame) -> Self {
        frame.points
    }
}

/// Fluent builder for synthetic hands, used by tests and demo streams.
///
/// Unset landmarks sit at the wrist position.
#[derive(Debug, Clone)]
pub struct HandPose {
    points: [Point2; LANDMARK_COUNT],
}

impl HandPose {
    /// Start a pose with every landmark at `wrist`.
    pub fn at(wrist: Point2) -> Self {
        Self {
            points: [wrist; LANDMARK_COUNT],
        }
    }

    pub fn with(mut self, landmark: HandLandmark, point: Point2) -> Self {
        self.points[landmark.index()] = point;
        self
    }

    pub fn build(self) -> LandmarkFrame {
        LandmarkFrame {
            points: self.points.to_vec(),
        }
    }
}
