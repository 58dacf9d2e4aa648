//! Landmark source captures and their JSONL encoding.
//!
//! Each line of a capture stream is one read from the detector:
//!
//! ```text
//! {"t":33000000,"width":640,"height":480,"landmarks":[[x,y], ...21 pairs],"key":"m"}
//! ```
//!
//! `t` (monotonic nanoseconds) is only present in recorded streams,
//! `landmarks` is `null` or absent when no hand was found, and `key`
//! carries a key pressed in the detector's preview window.

use serde::{Deserialize, Serialize};

use airpoint_common::clock::TimestampNs;
use airpoint_common::error::{AirpointError, AirpointResult};

use crate::landmark::{LandmarkFrame, Point2};

/// Keys the control loop reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKey {
    /// `q` or Esc.
    Quit,
    /// `m`: enable or disable pointer injection.
    ToggleMouse,
    /// `v`: show or hide the status overlay.
    ToggleOverlay,
}

impl ControlKey {
    /// Map a key name from the preview window. Unbound keys yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "q" | "Q" | "esc" | "Esc" | "escape" | "Escape" | "\u{1b}" => Some(Self::Quit),
            "m" | "M" => Some(Self::ToggleMouse),
            "v" | "V" => Some(Self::ToggleOverlay),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quit => "q",
            Self::ToggleMouse => "m",
            Self::ToggleOverlay => "v",
        }
    }
}

/// One read from the landmark source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CaptureRecord", into = "CaptureRecord")]
pub struct Capture {
    /// Recorded timestamp; `None` for live streams.
    pub timestamp_ns: Option<TimestampNs>,
    /// Camera frame width in pixels.
    pub width: u32,
    /// Camera frame height in pixels.
    pub height: u32,
    /// The tracked hand, if any.
    pub hand: Option<LandmarkFrame>,
    /// Key pressed in the preview window during this frame.
    pub key: Option<ControlKey>,
}

impl Capture {
    /// A frame with a hand.
    pub fn hand(width: u32, height: u32, hand: LandmarkFrame) -> Self {
        Self {
            timestamp_ns: None,
            width,
            height,
            hand: Some(hand),
            key: None,
        }
    }

    /// A frame where the detector found nothing.
    pub fn no_hand(width: u32, height: u32) -> Self {
        Self {
            timestamp_ns: None,
            width,
            height,
            hand: None,
            key: None,
        }
    }

    pub fn at(mut self, timestamp_ns: TimestampNs) -> Self {
        self.timestamp_ns = Some(timestamp_ns);
        self
    }

    pub fn with_key(mut self, key: ControlKey) -> Self {
        self.key = Some(key);
        self
    }
}

/// Wire shape of a capture line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureRecord {
    #[serde(rename = "t", default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ns: Option<TimestampNs>,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub landmarks: Option<Vec<Point2>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl TryFrom<CaptureRecord> for Capture {
    type Error = AirpointError;

    fn try_from(record: CaptureRecord) -> Result<Self, Self::Error> {
        let hand = record.landmarks.map(LandmarkFrame::new).transpose()?;
        Ok(Self {
            timestamp_ns: record.timestamp_ns,
            width: record.width,
            height: record.height,
            hand,
            key: record.key.as_deref().and_then(ControlKey::from_name),
        })
    }
}

impl From<Capture> for CaptureRecord {
    fn from(capture: Capture) -> Self {
        Self {
            timestamp_ns: capture.timestamp_ns,
            width: capture.width,
            height: capture.height,
            landmarks: capture.hand.map(Vec::from),
            key: capture.key.map(|k| k.as_str().to_string()),
        }
    }
}

/// Parse one JSONL line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_capture_line(line: &str) -> AirpointResult<Option<Capture>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let record: CaptureRecord = serde_json::from_str(trimmed)?;
    Capture::try_from(record).map(Some)
}

/// Parse a whole capture stream.
pub fn parse_captures(jsonl: &str) -> AirpointResult<Vec<Capture>> {
    let mut captures = Vec::new();
    for line in jsonl.lines() {
        if let Some(capture) = parse_capture_line(line)? {
            captures.push(capture);
        }
    }
    Ok(captures)
}

/// Serialize captures to JSONL format.
pub fn serialize_captures(captures: &[Capture]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for capture in captures {
        output.push_str(&serde_json::to_string(capture)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{HandLandmark, HandPose};

    fn pairs(n: usize) -> String {
        (0..n)
            .map(|i| format!("[{i}.0,{i}.5]"))
            .collect::<Vec<_>>()
            .join(",")
    }

    #[test]
    fn test_parse_hand_line() {
        let line = format!(
            r#"{{"t":1000,"width":640,"height":480,"landmarks":[{}]}}"#,
            pairs(21)
        );
        let capture = parse_capture_line(&line).unwrap().unwrap();
        assert_eq!(capture.timestamp_ns, Some(1000));
        assert_eq!(capture.width, 640);
        let hand = capture.hand.unwrap();
        assert_eq!(hand.index_tip(), Point2::new(8.0, 8.5));
        assert_eq!(capture.key, None);
    }

    #[test]
    fn test_parse_no_hand_and_key() {
        let capture = parse_capture_line(r#"{"width":640,"height":480,"landmarks":null,"key":"m"}"#)
            .unwrap()
            .unwrap();
        assert!(capture.hand.is_none());
        assert_eq!(capture.timestamp_ns, None);
        assert_eq!(capture.key, Some(ControlKey::ToggleMouse));

        let missing = parse_capture_line(r#"{"width":640,"height":480}"#)
            .unwrap()
            .unwrap();
        assert!(missing.hand.is_none());
    }

    #[test]
    fn test_unbound_key_is_ignored() {
        let capture = parse_capture_line(r#"{"width":640,"height":480,"key":"x"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(capture.key, None);
    }

    #[test]
    fn test_wrong_landmark_count_is_distinct_error() {
        let line = format!(r#"{{"width":640,"height":480,"landmarks":[{}]}}"#, pairs(5));
        let err = parse_capture_line(&line).unwrap_err();
        assert!(matches!(err, AirpointError::InvalidLandmarks { .. }));
    }

    #[test]
    fn test_comments_and_blanks_skipped() {
        let jsonl = "# recorded by detector\n\n{\"width\":640,\"height\":480}\n";
        let captures = parse_captures(jsonl).unwrap();
        assert_eq!(captures.len(), 1);
    }

    #[test]
    fn test_jsonl_roundtrip() {
        let hand = HandPose::at(Point2::new(300.0, 400.0))
            .with(HandLandmark::ThumbTip, Point2::new(310.0, 200.0))
            .with(HandLandmark::IndexTip, Point2::new(320.0, 190.0))
            .build();
        let captures = vec![
            Capture::hand(640, 480, hand).at(0),
            Capture::no_hand(640, 480)
                .at(33_000_000)
                .with_key(ControlKey::Quit),
        ];
        let jsonl = serialize_captures(&captures).unwrap();
        assert_eq!(parse_captures(&jsonl).unwrap(), captures);
    }

    #[test]
    fn test_control_key_names() {
        assert_eq!(ControlKey::from_name("Escape"), Some(ControlKey::Quit));
        assert_eq!(ControlKey::from_name("q"), Some(ControlKey::Quit));
        assert_eq!(ControlKey::from_name("v"), Some(ControlKey::ToggleOverlay));
        assert_eq!(ControlKey::from_name("k"), None);
    }
}
