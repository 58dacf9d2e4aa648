use std::path::PathBuf;

use airpoint_common::config::{GestureConfig, ScreenConfig};
use airpoint_gesture_core::smoother::screen_target;
use airpoint_gesture_core::{EventStateMachine, GestureClassifier, MotionSmoother};
use airpoint_hand_model::capture::{parse_captures, Capture};
use airpoint_hand_model::event::PointerEvent;
use airpoint_hand_model::landmark::{HandLandmark, HandPose, LandmarkFrame, Point2};

const W: u32 = 640;
const H: u32 = 480;
const MS: u64 = 1_000_000;

/// Smoother, classifier, and state machine wired the way the control loop
/// wires them.
struct Pipeline {
    smoother: MotionSmoother,
    classifier: GestureClassifier,
    machine: EventStateMachine,
    screen: ScreenConfig,
}

impl Pipeline {
    fn new() -> Self {
        let config = GestureConfig::default();
        Self {
            smoother: MotionSmoother::from_config(&config).unwrap(),
            classifier: GestureClassifier::from_config(&config),
            machine: EventStateMachine::new(&config),
            screen: ScreenConfig::default(),
        }
    }

    /// Non-move events per frame.
    fn feed(&mut self, captures: &[Capture]) -> Vec<Vec<PointerEvent>> {
        captures
            .iter()
            .map(|capture| {
                let Some(hand) = &capture.hand else {
                    return vec![];
                };
                let target =
                    screen_target(hand.index_tip(), capture.width, capture.height, &self.screen)
                        .unwrap();
                let cursor = self.smoother.update(target);
                let signals = self
                    .classifier
                    .classify(hand, capture.width, capture.height)
                    .unwrap();
                self.machine
                    .step(capture.timestamp_ns.unwrap(), &signals, cursor)
                    .events
                    .into_iter()
                    .filter(|e| !matches!(e, PointerEvent::Move { .. }))
                    .collect()
            })
            .collect()
    }
}

/// Hand with the thumb `pinch` and the middle finger `spread` away from the
/// index tip, both as frame-normalized horizontal offsets.
fn hand(pinch: f64, spread: f64, index_y: f64) -> LandmarkFrame {
    let index = Point2::new(320.0, index_y);
    HandPose::at(Point2::new(320.0, 400.0))
        .with(HandLandmark::IndexTip, index)
        .with(HandLandmark::ThumbTip, Point2::new(index.x + pinch * W as f64, index.y))
        .with(HandLandmark::MiddleTip, Point2::new(index.x + spread * W as f64, index.y))
        .build()
}

fn frame(t_ms: u64, pinch: f64) -> Capture {
    Capture::hand(W, H, hand(pinch, 0.08, 200.0)).at(t_ms * MS)
}

#[test]
fn held_pinch_then_release_is_drag_start_and_end() {
    let mut captures: Vec<Capture> = (0..5).map(|i| frame(i * 30, 0.02)).collect();
    captures.extend((5..7).map(|i| frame(i * 30, 0.1)));

    let per_frame = Pipeline::new().feed(&captures);

    assert_eq!(per_frame[0], vec![PointerEvent::DragStart]);
    for events in &per_frame[1..5] {
        assert!(events.is_empty());
    }
    assert_eq!(per_frame[5], vec![PointerEvent::DragEnd]);
    assert!(per_frame[6].is_empty());
}

#[test]
fn two_short_pulses_become_double_click() {
    let captures = vec![
        frame(0, 0.02),
        frame(100, 0.1),
        frame(200, 0.02),
        frame(300, 0.1),
    ];
    let flat: Vec<PointerEvent> = Pipeline::new().feed(&captures).concat();
    assert_eq!(
        flat,
        vec![
            PointerEvent::DragStart,
            PointerEvent::DragEnd,
            PointerEvent::DoubleClick
        ]
    );
}

#[test]
fn pinch_held_past_window_never_clicks() {
    let mut captures: Vec<Capture> = (0..30).map(|i| frame(i * 33, 0.02)).collect();
    captures.push(frame(30 * 33, 0.1));
    let flat: Vec<PointerEvent> = Pipeline::new().feed(&captures).concat();
    assert_eq!(flat, vec![PointerEvent::DragStart, PointerEvent::DragEnd]);
}

#[test]
fn open_hand_scrolls_with_smoothed_cursor() {
    let mut pipeline = Pipeline::new();
    // Let the smoother settle on the starting height before opening the hand.
    let settle: Vec<Capture> = (0..100)
        .map(|i| Capture::hand(W, H, hand(0.2, 0.08, 300.0)).at(i * 30 * MS))
        .collect();
    pipeline.feed(&settle);

    let mut captures = vec![];
    for i in 0..30u64 {
        // Raise the hand 4px per frame.
        let y = 300.0 - 4.0 * i as f64;
        captures.push(Capture::hand(W, H, hand(0.2, 0.2, y)).at((3000 + i * 30) * MS));
    }
    let flat: Vec<PointerEvent> = pipeline.feed(&captures).concat();

    assert!(!flat.is_empty());
    for event in flat {
        match event {
            PointerEvent::Scroll { amount } => assert!(amount > 0 && amount <= 10),
            other => panic!("unexpected {other:?}"),
        }
    }
}

#[test]
fn recorded_pinch_session_fixture() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("pinch-session.jsonl");
    let content = std::fs::read_to_string(path).expect("fixture should be readable");
    let captures = parse_captures(&content).expect("fixture should parse");
    assert_eq!(captures.len(), 9);

    let per_frame = Pipeline::new().feed(&captures);
    let expected: Vec<Vec<PointerEvent>> = vec![
        vec![PointerEvent::DragStart],
        vec![PointerEvent::DragEnd],
        vec![PointerEvent::DoubleClick],
        vec![],
        vec![PointerEvent::DragStart],
        vec![],
        vec![],
        vec![PointerEvent::DragEnd],
        vec![],
    ];
    assert_eq!(per_frame, expected);
}
