//! Frame-normalized geometry.

use airpoint_common::error::{AirpointError, AirpointResult};
use airpoint_hand_model::landmark::Point2;

/// Scale a pixel-space point into `[0, 1]` frame coordinates, each axis by
/// its own dimension.
pub fn normalize_point(p: Point2, frame_w: u32, frame_h: u32) -> AirpointResult<Point2> {
    if frame_w == 0 || frame_h == 0 {
        return Err(AirpointError::invalid_frame_dimensions(frame_w, frame_h));
    }
    Ok(Point2::new(p.x / frame_w as f64, p.y / frame_h as f64))
}

/// Euclidean distance between two landmarks after normalizing both by the
/// frame size.
pub fn normalized_distance(p1: Point2, p2: Point2, frame_w: u32, frame_h: u32) -> AirpointResult<f64> {
    let a = normalize_point(p1, frame_w, frame_h)?;
    let b = normalize_point(p2, frame_w, frame_h)?;
    Ok((b.x - a.x).hypot(b.y - a.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_axes_scale_independently() {
        // 64px across a 640px frame and 48px down a 480px frame are both 0.1.
        let d = normalized_distance(
            Point2::new(0.0, 0.0),
            Point2::new(64.0, 48.0),
            640,
            480,
        )
        .unwrap();
        assert!((d - 0.1f64.hypot(0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_zero_dimensions_fail() {
        let p = Point2::new(1.0, 1.0);
        assert!(matches!(
            normalized_distance(p, p, 0, 480),
            Err(AirpointError::InvalidFrameDimensions { width: 0, height: 480 })
        ));
        assert!(normalize_point(p, 640, 0).is_err());
    }

    #[test]
    fn test_same_point_is_zero() {
        let p = Point2::new(123.0, 45.0);
        assert_eq!(normalized_distance(p, p, 640, 480).unwrap(), 0.0);
    }

    proptest! {
        #[test]
        fn distance_is_symmetric_and_non_negative(
            x1 in 0.0f64..1920.0, y1 in 0.0f64..1080.0,
            x2 in 0.0f64..1920.0, y2 in 0.0f64..1080.0,
            w in 1u32..4096, h in 1u32..4096,
        ) {
            let a = Point2::new(x1, y1);
            let b = Point2::new(x2, y2);
            let ab = normalized_distance(a, b, w, h).unwrap();
            let ba = normalized_distance(b, a, w, h).unwrap();
            prop_assert!(ab >= 0.0);
            prop_assert!((ab - ba).abs() < 1e-12);
        }
    }
}
