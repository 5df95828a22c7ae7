//! Pixel geometry shared by the bubble, close zone and snap animation.
//!
//! Every position in this crate is the top-left corner of an overlay.

use serde::Deserialize;

use crate::screen::ScreenMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub const fn half(self) -> Self {
        Self {
            width: self.width / 2,
            height: self.height / 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub const fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }
}

pub fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    (x2 - x1).hypot(y2 - y1)
}

/// Saturating proximity score between a moving point and a fixed target.
///
/// Returns `0.0` once the point is within `capture_radius` of the target
/// (the boundary and a zero distance included) and approaches `1.0` as the
/// point moves away. The value drives the close-zone pull; it is not a
/// linear distance fraction.
pub fn closeness_ratio(target: Point, point: Point, capture_radius: i32) -> f64 {
    let distance = distance(
        f64::from(target.x),
        f64::from(target.y),
        f64::from(point.x),
        f64::from(point.y),
    );
    if distance == 0.0 {
        return 0.0;
    }

    let reach = f64::from(capture_radius) / distance;
    if reach > 1.0 {
        0.0
    } else {
        1.0 - reach
    }
}

/// Strip along the left edge that the host should keep free of system
/// back-gestures while the bubble is on screen.
pub fn gesture_exclusion_rect(bubble_width: i32, metrics: &ScreenMetrics) -> Rect {
    Rect::new(0, 0, bubble_width.max(0), metrics.height_px)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: Point = Point::new(100, 100);
    const RADIUS: i32 = 20;

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(distance(0.0, 0.0, 3.0, 4.0), 5.0);
        assert_eq!(distance(-1.0, -1.0, -1.0, -1.0), 0.0);
    }

    #[test]
    fn closeness_ratio_is_zero_inside_capture_radius() {
        assert_eq!(closeness_ratio(TARGET, Point::new(100, 100), RADIUS), 0.0);
        assert_eq!(closeness_ratio(TARGET, Point::new(100, 115), RADIUS), 0.0);
    }

    #[test]
    fn closeness_ratio_captures_exact_boundary() {
        assert_eq!(closeness_ratio(TARGET, Point::new(120, 100), RADIUS), 0.0);
        assert_eq!(closeness_ratio(TARGET, Point::new(100, 80), RADIUS), 0.0);
    }

    #[test]
    fn closeness_ratio_just_outside_boundary_is_small_but_positive() {
        let ratio = closeness_ratio(TARGET, Point::new(121, 100), RADIUS);
        assert!(ratio > 0.0 && ratio < 0.05, "ratio was {ratio}");
    }

    #[test]
    fn closeness_ratio_matches_formula_outside_radius() {
        let ratio = closeness_ratio(TARGET, Point::new(200, 100), RADIUS);
        assert!((ratio - 0.8).abs() < 1e-9, "ratio was {ratio}");
    }

    #[test]
    fn closeness_ratio_approaches_one_far_away() {
        let ratio = closeness_ratio(TARGET, Point::new(10_000, 100), RADIUS);
        assert!(ratio < 1.0);
        assert!((1.0 - ratio) < 0.003, "ratio was {ratio}");
    }

    #[test]
    fn closeness_ratio_with_zero_radius_never_captures_distinct_points() {
        assert_eq!(closeness_ratio(TARGET, TARGET, 0), 0.0);
        assert_eq!(closeness_ratio(TARGET, Point::new(101, 100), 0), 1.0);
    }

    #[test]
    fn gesture_exclusion_spans_full_screen_height() {
        let metrics = ScreenMetrics::new(1080, 2400, 60, 48);
        assert_eq!(
            gesture_exclusion_rect(160, &metrics),
            Rect::new(0, 0, 160, 2400)
        );
    }
}
