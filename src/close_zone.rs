use std::rc::Rc;

use serde::Deserialize;

use crate::config::CloseZoneSpec;
use crate::geometry::{closeness_ratio, Point, Rect, Size};
use crate::overlay::{OverlayKind, OverlaySpec, OverlaySurface, OverlayWindow};
use crate::screen::ScreenMetrics;

pub const DEFAULT_HORIZONTAL_DAMPING: f64 = 5.0;
pub const DEFAULT_VERTICAL_DAMPING: f64 = 10.0;
pub const DEFAULT_CAPTURE_RADIUS_DIVISOR: i32 = 15;
pub const DEFAULT_BOTTOM_PADDING_PX: i32 = 30;

const BACKGROUND_HEIGHT_DIVISOR: i32 = 4;
const BACKGROUND_ALPHA: f32 = 0.55;

/// Feel constants for the close-zone pull. Empirical, not a physical model.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CloseZoneTuning {
    pub horizontal_damping: f64,
    pub vertical_damping: f64,
    pub capture_radius_divisor: i32,
    pub bottom_padding_px: i32,
    /// Highest the zone may rise above its baseline; `None` means the
    /// capture radius.
    pub max_lift_px: Option<i32>,
}

impl Default for CloseZoneTuning {
    fn default() -> Self {
        Self {
            horizontal_damping: DEFAULT_HORIZONTAL_DAMPING,
            vertical_damping: DEFAULT_VERTICAL_DAMPING,
            capture_radius_divisor: DEFAULT_CAPTURE_RADIUS_DIVISOR,
            bottom_padding_px: DEFAULT_BOTTOM_PADDING_PX,
            max_lift_px: None,
        }
    }
}

impl CloseZoneTuning {
    /// Replaces values that would divide by zero or invert the pull.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            horizontal_damping: positive_or(self.horizontal_damping, defaults.horizontal_damping),
            vertical_damping: positive_or(self.vertical_damping, defaults.vertical_damping),
            capture_radius_divisor: if self.capture_radius_divisor > 0 {
                self.capture_radius_divisor
            } else {
                defaults.capture_radius_divisor
            },
            bottom_padding_px: self.bottom_padding_px,
            max_lift_px: self.max_lift_px.map(|lift| lift.max(0)),
        }
    }
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

/// Magnetic close target plus the optional dimming background.
#[derive(Debug)]
pub struct CloseZoneController {
    close: OverlayWindow,
    background: Option<OverlayWindow>,
    baseline: Point,
    zone_size: Size,
    bubble_size: Size,
    metrics: ScreenMetrics,
    tuning: CloseZoneTuning,
    capture_radius: i32,
}

impl CloseZoneController {
    pub fn new(
        surface: Rc<dyn OverlaySurface>,
        spec: &CloseZoneSpec,
        bubble_size: Size,
        metrics: ScreenMetrics,
        tuning: CloseZoneTuning,
        background_enabled: bool,
    ) -> Self {
        let tuning = tuning.sanitized();
        let zone_size = if spec.size.is_empty() {
            bubble_size
        } else {
            spec.size
        };
        let baseline = baseline_position(zone_size, &metrics, tuning.bottom_padding_px);
        let capture_radius = metrics.height_px / tuning.capture_radius_divisor;

        let close = OverlayWindow::create(
            surface.clone(),
            OverlaySpec::new(
                OverlayKind::CloseZone,
                Rect::from_parts(baseline, zone_size),
            )
            .with_alpha(spec.opacity)
            .with_icon(spec.icon.clone())
            .with_style(spec.style.clone()),
        );
        let background = background_enabled.then(|| {
            OverlayWindow::create(
                surface,
                OverlaySpec::new(OverlayKind::Background, background_bounds(&metrics))
                    .with_alpha(BACKGROUND_ALPHA),
            )
        });
        tracing::debug!(?baseline, capture_radius, ?zone_size, "close zone ready");

        Self {
            close,
            background,
            baseline,
            zone_size,
            bubble_size,
            metrics,
            tuning,
            capture_radius,
        }
    }

    pub fn baseline(&self) -> Point {
        self.baseline
    }

    pub fn position(&self) -> Point {
        self.close.position()
    }

    pub fn capture_radius(&self) -> i32 {
        self.capture_radius
    }

    pub fn is_shown(&self) -> bool {
        self.close.is_shown()
    }

    pub fn is_background_shown(&self) -> bool {
        self.background
            .as_ref()
            .is_some_and(OverlayWindow::is_shown)
    }

    pub fn show(&mut self) {
        if self.close.is_shown() {
            return;
        }
        if self.close.position() != self.baseline {
            self.close.move_to(self.baseline);
        }
        if let Some(background) = self.background.as_mut() {
            background.show();
        }
        self.close.show();
    }

    pub fn remove(&mut self) {
        if let Some(background) = self.background.as_mut() {
            background.remove();
        }
        self.close.remove();
    }

    pub fn closeness(&self, bubble: Point) -> f64 {
        closeness_ratio(self.baseline, bubble, self.capture_radius)
    }

    pub fn is_captured(&self, bubble: Point) -> bool {
        self.closeness(bubble) == 0.0
    }

    /// Moves the zone in reaction to the bubble at `bubble`.
    ///
    /// Inside the capture radius the zone centers itself on the bubble;
    /// outside it leans toward the bubble, damped per axis. The bubble is
    /// never moved.
    pub fn pull(&mut self, bubble: Point) {
        let ratio = self.closeness(bubble);
        let position = if ratio == 0.0 {
            self.stick_position(bubble)
        } else {
            self.pull_position(bubble, ratio)
        };
        self.close.move_to(position);
    }

    fn stick_position(&self, bubble: Point) -> Point {
        let bubble_half = self.bubble_size.half();
        let zone_half = self.zone_size.half();
        Point::new(
            saturate(
                i64::from(bubble.x) + i64::from(bubble_half.width) - i64::from(zone_half.width),
            ),
            saturate(
                i64::from(bubble.y) + i64::from(bubble_half.height)
                    - i64::from(zone_half.height),
            ),
        )
    }

    // Float math throughout; `as i32` truncates toward zero and saturates.
    fn pull_position(&self, bubble: Point, ratio: f64) -> Point {
        let half_screen = f64::from(self.metrics.half_width());
        let base_x = f64::from(self.baseline.x);
        let bubble_x = f64::from(bubble.x);
        let x = if bubble_x < half_screen {
            base_x - (half_screen - bubble_x) * ratio / self.tuning.horizontal_damping
        } else {
            base_x + (bubble_x - half_screen) * ratio / self.tuning.horizontal_damping
        };

        let lift = ((f64::from(self.metrics.height_px) - f64::from(bubble.y)) * ratio
            / self.tuning.vertical_damping)
            .trunc()
            .min(f64::from(self.max_lift()));
        Point::new(x as i32, (f64::from(self.baseline.y) - lift) as i32)
    }

    fn max_lift(&self) -> i32 {
        self.tuning.max_lift_px.unwrap_or(self.capture_radius)
    }
}

/// Horizontally centered, resting above the system bars and bottom padding.
pub fn baseline_position(zone_size: Size, metrics: &ScreenMetrics, bottom_padding_px: i32) -> Point {
    Point::new(
        metrics.half_width().saturating_sub(zone_size.width / 2),
        metrics
            .height_px
            .saturating_sub(zone_size.height)
            .saturating_sub(metrics.soft_nav_bar_height_px)
            .saturating_sub(metrics.status_bar_height_px)
            .saturating_sub(bottom_padding_px),
    )
}

fn saturate(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

fn background_bounds(metrics: &ScreenMetrics) -> Rect {
    let height = metrics.height_px / BACKGROUND_HEIGHT_DIVISOR;
    Rect::new(0, metrics.height_px - height, metrics.width_px, height)
}
