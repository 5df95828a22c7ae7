use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use super::{ease_out_quad, FrameControl, FrameScheduler};
use crate::geometry::Point;
use crate::overlay::SharedOverlayWindow;

pub const DEFAULT_SNAP_DURATION: Duration = Duration::from_millis(250);
pub const DEFAULT_SNAP_FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSnapTiming {
    pub duration: Duration,
    pub frame_interval: Duration,
}

impl Default for EdgeSnapTiming {
    fn default() -> Self {
        Self {
            duration: DEFAULT_SNAP_DURATION,
            frame_interval: DEFAULT_SNAP_FRAME_INTERVAL,
        }
    }
}

impl EdgeSnapTiming {
    /// Frames the snap may use; the last one always lands on the target.
    pub fn frame_count(&self) -> u32 {
        let interval = self.frame_interval.as_micros().max(1);
        let frames = self.duration.as_micros().div_ceil(interval);
        u32::try_from(frames).unwrap_or(u32::MAX).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
}

/// Nearest horizontal edge for a bubble whose left side is at `current_x`.
///
/// Returns the edge and the x the bubble must reach; ties go left.
pub fn nearest_edge(current_x: i32, screen_width: i32, bubble_width: i32) -> (Edge, i32) {
    let right_x = screen_width.saturating_sub(bubble_width);
    let to_left = i64::from(current_x).abs();
    let to_right = (i64::from(right_x) - i64::from(current_x)).abs();
    if to_left <= to_right {
        (Edge::Left, 0)
    } else {
        (Edge::Right, right_x)
    }
}

/// Pure frame-by-frame interpolation of one snap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSnapAnimation {
    from: Point,
    target_x: i32,
    frame: u32,
    frames: u32,
}

impl EdgeSnapAnimation {
    pub fn new(from: Point, target_x: i32, frames: u32) -> Self {
        Self {
            from,
            target_x,
            frame: 0,
            frames: frames.max(1),
        }
    }

    pub fn target(&self) -> Point {
        Point::new(self.target_x, self.from.y)
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= self.frames
    }

    pub fn step(&mut self) -> Option<Point> {
        if self.is_finished() {
            return None;
        }
        self.frame += 1;
        if self.is_finished() {
            return Some(self.target());
        }

        let t = self.frame as f32 / self.frames as f32;
        let span = (i64::from(self.target_x) - i64::from(self.from.x)) as f64;
        let travel = (span * f64::from(ease_out_quad(t))).round();
        Some(Point::new(
            (f64::from(self.from.x) + travel) as i32,
            self.from.y,
        ))
    }
}

/// Slides the bubble overlay to the nearest horizontal edge after a release.
pub struct EdgeSnapController {
    bubble: SharedOverlayWindow,
    scheduler: Rc<dyn FrameScheduler>,
    screen_width: i32,
    timing: EdgeSnapTiming,
    generation: Rc<Cell<u64>>,
    running: Rc<Cell<bool>>,
}

impl EdgeSnapController {
    pub fn new(
        bubble: SharedOverlayWindow,
        scheduler: Rc<dyn FrameScheduler>,
        screen_width: i32,
        timing: EdgeSnapTiming,
    ) -> Self {
        Self {
            bubble,
            scheduler,
            screen_width,
            timing,
            generation: Rc::new(Cell::new(0)),
            running: Rc::new(Cell::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Starts a snap from `current` and returns the position it will end at.
    ///
    /// Any snap already in flight is cancelled first.
    pub fn snap_to_nearest_edge(&self, current: Point) -> Point {
        self.cancel();

        let bubble_width = self.bubble.borrow().size().width;
        let (edge, target_x) = nearest_edge(current.x, self.screen_width, bubble_width);
        let mut animation = EdgeSnapAnimation::new(current, target_x, self.timing.frame_count());
        let target = animation.target();

        let generation = self.generation.get();
        let latest_generation = self.generation.clone();
        let running = self.running.clone();
        let bubble = self.bubble.clone();
        running.set(true);
        tracing::debug!(?edge, from = ?current, ?target, "edge snap started");

        self.scheduler.schedule_frames(
            self.timing.frame_interval,
            Box::new(move || {
                if latest_generation.get() != generation {
                    return FrameControl::Break;
                }
                let Some(position) = animation.step() else {
                    running.set(false);
                    return FrameControl::Break;
                };
                bubble.borrow_mut().move_to(position);
                if animation.is_finished() {
                    running.set(false);
                    tracing::debug!(?position, "edge snap finished");
                    FrameControl::Break
                } else {
                    FrameControl::Continue
                }
            }),
        );
        target
    }

    /// Stops the running snap; the last position pushed stays where it is.
    pub fn cancel(&self) {
        if self.running.replace(false) {
            tracing::debug!("edge snap cancelled");
        }
        self.generation.set(self.generation.get().wrapping_add(1));
    }
}

impl fmt::Debug for EdgeSnapController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeSnapController")
            .field("screen_width", &self.screen_width)
            .field("timing", &self.timing)
            .field("generation", &self.generation.get())
            .field("running", &self.running.get())
            .finish_non_exhaustive()
    }
}
