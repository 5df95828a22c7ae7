//! Frame-driven animation primitives.
//!
//! Animations never block: each one is a tick closure handed to a
//! [`FrameScheduler`], which calls it once per frame until it returns
//! [`FrameControl::Break`].

mod edge_snap;
mod scheduler;

use std::time::Duration;

pub use edge_snap::{
    nearest_edge, Edge, EdgeSnapAnimation, EdgeSnapController, EdgeSnapTiming,
    DEFAULT_SNAP_DURATION, DEFAULT_SNAP_FRAME_INTERVAL,
};
pub use scheduler::ManualFrameScheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Break,
}

pub type FrameTick = Box<dyn FnMut() -> FrameControl>;

pub trait FrameScheduler {
    fn schedule_frames(&self, interval: Duration, tick: FrameTick);
}

pub fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_out_quad_hits_endpoints_and_front_loads_motion() {
        assert_eq!(ease_out_quad(0.0), 0.0);
        assert_eq!(ease_out_quad(1.0), 1.0);
        assert_eq!(ease_out_quad(0.5), 0.75);
        assert_eq!(ease_out_quad(2.0), 1.0);
    }
}
