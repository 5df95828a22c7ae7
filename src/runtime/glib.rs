use std::time::Duration;

use gtk4::prelude::*;

use crate::animation::{FrameControl, FrameScheduler, FrameTick};
use crate::screen::{ScreenMetrics, ScreenMetricsProvider};

/// Runs frame ticks on the thread-default GLib main context.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlibFrameScheduler;

impl FrameScheduler for GlibFrameScheduler {
    fn schedule_frames(&self, interval: Duration, mut tick: FrameTick) {
        gtk4::glib::timeout_add_local(interval, move || match tick() {
            FrameControl::Continue => gtk4::glib::ControlFlow::Continue,
            FrameControl::Break => gtk4::glib::ControlFlow::Break,
        });
    }
}

/// Reads the first monitor of the default display.
///
/// GDK exposes no system bars, so both insets come from the caller.
#[derive(Debug, Clone, Copy)]
pub struct GdkScreenMetricsProvider {
    fallback: ScreenMetrics,
}

impl GdkScreenMetricsProvider {
    pub fn new(fallback: ScreenMetrics) -> Self {
        Self { fallback }
    }
}

impl ScreenMetricsProvider for GdkScreenMetricsProvider {
    fn get(&self) -> ScreenMetrics {
        let Some(display) = gtk4::gdk::Display::default() else {
            tracing::debug!("no default display; using fallback metrics");
            return self.fallback;
        };
        let monitors = display.monitors();
        let Some(monitor) = monitors
            .item(0)
            .and_then(|item| item.downcast::<gtk4::gdk::Monitor>().ok())
        else {
            tracing::debug!("display has no monitors; using fallback metrics");
            return self.fallback;
        };

        let geometry = monitor.geometry();
        ScreenMetrics::new(
            geometry.width().max(1),
            geometry.height().max(1),
            self.fallback.status_bar_height_px,
            self.fallback.soft_nav_bar_height_px,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn glib_scheduler_runs_ticks_until_break() {
        let context = gtk4::glib::MainContext::new();
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();

        context
            .with_thread_default(|| {
                GlibFrameScheduler.schedule_frames(
                    Duration::from_millis(1),
                    Box::new(move || {
                        seen.set(seen.get() + 1);
                        if seen.get() == 3 {
                            FrameControl::Break
                        } else {
                            FrameControl::Continue
                        }
                    }),
                );
                while count.get() < 3 {
                    context.iteration(true);
                }
            })
            .expect("context should be acquirable");

        assert_eq!(count.get(), 3);
    }
}
