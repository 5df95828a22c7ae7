use std::rc::Rc;
use std::time::Duration;

use anyhow::Context;
use image::{Rgba, RgbaImage};

use crate::animation::DEFAULT_SNAP_DURATION;
use crate::bubble::{
    BubbleController, BubbleEnvironment, BubbleService, DefaultView, HostLifecycle,
};
use crate::config::{BubbleBuilder, BubbleSettings, DEFAULT_BUBBLE_SIZE_PX};
use crate::geometry::Point;
use crate::icon::{FileIconResolver, IconSource};
use crate::listener::BubbleListener;
use crate::overlay::RecordingSurface;
use crate::runtime::{GdkScreenMetricsProvider, GlibFrameScheduler};
use crate::screen::{FixedScreenMetrics, ScreenMetrics, ScreenMetricsProvider};

const FALLBACK_METRICS: ScreenMetrics = ScreenMetrics::new(1080, 2400, 60, 48);
const SNAP_SETTLE_MARGIN: Duration = Duration::from_millis(150);

struct QuitOnStop(gtk4::glib::MainLoop);

impl HostLifecycle for QuitOnStop {
    fn stop(&self) {
        self.0.quit();
    }
}

struct TraceListener;

impl BubbleListener for TraceListener {
    fn on_down(&self, x: i32, y: i32) {
        tracing::info!(x, y, "bubble pressed");
    }

    fn on_up(&self, x: i32, y: i32) {
        tracing::info!(x, y, "bubble released");
    }

    fn on_click(&self) {
        tracing::info!("bubble clicked");
    }

    fn on_destroy(&self) {
        tracing::info!("bubble destroyed");
    }
}

/// Drives a scripted session: one drag released mid-screen, which snaps to
/// an edge, then a drag into the close zone, which ends the main loop.
pub(crate) fn replay(settings: &BubbleSettings) -> anyhow::Result<()> {
    let provider: Box<dyn ScreenMetricsProvider> = match gtk4::init() {
        Ok(()) => Box::new(GdkScreenMetricsProvider::new(FALLBACK_METRICS)),
        Err(err) => {
            tracing::warn!(%err, "GTK unavailable; using fallback screen metrics");
            Box::new(FixedScreenMetrics(FALLBACK_METRICS))
        }
    };
    let metrics = ScreenMetrics::query(provider.as_ref());

    let main_loop = gtk4::glib::MainLoop::new(None, false);
    let env = BubbleEnvironment::new(
        Rc::new(RecordingSurface::traced()),
        Rc::new(GlibFrameScheduler),
        metrics,
    );
    let service = BubbleService::new(env, Some(Rc::new(QuitOnStop(main_loop.clone()))));
    service.setup(DefaultView::Bubble, &FileIconResolver, |_action| {
        BubbleBuilder::new()
            .bubble_image(IconSource::from(placeholder_bubble_image()))
            .start_position(0, metrics.height_px / 3)
            .with_settings(settings)
            .add_listener(Rc::new(TraceListener))
    })?;
    let bubble = service
        .bubble()
        .context("bubble service started without a bubble")?;
    let target = bubble
        .close_zone_baseline()
        .context("close zone disabled in settings; nothing would end the demo")?;

    drag(
        &bubble,
        bubble.position(),
        Point::new(metrics.width_px * 3 / 5, metrics.height_px / 2),
    );

    let settle = settings
        .edge_snap
        .map(|edge_snap| edge_snap.timing().duration)
        .unwrap_or(DEFAULT_SNAP_DURATION)
        + SNAP_SETTLE_MARGIN;
    gtk4::glib::timeout_add_local_once(settle, move || {
        tracing::info!(position = ?bubble.position(), "edge snap settled");
        drag(&bubble, bubble.position(), target);
    });

    main_loop.run();
    tracing::info!(running = service.is_running(), "demo finished");
    Ok(())
}

fn drag(bubble: &BubbleController, from: Point, to: Point) {
    const STEPS: i32 = 8;
    bubble.on_down(from.x, from.y);
    for step in 1..=STEPS {
        bubble.on_move(
            from.x + (to.x - from.x) * step / STEPS,
            from.y + (to.y - from.y) * step / STEPS,
        );
    }
    bubble.on_up(to.x, to.y);
}

fn placeholder_bubble_image() -> RgbaImage {
    let size = DEFAULT_BUBBLE_SIZE_PX as u32;
    RgbaImage::from_pixel(size, size, Rgba([52, 120, 246, 255]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ManualFrameScheduler;
    use crate::state::DragState;

    #[test]
    fn scripted_drag_into_close_zone_destroys_bubble() {
        let env = BubbleEnvironment::new(
            Rc::new(RecordingSurface::new()),
            Rc::new(ManualFrameScheduler::new()),
            FALLBACK_METRICS,
        );
        let config = BubbleBuilder::new()
            .bubble_image(IconSource::from(placeholder_bubble_image()))
            .build(&FileIconResolver)
            .expect("config");
        let bubble = BubbleController::new(config, &env);
        bubble.show();
        let target = bubble.close_zone_baseline().expect("close zone enabled");

        drag(&bubble, bubble.position(), target);

        assert_eq!(bubble.drag_state(), DragState::Destroyed);
        assert!(!bubble.is_shown());
    }
}
