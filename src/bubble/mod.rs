mod service;

use std::cell::RefCell;
use std::rc::Rc;

use crate::animation::{EdgeSnapController, FrameScheduler};
use crate::close_zone::CloseZoneController;
use crate::config::BubbleConfig;
use crate::geometry::{gesture_exclusion_rect, Point, Rect};
use crate::listener::{BubbleEvent, ListenerChain};
use crate::overlay::{OverlayKind, OverlaySpec, OverlaySurface, OverlayWindow, SharedOverlayWindow};
use crate::screen::ScreenMetrics;
use crate::state::{DragState, DragStateMachine, PointerEvent};

pub use service::{BubbleService, DefaultView, ExpandableAction, ExpandableView, HostLifecycle};

/// Collaborators every bubble on a host shares.
#[derive(Clone)]
pub struct BubbleEnvironment {
    pub surface: Rc<dyn OverlaySurface>,
    pub scheduler: Rc<dyn FrameScheduler>,
    pub metrics: ScreenMetrics,
}

impl BubbleEnvironment {
    pub fn new(
        surface: Rc<dyn OverlaySurface>,
        scheduler: Rc<dyn FrameScheduler>,
        metrics: ScreenMetrics,
    ) -> Self {
        Self {
            surface,
            scheduler,
            metrics,
        }
    }
}

/// One on-screen bubble: its overlay, its drag state machine and the
/// composed listener that receives its lifecycle events.
pub struct BubbleController {
    bubble: SharedOverlayWindow,
    machine: RefCell<DragStateMachine>,
    listeners: ListenerChain,
    metrics: ScreenMetrics,
}

impl BubbleController {
    pub fn new(config: BubbleConfig, env: &BubbleEnvironment) -> Self {
        let BubbleConfig {
            bubble: bubble_spec,
            close_zone: close_zone_spec,
            start_position,
            close_zone_enabled,
            edge_snap_enabled,
            bottom_background_enabled,
            tuning,
            edge_snap_timing,
            listeners,
        } = config;
        let metrics = env.metrics;

        let bubble = OverlayWindow::create(
            env.surface.clone(),
            OverlaySpec::new(
                OverlayKind::Bubble,
                Rect::from_parts(start_position, bubble_spec.size),
            )
            .with_alpha(bubble_spec.opacity)
            .with_icon(bubble_spec.icon)
            .with_style(bubble_spec.style)
            .with_gesture_exclusion(gesture_exclusion_rect(bubble_spec.size.width, &metrics)),
        )
        .shared();

        let close_zone = close_zone_enabled.then(|| {
            CloseZoneController::new(
                env.surface.clone(),
                &close_zone_spec,
                bubble_spec.size,
                metrics,
                tuning,
                bottom_background_enabled,
            )
        });
        let edge_snap = edge_snap_enabled.then(|| {
            EdgeSnapController::new(
                bubble.clone(),
                env.scheduler.clone(),
                metrics.width_px,
                edge_snap_timing,
            )
        });
        tracing::debug!(
            close_zone_enabled,
            edge_snap_enabled,
            bottom_background_enabled,
            listeners = listeners.len(),
            "bubble controller created"
        );

        Self {
            machine: RefCell::new(DragStateMachine::new(bubble.clone(), close_zone, edge_snap)),
            bubble,
            listeners,
            metrics,
        }
    }

    pub fn show(&self) {
        self.bubble.borrow_mut().show();
    }

    /// Removes the bubble, the close zone and the background from screen.
    pub fn remove(&self) {
        self.machine.borrow_mut().halt();
        self.bubble.borrow_mut().remove();
    }

    pub fn is_shown(&self) -> bool {
        self.bubble.borrow().is_shown()
    }

    pub fn position(&self) -> Point {
        self.bubble.borrow().position()
    }

    pub fn drag_state(&self) -> DragState {
        self.machine.borrow().state()
    }

    pub fn metrics(&self) -> ScreenMetrics {
        self.metrics
    }

    /// Resting position of the close zone, if it is enabled.
    pub fn close_zone_baseline(&self) -> Option<Point> {
        self.machine
            .borrow()
            .close_zone()
            .map(CloseZoneController::baseline)
    }

    pub fn on_down(&self, x: i32, y: i32) {
        self.handle(PointerEvent::Down(Point::new(x, y)));
    }

    pub fn on_move(&self, x: i32, y: i32) {
        self.handle(PointerEvent::Move(Point::new(x, y)));
    }

    pub fn on_up(&self, x: i32, y: i32) {
        self.handle(PointerEvent::Up(Point::new(x, y)));
    }

    /// Tap recognised by the host gesture layer.
    pub fn on_click(&self) {
        self.handle(PointerEvent::Click);
    }

    pub fn handle(&self, event: PointerEvent) {
        let events = self.machine.borrow_mut().handle(event);
        for event in events {
            if event == BubbleEvent::Destroy {
                tracing::debug!("bubble released in close zone");
                self.remove();
            }
            self.listeners.emit(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use image::{Rgba, RgbaImage};

    use super::*;
    use crate::animation::ManualFrameScheduler;
    use crate::config::BubbleBuilder;
    use crate::icon::{FileIconResolver, IconSource};
    use crate::listener::BubbleListener;
    use crate::overlay::{OverlayCall, RecordingSurface};

    const METRICS: ScreenMetrics = ScreenMetrics::new(1080, 2400, 60, 48);

    #[derive(Default)]
    struct EventLog(RefCell<Vec<String>>);

    impl BubbleListener for EventLog {
        fn on_down(&self, x: i32, y: i32) {
            self.0.borrow_mut().push(format!("down({x},{y})"));
        }

        fn on_up(&self, x: i32, y: i32) {
            self.0.borrow_mut().push(format!("up({x},{y})"));
        }

        fn on_move(&self, x: i32, y: i32) {
            self.0.borrow_mut().push(format!("move({x},{y})"));
        }

        fn on_click(&self) {
            self.0.borrow_mut().push("click".to_string());
        }

        fn on_destroy(&self) {
            self.0.borrow_mut().push("destroy".to_string());
        }
    }

    fn builder() -> BubbleBuilder {
        BubbleBuilder::new()
            .bubble_image(IconSource::from(RgbaImage::from_pixel(
                4,
                4,
                Rgba([0, 0, 255, 255]),
            )))
            .start_position(40, 600)
    }

    fn environment() -> (Rc<RecordingSurface>, Rc<ManualFrameScheduler>, BubbleEnvironment) {
        let surface = Rc::new(RecordingSurface::new());
        let scheduler = Rc::new(ManualFrameScheduler::new());
        let env = BubbleEnvironment::new(surface.clone(), scheduler.clone(), METRICS);
        (surface, scheduler, env)
    }

    #[test]
    fn construction_creates_overlays_for_enabled_features_only() {
        let (surface, _scheduler, env) = environment();
        let config = builder()
            .bottom_background(true)
            .build(&FileIconResolver)
            .expect("config");

        let controller = BubbleController::new(config, &env);

        let created: Vec<OverlayKind> = surface
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                OverlayCall::Create { kind, .. } => Some(kind),
                _ => None,
            })
            .collect();
        assert_eq!(
            created,
            vec![
                OverlayKind::Bubble,
                OverlayKind::CloseZone,
                OverlayKind::Background
            ]
        );
        assert_eq!(controller.position(), Point::new(40, 600));
        assert_eq!(controller.close_zone_baseline(), Some(Point::new(460, 2102)));
        assert!(!controller.is_shown());

        let (surface, _scheduler, env) = environment();
        let config = builder()
            .close_zone(false)
            .build(&FileIconResolver)
            .expect("config");
        BubbleController::new(config, &env);
        assert_eq!(surface.calls().len(), 1);
    }

    #[test]
    fn missing_image_fails_before_any_overlay_call() {
        let (surface, _scheduler, _env) = environment();
        let result = BubbleBuilder::new().build(&FileIconResolver);

        assert!(result.is_err());
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn show_and_remove_toggle_the_bubble() {
        let (surface, _scheduler, env) = environment();
        let controller =
            BubbleController::new(builder().build(&FileIconResolver).expect("config"), &env);

        controller.show();
        assert!(surface.is_visible(OverlayKind::Bubble));
        controller.remove();
        controller.remove();
        assert!(!surface.is_visible(OverlayKind::Bubble));
    }

    #[test]
    fn capture_tears_down_every_overlay_and_notifies_listeners() {
        let (surface, scheduler, env) = environment();
        let log = Rc::new(EventLog::default());
        let config = builder()
            .bottom_background(true)
            .add_listener(log.clone())
            .build(&FileIconResolver)
            .expect("config");
        let controller = BubbleController::new(config, &env);
        controller.show();

        controller.on_down(40, 600);
        controller.on_move(300, 1500);
        assert!(surface.is_visible(OverlayKind::CloseZone));
        assert!(surface.is_visible(OverlayKind::Background));
        controller.on_move(460, 2102);
        controller.on_up(460, 2102);

        assert_eq!(
            *log.0.borrow(),
            vec![
                "down(40,600)",
                "move(300,1500)",
                "move(460,2102)",
                "up(460,2102)",
                "destroy"
            ]
        );
        assert_eq!(controller.drag_state(), DragState::Destroyed);
        assert!(!surface.is_visible(OverlayKind::Bubble));
        assert!(!surface.is_visible(OverlayKind::CloseZone));
        assert!(!surface.is_visible(OverlayKind::Background));
        assert_eq!(scheduler.scheduled_count(), 0);

        controller.on_down(0, 0);
        assert_eq!(log.0.borrow().len(), 5);
    }

    #[test]
    fn release_outside_snaps_bubble_to_the_left_edge() {
        let (surface, scheduler, env) = environment();
        let controller =
            BubbleController::new(builder().build(&FileIconResolver).expect("config"), &env);
        controller.show();

        controller.on_down(40, 600);
        controller.on_move(200, 700);
        controller.on_move(250, 720);
        controller.on_up(250, 720);
        scheduler.run_until_idle(100);

        assert_eq!(controller.position(), Point::new(0, 720));
        assert_eq!(
            surface.positions_for(OverlayKind::Bubble).last(),
            Some(&Point::new(0, 720))
        );
        assert_eq!(controller.drag_state(), DragState::Idle);
    }

    #[test]
    fn listener_may_remove_bubble_from_inside_a_callback() {
        struct RemoveOnDestroy(RefCell<Option<Rc<BubbleController>>>);

        impl BubbleListener for RemoveOnDestroy {
            fn on_destroy(&self) {
                if let Some(controller) = self.0.borrow().as_ref() {
                    controller.remove();
                }
            }
        }

        let (surface, _scheduler, env) = environment();
        let hook = Rc::new(RemoveOnDestroy(RefCell::new(None)));
        let config = builder()
            .add_listener(hook.clone())
            .build(&FileIconResolver)
            .expect("config");
        let controller = Rc::new(BubbleController::new(config, &env));
        *hook.0.borrow_mut() = Some(controller.clone());
        controller.show();

        controller.on_down(40, 600);
        controller.on_move(460, 2102);
        controller.on_up(460, 2102);

        assert!(!surface.is_visible(OverlayKind::Bubble));
        hook.0.borrow_mut().take();
    }
}
