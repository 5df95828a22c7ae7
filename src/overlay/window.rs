use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::{OverlayHandle, OverlayKind, OverlaySpec, OverlaySurface};
use crate::geometry::{Point, Size};

pub type SharedOverlayWindow = Rc<RefCell<OverlayWindow>>;

/// One overlay on a surface, with the last position pushed to it.
///
/// Surface failures are logged and swallowed here. An overlay whose creation
/// failed has no handle and every later call on it is a no-op.
pub struct OverlayWindow {
    surface: Rc<dyn OverlaySurface>,
    kind: OverlayKind,
    handle: Option<OverlayHandle>,
    position: Point,
    size: Size,
    shown: bool,
}

impl OverlayWindow {
    pub fn create(surface: Rc<dyn OverlaySurface>, spec: OverlaySpec) -> Self {
        let handle = match surface.create(&spec) {
            Ok(handle) => {
                tracing::debug!(kind = ?spec.kind, ?handle, bounds = ?spec.bounds, "overlay created");
                Some(handle)
            }
            Err(err) => {
                tracing::warn!(kind = ?spec.kind, %err, "overlay creation failed; overlay disabled");
                None
            }
        };

        Self {
            surface,
            kind: spec.kind,
            handle,
            position: spec.bounds.origin(),
            size: Size::new(spec.bounds.width, spec.bounds.height),
            shown: false,
        }
    }

    pub fn shared(self) -> SharedOverlayWindow {
        Rc::new(RefCell::new(self))
    }

    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn is_attached(&self) -> bool {
        self.handle.is_some()
    }

    pub fn show(&mut self) {
        if self.shown {
            return;
        }
        let Some(handle) = self.handle else {
            return;
        };
        match self.surface.show(handle) {
            Ok(()) => self.shown = true,
            Err(err) => tracing::warn!(kind = ?self.kind, %err, "overlay show failed"),
        }
    }

    pub fn remove(&mut self) {
        if !self.shown {
            return;
        }
        self.shown = false;
        let Some(handle) = self.handle else {
            return;
        };
        if let Err(err) = self.surface.remove(handle) {
            tracing::warn!(kind = ?self.kind, %err, "overlay remove failed");
        }
    }

    pub fn move_to(&mut self, position: Point) {
        self.position = position;
        let Some(handle) = self.handle else {
            return;
        };
        if let Err(err) = self.surface.update_position(handle, position) {
            tracing::warn!(kind = ?self.kind, ?position, %err, "overlay position update failed");
        }
    }
}

impl fmt::Debug for OverlayWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayWindow")
            .field("kind", &self.kind)
            .field("handle", &self.handle)
            .field("position", &self.position)
            .field("size", &self.size)
            .field("shown", &self.shown)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::overlay::{OverlayCall, RecordingSurface};

    fn close_zone_window(surface: &Rc<RecordingSurface>) -> OverlayWindow {
        OverlayWindow::create(
            surface.clone(),
            OverlaySpec::new(OverlayKind::CloseZone, Rect::new(10, 20, 100, 100)),
        )
    }

    #[test]
    fn show_and_remove_reach_the_surface_once() {
        let surface = Rc::new(RecordingSurface::new());
        let mut window = close_zone_window(&surface);

        window.show();
        window.show();
        window.remove();
        window.remove();

        let handle = surface
            .handle_for(OverlayKind::CloseZone)
            .expect("close zone should be created");
        assert_eq!(
            surface.calls()[1..],
            [OverlayCall::Show(handle), OverlayCall::Remove(handle)]
        );
        assert!(!window.is_shown());
    }

    #[test]
    fn failed_creation_turns_every_call_into_a_no_op() {
        let surface = Rc::new(RecordingSurface::new());
        surface.fail_on(OverlayKind::CloseZone, "create");
        let mut window = close_zone_window(&surface);

        window.show();
        window.move_to(Point::new(1, 2));
        window.remove();

        assert!(!window.is_attached());
        assert!(!window.is_shown());
        assert_eq!(window.position(), Point::new(1, 2));
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn failed_show_keeps_window_hidden_and_usable() {
        let surface = Rc::new(RecordingSurface::new());
        surface.fail_on(OverlayKind::CloseZone, "show");
        let mut window = close_zone_window(&surface);

        window.show();
        assert!(!window.is_shown());

        window.remove();
        window.move_to(Point::new(5, 5));
        assert_eq!(
            surface.positions_for(OverlayKind::CloseZone),
            vec![Point::new(5, 5)]
        );
    }
}
