use super::{DragState, PointerEvent};
use crate::animation::EdgeSnapController;
use crate::close_zone::CloseZoneController;
use crate::geometry::Point;
use crate::listener::BubbleEvent;
use crate::overlay::SharedOverlayWindow;

/// Turns pointer input into bubble movement, close-zone feedback and
/// lifecycle events.
///
/// Lifecycle events are returned rather than dispatched so the caller can
/// hand them to listeners after releasing any borrow on the machine.
#[derive(Debug)]
pub struct DragStateMachine {
    state: DragState,
    bubble: SharedOverlayWindow,
    close_zone: Option<CloseZoneController>,
    edge_snap: Option<EdgeSnapController>,
}

impl DragStateMachine {
    pub fn new(
        bubble: SharedOverlayWindow,
        close_zone: Option<CloseZoneController>,
        edge_snap: Option<EdgeSnapController>,
    ) -> Self {
        Self {
            state: DragState::default(),
            bubble,
            close_zone,
            edge_snap,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state == DragState::Dragging
    }

    pub fn can_handle(&self, event: PointerEvent) -> bool {
        self.next_state(event).is_some()
    }

    /// State the machine would be in after `event`, or `None` when the event
    /// is ignored.
    pub fn next_state(&self, event: PointerEvent) -> Option<DragState> {
        use DragState::*;
        match (self.state, event) {
            (Destroyed, _) => None,
            (_, PointerEvent::Down(_)) => Some(Pressed),
            (Dragging, PointerEvent::Move(_)) => Some(Dragging),
            (_, PointerEvent::Move(_)) if self.close_zone.is_some() => Some(Dragging),
            (state, PointerEvent::Move(_)) => Some(state),
            (_, PointerEvent::Up(_)) if self.bubble_captured() => Some(Destroyed),
            (_, PointerEvent::Up(_)) => Some(Idle),
            (state, PointerEvent::Click) => Some(state),
        }
    }

    pub fn close_zone(&self) -> Option<&CloseZoneController> {
        self.close_zone.as_ref()
    }

    pub fn edge_snap(&self) -> Option<&EdgeSnapController> {
        self.edge_snap.as_ref()
    }

    pub fn handle(&mut self, event: PointerEvent) -> Vec<BubbleEvent> {
        let Some(next) = self.next_state(event) else {
            tracing::debug!(?event, state = ?self.state, "pointer event ignored");
            return Vec::new();
        };
        let events = match event {
            PointerEvent::Down(point) => self.on_down(point),
            PointerEvent::Move(point) => self.on_move(point),
            PointerEvent::Up(point) => self.on_up(point, next),
            PointerEvent::Click => vec![BubbleEvent::Click],
        };
        self.set_state(next);
        events
    }

    /// Hides the close zone and stops any snap, e.g. when the bubble is
    /// removed from screen.
    pub fn halt(&mut self) {
        if let Some(edge_snap) = &self.edge_snap {
            edge_snap.cancel();
        }
        if let Some(close_zone) = self.close_zone.as_mut() {
            close_zone.remove();
        }
        if self.state != DragState::Destroyed {
            self.set_state(DragState::Idle);
        }
    }

    fn on_down(&mut self, point: Point) -> Vec<BubbleEvent> {
        if let Some(edge_snap) = &self.edge_snap {
            edge_snap.cancel();
        }
        vec![BubbleEvent::Down(point)]
    }

    fn on_move(&mut self, point: Point) -> Vec<BubbleEvent> {
        self.bubble.borrow_mut().move_to(point);

        if self.state == DragState::Dragging {
            if let Some(close_zone) = self.close_zone.as_mut() {
                close_zone.pull(point);
            }
        } else if let Some(close_zone) = self.close_zone.as_mut() {
            close_zone.show();
        }

        vec![BubbleEvent::Move(point)]
    }

    fn on_up(&mut self, point: Point, next: DragState) -> Vec<BubbleEvent> {
        if let Some(close_zone) = self.close_zone.as_mut() {
            close_zone.remove();
        }

        if next == DragState::Destroyed {
            return vec![BubbleEvent::Up(point), BubbleEvent::Destroy];
        }
        if let Some(edge_snap) = &self.edge_snap {
            edge_snap.snap_to_nearest_edge(self.bubble.borrow().position());
        }
        vec![BubbleEvent::Up(point)]
    }

    fn bubble_captured(&self) -> bool {
        let position = self.bubble.borrow().position();
        self.close_zone
            .as_ref()
            .is_some_and(|close_zone| close_zone.is_captured(position))
    }

    fn set_state(&mut self, next: DragState) {
        if self.state != next {
            tracing::debug!(from = ?self.state, to = ?next, "drag state transition");
        }
        self.state = next;
    }
}
