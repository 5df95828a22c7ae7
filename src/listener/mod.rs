use std::fmt;
use std::rc::Rc;

use crate::error::BubbleResult;
use crate::geometry::Point;

/// Lifecycle callbacks for a bubble. Every method defaults to a no-op.
pub trait BubbleListener {
    fn on_down(&self, _x: i32, _y: i32) {}

    fn on_up(&self, _x: i32, _y: i32) {}

    fn on_move(&self, _x: i32, _y: i32) {}

    fn on_click(&self) {}

    fn on_destroy(&self) {}
}

/// Capabilities a host offers to bubble code.
pub trait BubbleAction {
    /// Switches from the bubble to the host's expandable view.
    fn navigate_to_expandable_view(&self) -> BubbleResult<()> {
        Ok(())
    }
}

/// No-op action for bubbles that never navigate.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAction;

impl BubbleAction for NoAction {}

/// High-level event produced by the drag state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleEvent {
    Down(Point),
    Move(Point),
    Up(Point),
    Click,
    Destroy,
}

impl BubbleEvent {
    pub fn dispatch(self, listener: &dyn BubbleListener) {
        match self {
            Self::Down(point) => listener.on_down(point.x, point.y),
            Self::Move(point) => listener.on_move(point.x, point.y),
            Self::Up(point) => listener.on_up(point.x, point.y),
            Self::Click => listener.on_click(),
            Self::Destroy => listener.on_destroy(),
        }
    }
}

/// Ordered fan-out over registered listeners.
///
/// Listeners run in registration order for every event. A chain is itself a
/// listener, so chains can be nested without reordering.
#[derive(Clone, Default)]
pub struct ListenerChain {
    listeners: Vec<Rc<dyn BubbleListener>>,
}

impl ListenerChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, listener: Rc<dyn BubbleListener>) {
        self.listeners.push(listener);
    }

    pub fn with(mut self, listener: Rc<dyn BubbleListener>) -> Self {
        self.push(listener);
        self
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn emit(&self, event: BubbleEvent) {
        for listener in &self.listeners {
            event.dispatch(listener.as_ref());
        }
    }
}

impl BubbleListener for ListenerChain {
    fn on_down(&self, x: i32, y: i32) {
        self.emit(BubbleEvent::Down(Point::new(x, y)));
    }

    fn on_up(&self, x: i32, y: i32) {
        self.emit(BubbleEvent::Up(Point::new(x, y)));
    }

    fn on_move(&self, x: i32, y: i32) {
        self.emit(BubbleEvent::Move(Point::new(x, y)));
    }

    fn on_click(&self) {
        self.emit(BubbleEvent::Click);
    }

    fn on_destroy(&self) {
        self.emit(BubbleEvent::Destroy);
    }
}

impl fmt::Debug for ListenerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerChain")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Wraps `existing` (as it is right now) followed by `incoming`.
pub fn compose(
    existing: Option<Rc<dyn BubbleListener>>,
    incoming: Rc<dyn BubbleListener>,
) -> ListenerChain {
    let mut chain = ListenerChain::new();
    if let Some(existing) = existing {
        chain.push(existing);
    }
    chain.with(incoming)
}
