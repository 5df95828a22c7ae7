use crate::geometry::Point;

/// Raw pointer input, already translated to the bubble's top-left position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up(Point),
    Click,
}
