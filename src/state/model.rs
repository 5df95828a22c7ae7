/// Phase of the current pointer interaction with a bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Pointer is down but the bubble has not started dragging yet.
    Pressed,
    Dragging,
    /// Released inside the close zone; the bubble accepts no further input.
    Destroyed,
}

impl DragState {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Destroyed)
    }
}
