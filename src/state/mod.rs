pub mod event;
pub mod machine;
pub mod model;

pub use event::PointerEvent;
pub use machine::DragStateMachine;
pub use model::DragState;
