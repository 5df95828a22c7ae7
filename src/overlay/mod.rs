mod recording;
mod window;

use thiserror::Error;

use crate::geometry::{Point, Rect};
use crate::icon::Icon;

pub use recording::{OverlayCall, RecordingSurface};
pub use window::{OverlayWindow, SharedOverlayWindow};

pub type OverlayResult<T> = std::result::Result<T, OverlayError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Bubble,
    CloseZone,
    Background,
}

/// Opaque open/exit animation token handed through to the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleToken(pub String);

impl StyleToken {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlayFlags {
    pub focusable: bool,
    pub touchable: bool,
    pub watch_outside_touch: bool,
    pub translucent_navigation: bool,
}

impl OverlayFlags {
    pub const fn bubble() -> Self {
        Self {
            focusable: false,
            touchable: true,
            watch_outside_touch: false,
            translucent_navigation: false,
        }
    }

    pub const fn close_zone() -> Self {
        Self {
            focusable: false,
            touchable: false,
            watch_outside_touch: true,
            translucent_navigation: true,
        }
    }

    pub const fn background() -> Self {
        Self {
            focusable: false,
            touchable: false,
            watch_outside_touch: false,
            translucent_navigation: true,
        }
    }
}

/// Everything a surface needs to create one positioned rectangle.
#[derive(Debug, Clone)]
pub struct OverlaySpec {
    pub kind: OverlayKind,
    pub bounds: Rect,
    pub alpha: f32,
    pub flags: OverlayFlags,
    pub icon: Option<Icon>,
    pub style: Option<StyleToken>,
    pub gesture_exclusion: Option<Rect>,
}

impl OverlaySpec {
    pub fn new(kind: OverlayKind, bounds: Rect) -> Self {
        let flags = match kind {
            OverlayKind::Bubble => OverlayFlags::bubble(),
            OverlayKind::CloseZone => OverlayFlags::close_zone(),
            OverlayKind::Background => OverlayFlags::background(),
        };
        Self {
            kind,
            bounds,
            alpha: 1.0,
            flags,
            icon: None,
            style: None,
            gesture_exclusion: None,
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_style(mut self, style: Option<StyleToken>) -> Self {
        self.style = style;
        self
    }

    pub fn with_gesture_exclusion(mut self, rect: Rect) -> Self {
        self.gesture_exclusion = Some(rect);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    #[error("overlay {0:?} is not known to the surface")]
    UnknownHandle(OverlayHandle),
    #[error("overlay surface failed to {operation}: {reason}")]
    Surface {
        operation: &'static str,
        reason: String,
    },
}

/// Window-system collaborator that owns the actual on-screen surfaces.
///
/// Implementations must treat `show`, `remove` and `update_position` as
/// idempotent: removing an overlay that is not shown is not an error.
pub trait OverlaySurface {
    fn create(&self, spec: &OverlaySpec) -> OverlayResult<OverlayHandle>;
    fn show(&self, handle: OverlayHandle) -> OverlayResult<()>;
    fn update_position(&self, handle: OverlayHandle, position: Point) -> OverlayResult<()>;
    fn remove(&self, handle: OverlayHandle) -> OverlayResult<()>;
}
