//! GTK-backed implementations of the collaborator traits.

mod glib;

pub use glib::{GdkScreenMetricsProvider, GlibFrameScheduler};
