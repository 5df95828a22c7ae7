pub mod animation;
pub mod bubble;
pub mod close_zone;
pub mod config;
mod demo;
pub mod error;
pub mod geometry;
pub mod icon;
pub mod listener;
pub mod logging;
pub mod overlay;
pub mod runtime;
pub mod screen;
pub mod state;
pub use bubble::{BubbleController, BubbleEnvironment, BubbleService};
pub use config::{BubbleBuilder, BubbleConfig};
pub use error::{BubbleError, BubbleResult};
pub use listener::{BubbleAction, BubbleListener};

/// Entrypoint of the demo binary: replays a scripted drag session and logs
/// every overlay call.
pub fn run() -> anyhow::Result<()> {
    let settings = config::load_settings();
    logging::init(settings.debug_logging);
    tracing::info!("starting floating-bubble demo");

    demo::replay(&settings)?;

    tracing::info!("demo complete");
    Ok(())
}
