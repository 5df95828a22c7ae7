use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` is honoured only when debug
/// logging is enabled in settings; otherwise the level is pinned to `info`.
pub fn init(debug: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .with_target(false)
        .try_init();
}

fn env_filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    }
}
