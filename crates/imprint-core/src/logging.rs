use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,imprint=debug,imprint_text=debug,imprint_scene=debug,cosmic_text=info";

/// Install a global fmt subscriber. `RUST_LOG` overrides the default filter.
///
/// Calling this twice is harmless; the second installation is ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
