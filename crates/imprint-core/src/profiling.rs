//! Scope profiling for layout and raster passes, backed by `puffin`.

use std::sync::OnceLock;

pub use puffin::{GlobalProfiler, profile_function, profile_scope};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilingBackend {
    /// Scopes compiled in but not recorded.
    Off,
    /// Record scopes and serve them to `puffin_viewer` on [`PUFFIN_ADDR`].
    PuffinHttp,
}

pub const PUFFIN_ADDR: &str = "127.0.0.1:8585";

static SERVER: OnceLock<puffin_http::Server> = OnceLock::new();

/// Turn scope recording on or off. Starting the HTTP server more than once
/// is a no-op.
///
/// ```no_run
/// use imprint_core::profiling::{ProfilingBackend, init_profiling};
///
/// init_profiling(ProfilingBackend::PuffinHttp);
/// ```
pub fn init_profiling(backend: ProfilingBackend) {
    let enabled = backend == ProfilingBackend::PuffinHttp;
    puffin::set_scopes_on(enabled);
    if !enabled || SERVER.get().is_some() {
        return;
    }

    match puffin_http::Server::new(PUFFIN_ADDR) {
        Ok(server) => {
            tracing::info!(addr = PUFFIN_ADDR, "puffin server listening");
            let _ = SERVER.set(server);
        }
        Err(err) => tracing::error!(addr = PUFFIN_ADDR, "puffin server failed to start: {}", err),
    }
}

/// Close the current profiler frame. Hosts call this once per composed image.
#[inline]
pub fn new_frame() {
    GlobalProfiler::lock().new_frame();
}
