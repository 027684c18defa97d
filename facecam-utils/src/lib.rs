//! Common helpers shared across facecam crates.

/// Detector and application configuration.
pub mod config;
/// 2D point primitive shared by the geometry core.
pub mod point;
/// Instrumentation helpers for optional performance tracing.
pub mod telemetry;

use anyhow::Result;
use log::LevelFilter;

pub use config::{
    ClassificationMode, ContourMode, DetectorSettings, FaceCamSettings, LandmarkMode,
    PerformanceMode, TelemetrySettings,
};
pub use point::Point;
pub use telemetry::{
    TimingGuard, configure as configure_telemetry, telemetry_allows, telemetry_enabled,
    timing_guard,
};

/// Initialize logging once for host applications and tests.
///
/// Respects the `RUST_LOG` environment variable when set; otherwise falls
/// back to the provided default filter level. Calling it more than once is
/// harmless.
pub fn init_logging(default_filter: LevelFilter) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter.as_str()),
    );
    builder.filter_module("facecam::telemetry", LevelFilter::Trace);

    if builder.try_init().is_err() {
        // Logger already initialized; nothing to do.
    }
    Ok(())
}
