//! Opt-in `tracing` setup for hosts that do not install their own subscriber.
//!
//! Log levels used by the crate: binding changes at `debug`, per-entry
//! updates at `trace`, desyncs and widget rejections at `warn`.

/// Filter used when `RUST_LOG` is unset: warnings everywhere, binding
/// activity from this crate.
pub const DEFAULT_FILTER: &str = "warn,chart_curve_sync=debug";

/// Installs a compact `fmt` subscriber honoring `RUST_LOG`, falling back to
/// [`DEFAULT_FILTER`].
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already set.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with(DEFAULT_FILTER)
}

/// Same as [`init_default_tracing`] with an explicit fallback directive.
#[must_use]
pub fn init_tracing_with(fallback_filter: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .or_else(|_| tracing_subscriber::EnvFilter::try_new(fallback_filter));
        let Ok(filter) = filter else {
            return false;
        };
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_filter;
        false
    }
}
