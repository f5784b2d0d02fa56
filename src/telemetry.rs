//! Opt-in `tracing` subscriber setup for hosts embedding `timeline-rs`.
//!
//! The engine only emits events; installing a subscriber is left to the
//! host unless it calls one of the helpers below with the `telemetry`
//! feature enabled.

/// Environment variable read for filter directives, e.g.
/// `TIMELINE_LOG=timeline_rs=trace`.
pub const TIMELINE_LOG_ENV: &str = "TIMELINE_LOG";

/// Directive used when `TIMELINE_LOG` is unset: engine lifecycle events
/// (chart registration, resizes, fetch fallbacks) but not per-gesture traces.
pub const DEFAULT_TIMELINE_DIRECTIVE: &str = "warn,timeline_rs=info";

/// Installs a compact fmt subscriber filtered by `TIMELINE_LOG`, falling
/// back to [`DEFAULT_TIMELINE_DIRECTIVE`].
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing(DEFAULT_TIMELINE_DIRECTIVE)
}

/// Like [`init_default_tracing`] with a caller-chosen fallback directive.
#[must_use]
pub fn init_tracing(fallback_directive: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_env(TIMELINE_LOG_ENV)
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback_directive));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_directive;
        false
    }
}
