use std::path::PathBuf;

/// Errors that can occur while constructing a [`crate::ctrl::MessMemCtrl`] or
/// loading its curve family. All of these are fatal: the caller must handle
/// them at startup, before any access is simulated.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("curve directory does not exist: {0}")]
    MissingDirectory(PathBuf),

    #[error("no curve files could be loaded from {0}; all buckets are empty")]
    NoCurvesLoaded(PathBuf),

    #[error("curve file {path} contains an unparseable line: {line:?}")]
    UnparseableCurveFile { path: PathBuf, line: String },

    #[error("window_size must be >= 1, got {0}")]
    InvalidWindowSize(usize),

    #[error("cpu_frequency must be > 0, got {0}")]
    InvalidCpuFrequency(f64),

    #[error("curve_frequency must be > 0, got {0}")]
    InvalidCurveFrequency(f64),
}

/// A runtime invariant the core could not maintain. Unlike [`ConfigError`],
/// this happens after construction succeeded, and indicates the loaded
/// curve data cannot answer the request it was asked to answer.
#[derive(thiserror::Error, Debug)]
pub enum StateError {
    #[error("bucket {bucket} has no curve points loaded; its curve file was missing or empty")]
    EmptyCurve { bucket: usize },
}

/// A caller contract violation. The core requires cycle values passed to
/// `access()` to be non-decreasing within one instance; violating that is a
/// programmer bug in the embedding simulator, not a runtime condition this
/// crate recovers from.
#[derive(thiserror::Error, Debug)]
pub enum UsageError {
    #[error("access cycle {cycle} is before the last observed cycle {last_cycle}")]
    NonMonotonicCycle { cycle: u64, last_cycle: u64 },
}

/// Everything [`crate::ctrl::MessMemCtrl::access`] can fail with: either a
/// caller contract violation or a runtime state problem surfacing lazily
/// from a window close.
#[derive(thiserror::Error, Debug)]
pub enum AccessError {
    #[error(transparent)]
    Usage(#[from] UsageError),
    #[error(transparent)]
    State(#[from] StateError),
}
