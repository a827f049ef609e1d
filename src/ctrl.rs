use std::sync::Arc;

use crate::config::MemCtrlConfig;
use crate::controller::{ControllerState, SmoothingController};
use crate::curve::CurveStore;
use crate::error::{AccessError, ConfigError, StateError};
use crate::interpolate;
use crate::window::Window;

/// Curve-driven memory controller timing model. Owns a [`CurveStore`] and
/// the per-instance mutable state (window accumulator, smoothing
/// controller); `access()` is the single entry point simulators call once
/// per memory access.
///
/// The curve family is held behind an `Arc` so multiple controller
/// instances (e.g. one per memory channel) can share a single loaded curve
/// set without re-parsing it.
#[derive(Debug, Clone)]
pub struct MessMemCtrl {
    store: Arc<CurveStore>,
    window: Window,
    state: ControllerState,
}

impl MessMemCtrl {
    pub fn new(config: &MemCtrlConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let store = CurveStore::load(
            &config.curve_path,
            config.cpu_frequency,
            config.curve_frequency,
            config.on_core_latency,
        )?;
        Ok(Self::with_store(Arc::new(store), config.window_size))
    }

    /// Construct directly from an already-loaded, possibly shared curve
    /// family. Useful when several controllers (e.g. per-channel) are
    /// backed by the same curve directory.
    pub fn with_store(store: Arc<CurveStore>, window_size: u32) -> Self {
        let lead_off = store.lead_off_latency();
        Self {
            window: Window::new(window_size),
            state: ControllerState::initial(lead_off),
            store,
        }
    }

    /// Record one access at `cycle` and return the current latency
    /// estimate, in CPU cycles. This is always the estimate produced by the
    /// *previous* completed window: the access that closes a window is
    /// itself charged the old latency, and the recomputed estimate only
    /// takes effect starting with the next window's accesses.
    pub fn access(&mut self, cycle: u64, is_write: bool) -> Result<u64, AccessError> {
        let latency_for_this_access = self.state.current_latency();

        if let Some(sample) = self.window.record(cycle, is_write)? {
            let bucket = interpolate::read_ratio_to_bucket(sample.read_ratio);
            let bucket_index = interpolate::bucket_to_index(bucket);
            if self.store.curve(bucket_index).is_empty() {
                return Err(StateError::EmptyCurve { bucket: bucket_index }.into());
            }
            SmoothingController::blend(&mut self.state, &self.store, sample.bandwidth, bucket);
        }

        Ok(latency_for_this_access)
    }

    /// The curve family's lead-off (idle, zero-queueing) latency, in CPU
    /// cycles. Used by [`crate::event::TimingEventShim`] to split a
    /// latency estimate into its fixed and queueing-dependent parts.
    pub fn lead_off_latency(&self) -> u64 {
        self.store.lead_off_latency().round() as u64
    }

    /// Current latency estimate without recording an access; identical to
    /// the value the next call to `access()` would return absent a window
    /// close in between.
    pub fn current_latency(&self) -> u64 {
        self.state.current_latency()
    }

    /// QoS load headroom: how far the current latency estimate sits above
    /// the bucket's characterized maximum latency. `0` when the system is
    /// not over its characterized ceiling.
    pub fn qos_load_headroom(&self) -> u64 {
        let bucket_index = interpolate::bucket_to_index(self.state.last_read_bucket());
        let max_latency = self.store.max_latency_for_bucket(bucket_index).round() as u64;
        self.state.current_latency().saturating_sub(max_latency)
    }

    pub fn curve_store(&self) -> &CurveStore {
        &self.store
    }

    /// Accesses recorded in the current, still-open window. Drops back to a
    /// small number right after a window closes and resets; used by
    /// [`crate::event::TimingEventShim`] to detect a window close for
    /// observability tracing without duplicating the accounting itself.
    pub fn window_access_count(&self) -> u32 {
        self.window.count()
    }
}
