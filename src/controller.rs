use crate::curve::CurveStore;
use crate::interpolate;

/// First-order low-pass filter coefficient. Each new bandwidth/latency
/// sample is blended with the running estimate at this weight; the
/// complement (`1 - CONVERGE_SPEED`) weights the previous estimate. Smaller
/// values converge more slowly but oscillate less.
pub const CONVERGE_SPEED: f64 = 0.05;

/// Per-increment step applied to `overflow_factor` while saturated, and
/// per-window decay applied once saturation clears.
const OVERFLOW_STEP: f64 = 0.02;
const OVERFLOW_DECAY: f64 = 0.01;

/// Mutable state the controller carries across windows: the blended
/// bandwidth/latency estimates, the saturation accumulator, and the bucket
/// selected by the most recent update (exposed for QoS queries).
#[derive(Debug, Clone)]
pub struct ControllerState {
    last_bandwidth: f64,
    last_latency: f64,
    overflow_factor: f64,
    current_latency: u64,
    last_read_bucket: usize,
}

impl ControllerState {
    /// Initial state: zero bandwidth, latency pinned to the curve family's
    /// lead-off latency, no overflow.
    pub fn initial(lead_off_latency: f64) -> Self {
        Self {
            last_bandwidth: 0.0,
            last_latency: lead_off_latency,
            overflow_factor: 0.0,
            current_latency: lead_off_latency.round() as u64,
            last_read_bucket: 0,
        }
    }

    pub fn current_latency(&self) -> u64 {
        self.current_latency
    }

    pub fn overflow_factor(&self) -> f64 {
        self.overflow_factor
    }

    pub fn last_read_bucket(&self) -> usize {
        self.last_read_bucket
    }
}

/// The PID-like blending step: folds a fresh (bandwidth, read_ratio) sample
/// into `state`, handling the saturation penalty and its decay, and returns
/// the new `current_latency`.
pub struct SmoothingController;

impl SmoothingController {
    /// Blend a new window's raw bandwidth and read ratio into `state`,
    /// updating it in place and returning the new current latency in
    /// cycles. `bucket` is the read-ratio bucket selected for this sample
    /// (`0, 2, .. 100`); `state.last_read_bucket` is updated to match.
    pub fn blend(state: &mut ControllerState, store: &CurveStore, raw_bandwidth: f64, bucket: usize) -> u64 {
        state.last_read_bucket = bucket;
        let bucket_index = interpolate::bucket_to_index(bucket);

        let blended_bandwidth = CONVERGE_SPEED * raw_bandwidth + (1.0 - CONVERGE_SPEED) * state.last_bandwidth;
        let lead_off = store.lead_off_latency();

        let blended_latency = if interpolate::is_saturated(store, blended_bandwidth, bucket_index) {
            state.overflow_factor += OVERFLOW_STEP;
            let raw_latency = (1.0 + state.overflow_factor) * store.max_latency_for_bucket(bucket_index);
            let blended_latency = CONVERGE_SPEED * raw_latency + (1.0 - CONVERGE_SPEED) * state.last_latency;
            state.last_bandwidth =
                CONVERGE_SPEED * store.max_bandwidth_for_bucket(bucket_index) + (1.0 - CONVERGE_SPEED) * state.last_bandwidth;
            blended_latency
        } else {
            let mut raw_latency = interpolate::interpolate_only(store, blended_bandwidth, bucket_index)
                .unwrap_or(lead_off);
            // Carryover penalty that decays as overflow_factor winds down.
            raw_latency += state.overflow_factor * raw_latency;
            let blended_latency = CONVERGE_SPEED * raw_latency + (1.0 - CONVERGE_SPEED) * state.last_latency;

            if state.overflow_factor > OVERFLOW_DECAY {
                state.overflow_factor -= OVERFLOW_DECAY;
            } else {
                state.overflow_factor = 0.0;
            }
            state.last_bandwidth = blended_bandwidth;
            blended_latency
        };

        state.last_latency = blended_latency;
        let clamped = blended_latency.max(lead_off);
        state.current_latency = clamped.round() as u64;

        debug_assert!(state.overflow_factor >= 0.0);
        debug_assert!(clamped >= lead_off);

        state.current_latency
    }
}
