use crate::curve::CurveStore;

/// Fraction of a bucket's maximum bandwidth above which the interpolator
/// considers the memory system saturated and switches to the overflow
/// penalty rule instead of walking the curve. The original source has two
/// competing thresholds across its copies (`0.985` and `0.99`); this
/// implementation fixes `0.99`, the value used by the final released copy.
pub const SATURATION_THRESHOLD: f64 = 0.99;

/// Map a read ratio in `[0, 1]` to its bucket (`0, 2, .. 100`).
pub fn read_ratio_to_bucket(read_ratio: f64) -> usize {
    let bucket = (read_ratio * 50.0).round() as i64 * 2;
    bucket.clamp(0, 100) as usize
}

/// Bucket value (`0..=100`) to its index into the curve array (`0..=50`).
pub fn bucket_to_index(bucket: usize) -> usize {
    bucket / 2
}

/// Whether `bandwidth` is at or above the saturation point of the curve for
/// `bucket_index`.
pub fn is_saturated(store: &CurveStore, bandwidth: f64, bucket_index: usize) -> bool {
    bandwidth > SATURATION_THRESHOLD * store.max_bandwidth_for_bucket(bucket_index)
}

/// Piecewise-linear interpolation of `bandwidth` against the curve for
/// `bucket_index`, with no saturation handling — the caller is responsible
/// for routing saturated bandwidth to the penalty rule first (see
/// [`crate::controller::SmoothingController`]).
///
/// Returns `None` if the bucket's curve has no points loaded (an empty
/// bucket, which the caller should treat as a `StateError`).
pub fn interpolate_only(store: &CurveStore, bandwidth: f64, bucket_index: usize) -> Option<f64> {
    let curve = store.curve(bucket_index);
    let points = curve.points();
    if points.is_empty() {
        return None;
    }

    // Walk from the high-bandwidth end. `j` lands on the first point whose
    // bandwidth drops below the requested value (the low-bandwidth side of
    // the bracket); `j - 1` is the high-bandwidth side. If every point's
    // bandwidth is >= the requested value, the loop runs to completion and
    // `j` is left at the last index (below-minimum-bandwidth case: use the
    // last point's latency, no extrapolation below the curve).
    let mut j = 0usize;
    let mut bracket_found = false;
    let first_point_latency = points[0].latency;
    for (idx, point) in points.iter().enumerate() {
        j = idx;
        if point.bandwidth < bandwidth {
            bracket_found = true;
            break;
        }
    }

    let latency = if !bracket_found {
        // Every point's bandwidth was >= the requested value: bandwidth is
        // below the lowest listed bandwidth. No extrapolation below the
        // curve; use the last (lowest-bandwidth) point's latency directly.
        points[points.len() - 1].latency
    } else if j != 0 {
        let (x1, y1) = (points[j].bandwidth, points[j].latency);
        let (x2, y2) = (points[j - 1].bandwidth, points[j - 1].latency);
        y1 + (bandwidth - x1) * (y2 - y1) / (x2 - x1)
    } else {
        // j == 0 on the very first point: bandwidth exceeds even the
        // saturation point. No extrapolation above the curve; the
        // saturation branch in the controller should already have caught
        // this case before reaching here.
        first_point_latency
    };

    Some(latency.max(store.lead_off_latency()))
}
