use crate::ctrl::MessMemCtrl;
use crate::error::AccessError;

/// Distinguishes the write-back case from ordinary reads/writes. `Puts`
/// (dirty-line write-backs in the originating simulator's terminology)
/// never block anything downstream: they are recorded for bandwidth/window
/// accounting but the caller gets back a latency of `0` and should not
/// enqueue a completion event for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
    /// Write-back, fire-and-forget.
    Puts,
}

impl AccessKind {
    fn is_write_for_window(self) -> bool {
        !matches!(self, AccessKind::Read)
    }
}

/// A split latency estimate ready to drive a two-phase (bound/weave) event
/// simulator integration, following the `WeaveMessMemCtrl` pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitLatency {
    /// The curve family's lead-off latency: the portion of the estimate
    /// known immediately, usable as a provisional ("bound phase") result
    /// before the window's full accounting lands.
    pub zero_load_latency: u64,
    /// `current_latency - zero_load_latency`: the queueing-dependent
    /// remainder, delivered once the weave phase actually runs.
    pub overflow: u64,
    /// Half of `zero_load_latency`, charged before the overflow event.
    pub pre_delay: u64,
    /// The remaining half, charged after.
    pub post_delay: u64,
}

/// Observability state machine for one in-flight access through the shim,
/// mirroring `MessAccEvent`'s lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPhase {
    Received,
    Recorded,
    LatencyUpdated,
    Responded,
}

/// Wraps a [`MessMemCtrl`] for event-driven simulators that split a memory
/// access into a cheap, immediately-known baseline delay (the "bound"
/// phase) and a deferred, window-dependent overflow delay (the "weave"
/// phase), rather than blocking on the full latency estimate up front.
///
/// Mirrors the `WeaveMessMemCtrl`/`MessAccEvent` pair: the bound phase
/// issues `zero_load_latency` immediately, and the weave phase later
/// applies the `overflow` once the access's window has actually closed and
/// the full estimate is available.
#[derive(Debug, Clone)]
pub struct TimingEventShim {
    ctrl: MessMemCtrl,
}

impl TimingEventShim {
    pub fn new(ctrl: MessMemCtrl) -> Self {
        Self { ctrl }
    }

    pub fn into_inner(self) -> MessMemCtrl {
        self.ctrl
    }

    /// Record the access and compute its split latency. `Puts` accesses
    /// are still recorded for window accounting (they count toward
    /// bandwidth) but always report a zero split, since write-backs do not
    /// block the requesting core.
    pub fn access(&mut self, cycle: u64, kind: AccessKind) -> Result<SplitLatency, AccessError> {
        let mut phase = AccessPhase::Received;
        tracing::trace!(cycle, ?kind, ?phase, "access entering shim");

        let count_before = self.ctrl.window_access_count();
        let latency = self.ctrl.access(cycle, kind.is_write_for_window())?;
        phase = AccessPhase::Recorded;
        tracing::trace!(cycle, ?phase, "access recorded in window");

        if self.ctrl.window_access_count() < count_before {
            phase = AccessPhase::LatencyUpdated;
            tracing::trace!(cycle, ?phase, latency = self.ctrl.current_latency(), "window closed, latency updated");
        }

        let split = if kind == AccessKind::Puts {
            SplitLatency {
                zero_load_latency: 0,
                overflow: 0,
                pre_delay: 0,
                post_delay: 0,
            }
        } else {
            let zero_load_latency = self.ctrl.lead_off_latency();
            let overflow = latency.saturating_sub(zero_load_latency);
            let pre_delay = zero_load_latency / 2;
            let post_delay = zero_load_latency - pre_delay;

            SplitLatency {
                zero_load_latency,
                overflow,
                pre_delay,
                post_delay,
            }
        };

        phase = AccessPhase::Responded;
        tracing::trace!(cycle, ?phase, ?split, "access responded");

        Ok(split)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemCtrlConfig;
    use std::fs;
    use std::sync::atomic::{AtomicU64, Ordering};

    static NEXT_ID: AtomicU64 = AtomicU64::new(0);

    struct TempDirGuard(std::path::PathBuf);
    impl Drop for TempDirGuard {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    fn shim_with_toy_curve() -> (TimingEventShim, TempDirGuard) {
        let mut dir = std::env::temp_dir();
        dir.push(format!(
            "mess-event-test-{}-{}",
            std::process::id(),
            NEXT_ID.fetch_add(1, Ordering::Relaxed)
        ));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("bwlat_100.txt"), "0.0100 200\n0.0050 120\n0.0010 80\n").unwrap();

        let config = MemCtrlConfig {
            curve_path: dir.clone(),
            curve_frequency: 1.0,
            window_size: 4,
            cpu_frequency: 1.0,
            on_core_latency: 0.0,
        };
        let ctrl = MessMemCtrl::new(&config).unwrap();
        (TimingEventShim::new(ctrl), TempDirGuard(dir))
    }

    #[test]
    fn puts_never_block_and_report_zero_split() {
        let (mut shim, _guard) = shim_with_toy_curve();
        let split = shim.access(0, AccessKind::Puts).unwrap();
        assert_eq!(split.zero_load_latency, 0);
        assert_eq!(split.overflow, 0);
        assert_eq!(split.pre_delay, 0);
        assert_eq!(split.post_delay, 0);
    }

    #[test]
    fn idle_read_splits_into_bound_and_zero_overflow() {
        let (mut shim, _guard) = shim_with_toy_curve();
        let split = shim.access(0, AccessKind::Read).unwrap();
        assert_eq!(split.zero_load_latency, 80);
        assert_eq!(split.overflow, 0);
        assert_eq!(split.pre_delay + split.post_delay, split.zero_load_latency);
    }

    #[test]
    fn pre_and_post_delay_split_zero_load_latency_in_half() {
        let (mut shim, _guard) = shim_with_toy_curve();
        let split = shim.access(0, AccessKind::Write).unwrap();
        assert_eq!(split.pre_delay, split.zero_load_latency / 2);
        assert_eq!(split.post_delay, split.zero_load_latency - split.pre_delay);
    }
}
