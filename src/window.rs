use crate::error::UsageError;

/// The result of a window closing: the raw bandwidth and read ratio
/// observed over that window, ready to be fed into
/// [`crate::controller::SmoothingController::blend`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSample {
    pub bandwidth: f64,
    pub read_ratio: f64,
}

/// Fixed-size batch of consecutive accesses over which bandwidth and read
/// ratio are measured. Resets atomically once `count` reaches `size`.
#[derive(Debug, Clone)]
pub struct Window {
    size: u32,
    start_cycle: u64,
    last_cycle: Option<u64>,
    count: u32,
    count_read: u32,
    count_write: u32,
}

impl Window {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            start_cycle: 0,
            last_cycle: None,
            count: 0,
            count_read: 0,
            count_write: 0,
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Record one access at `cycle`. Returns `Some(WindowSample)` exactly
    /// when this access closes the window (count reaches `size`); the
    /// window's counters are reset before returning.
    ///
    /// `cycle` must be >= the last cycle passed to any previous call to
    /// `record`, including across a window reset; cycles must be
    /// non-decreasing across calls within one controller instance.
    pub fn record(&mut self, cycle: u64, is_write: bool) -> Result<Option<WindowSample>, UsageError> {
        if let Some(last_cycle) = self.last_cycle {
            if cycle < last_cycle {
                return Err(UsageError::NonMonotonicCycle { cycle, last_cycle });
            }
        }
        self.last_cycle = Some(cycle);

        if self.count == 0 {
            self.start_cycle = cycle;
        }

        self.count += 1;
        if is_write {
            self.count_write += 1;
        } else {
            self.count_read += 1;
        }

        debug_assert!(self.count <= self.size);
        debug_assert_eq!(self.count_read + self.count_write, self.count);

        if self.count == self.size {
            let window_length = cycle.saturating_sub(self.start_cycle).max(1);
            let sample = WindowSample {
                bandwidth: self.count as f64 / window_length as f64,
                read_ratio: self.count_read as f64 / self.count as f64,
            };

            self.count = 0;
            self.count_read = 0;
            self.count_write = 0;

            return Ok(Some(sample));
        }

        Ok(None)
    }
}
