//! Fixed-capacity circular history buffers for metric streams
//!
//! Every chart in the dashboard is backed by a [`RingHistory`]: a ring of
//! exactly `capacity` samples where the newest write overwrites the oldest
//! slot. The buffer is always full (slots start at a seed value), so chart
//! renderers never have to handle a partially-filled series.
//!
//! Write throttling is the owner's job: callers gate `record` on elapsed
//! wall-clock time (1 s for system metrics, 2 s for per-app metrics).
//! Calling it more often does not error, it just shortens the span of
//! history the chart covers.

use crate::error::{Result, TaskmonError};

/// Samples kept per system-wide metric (CPU, memory, disk, GPU).
pub const SYSTEM_HISTORY_LEN: usize = 100;

/// Samples kept per per-application metric (CPU time, memory, network).
pub const APP_HISTORY_LEN: usize = 30;

/// Fixed-capacity circular buffer of metric samples.
///
/// `write_index` is the next slot to overwrite; chronological order starts
/// there and wraps around the whole buffer.
#[derive(Debug, Clone)]
pub struct RingHistory<T> {
    buf: Vec<T>,
    write_index: usize,
}

impl<T: Copy> RingHistory<T> {
    /// Create a ring with every slot set to `seed`.
    ///
    /// Fails with `InvalidArgument` if `capacity` is zero; a ring with no
    /// slots has no meaningful read order.
    pub fn new(capacity: usize, seed: T) -> Result<Self> {
        if capacity == 0 {
            return Err(TaskmonError::InvalidArgument(
                "history capacity must be non-zero".to_string(),
            ));
        }
        Ok(Self {
            buf: vec![seed; capacity],
            write_index: 0,
        })
    }

    /// Create a ring where each slot holds `seed` perturbed by `jitter`.
    ///
    /// Used at startup so the first rendered chart is not a flat line.
    /// The closure receives the seed and returns the value for one slot.
    pub fn with_seed_jitter(
        capacity: usize,
        seed: T,
        mut jitter: impl FnMut(T) -> T,
    ) -> Result<Self> {
        let mut ring = Self::new(capacity, seed)?;
        for slot in ring.buf.iter_mut() {
            *slot = jitter(seed);
        }
        Ok(ring)
    }

    /// Number of samples held (constant for the life of the ring).
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Overwrite the oldest sample with `value` and advance the cursor.
    pub fn record(&mut self, value: T) {
        self.buf[self.write_index] = value;
        self.write_index = (self.write_index + 1) % self.buf.len();
    }

    /// Iterate all samples oldest-first.
    ///
    /// Yields exactly `capacity` values. The iterator borrows the ring, so
    /// each call restarts from the current oldest sample.
    pub fn iter_chronological(&self) -> impl Iterator<Item = T> + '_ {
        let len = self.buf.len();
        (0..len).map(move |i| self.buf[(self.write_index + i) % len])
    }

    /// Most recently recorded sample.
    pub fn latest(&self) -> T {
        let len = self.buf.len();
        self.buf[(self.write_index + len - 1) % len]
    }
}

impl<T: Copy + PartialOrd> RingHistory<T> {
    /// Maximum sample in the buffer, or `floor` if every sample is below it.
    ///
    /// The floor guards division by zero when normalizing a chart whose
    /// samples are all zero.
    pub fn max_value(&self, floor: T) -> T {
        let mut max = floor;
        for &v in &self.buf {
            if v > max {
                max = v;
            }
        }
        max
    }
}
