//! System performance metrics
//!
//! [`PerfMetrics`] owns one 100-sample [`RingHistory`] per system metric
//! (CPU, memory, disk, GPU) plus the scalar counters shown on the
//! Performance tab. Sampling goes through the [`Sampler`] trait so the
//! demo generator and test doubles plug in the same way.
//!
//! Updates are time-gated here, once per loop tick: `update` is a no-op
//! until at least the configured interval has elapsed since the last
//! accepted sample. The rings themselves never gate.

use std::time::{Duration, Instant};

use log::debug;

use crate::error::Result;
use crate::history::{RingHistory, SYSTEM_HISTORY_LEN};

/// Default minimum interval between accepted system-metric samples.
pub const DEFAULT_PERF_INTERVAL: Duration = Duration::from_secs(1);

/// Source of system metric samples.
///
/// Implementations return pre-validated scalars: percentages in `[0, 100]`
/// and memory figures where `used <= total`. `PerfMetrics` clamps anyway
/// so a misbehaving sampler cannot corrupt chart scales.
pub trait Sampler {
    /// Overall CPU utilization, percent.
    fn sample_cpu_percent(&mut self) -> f32;
    /// Memory `(used_mb, total_mb)`.
    fn sample_memory_mb(&mut self) -> (u64, u64);
    /// Disk space in use, MB.
    fn sample_disk_used_mb(&mut self) -> u64;
    /// GPU utilization, percent.
    fn sample_gpu_percent(&mut self) -> f32;
    /// System-wide thread count estimate for `process_count` processes.
    fn sample_thread_count(&mut self, process_count: usize) -> usize;
}

/// Current values and history for the Performance tab.
pub struct PerfMetrics {
    pub cpu_percent: f32,
    pub cpu_history: RingHistory<f32>,
    pub memory_used_mb: u64,
    pub memory_total_mb: u64,
    pub memory_available_mb: u64,
    pub memory_history: RingHistory<u64>,
    pub disk_used_mb: u64,
    pub disk_total_mb: u64,
    pub disk_history: RingHistory<u64>,
    pub gpu_percent: f32,
    pub gpu_history: RingHistory<f32>,
    pub process_count: usize,
    pub thread_count: usize,
    pub uptime: Duration,
    interval: Duration,
    last_update: Instant,
}

impl PerfMetrics {
    /// Create metrics with empty (zeroed) history rings.
    pub fn new(memory_total_mb: u64, disk_total_mb: u64, interval: Duration) -> Result<Self> {
        Ok(Self {
            cpu_percent: 0.0,
            cpu_history: RingHistory::new(SYSTEM_HISTORY_LEN, 0.0)?,
            memory_used_mb: 0,
            memory_total_mb,
            memory_available_mb: memory_total_mb,
            memory_history: RingHistory::new(SYSTEM_HISTORY_LEN, 0)?,
            disk_used_mb: 0,
            disk_total_mb,
            disk_history: RingHistory::new(SYSTEM_HISTORY_LEN, 0)?,
            gpu_percent: 0.0,
            gpu_history: RingHistory::new(SYSTEM_HISTORY_LEN, 0.0)?,
            process_count: 0,
            thread_count: 0,
            uptime: Duration::ZERO,
            interval,
            last_update: Instant::now(),
        })
    }

    /// Percent of memory in use, for gauges.
    pub fn memory_percent(&self) -> f32 {
        if self.memory_total_mb == 0 {
            return 0.0;
        }
        self.memory_used_mb as f32 * 100.0 / self.memory_total_mb as f32
    }

    /// Percent of disk in use, for gauges.
    pub fn disk_percent(&self) -> f32 {
        if self.disk_total_mb == 0 {
            return 0.0;
        }
        self.disk_used_mb as f32 * 100.0 / self.disk_total_mb as f32
    }

    /// Take one sample if the interval has elapsed.
    ///
    /// Returns `true` when a sample was recorded. `now` comes from the
    /// caller so the gate is testable without sleeping.
    pub fn update(&mut self, now: Instant, sampler: &mut dyn Sampler, process_count: usize) -> bool {
        let elapsed = now.saturating_duration_since(self.last_update);
        if elapsed < self.interval {
            return false;
        }
        self.last_update = now;

        self.cpu_percent = sampler.sample_cpu_percent().clamp(0.0, 100.0);
        self.cpu_history.record(self.cpu_percent);

        let (used, total) = sampler.sample_memory_mb();
        self.memory_total_mb = total;
        self.memory_used_mb = used.min(total);
        self.memory_available_mb = self.memory_total_mb - self.memory_used_mb;
        self.memory_history.record(self.memory_used_mb);

        self.disk_used_mb = sampler.sample_disk_used_mb().min(self.disk_total_mb);
        self.disk_history.record(self.disk_used_mb);

        self.gpu_percent = sampler.sample_gpu_percent().clamp(0.0, 100.0);
        self.gpu_history.record(self.gpu_percent);

        self.process_count = process_count;
        self.thread_count = sampler.sample_thread_count(process_count);
        self.uptime += elapsed;

        debug!(
            "perf sample: cpu={:.1}% mem={}MB disk={}MB gpu={:.1}%",
            self.cpu_percent, self.memory_used_mb, self.disk_used_mb, self.gpu_percent
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sampler returning fixed values, for deterministic tests.
    struct FixedSampler {
        cpu: f32,
        memory: (u64, u64),
        disk: u64,
        gpu: f32,
    }

    impl Sampler for FixedSampler {
        fn sample_cpu_percent(&mut self) -> f32 {
            self.cpu
        }
        fn sample_memory_mb(&mut self) -> (u64, u64) {
            self.memory
        }
        fn sample_disk_used_mb(&mut self) -> u64 {
            self.disk
        }
        fn sample_gpu_percent(&mut self) -> f32 {
            self.gpu
        }
        fn sample_thread_count(&mut self, process_count: usize) -> usize {
            process_count * 3
        }
    }

    fn fixed() -> FixedSampler {
        FixedSampler {
            cpu: 42.0,
            memory: (6000, 16384),
            disk: 250_000,
            gpu: 33.0,
        }
    }

    #[test]
    fn test_update_is_time_gated() {
        let mut perf = PerfMetrics::new(16384, 512_000, Duration::from_secs(1)).unwrap();
        let start = Instant::now();
        assert!(!perf.update(start + Duration::from_millis(500), &mut fixed(), 10));
        assert!(perf.update(start + Duration::from_millis(1600), &mut fixed(), 10));
        // Immediately after an accepted sample the gate closes again.
        assert!(!perf.update(start + Duration::from_millis(1700), &mut fixed(), 10));
    }

    #[test]
    fn test_update_records_into_rings() {
        let mut perf = PerfMetrics::new(16384, 512_000, Duration::from_secs(1)).unwrap();
        let start = Instant::now();
        assert!(perf.update(start + Duration::from_secs(2), &mut fixed(), 12));
        assert_eq!(perf.cpu_percent, 42.0);
        assert_eq!(perf.cpu_history.latest(), 42.0);
        assert_eq!(perf.memory_history.latest(), 6000);
        assert_eq!(perf.memory_available_mb, 16384 - 6000);
        assert_eq!(perf.disk_history.latest(), 250_000);
        assert_eq!(perf.gpu_history.latest(), 33.0);
        assert_eq!(perf.process_count, 12);
        assert_eq!(perf.thread_count, 36);
    }

    #[test]
    fn test_update_clamps_out_of_range_samples() {
        let mut perf = PerfMetrics::new(16384, 512_000, Duration::from_secs(1)).unwrap();
        let mut sampler = FixedSampler {
            cpu: 180.0,
            memory: (20_000, 16384),
            disk: 999_999_999,
            gpu: -5.0,
        };
        let start = Instant::now();
        assert!(perf.update(start + Duration::from_secs(2), &mut sampler, 1));
        assert_eq!(perf.cpu_percent, 100.0);
        assert_eq!(perf.memory_used_mb, 16384);
        assert_eq!(perf.memory_available_mb, 0);
        assert_eq!(perf.disk_used_mb, 512_000);
        assert_eq!(perf.gpu_percent, 0.0);
    }

    #[test]
    fn test_uptime_accumulates_elapsed_time() {
        let mut perf = PerfMetrics::new(16384, 512_000, Duration::from_secs(1)).unwrap();
        let start = Instant::now();
        perf.update(start + Duration::from_secs(2), &mut fixed(), 0);
        perf.update(start + Duration::from_secs(4), &mut fixed(), 0);
        assert!(perf.uptime >= Duration::from_secs(3));
    }

    #[test]
    fn test_percent_helpers_guard_zero_totals() {
        let perf = PerfMetrics::new(0, 0, Duration::from_secs(1)).unwrap();
        assert_eq!(perf.memory_percent(), 0.0);
        assert_eq!(perf.disk_percent(), 0.0);
    }
}
