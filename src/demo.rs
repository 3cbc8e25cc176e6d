//! Simulated metric sources
//!
//! The dashboard is a demo: apart from process names and PIDs, every
//! figure is generated. [`DemoSampler`] produces system metrics in the
//! same ranges the original data set used, so charts look plausible
//! without any OS counters.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::perf::Sampler;

/// Rand-backed [`Sampler`] producing plausible system metrics.
pub struct DemoSampler {
    rng: SmallRng,
    memory_total_mb: u64,
}

impl DemoSampler {
    pub fn new(memory_total_mb: u64) -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
            memory_total_mb,
        }
    }

    /// Seeded constructor for deterministic tests.
    pub fn with_seed(memory_total_mb: u64, seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            memory_total_mb,
        }
    }
}

impl Sampler for DemoSampler {
    fn sample_cpu_percent(&mut self) -> f32 {
        5.0 + self.rng.random_range(0..60) as f32
    }

    fn sample_memory_mb(&mut self) -> (u64, u64) {
        let mut used = 4000 + self.rng.random_range(0..4000);
        if used > self.memory_total_mb {
            used = self.memory_total_mb.saturating_sub(500);
        }
        (used, self.memory_total_mb)
    }

    fn sample_disk_used_mb(&mut self) -> u64 {
        200_000 + self.rng.random_range(0..150_000)
    }

    fn sample_gpu_percent(&mut self) -> f32 {
        8.0 + self.rng.random_range(0..50) as f32
    }

    fn sample_thread_count(&mut self, process_count: usize) -> usize {
        process_count * 3 + self.rng.random_range(0..100)
    }
}

/// Multiplicative jitter in `[0.8, 1.2)`, used to seed history rings so
/// the first rendered chart is not flat.
pub fn seed_jitter(rng: &mut SmallRng) -> f32 {
    0.8 + rng.random_range(0..40) as f32 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_sample_stays_in_demo_range() {
        let mut sampler = DemoSampler::with_seed(16384, 1);
        for _ in 0..200 {
            let cpu = sampler.sample_cpu_percent();
            assert!((5.0..=64.0).contains(&cpu));
        }
    }

    #[test]
    fn test_memory_sample_never_exceeds_total() {
        let mut sampler = DemoSampler::with_seed(6000, 2);
        for _ in 0..200 {
            let (used, total) = sampler.sample_memory_mb();
            assert!(used <= total);
            assert_eq!(total, 6000);
        }
    }

    #[test]
    fn test_disk_and_gpu_ranges() {
        let mut sampler = DemoSampler::with_seed(16384, 3);
        for _ in 0..200 {
            let disk = sampler.sample_disk_used_mb();
            assert!((200_000..350_000).contains(&disk));
            let gpu = sampler.sample_gpu_percent();
            assert!((8.0..=57.0).contains(&gpu));
        }
    }

    #[test]
    fn test_thread_count_scales_with_processes() {
        let mut sampler = DemoSampler::with_seed(16384, 4);
        let threads = sampler.sample_thread_count(50);
        assert!((150..250).contains(&threads));
    }

    #[test]
    fn test_seed_jitter_range() {
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..200 {
            let f = seed_jitter(&mut rng);
            assert!((0.8..1.2).contains(&f));
        }
    }
}
