//! Per-application usage history
//!
//! The App History tab shows a fixed roster of applications, each with 30
//! samples of CPU time, memory and network usage in [`RingHistory`]
//! buffers. Values drift randomly on a 2-second gate per entry, the same
//! cadence the original data set used.

use std::time::{Duration, Instant};

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::demo::seed_jitter;
use crate::error::Result;
use crate::history::{RingHistory, APP_HISTORY_LEN};

/// Default minimum interval between accepted per-app samples.
pub const DEFAULT_APP_HISTORY_INTERVAL: Duration = Duration::from_secs(2);

const DEMO_APP_NAMES: &[&str] = &[
    "chrome.exe",
    "Code.exe",
    "explorer.exe",
    "Spotify.exe",
    "Discord.exe",
    "steam.exe",
    "msedge.exe",
    "devenv.exe",
];

/// Usage history for one application.
pub struct AppUsage {
    pub name: &'static str,
    /// Accumulated CPU time share, percent.
    pub cpu_time: f32,
    pub memory_kb: u64,
    pub network_kb: u64,
    pub cpu_history: RingHistory<f32>,
    pub memory_history: RingHistory<u64>,
    pub network_history: RingHistory<u64>,
    last_update: Instant,
}

impl AppUsage {
    fn new(name: &'static str, now: Instant, rng: &mut SmallRng) -> Result<Self> {
        let cpu_time = 5.0 + rng.random_range(0..50) as f32;
        let memory_kb = 100 + rng.random_range(0..500);
        let network_kb = 10 + rng.random_range(0..100);
        Ok(Self {
            name,
            cpu_time,
            memory_kb,
            network_kb,
            cpu_history: RingHistory::with_seed_jitter(APP_HISTORY_LEN, cpu_time, |v| {
                v * seed_jitter(rng)
            })?,
            memory_history: RingHistory::with_seed_jitter(APP_HISTORY_LEN, memory_kb, |v| {
                (v as f32 * seed_jitter(rng)) as u64
            })?,
            network_history: RingHistory::with_seed_jitter(APP_HISTORY_LEN, network_kb, |v| {
                (v as f32 * seed_jitter(rng)) as u64
            })?,
            last_update: now,
        })
    }

    /// Drift the current values and record them, if the gate allows.
    fn tick(&mut self, now: Instant, interval: Duration, rng: &mut SmallRng) -> bool {
        if now.saturating_duration_since(self.last_update) < interval {
            return false;
        }
        self.last_update = now;

        self.cpu_time *= 0.9 + rng.random_range(0..20) as f32 / 100.0;
        self.memory_kb = (self.memory_kb as f32 * (0.9 + rng.random_range(0..20) as f32 / 100.0))
            as u64;
        self.network_kb = (self.network_kb as f32 * (0.8 + rng.random_range(0..40) as f32 / 100.0))
            as u64;

        self.cpu_history.record(self.cpu_time);
        self.memory_history.record(self.memory_kb);
        self.network_history.record(self.network_kb);
        true
    }
}

/// All tracked applications for the App History tab.
pub struct AppHistoryList {
    entries: Vec<AppUsage>,
    interval: Duration,
    rng: SmallRng,
}

impl AppHistoryList {
    /// Load the demo roster, seeding every ring with jittered values.
    pub fn load_demo(now: Instant, interval: Duration) -> Result<Self> {
        Self::load_demo_seeded(now, interval, SmallRng::from_os_rng())
    }

    /// Seeded variant for deterministic tests.
    pub fn load_demo_seeded(now: Instant, interval: Duration, mut rng: SmallRng) -> Result<Self> {
        let entries = DEMO_APP_NAMES
            .iter()
            .map(|&name| AppUsage::new(name, now, &mut rng))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            entries,
            interval,
            rng,
        })
    }

    pub fn entries(&self) -> &[AppUsage] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Advance every entry whose gate has elapsed. Returns how many
    /// recorded a sample.
    pub fn tick(&mut self, now: Instant) -> usize {
        let mut sampled = 0;
        for entry in self.entries.iter_mut() {
            if entry.tick(now, self.interval, &mut self.rng) {
                sampled += 1;
            }
        }
        if sampled > 0 {
            debug!("app history tick: {} entries sampled", sampled);
        }
        sampled
    }
}
