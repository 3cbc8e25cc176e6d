//! Process table
//!
//! Enumerates processes through the platform's listing command (`ps` on
//! POSIX, `tasklist` on Windows) and keeps them in a `Vec` for direct
//! indexing by the virtualized list view. Per-row CPU/memory figures are
//! synthetic demo values attached at parse time; only names and PIDs are
//! real. Termination shells out to `kill`/`taskkill`.

use std::process::Command;

use log::{info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::{Result, TaskmonError};

/// One row of the Processes tab.
#[derive(Debug, Clone)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
    /// Synthetic resident-memory figure, KB.
    pub memory_kb: u64,
    /// Synthetic CPU share, percent.
    pub cpu_percent: f32,
    pub selected: bool,
}

/// Parse one line of `ps -eo pid,comm --no-headers` output.
///
/// Returns `(pid, name)`, or `None` for lines that do not start with a
/// numeric PID.
pub fn parse_ps_line(line: &str) -> Option<(u32, String)> {
    let trimmed = line.trim();
    let (pid_str, rest) = trimmed.split_once(char::is_whitespace)?;
    let pid = pid_str.parse::<u32>().ok()?;
    let name = rest.trim();
    if name.is_empty() {
        return None;
    }
    Some((pid, name.to_string()))
}

/// Parse one line of `tasklist /fo csv /nh` output.
///
/// Returns `(pid, name)` from the first two quoted CSV fields.
pub fn parse_tasklist_line(line: &str) -> Option<(u32, String)> {
    let mut fields = line.split('"').filter(|s| !s.is_empty() && *s != ",");
    let name = fields.next()?.trim();
    let pid = fields.next()?.trim().parse::<u32>().ok()?;
    if name.is_empty() {
        return None;
    }
    Some((pid, name.to_string()))
}

/// The process list plus single-row selection state.
pub struct ProcessTable {
    entries: Vec<ProcessEntry>,
    selected: Option<usize>,
    rng: SmallRng,
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            selected: None,
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Seeded constructor for deterministic tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            entries: Vec::new(),
            selected: None,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn entries(&self) -> &[ProcessEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&ProcessEntry> {
        self.selected.and_then(|i| self.entries.get(i))
    }

    /// Select the row at `index`, clearing any previous selection.
    pub fn select(&mut self, index: usize) -> Result<()> {
        if index >= self.entries.len() {
            return Err(TaskmonError::InvalidArgument(format!(
                "process index {} out of range ({} entries)",
                index,
                self.entries.len()
            )));
        }
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.selected = i == index;
        }
        self.selected = Some(index);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        for entry in self.entries.iter_mut() {
            entry.selected = false;
        }
        self.selected = None;
    }

    /// Re-enumerate processes. Returns the new row count.
    pub fn refresh(&mut self) -> Result<usize> {
        let output = Self::list_command()
            .output()
            .map_err(|e| TaskmonError::CommandFailed(format!("process listing: {}", e)))?;
        if !output.status.success() {
            return Err(TaskmonError::CommandFailed(format!(
                "process listing exited with {}",
                output.status
            )));
        }
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let count = self.rebuild(&stdout);
        info!("process list refreshed: {} entries", count);
        Ok(count)
    }

    #[cfg(unix)]
    fn list_command() -> Command {
        let mut cmd = Command::new("ps");
        cmd.args(["-eo", "pid,comm", "--no-headers"]);
        cmd
    }

    #[cfg(windows)]
    fn list_command() -> Command {
        let mut cmd = Command::new("tasklist");
        cmd.args(["/fo", "csv", "/nh"]);
        cmd
    }

    /// Rebuild the table from raw listing output.
    ///
    /// Split out of `refresh` so parsing and metric synthesis are testable
    /// without spawning the platform command.
    pub fn rebuild(&mut self, listing: &str) -> usize {
        self.entries.clear();
        self.selected = None;
        for line in listing.lines() {
            #[cfg(unix)]
            let parsed = parse_ps_line(line);
            #[cfg(windows)]
            let parsed = parse_tasklist_line(line);

            let Some((pid, name)) = parsed else {
                continue;
            };
            // Demo metrics; the listing's own figures are not queried.
            let memory_kb = 1000 + self.rng.random_range(0..10_000);
            let cpu_percent = self.rng.random_range(0..1000) as f32 / 10.0;
            self.entries.push(ProcessEntry {
                pid,
                name,
                memory_kb,
                cpu_percent,
                selected: false,
            });
        }
        self.entries.len()
    }

    /// Force-terminate the process with `pid`.
    pub fn kill(&self, pid: u32) -> Result<()> {
        let status = Self::kill_command(pid)
            .status()
            .map_err(|e| TaskmonError::CommandFailed(format!("kill {}: {}", pid, e)))?;
        if status.success() {
            info!("terminated process {}", pid);
            Ok(())
        } else {
            warn!("failed to terminate process {}: {}", pid, status);
            Err(TaskmonError::Process(format!(
                "could not terminate pid {}",
                pid
            )))
        }
    }

    #[cfg(unix)]
    fn kill_command(pid: u32) -> Command {
        let mut cmd = Command::new("kill");
        cmd.args(["-9", &pid.to_string()]);
        cmd
    }

    #[cfg(windows)]
    fn kill_command(pid: u32) -> Command {
        let mut cmd = Command::new("taskkill");
        cmd.args(["/PID", &pid.to_string(), "/F"]);
        cmd
    }
}
