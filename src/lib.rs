//! Task Monitor: a terminal task-manager dashboard
//!
//! Four tabbed views (Processes, Performance, App History, Startup) over
//! simulated metrics, with real process enumeration on the Processes tab.
//! The reusable core is framework-agnostic:
//!
//! - [`history::RingHistory`]: fixed-capacity, always-full circular
//!   buffers backing every chart
//! - [`viewport::ScrollViewport`]: proportional scrollbar, drag/wheel
//!   handling and list virtualization, driven by plain pointer data
//!
//! The `tui` module wires these into a ratatui dashboard; `demo` supplies
//! the simulated samplers.

pub mod app_history;
pub mod config;
pub mod demo;
pub mod error;
pub mod history;
pub mod perf;
pub mod process_list;
pub mod startup;
pub mod tui;
pub mod viewport;

pub use config::Config;
pub use error::{Result, TaskmonError};
pub use history::RingHistory;
pub use viewport::{PointerInput, RowWindow, ScrollViewport};
