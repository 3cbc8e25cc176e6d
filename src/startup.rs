//! Startup applications
//!
//! Static demo data for the Startup tab: a fixed roster of applications
//! with a boot-impact figure and an enabled flag that can be toggled.

use log::info;

use crate::error::{Result, TaskmonError};

/// One row of the Startup tab.
#[derive(Debug, Clone)]
pub struct StartupApp {
    pub name: &'static str,
    pub publisher: &'static str,
    /// Estimated boot-time impact, seconds.
    pub impact_seconds: f32,
    pub enabled: bool,
}

impl StartupApp {
    /// Display status derived from the enabled flag.
    pub fn status(&self) -> &'static str {
        if self.enabled {
            "Enabled"
        } else {
            "Disabled"
        }
    }
}

const DEMO_APPS: &[(&str, &str, f32, bool)] = &[
    ("Microsoft OneDrive", "Microsoft Corporation", 2.1, true),
    ("Spotify", "Spotify AB", 1.5, true),
    ("Discord", "Discord Inc.", 3.2, false),
    ("Steam Client", "Valve Corporation", 4.5, true),
    ("Adobe Creative Cloud", "Adobe Inc.", 2.8, true),
    ("NVIDIA Display", "NVIDIA Corporation", 0.5, true),
    ("Realtek Audio", "Realtek Semiconductor", 0.3, true),
    ("Microsoft Teams", "Microsoft Corporation", 3.8, false),
];

/// The startup application list plus selection state.
pub struct StartupList {
    apps: Vec<StartupApp>,
    selected: Option<usize>,
}

impl Default for StartupList {
    fn default() -> Self {
        Self::load_demo()
    }
}

impl StartupList {
    /// Load the demo roster.
    pub fn load_demo() -> Self {
        let apps = DEMO_APPS
            .iter()
            .map(|&(name, publisher, impact_seconds, enabled)| StartupApp {
                name,
                publisher,
                impact_seconds,
                enabled,
            })
            .collect::<Vec<_>>();
        info!("startup list loaded: {} entries", apps.len());
        Self {
            apps,
            selected: None,
        }
    }

    pub fn apps(&self) -> &[StartupApp] {
        &self.apps
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_app(&self) -> Option<&StartupApp> {
        self.selected.and_then(|i| self.apps.get(i))
    }

    pub fn select(&mut self, index: usize) -> Result<()> {
        if index >= self.apps.len() {
            return Err(TaskmonError::InvalidArgument(format!(
                "startup index {} out of range ({} entries)",
                index,
                self.apps.len()
            )));
        }
        self.selected = Some(index);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Flip the enabled flag of the app at `index`; returns the app for
    /// status reporting.
    pub fn toggle(&mut self, index: usize) -> Result<&StartupApp> {
        let app = self.apps.get_mut(index).ok_or_else(|| {
            TaskmonError::InvalidArgument(format!("startup index {} out of range", index))
        })?;
        app.enabled = !app.enabled;
        info!(
            "startup app '{}' {}",
            app.name,
            if app.enabled { "enabled" } else { "disabled" }
        );
        Ok(&self.apps[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_roster_shape() {
        let list = StartupList::load_demo();
        assert_eq!(list.len(), 8);
        assert_eq!(list.apps()[0].name, "Microsoft OneDrive");
        assert_eq!(list.apps()[3].impact_seconds, 4.5);
        assert!(!list.apps()[2].enabled);
    }

    #[test]
    fn test_status_tracks_enabled_flag() {
        let mut list = StartupList::load_demo();
        assert_eq!(list.apps()[1].status(), "Enabled");
        list.toggle(1).unwrap();
        assert_eq!(list.apps()[1].status(), "Disabled");
    }

    #[test]
    fn test_toggle_flips_and_reports() {
        let mut list = StartupList::load_demo();
        let app = list.toggle(2).unwrap();
        assert!(app.enabled);
        let app = list.toggle(2).unwrap();
        assert!(!app.enabled);
    }

    #[test]
    fn test_toggle_out_of_range() {
        let mut list = StartupList::load_demo();
        assert!(list.toggle(8).is_err());
    }

    #[test]
    fn test_select_bounds() {
        let mut list = StartupList::load_demo();
        assert!(list.select(7).is_ok());
        assert_eq!(list.selected_app().unwrap().name, "Microsoft Teams");
        assert!(list.select(8).is_err());
    }
}
