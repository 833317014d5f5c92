//! "Update available" prompt state.
//!
//! Wraps the lifecycle signals of an update registration (the browser's
//! service worker, or any equivalent installer) into a single `need_refresh`
//! flag with reload and dismiss actions.

use std::time::Duration;

/// Default interval between update probes
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Lifecycle state of the update registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Installing,
    Installed,
    Activating,
    Activated,
    Redundant,
}

impl WorkerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerState::Installing => "installing",
            WorkerState::Installed => "installed",
            WorkerState::Activating => "activating",
            WorkerState::Activated => "activated",
            WorkerState::Redundant => "redundant",
        }
    }
}

/// Periodic checks start only once the registration is active
pub fn should_schedule_checks(state: WorkerState, period: Duration) -> bool {
    !period.is_zero() && state == WorkerState::Activated
}

/// Reload request handed back to the registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadRequest {
    pub force_reload: bool,
}

/// Banner state for the update prompt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdatePrompt {
    need_refresh: bool,
}

impl UpdatePrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn need_refresh(&self) -> bool {
        self.need_refresh
    }

    pub fn set_need_refresh(&mut self, value: bool) {
        self.need_refresh = value;
    }

    /// Hide the banner without reloading
    pub fn dismiss(&mut self) {
        self.need_refresh = false;
    }

    /// Accept the update; the registration should activate it and reload
    pub fn reload(&mut self) -> Option<ReloadRequest> {
        if !self.need_refresh {
            return None;
        }
        self.need_refresh = false;
        Some(ReloadRequest { force_reload: true })
    }
}
