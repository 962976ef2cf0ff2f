//! Application entries: one launchable image and its container state

use crate::ConfigurableOption;
use remoteapp_client::{ApplicationData, ConfigDict, Container};
use std::collections::BTreeMap;

/// Lifecycle status of an application entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppStatus {
    /// No container; start is allowed
    Stopped,
    /// Start request in flight
    Starting,
    /// Container running and reachable through its frame URL
    Running,
    /// A stop request failed; container state unknown
    Error,
}

impl std::fmt::Display for AppStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stopped => write!(f, "stopped"),
            Self::Starting => write!(f, "starting"),
            Self::Running => write!(f, "running"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Client-side record pairing a launchable image with its runtime state
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationEntry {
    app_data: ApplicationData,
    status: AppStatus,
    configurables: Vec<ConfigurableOption>,
    delayed: bool,
}

impl ApplicationEntry {
    /// Build an entry from catalog data. Entries whose catalog item already
    /// carries a container start out Running.
    pub fn new(app_data: ApplicationData) -> Self {
        let configurables = app_data
            .image
            .configurables
            .iter()
            .map(ConfigurableOption::new)
            .collect();
        let status = if app_data.container.is_some() {
            AppStatus::Running
        } else {
            AppStatus::Stopped
        };
        Self {
            app_data,
            status,
            configurables,
            delayed: false,
        }
    }

    pub fn app_data(&self) -> &ApplicationData {
        &self.app_data
    }

    pub fn status(&self) -> AppStatus {
        self.status
    }

    pub fn is_stopped(&self) -> bool {
        self.status == AppStatus::Stopped
    }

    pub fn is_starting(&self) -> bool {
        self.status == AppStatus::Starting
    }

    pub fn is_running(&self) -> bool {
        self.status == AppStatus::Running
    }

    /// `ui_name` if present, else the image name
    pub fn display_name(&self) -> &str {
        self.app_data.image.display_name()
    }

    pub fn container(&self) -> Option<&Container> {
        self.app_data.container.as_ref()
    }

    pub fn configurables(&self) -> &[ConfigurableOption] {
        &self.configurables
    }

    pub fn configurable(&self, tag: &str) -> Option<&ConfigurableOption> {
        self.configurables.iter().find(|c| c.tag() == tag)
    }

    /// Whether the next frame URL should omit its trailing slash
    pub fn is_delayed(&self) -> bool {
        self.delayed
    }

    /// Check if a start may be issued
    pub fn can_start(&self) -> bool {
        matches!(self.status, AppStatus::Stopped | AppStatus::Error)
    }

    /// Check if a stop may be issued
    pub fn can_stop(&self) -> bool {
        matches!(self.status, AppStatus::Running | AppStatus::Error)
    }

    /// Configuration dictionaries keyed by tag, as sent in a start request
    pub fn configuration(&self) -> BTreeMap<String, ConfigDict> {
        self.configurables
            .iter()
            .map(|c| (c.tag().to_string(), c.config_dict().clone()))
            .collect()
    }

    pub(crate) fn configurable_mut(&mut self, tag: &str) -> Option<&mut ConfigurableOption> {
        self.configurables.iter_mut().find(|c| c.tag() == tag)
    }

    pub(crate) fn mark_starting(&mut self) {
        self.status = AppStatus::Starting;
    }

    pub(crate) fn mark_running(&mut self, container: Container) {
        self.app_data.container = Some(container);
        self.status = AppStatus::Running;
        self.delayed = true;
    }

    pub(crate) fn mark_stopped(&mut self) {
        self.app_data.container = None;
        self.status = AppStatus::Stopped;
        self.delayed = false;
    }

    pub(crate) fn mark_error(&mut self) {
        self.status = AppStatus::Error;
    }

    /// Consume the one-shot delayed flag
    pub(crate) fn take_delayed(&mut self) -> bool {
        std::mem::take(&mut self.delayed)
    }
}
