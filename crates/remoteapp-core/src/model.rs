//! Application list model - coordinates application lifecycle operations

use crate::{AppStatus, ApplicationEntry, ConfigurableOption, CoreError, Result, StartingError};
use remoteapp_client::{Backend, BackendInfo, ConfigDict, Container, StartRequest};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

/// Message stored when the catalog cannot be loaded
pub const COMMUNICATION_ERROR: &str = "The request could not be executed successfully";

#[derive(Debug)]
struct ModelState {
    app_list: Vec<ApplicationEntry>,
    selected_index: Option<usize>,
    loading: bool,
    communication_error: Option<String>,
    /// Mapping ids with a stop request in flight
    stopping: HashSet<String>,
    /// Bumped on every local start or stop transition
    generation: u64,
    /// Generation of the last local transition, per mapping id
    touched: HashMap<String, u64>,
}

impl ModelState {
    fn touch(&mut self, mapping_id: &str) {
        self.generation += 1;
        self.touched.insert(mapping_id.to_string(), self.generation);
    }

    /// Whether an entry changed locally after generation `since`
    fn touched_since(&self, mapping_id: &str, since: u64) -> bool {
        self.touched.get(mapping_id).is_some_and(|g| *g > since)
    }

    fn find_mut(&mut self, mapping_id: &str) -> Option<&mut ApplicationEntry> {
        self.app_list
            .iter_mut()
            .find(|e| e.app_data().mapping_id == mapping_id)
    }

    fn selected_mut(&mut self) -> Result<&mut ApplicationEntry> {
        let index = self.selected_index.ok_or(CoreError::NoSelection)?;
        self.app_list.get_mut(index).ok_or(CoreError::NoSelection)
    }
}

/// Holds the launchable applications and the selected one, and drives
/// their lifecycle against the backend.
///
/// One instance per session, built by the shell and shared with the view
/// adapters. The catalog is only pulled from the backend by `update()`.
pub struct ApplicationListModel {
    backend: Box<dyn Backend>,
    state: RwLock<ModelState>,
}

impl ApplicationListModel {
    /// Create an empty model; `loading` stays true until the first `update()`
    pub fn new(backend: Box<dyn Backend>) -> Self {
        Self {
            backend,
            state: RwLock::new(ModelState {
                app_list: Vec::new(),
                selected_index: None,
                loading: true,
                communication_error: None,
                stopping: HashSet::new(),
                generation: 0,
                touched: HashMap::new(),
            }),
        }
    }

    pub fn backend_info(&self) -> BackendInfo {
        self.backend.info()
    }

    /// Load the catalog and running containers from the backend.
    ///
    /// Replaces the whole list. The selection follows the previously
    /// selected application if it is still present. On failure the list is
    /// emptied and `communication_error` is set; `loading` becomes false in
    /// both cases. Entries started or stopped while the catalog request was
    /// in flight keep their local state over the older snapshot.
    pub async fn update(&self) -> Result<()> {
        let since = self.state.read().await.generation;
        let result = self.backend.applications().await;

        let mut state = self.state.write().await;
        state.loading = false;

        match result {
            Ok(apps) => {
                let selected_mapping = state
                    .selected_index
                    .and_then(|i| state.app_list.get(i))
                    .map(|e| e.app_data().mapping_id.clone());
                let starting: HashSet<String> = state
                    .app_list
                    .iter()
                    .filter(|e| e.is_starting())
                    .map(|e| e.app_data().mapping_id.clone())
                    .collect();

                let mut entries: Vec<ApplicationEntry> =
                    apps.into_iter().map(ApplicationEntry::new).collect();
                for entry in entries.iter_mut() {
                    let mapping_id = entry.app_data().mapping_id.clone();
                    if state.touched_since(&mapping_id, since) {
                        if let Some(local) = state
                            .app_list
                            .iter()
                            .find(|e| e.app_data().mapping_id == mapping_id)
                        {
                            tracing::debug!(
                                "Keeping local state of '{}' over stale catalog",
                                mapping_id
                            );
                            *entry = local.clone();
                            continue;
                        }
                    }
                    // A reload must not re-enable start for a request still in flight
                    if entry.is_stopped() && starting.contains(&mapping_id) {
                        entry.mark_starting();
                    }
                }

                state.selected_index = selected_mapping.and_then(|id| {
                    entries.iter().position(|e| e.app_data().mapping_id == id)
                });
                tracing::debug!("Loaded {} applications", entries.len());
                state.app_list = entries;
                state.communication_error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load applications: {}", e);
                state.app_list.clear();
                state.selected_index = None;
                state.communication_error = Some(COMMUNICATION_ERROR.to_string());
                Err(e.into())
            }
        }
    }

    /// Select the application at `index`.
    ///
    /// Out of range indexes leave the selection unchanged.
    pub async fn select(&self, index: usize) -> Result<()> {
        let mut state = self.state.write().await;
        let len = state.app_list.len();
        if index >= len {
            tracing::warn!("Ignoring selection of index {} ({} applications)", index, len);
            return Err(CoreError::InvalidSelection { index, len });
        }
        state.selected_index = Some(index);
        Ok(())
    }

    /// Reset the selection to "none selected"
    pub async fn clear_selection(&self) {
        self.state.write().await.selected_index = None;
    }

    /// Start the selected application.
    ///
    /// The status flip to Starting and the assembly of the configuration
    /// happen under one lock, so a second call for the same application is
    /// rejected before any request is sent.
    pub async fn start_application(&self) -> Result<Container> {
        let (request, app_name) = {
            let mut state = self.state.write().await;
            let entry = state.selected_mut()?;
            let app_name = entry.display_name().to_string();

            if entry.is_starting() {
                return Err(CoreError::AlreadyStarting(app_name));
            }
            if !entry.can_start() {
                return Err(CoreError::InvalidState(format!(
                    "Application '{}' cannot be started in {} state",
                    app_name,
                    entry.status()
                )));
            }

            let request = StartRequest {
                mapping_id: entry.app_data().mapping_id.clone(),
                image_id: entry.app_data().image.name.clone(),
                configuration: entry.configuration(),
            };
            entry.mark_starting();
            state.touch(&request.mapping_id);
            (request, app_name)
        };

        tracing::info!("Starting application '{}'", app_name);
        let result = self.backend.start(&request).await;

        let mut state = self.state.write().await;
        state.touch(&request.mapping_id);
        let entry = state
            .find_mut(&request.mapping_id)
            .filter(|e| e.is_starting());

        let failure = match result {
            Ok(container) if !container.url_id.is_empty() => {
                match entry {
                    Some(entry) => entry.mark_running(container.clone()),
                    None => tracing::warn!(
                        "Application '{}' disappeared while starting",
                        app_name
                    ),
                }
                tracing::info!("Application '{}' running at {}", app_name, container.url_id);
                return Ok(container);
            }
            Ok(_) => StartingError {
                app_name,
                code: String::new(),
                message: "The server did not return a container identifier".to_string(),
            },
            Err(e) => StartingError {
                app_name,
                code: e.code().map(|c| c.to_string()).unwrap_or_default(),
                message: e.message(),
            },
        };

        if let Some(entry) = entry {
            entry.mark_stopped();
        }
        tracing::warn!("{}", failure);
        Err(CoreError::StartFailed(failure))
    }

    /// Stop the selected application. Already stopped applications are a no-op.
    pub async fn stop_application(&self) -> Result<()> {
        let (mapping_id, url_id, app_name) = {
            let mut state = self.state.write().await;
            let entry = state.selected_mut()?;
            let app_name = entry.display_name().to_string();
            let mapping_id = entry.app_data().mapping_id.clone();

            match entry.status() {
                AppStatus::Stopped => return Ok(()),
                AppStatus::Starting => {
                    return Err(CoreError::InvalidState(format!(
                        "Application '{}' cannot be stopped while starting",
                        app_name
                    )))
                }
                AppStatus::Running | AppStatus::Error => {}
            }

            let Some(url_id) = entry.container().map(|c| c.url_id.clone()) else {
                entry.mark_stopped();
                return Ok(());
            };

            if !state.stopping.insert(mapping_id.clone()) {
                return Err(CoreError::InvalidState(format!(
                    "Application '{}' is already stopping",
                    app_name
                )));
            }
            (mapping_id, url_id, app_name)
        };

        tracing::info!("Stopping application '{}'", app_name);
        let result = self.backend.stop(&url_id).await;

        let mut state = self.state.write().await;
        state.stopping.remove(&mapping_id);
        state.touch(&mapping_id);
        let entry = state.find_mut(&mapping_id);

        match result {
            Ok(()) => {
                if let Some(entry) = entry {
                    entry.mark_stopped();
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to stop application '{}': {}", app_name, e);
                if let Some(entry) = entry {
                    entry.mark_error();
                }
                Err(e.into())
            }
        }
    }

    /// Configurables of an entry, cloned
    pub async fn configuration(&self, index: usize) -> Result<Vec<ConfigurableOption>> {
        let state = self.state.read().await;
        let len = state.app_list.len();
        state
            .app_list
            .get(index)
            .map(|e| e.configurables().to_vec())
            .ok_or(CoreError::InvalidSelection { index, len })
    }

    /// Write a configuration dictionary back to an entry
    pub async fn commit_configuration(
        &self,
        index: usize,
        tag: &str,
        dict: ConfigDict,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let len = state.app_list.len();
        let entry = state
            .app_list
            .get_mut(index)
            .ok_or(CoreError::InvalidSelection { index, len })?;
        if entry.is_starting() {
            return Err(CoreError::InvalidState(format!(
                "Configuration of '{}' is locked while starting",
                entry.display_name()
            )));
        }
        let app = entry.display_name().to_string();
        let option = entry
            .configurable_mut(tag)
            .ok_or_else(|| CoreError::UnknownConfigurable {
                app,
                tag: tag.to_string(),
            })?;
        option.replace(dict).map_err(CoreError::InvalidState)?;
        tracing::debug!("Committed configuration '{}' for entry {}", tag, index);
        Ok(())
    }

    /// Write a set of configuration drafts back to the entry with
    /// `mapping_id`. Every draft is validated before any is applied, so a
    /// rejected draft leaves the whole configuration untouched.
    pub async fn commit_drafts(
        &self,
        mapping_id: &str,
        drafts: &[ConfigurableOption],
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let entry = state
            .find_mut(mapping_id)
            .ok_or_else(|| CoreError::UnknownApplication(mapping_id.to_string()))?;
        if entry.is_starting() {
            return Err(CoreError::InvalidState(format!(
                "Configuration of '{}' is locked while starting",
                entry.display_name()
            )));
        }

        let mut validated = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let mut option = entry.configurable(draft.tag()).cloned().ok_or_else(|| {
                CoreError::UnknownConfigurable {
                    app: entry.display_name().to_string(),
                    tag: draft.tag().to_string(),
                }
            })?;
            option
                .replace(draft.config_dict().clone())
                .map_err(CoreError::InvalidState)?;
            validated.push(option);
        }

        for option in validated {
            if let Some(slot) = entry.configurable_mut(option.tag()) {
                *slot = option;
            }
        }
        tracing::debug!("Committed {} configurables for '{}'", drafts.len(), mapping_id);
        Ok(())
    }

    /// Current position of the entry with `mapping_id`
    pub async fn index_of(&self, mapping_id: &str) -> Option<usize> {
        let state = self.state.read().await;
        state
            .app_list
            .iter()
            .position(|e| e.app_data().mapping_id == mapping_id)
    }

    /// Consume the one-shot delayed flag of an entry
    pub async fn take_delayed(&self, index: usize) -> bool {
        let mut state = self.state.write().await;
        state
            .app_list
            .get_mut(index)
            .map(|e| e.take_delayed())
            .unwrap_or(false)
    }

    /// Snapshot of all entries in load order
    pub async fn entries(&self) -> Vec<ApplicationEntry> {
        self.state.read().await.app_list.clone()
    }

    pub async fn entry(&self, index: usize) -> Option<ApplicationEntry> {
        self.state.read().await.app_list.get(index).cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.app_list.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn selected_index(&self) -> Option<usize> {
        self.state.read().await.selected_index
    }

    pub async fn selected_entry(&self) -> Option<ApplicationEntry> {
        let state = self.state.read().await;
        state
            .selected_index
            .and_then(|i| state.app_list.get(i))
            .cloned()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn communication_error(&self) -> Option<String> {
        self.state.read().await.communication_error.clone()
    }

    /// Find an application by mapping id, image name or display name
    pub async fn find(&self, name: &str) -> Option<usize> {
        let state = self.state.read().await;
        state.app_list.iter().position(|e| {
            e.app_data().mapping_id == name
                || e.app_data().image.name == name
                || e.display_name() == name
        })
    }
}
