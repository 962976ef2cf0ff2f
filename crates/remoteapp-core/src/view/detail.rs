//! Detail adapter for the selected application

use super::{frame_url, max_iframe_size, ConfigurationForm, FrameSize, Viewport};
use crate::events::emit;
use crate::{
    AppEvent, ApplicationEntry, ApplicationListModel, CoreError, EventSender, Result,
    StartingError,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Projects the selected entry: description, policy, frame URL and the
/// starting error dialog.
///
/// Clones share the error dialog and focus state, so a shell can run a
/// start on a background task while drawing from another handle.
#[derive(Clone)]
pub struct DetailView {
    model: Arc<ApplicationListModel>,
    base_url: String,
    viewport: Viewport,
    events: Option<EventSender>,
    starting_error: Arc<Mutex<Option<StartingError>>>,
    frame_focused: Arc<AtomicBool>,
}

impl DetailView {
    pub fn new(model: Arc<ApplicationListModel>, viewport: Viewport) -> Self {
        let base_url = model.backend_info().base_url;
        Self {
            model,
            base_url,
            viewport,
            events: None,
            starting_error: Arc::new(Mutex::new(None)),
            frame_focused: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Emit `startApplication` and `error` on the given channel
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    /// The selected entry, if any
    pub async fn current(&self) -> Option<ApplicationEntry> {
        self.model.selected_entry().await
    }

    pub async fn display_name(&self) -> Option<String> {
        self.current().await.map(|e| e.display_name().to_string())
    }

    pub async fn description(&self) -> Option<String> {
        self.current()
            .await
            .and_then(|e| e.app_data().image.description.clone())
    }

    /// Human readable policy of the selected image
    pub async fn policy_lines(&self) -> Vec<String> {
        let Some(entry) = self.current().await else {
            return Vec::new();
        };
        let policy = &entry.app_data().image.policy;
        let workspace = if policy.allow_home {
            "Workspace accessible".to_string()
        } else {
            "Workspace not accessible".to_string()
        };
        let volume = match policy.volume() {
            Some((source, target, mode)) => {
                format!("Volume mounted: {} \u{2192} {} ({})", source, target, mode)
            }
            None => "No volumes mounted".to_string(),
        };
        vec![workspace, volume]
    }

    /// Frame URL of the selected running application.
    ///
    /// Reading it consumes the entry's delayed flag, so the first read after
    /// a start has no trailing slash and every later read has one.
    pub async fn app_source(&self) -> Option<String> {
        let index = self.model.selected_index().await?;
        let entry = self.model.entry(index).await?;
        if !entry.is_running() {
            return None;
        }
        let url_id = entry.container()?.url_id.clone();
        let delayed = self.model.take_delayed(index).await;
        Some(frame_url(&self.base_url, &url_id, delayed))
    }

    pub fn frame_size(&self) -> FrameSize {
        max_iframe_size(self.viewport)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Start the selected application.
    ///
    /// A failed start is kept for the error dialog and forwarded as an
    /// `error` event.
    pub async fn start_application(&self) -> Result<()> {
        let entry = self.current().await.ok_or(CoreError::NoSelection)?;
        if entry.can_start() {
            tracing::info!(
                application = entry.display_name(),
                "startApplication"
            );
            emit(
                self.events.as_ref(),
                AppEvent::StartApplication {
                    name: entry.display_name().to_string(),
                    mapping_id: entry.app_data().mapping_id.clone(),
                },
            );
        }

        match self.model.start_application().await {
            Ok(_) => Ok(()),
            Err(CoreError::StartFailed(error)) => {
                *self.starting_error.lock().await = Some(error.clone());
                emit(self.events.as_ref(), AppEvent::Error(error.clone()));
                Err(CoreError::StartFailed(error))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn starting_error(&self) -> Option<StartingError> {
        self.starting_error.lock().await.clone()
    }

    /// Dismiss the error dialog
    pub async fn close_error(&self) {
        *self.starting_error.lock().await = None;
    }

    /// Hook for shells after a redraw
    pub async fn updated(&self) {
        self.focus_frame().await;
    }

    /// Give focus to the frame if the selected application is running.
    /// Returns whether the frame is focused.
    pub async fn focus_frame(&self) -> bool {
        let running = self
            .current()
            .await
            .map(|e| e.is_running())
            .unwrap_or(false);
        self.frame_focused.store(running, Ordering::Relaxed);
        running
    }

    pub fn blur_frame(&self) {
        self.frame_focused.store(false, Ordering::Relaxed);
    }

    pub fn frame_focused(&self) -> bool {
        self.frame_focused.load(Ordering::Relaxed)
    }

    /// Whether the start button is enabled
    pub async fn start_enabled(&self) -> bool {
        self.current()
            .await
            .map(|e| e.can_start())
            .unwrap_or(false)
    }

    /// Configuration form for the selected entry
    pub async fn form(&self) -> Result<ConfigurationForm> {
        let index = self
            .model
            .selected_index()
            .await
            .ok_or(CoreError::NoSelection)?;
        ConfigurationForm::load(self.model.clone(), index).await
    }
}
