//! Application list adapter

use super::icon_src;
use crate::events::emit;
use crate::{AppEvent, AppStatus, ApplicationListModel, EventSender, Result};
use std::sync::Arc;

/// One row of the application list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItemView {
    pub display_name: String,
    pub icon_src: String,
    pub status: AppStatus,
    pub selected: bool,
}

/// Projects the model's entries as list rows and turns clicks into selections
pub struct ListView {
    model: Arc<ApplicationListModel>,
    base_url: String,
    events: Option<EventSender>,
}

impl ListView {
    pub fn new(model: Arc<ApplicationListModel>) -> Self {
        let base_url = model.backend_info().base_url;
        Self {
            model,
            base_url,
            events: None,
        }
    }

    /// Emit `entryClicked` on the given channel
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    pub async fn items(&self) -> Vec<ListItemView> {
        let selected = self.model.selected_index().await;
        self.model
            .entries()
            .await
            .iter()
            .enumerate()
            .map(|(i, entry)| ListItemView {
                display_name: entry.display_name().to_string(),
                icon_src: icon_src(&entry.app_data().image, &self.base_url),
                status: entry.status(),
                selected: selected == Some(i),
            })
            .collect()
    }

    /// Select the clicked entry and notify the shell
    pub async fn entry_clicked(&self, index: usize) -> Result<()> {
        self.model.select(index).await?;
        emit(self.events.as_ref(), AppEvent::EntryClicked { index });
        Ok(())
    }

    pub async fn is_loading(&self) -> bool {
        self.model.is_loading().await
    }

    pub async fn communication_error(&self) -> Option<String> {
        self.model.communication_error().await
    }
}
