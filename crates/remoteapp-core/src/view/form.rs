//! Configuration form adapter
//!
//! Edits happen on detached copies of an entry's configurables and only
//! reach the model on [`ConfigurationForm::commit`]. The form follows its
//! entry by mapping id, so a reload that reorders the list is harmless.

use crate::{ApplicationListModel, ConfigurableOption, CoreError, Result};
use serde_json::Value;
use std::sync::Arc;

/// Shown instead of the form when an image has no configurables
pub const NO_CONFIGURABLES: &str = "No configurable options for this image";

pub struct ConfigurationForm {
    model: Arc<ApplicationListModel>,
    mapping_id: String,
    app_name: String,
    drafts: Vec<ConfigurableOption>,
}

impl ConfigurationForm {
    /// Take drafts of the configurables of entry `index`
    pub async fn load(model: Arc<ApplicationListModel>, index: usize) -> Result<Self> {
        let entry = model.entry(index).await.ok_or(CoreError::InvalidSelection {
            index,
            len: model.len().await,
        })?;
        Ok(Self {
            mapping_id: entry.app_data().mapping_id.clone(),
            app_name: entry.display_name().to_string(),
            drafts: entry.configurables().to_vec(),
            model,
        })
    }

    pub fn mapping_id(&self) -> &str {
        &self.mapping_id
    }

    pub fn drafts(&self) -> &[ConfigurableOption] {
        &self.drafts
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// Change one key of a draft; nothing is validated until commit
    pub fn set(&mut self, tag: &str, key: &str, value: impl Into<Value>) -> Result<()> {
        let draft = self
            .drafts
            .iter_mut()
            .find(|d| d.tag() == tag)
            .ok_or_else(|| CoreError::UnknownConfigurable {
                app: self.app_name.clone(),
                tag: tag.to_string(),
            })?;
        draft.set(key, value);
        Ok(())
    }

    /// Editing is locked while the entry is starting or once it is gone
    pub async fn is_disabled(&self) -> bool {
        let Some(index) = self.model.index_of(&self.mapping_id).await else {
            return true;
        };
        self.model
            .entry(index)
            .await
            .map(|e| e.is_starting())
            .unwrap_or(true)
    }

    /// Write every draft back to the entry; nothing is written if any
    /// draft is rejected
    pub async fn commit(&self) -> Result<()> {
        self.model.commit_drafts(&self.mapping_id, &self.drafts).await
    }

    /// Drop local edits and re-read the entry's configurables
    pub async fn reset(&mut self) -> Result<()> {
        let index = self
            .model
            .index_of(&self.mapping_id)
            .await
            .ok_or_else(|| CoreError::UnknownApplication(self.mapping_id.clone()))?;
        self.drafts = self.model.configuration(index).await?;
        Ok(())
    }
}
