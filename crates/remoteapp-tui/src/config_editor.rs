//! Configuration editing state
//!
//! Wraps a [`ConfigurationForm`] with a field cursor and an inline text
//! input. Resolution fields cycle through the known resolutions instead of
//! taking free text.

use crate::widgets::TextInputState;
use remoteapp_core::view::ConfigurationForm;
use remoteapp_core::{ConfigurableKind, CoreError, RESOLUTION_OPTIONS};
use serde_json::Value;

/// One editable key of a configurable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigField {
    pub tag: String,
    pub key: String,
    pub value: String,
    pub kind: ConfigurableKind,
}

/// What the text input is being used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// Editing the value of the selected field
    Value,
    /// Entering `key=value` for a new key on the selected configurable
    NewKey,
}

pub struct ConfigEditor {
    pub form: ConfigurationForm,
    pub selected: usize,
    pub input: Option<(EditMode, TextInputState)>,
    pub disabled: bool,
}

impl ConfigEditor {
    pub fn new(form: ConfigurationForm) -> Self {
        Self {
            form,
            selected: 0,
            input: None,
            disabled: false,
        }
    }

    /// Flattened view of every configurable's keys, in configurable order.
    /// Configurables without keys appear once with an empty key.
    pub fn fields(&self) -> Vec<ConfigField> {
        let mut fields = Vec::new();
        for draft in self.form.drafts() {
            if draft.config_dict().is_empty() {
                fields.push(ConfigField {
                    tag: draft.tag().to_string(),
                    key: String::new(),
                    value: String::new(),
                    kind: draft.kind(),
                });
            }
            for (key, value) in draft.config_dict() {
                fields.push(ConfigField {
                    tag: draft.tag().to_string(),
                    key: key.clone(),
                    value: value_to_string(value),
                    kind: draft.kind(),
                });
            }
        }
        fields
    }

    pub fn selected_field(&self) -> Option<ConfigField> {
        self.fields().into_iter().nth(self.selected)
    }

    pub fn select_next(&mut self) {
        let len = self.fields().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_prev(&mut self) {
        let len = self.fields().len();
        if len > 0 {
            self.selected = self.selected.checked_sub(1).unwrap_or(len - 1);
        }
    }

    /// Step a resolution field through the known options
    pub fn cycle(&mut self, forward: bool) -> Result<(), CoreError> {
        let Some(field) = self.selected_field() else {
            return Ok(());
        };
        if field.kind != ConfigurableKind::Resolution || field.key.is_empty() {
            return Ok(());
        }
        let pos = RESOLUTION_OPTIONS
            .iter()
            .position(|o| *o == field.value)
            .unwrap_or(0);
        let len = RESOLUTION_OPTIONS.len();
        let next = if forward {
            (pos + 1) % len
        } else {
            (pos + len - 1) % len
        };
        self.form.set(&field.tag, &field.key, RESOLUTION_OPTIONS[next])
    }

    /// Open the text input for the selected field
    pub fn begin_edit(&mut self) {
        if let Some(field) = self.selected_field() {
            let mode = if field.key.is_empty() {
                EditMode::NewKey
            } else {
                EditMode::Value
            };
            let initial = if mode == EditMode::Value {
                field.value.as_str()
            } else {
                ""
            };
            self.input = Some((mode, TextInputState::with_value(initial)));
        }
    }

    /// Open the text input for a new `key=value` pair
    pub fn begin_new_key(&mut self) {
        if self.selected_field().is_some() {
            self.input = Some((EditMode::NewKey, TextInputState::new()));
        }
    }

    pub fn cancel_edit(&mut self) {
        self.input = None;
    }

    /// Apply the text input to the draft
    pub fn finish_edit(&mut self) -> Result<(), CoreError> {
        let (Some((mode, input)), Some(field)) = (self.input.take(), self.selected_field()) else {
            return Ok(());
        };
        match mode {
            EditMode::Value => self.form.set(&field.tag, &field.key, parse_value(&input.value())),
            EditMode::NewKey => match input.value().split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    self.form.set(&field.tag, key.trim(), parse_value(value))
                }
                _ => Err(CoreError::InvalidState(format!(
                    "Expected key=value, got '{}'",
                    input.value()
                ))),
            },
        }
    }
}

/// Render a JSON value for display and editing; strings lose their quotes
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Interpret user input as JSON when it parses, else as a plain string
pub fn parse_value(raw: &str) -> Value {
    let raw = raw.trim();
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
