//! Start-time configurable options attached to an image

use remoteapp_client::ConfigDict;
use serde_json::Value;

/// Choices offered for the `resolution` configurable
pub const RESOLUTION_OPTIONS: &[&str] = &["Window", "1920x1080", "1280x1024", "1280x800", "1024x768"];

/// Which widget renders a configurable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurableKind {
    /// Screen resolution picker (`Window` or `WIDTHxHEIGHT`)
    Resolution,
    /// Free-form key/value editor for tags without a dedicated widget
    Generic,
}

impl ConfigurableKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "resolution" => Self::Resolution,
            _ => Self::Generic,
        }
    }
}

/// One configurable of an application entry
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurableOption {
    tag: String,
    config_dict: ConfigDict,
}

impl ConfigurableOption {
    /// Create an option for `tag` with its default dictionary
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let config_dict = default_dict(&tag);
        Self { tag, config_dict }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn kind(&self) -> ConfigurableKind {
        ConfigurableKind::from_tag(&self.tag)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.config_dict.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.config_dict.insert(key.into(), value.into());
    }

    pub fn config_dict(&self) -> &ConfigDict {
        &self.config_dict
    }

    /// Replace the whole dictionary after validating it for this tag
    pub fn replace(&mut self, dict: ConfigDict) -> std::result::Result<(), String> {
        validate(&self.tag, &dict)?;
        self.config_dict = dict;
        Ok(())
    }
}

fn default_dict(tag: &str) -> ConfigDict {
    let mut dict = ConfigDict::new();
    if ConfigurableKind::from_tag(tag) == ConfigurableKind::Resolution {
        dict.insert("resolution".to_string(), Value::from(RESOLUTION_OPTIONS[0]));
    }
    dict
}

fn validate(tag: &str, dict: &ConfigDict) -> std::result::Result<(), String> {
    match ConfigurableKind::from_tag(tag) {
        ConfigurableKind::Resolution => {
            let value = dict
                .get("resolution")
                .and_then(Value::as_str)
                .ok_or_else(|| "resolution must be a string".to_string())?;
            if is_resolution(value) {
                Ok(())
            } else {
                Err(format!(
                    "resolution must be 'Window' or WIDTHxHEIGHT, got '{}'",
                    value
                ))
            }
        }
        ConfigurableKind::Generic => Ok(()),
    }
}

fn is_resolution(value: &str) -> bool {
    if value == "Window" {
        return true;
    }
    match value.split_once('x') {
        Some((w, h)) => {
            matches!((w.parse::<u32>(), h.parse::<u32>()), (Ok(w), Ok(h)) if w > 0 && h > 0)
        }
        None => false,
    }
}
