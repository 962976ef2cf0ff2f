//! Wire types for the application manager API

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Option-name → value mapping of one configurable
pub type ConfigDict = serde_json::Map<String, serde_json::Value>;

/// Access policy attached to an image
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub allow_home: bool,
    pub volume_source: Option<String>,
    pub volume_target: Option<String>,
    pub volume_mode: Option<String>,
}

impl Policy {
    /// The mounted volume as `(source, target, mode)`, only when all three are set
    pub fn volume(&self) -> Option<(&str, &str, &str)> {
        match (
            non_empty(&self.volume_source),
            non_empty(&self.volume_target),
            non_empty(&self.volume_mode),
        ) {
            (Some(source), Some(target), Some(mode)) => Some((source, target, mode)),
            _ => None,
        }
    }
}

/// Backend-defined template for a launchable application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub name: String,
    pub ui_name: Option<String>,
    pub description: Option<String>,
    /// Base64 encoded 128x128 PNG
    pub icon_128: Option<String>,
    pub policy: Policy,
    /// Tags of the start-time options the image accepts
    pub configurables: Vec<String>,
}

impl Image {
    /// `ui_name` when set, otherwise the docker image name
    pub fn display_name(&self) -> &str {
        non_empty(&self.ui_name).unwrap_or(&self.name)
    }

    /// Icon payload, ignoring empty strings the backend sends for "no icon"
    pub fn icon(&self) -> Option<&str> {
        non_empty(&self.icon_128)
    }
}

/// Running instance of an image
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Container {
    pub name: String,
    pub image_name: String,
    pub url_id: String,
    pub mapping_id: String,
    pub docker_id: String,
}

/// One entry of the application catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationData {
    pub mapping_id: String,
    pub image: Image,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<Container>,
}

/// Body of a start request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StartRequest {
    pub mapping_id: String,
    pub image_id: String,
    /// Configuration dictionaries keyed by configurable tag
    pub configuration: BTreeMap<String, ConfigDict>,
}

/// Body of a successful start response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StartResponse {
    pub container: Container,
}

/// Paged item listing as returned by the REST resources
#[derive(Debug, Clone, Deserialize)]
#[serde(bound = "T: Deserialize<'de>")]
pub(crate) struct ItemsResponse<T> {
    #[serde(default)]
    pub identifiers: Vec<String>,
    #[serde(default)]
    pub items: HashMap<String, T>,
}

/// Catalog item before the identifier is folded in
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApplicationItem {
    #[serde(default)]
    pub mapping_id: Option<String>,
    pub image: Image,
    #[serde(default)]
    pub container: Option<Container>,
}

impl ItemsResponse<ApplicationItem> {
    /// Flatten into catalog order (the order of `identifiers`)
    pub(crate) fn into_applications(mut self) -> Vec<ApplicationData> {
        let mut out = Vec::with_capacity(self.identifiers.len());
        for id in &self.identifiers {
            let Some(item) = self.items.remove(id) else {
                tracing::warn!("Application '{}' listed without an item body, skipping", id);
                continue;
            };
            out.push(ApplicationData {
                mapping_id: item.mapping_id.unwrap_or_else(|| id.clone()),
                image: item.image,
                container: item.container,
            });
        }
        out
    }
}

/// Backend information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendInfo {
    pub name: String,
    pub base_url: String,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_ui_name() {
        let mut image = Image {
            name: "jupyter".to_string(),
            ..Default::default()
        };
        assert_eq!(image.display_name(), "jupyter");

        image.ui_name = Some(String::new());
        assert_eq!(image.display_name(), "jupyter");

        image.ui_name = Some("Jupyter Notebook".to_string());
        assert_eq!(image.display_name(), "Jupyter Notebook");
    }

    #[test]
    fn test_policy_volume_requires_all_parts() {
        let mut policy = Policy {
            allow_home: true,
            volume_source: Some("/data".to_string()),
            volume_target: Some("/mnt/data".to_string()),
            volume_mode: None,
        };
        assert!(policy.volume().is_none());

        policy.volume_mode = Some("ro".to_string());
        assert_eq!(policy.volume(), Some(("/data", "/mnt/data", "ro")));
    }

    #[test]
    fn test_items_response_keeps_identifier_order() {
        let json = r#"{
            "identifiers": ["two", "one", "ghost"],
            "items": {
                "one": {"image": {"name": "boo", "ui_name": "foo_ui", "icon_128": "",
                                  "policy": {"allow_home": true}, "configurables": []},
                        "mapping_id": "one"},
                "two": {"image": {"name": "hello2"},
                        "container": {"url_id": "abc", "docker_id": "d1", "mapping_id": "two"}}
            },
            "total": 2,
            "offset": 0
        }"#;

        let response: ItemsResponse<ApplicationItem> = serde_json::from_str(json).unwrap();
        let apps = response.into_applications();
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].mapping_id, "two");
        assert_eq!(apps[0].container.as_ref().unwrap().url_id, "abc");
        assert_eq!(apps[1].mapping_id, "one");
        assert!(apps[1].image.policy.allow_home);
        assert!(apps[1].image.icon().is_none());
    }

    #[test]
    fn test_start_request_serialization() {
        let mut dict = ConfigDict::new();
        dict.insert("resolution".to_string(), "1024x768".into());
        let mut configuration = BTreeMap::new();
        configuration.insert("resolution".to_string(), dict);

        let req = StartRequest {
            mapping_id: "m1".to_string(),
            image_id: "simphony/desktop".to_string(),
            configuration,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["mapping_id"], "m1");
        assert_eq!(value["configuration"]["resolution"]["resolution"], "1024x768");
    }
}
