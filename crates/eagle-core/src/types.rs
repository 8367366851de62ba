//! Core type definitions for Eagle Send

use serde::{Deserialize, Serialize};

/// Port the Eagle application serves its local API on
pub const DEFAULT_PORT: u16 = 41595;

/// Tag attached to the companion metadata image of a video
pub const METADATA_PNG_TAG: &str = "metadata_png";

/// A destination folder in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
}

impl Folder {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// True when either the name or the id equals `name_or_id`
    pub fn matches(&self, name_or_id: &str) -> bool {
        self.name == name_or_id || self.id == name_or_id
    }
}

/// Payload of `POST /api/item/addFromPath`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub path: String,
    pub name: String,
    pub annotation: String,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
}

impl CatalogItem {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            annotation: String::new(),
            tags: Vec::new(),
            folder_id: None,
        }
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = annotation.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// Which generation details end up as catalog tags
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagPolicy {
    #[default]
    None,
    Prompt,
    Checkpoint,
    #[serde(rename = "Prompt + Checkpoint")]
    PromptAndCheckpoint,
}

impl TagPolicy {
    /// Get all policies in the order the node offers them
    pub fn all() -> &'static [TagPolicy] {
        &[
            TagPolicy::None,
            TagPolicy::PromptAndCheckpoint,
            TagPolicy::Prompt,
            TagPolicy::Checkpoint,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TagPolicy::None => "None",
            TagPolicy::Prompt => "Prompt",
            TagPolicy::Checkpoint => "Checkpoint",
            TagPolicy::PromptAndCheckpoint => "Prompt + Checkpoint",
        }
    }

    pub fn includes_prompt(&self) -> bool {
        matches!(self, TagPolicy::Prompt | TagPolicy::PromptAndCheckpoint)
    }

    pub fn includes_checkpoint(&self) -> bool {
        matches!(self, TagPolicy::Checkpoint | TagPolicy::PromptAndCheckpoint)
    }
}

impl std::fmt::Display for TagPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TagPolicy {
    type Err = crate::error::EagleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "none" => Ok(TagPolicy::None),
            "prompt" => Ok(TagPolicy::Prompt),
            "checkpoint" => Ok(TagPolicy::Checkpoint),
            "prompt+checkpoint" | "prompt-checkpoint" | "prompt-and-checkpoint" => {
                Ok(TagPolicy::PromptAndCheckpoint)
            }
            _ => Err(crate::error::EagleError::InvalidInput(format!(
                "unknown tag policy '{}' (expected one of: {})",
                s,
                TagPolicy::all()
                    .iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

/// Persisted user settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub version: String,
    /// Full API base URL; overrides host discovery when set
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Program used to turn WSL paths into Windows paths
    #[serde(default = "default_path_translator")]
    pub path_translator: String,
    #[serde(default)]
    pub default_folder: Option<String>,
    #[serde(default)]
    pub default_tag_policy: TagPolicy,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_path_translator() -> String {
    "wslpath".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            base_url: None,
            port: DEFAULT_PORT,
            path_translator: default_path_translator(),
            default_folder: None,
            default_tag_policy: TagPolicy::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_item_omits_missing_folder_id() {
        let item = CatalogItem::new("/out/a.png", "a.png").with_tags(vec!["cat".to_string()]);
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["path"], "/out/a.png");
        assert_eq!(json["tags"][0], "cat");
        assert!(json.get("folderId").is_none());

        let mut item = item;
        item.folder_id = Some("F1".to_string());
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["folderId"], "F1");
    }

    #[test]
    fn test_tag_policy_parsing() {
        assert_eq!("None".parse::<TagPolicy>().unwrap(), TagPolicy::None);
        assert_eq!(
            "Prompt + Checkpoint".parse::<TagPolicy>().unwrap(),
            TagPolicy::PromptAndCheckpoint
        );
        assert_eq!(
            "prompt-and-checkpoint".parse::<TagPolicy>().unwrap(),
            TagPolicy::PromptAndCheckpoint
        );
        assert_eq!("checkpoint".parse::<TagPolicy>().unwrap(), TagPolicy::Checkpoint);
        assert!("everything".parse::<TagPolicy>().is_err());
    }

    #[test]
    fn test_settings_fill_defaults_for_missing_fields() {
        let settings: Settings = serde_json::from_str(r#"{"version": "1.0.0"}"#).unwrap();
        assert_eq!(settings, Settings::default());

        let settings: Settings = serde_json::from_str(
            r#"{"version": "1.0.0", "default_tag_policy": "Prompt + Checkpoint"}"#,
        )
        .unwrap();
        assert_eq!(settings.default_tag_policy, TagPolicy::PromptAndCheckpoint);
    }
}
