use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata keys the translator understands.
pub mod keys {
    pub const HAS_MATCHING_LOGINS: &str = "hasMatchingLogins";
    pub const TEXT_SELECTION_OPTION: &str = "textSelectionOption";
    pub const INSTALLED: &str = "installed";
    pub const ENABLED: &str = "enabled";
    pub const CUSTOM_TAB: &str = "customTab";
    pub const ADDON_ID: &str = "id";
    pub const CONTEXT_MENU_ITEM: &str = "item";
    pub const DURATION_PAIR: &str = "duration_pair";
}

/// One metadata entry. Emitters are loosely typed, so every accessor below
/// checks the shape and hands back `None` on a mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<String>),
    Timing { provider: String, duration_ms: u64 },
    /// Any other JSON shape (null, floats, objects, mixed lists). Kept so one
    /// odd entry does not reject the whole fact; no accessor ever reads it.
    Unrecognized(serde_json::Value),
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Bool(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Int(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Text(value)
    }
}

impl From<Vec<String>> for MetadataValue {
    fn from(value: Vec<String>) -> Self {
        MetadataValue::List(value)
    }
}

impl From<Vec<&str>> for MetadataValue {
    fn from(value: Vec<&str>) -> Self {
        MetadataValue::List(value.into_iter().map(str::to_string).collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, MetadataValue>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `insert`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.0.get(key)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            MetadataValue::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            MetadataValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        match self.get(key)? {
            MetadataValue::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn get_timing(&self, key: &str) -> Option<(&str, u64)> {
        match self.get(key)? {
            MetadataValue::Timing { provider, duration_ms } => Some((provider, *duration_ms)),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Option picked from the floating text-selection toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextSelectionOption {
    Copy,
    Search,
    SelectAll,
    Share,
}

impl TextSelectionOption {
    /// Accepts both the engine's action ids and the short names.
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "org.mozilla.geckoview.COPY" | "copy" => Some(Self::Copy),
            // Private search is counted as a regular search
            "CUSTOM_CONTEXT_MENU_SEARCH" | "CUSTOM_CONTEXT_MENU_SEARCH_PRIVATELY" | "search" => {
                Some(Self::Search)
            }
            "org.mozilla.geckoview.SELECT_ALL" | "selectAll" => Some(Self::SelectAll),
            "CUSTOM_CONTEXT_MENU_SHARE" | "share" => Some(Self::Share),
            _ => None,
        }
    }
}

/// Context menu entries whose taps are reported. Anything else stays private.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContextMenuItem {
    OpenInNewTab,
    OpenInPrivateTab,
    OpenImageInNewTab,
    SaveImage,
    ShareLink,
    CopyLink,
    CopyImageLocation,
    ShareImage,
}

impl ContextMenuItem {
    pub fn from_wire(raw: &str) -> Option<Self> {
        let name = raw.strip_prefix("mozac.feature.contextmenu.")?;
        match name {
            "open_in_new_tab" => Some(Self::OpenInNewTab),
            "open_in_private_tab" => Some(Self::OpenInPrivateTab),
            "open_image_in_new_tab" => Some(Self::OpenImageInNewTab),
            "save_image" => Some(Self::SaveImage),
            "share_link" => Some(Self::ShareLink),
            "copy_link" => Some(Self::CopyLink),
            "copy_image_location" => Some(Self::CopyImageLocation),
            "share_image" => Some(Self::ShareImage),
            _ => None,
        }
    }

    /// Value reported in the `named` extra.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenInNewTab => "open_in_new_tab",
            Self::OpenInPrivateTab => "open_in_private_tab",
            Self::OpenImageInNewTab => "open_image_in_new_tab",
            Self::SaveImage => "save_image",
            Self::ShareLink => "share_link",
            Self::CopyLink => "copy_link",
            Self::CopyImageLocation => "copy_image_location",
            Self::ShareImage => "share_image",
        }
    }
}
