use serde::{Deserialize, Serialize};
use std::fmt;

use super::metadata::Metadata;

/// The feature area that emitted a fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    FeaturePrompts,
    FeatureMedia,
    FeatureCustomTabs,
    BrowserToolbar,
    BrowserMenu,
    FeatureAutofill,
    FeatureContextMenu,
    FeaturePwa,
    FeatureSyncedTabs,
    FeatureAwesomeBar,
    BrowserAwesomeBar,
    FeatureSearch,
    FeatureTopSites,
    SupportWebExtensions,
    // Areas that emit facts nobody translates (yet)
    FeatureDownloads,
    FeatureFindInPage,
    FeatureSitePermissions,
    FeatureTabs,
    FeatureReaderView,
}

/// Generic verb attached to a fact. Only a few items branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Click,
    Toggle,
    Commit,
    Display,
    Cancel,
    Select,
    Confirm,
    Play,
    Pause,
    Stop,
    Interaction,
}

macro_rules! wire_items {
    ($($variant:ident => $wire:literal,)*) => {
        /// Sub-event tag within a component, carried on the wire as a plain string.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum Item {
            $($variant,)*
            /// A tag emitted by a feature this crate does not know about.
            Other(String),
        }

        impl Item {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Item::$variant => $wire,)*
                    Item::Other(raw) => raw,
                }
            }

            pub fn from_wire(raw: &str) -> Self {
                match raw {
                    $($wire => Item::$variant,)*
                    other => Item::Other(other.to_string()),
                }
            }
        }
    };
}

wire_items! {
    // Login dialog
    Display => "display",
    Cancel => "cancel",
    NeverSave => "never_save",
    Save => "save",
    // Credit card autofill dialog
    CreditCardFormDetected => "autofill_credit_card_form_detected",
    CreditCardSuccess => "autofill_credit_card_success",
    CreditCardPromptShown => "autofill_credit_card_prompt_shown",
    CreditCardPromptExpanded => "autofill_credit_card_prompt_expanded",
    CreditCardPromptDismissed => "autofill_credit_card_prompt_dismissed",
    // Media
    Notification => "notification",
    State => "state",
    // Custom tabs, toolbar, browser menu
    Close => "close",
    ActionButton => "action_button",
    Menu => "menu",
    WebExtensionMenuItem => "web_extension_menu_item",
    // Android autofill service
    AutofillRequest => "autofill_request",
    AutofillSearch => "autofill_search",
    AutofillLock => "autofill_lock",
    AutofillConfirmation => "autofill_confirmation",
    // Context menu
    TextSelectionOption => "text_selection_option",
    ContextItem => "item",
    // PWA
    HomescreenIconTap => "homescreen_icon_tap",
    InstallShortcut => "install_shortcut",
    // Synced tabs and awesome bar
    SyncedTabsSuggestionClicked => "synced_tabs_suggestion_clicked",
    BookmarkSuggestionClicked => "bookmark_suggestion_clicked",
    ClipboardSuggestionClicked => "clipboard_suggestion_clicked",
    HistorySuggestionClicked => "history_suggestion_clicked",
    SearchActionClicked => "search_action_clicked",
    SearchSuggestionClicked => "search_suggestion_clicked",
    OpenedTabSuggestionClicked => "opened_tab_suggestion_clicked",
    ProviderDuration => "provider_duration",
    // Search
    SerpAddClicked => "serp_add_clicked",
    SerpShownWithAdds => "serp_shown_with_adds",
    InContentSearch => "in_content_search",
    // Top sites, web extensions
    Count => "count",
    WebExtensionsInitialized => "web_extensions_initialized",
}

impl From<String> for Item {
    fn from(raw: String) -> Self {
        Item::from_wire(&raw)
    }
}

impl From<&str> for Item {
    fn from(raw: &str) -> Self {
        Item::from_wire(raw)
    }
}

impl From<Item> for String {
    fn from(item: Item) -> Self {
        match item {
            Item::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single interaction reported by some application feature.
///
/// Facts are built at the emission site, handed to the bus, and dropped once
/// every processor has seen them. They are never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    component: Component,
    action: Action,
    item: Item,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
}

impl Fact {
    pub fn new(component: Component, action: Action, item: impl Into<Item>) -> Self {
        Self {
            component,
            action,
            item: item.into(),
            value: None,
            metadata: Metadata::default(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn component(&self) -> Component {
        self.component
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}
