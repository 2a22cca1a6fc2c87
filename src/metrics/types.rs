use serde::Serialize;
use std::fmt;

use crate::fact::ContextMenuItem;

// Identifiers below are part of the backend schema. Renaming one breaks
// every dashboard built on it.

/// Event metrics, recorded once per occurrence with an optional extra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventMetric {
    LoginDialogDisplayed,
    LoginDialogCancelled,
    LoginDialogNeverSave,
    LoginDialogSaved,

    CreditCardFormDetected,
    CreditCardAutofilled,
    CreditCardPromptShown,
    CreditCardPromptExpanded,
    CreditCardPromptDismissed,

    MediaNotificationPlay,
    MediaNotificationPause,
    MediaStatePlay,
    MediaStatePause,
    MediaStateStop,

    CustomTabActionButton,
    CustomTabClosed,
    CustomTabMenu,

    AutofillRequestMatchingLogins,
    AutofillRequestNoMatchingLogins,
    AutofillSearchDisplayed,
    AutofillSearchItemSelected,
    AutofillUnlockSuccessful,
    AutofillUnlockCancelled,
    AutofillConfirmSuccessful,
    AutofillConfirmCancelled,

    ContextMenuItemTapped,
    AddonOpenedInToolbarMenu,
}

impl EventMetric {
    pub fn id(&self) -> &'static str {
        match self {
            EventMetric::LoginDialogDisplayed => "loginDialog.displayed",
            EventMetric::LoginDialogCancelled => "loginDialog.cancelled",
            EventMetric::LoginDialogNeverSave => "loginDialog.neverSave",
            EventMetric::LoginDialogSaved => "loginDialog.saved",
            EventMetric::CreditCardFormDetected => "creditCards.formDetected",
            EventMetric::CreditCardAutofilled => "creditCards.autofilled",
            EventMetric::CreditCardPromptShown => "creditCards.autofillPromptShown",
            EventMetric::CreditCardPromptExpanded => "creditCards.autofillPromptExpanded",
            EventMetric::CreditCardPromptDismissed => "creditCards.autofillPromptDismissed",
            EventMetric::MediaNotificationPlay => "mediaNotification.play",
            EventMetric::MediaNotificationPause => "mediaNotification.pause",
            EventMetric::MediaStatePlay => "mediaState.play",
            EventMetric::MediaStatePause => "mediaState.pause",
            EventMetric::MediaStateStop => "mediaState.stop",
            EventMetric::CustomTabActionButton => "customTab.actionButton",
            EventMetric::CustomTabClosed => "customTab.closed",
            EventMetric::CustomTabMenu => "customTab.menu",
            EventMetric::AutofillRequestMatchingLogins => "androidAutofill.requestMatchingLogins",
            EventMetric::AutofillRequestNoMatchingLogins => "androidAutofill.requestNoMatchingLogins",
            EventMetric::AutofillSearchDisplayed => "androidAutofill.searchDisplayed",
            EventMetric::AutofillSearchItemSelected => "androidAutofill.searchItemSelected",
            EventMetric::AutofillUnlockSuccessful => "androidAutofill.unlockSuccessful",
            EventMetric::AutofillUnlockCancelled => "androidAutofill.unlockCancelled",
            EventMetric::AutofillConfirmSuccessful => "androidAutofill.confirmSuccessful",
            EventMetric::AutofillConfirmCancelled => "androidAutofill.confirmCancelled",
            EventMetric::ContextMenuItemTapped => "contextMenu.itemTapped",
            EventMetric::AddonOpenedInToolbarMenu => "addons.openAddonInToolbarMenu",
        }
    }
}

/// Plain counters, incremented by one per fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CounterMetric {
    ContextMenuCopyButton,
    ContextMenuSearchButton,
    ContextMenuSelectAllButton,
    ContextMenuShareButton,

    PwaHomescreenTap,
    PwaInstallTap,

    SyncedTabsSuggestionClicked,

    AwesomebarBookmarkSuggestionClicked,
    AwesomebarClipboardSuggestionClicked,
    AwesomebarHistorySuggestionClicked,
    AwesomebarSearchActionClicked,
    AwesomebarSearchSuggestionClicked,
    AwesomebarOpenedTabSuggestionClicked,
}

impl CounterMetric {
    pub fn id(&self) -> &'static str {
        match self {
            CounterMetric::ContextMenuCopyButton => "contextMenu.copyButton",
            CounterMetric::ContextMenuSearchButton => "contextMenu.searchButton",
            CounterMetric::ContextMenuSelectAllButton => "contextMenu.selectAllButton",
            CounterMetric::ContextMenuShareButton => "contextMenu.shareButton",
            CounterMetric::PwaHomescreenTap => "progressiveWebApp.homescreenTap",
            CounterMetric::PwaInstallTap => "progressiveWebApp.installTap",
            CounterMetric::SyncedTabsSuggestionClicked => "syncedTabs.syncedTabsSuggestionClicked",
            CounterMetric::AwesomebarBookmarkSuggestionClicked => "awesomebar.bookmarkSuggestionClicked",
            CounterMetric::AwesomebarClipboardSuggestionClicked => "awesomebar.clipboardSuggestionClicked",
            CounterMetric::AwesomebarHistorySuggestionClicked => "awesomebar.historySuggestionClicked",
            CounterMetric::AwesomebarSearchActionClicked => "awesomebar.searchActionClicked",
            CounterMetric::AwesomebarSearchSuggestionClicked => "awesomebar.searchSuggestionClicked",
            CounterMetric::AwesomebarOpenedTabSuggestionClicked => "awesomebar.openedTabSuggestionClicked",
        }
    }
}

/// Counters split by a free-form label (the search provider).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LabeledCounterMetric {
    SearchAdClicks,
    SearchWithAds,
    SearchInContent,
}

impl LabeledCounterMetric {
    pub fn id(&self) -> &'static str {
        match self {
            LabeledCounterMetric::SearchAdClicks => "browserSearch.adClicks",
            LabeledCounterMetric::SearchWithAds => "browserSearch.withAds",
            LabeledCounterMetric::SearchInContent => "browserSearch.inContent",
        }
    }
}

/// Timing distributions for awesome bar suggestion providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimingMetric {
    HistorySuggestions,
    BookmarkSuggestions,
    SessionSuggestions,
    SearchEngineSuggestions,
    SyncedTabsSuggestions,
}

impl TimingMetric {
    pub fn id(&self) -> &'static str {
        match self {
            TimingMetric::HistorySuggestions => "perfAwesomebar.historySuggestions",
            TimingMetric::BookmarkSuggestions => "perfAwesomebar.bookmarkSuggestions",
            TimingMetric::SessionSuggestions => "perfAwesomebar.sessionSuggestions",
            TimingMetric::SearchEngineSuggestions => "perfAwesomebar.searchEngineSuggestions",
            TimingMetric::SyncedTabsSuggestions => "perfAwesomebar.syncedTabsSuggestions",
        }
    }

    /// Maps the provider name carried in a `duration_pair` to its metric.
    pub fn for_provider(provider: &str) -> Option<Self> {
        match provider {
            "history" => Some(TimingMetric::HistorySuggestions),
            "bookmarks" => Some(TimingMetric::BookmarkSuggestions),
            "session" => Some(TimingMetric::SessionSuggestions),
            "search_engine" => Some(TimingMetric::SearchEngineSuggestions),
            "synced_tabs" => Some(TimingMetric::SyncedTabsSuggestions),
            _ => None,
        }
    }
}

macro_rules! display_by_id {
    ($($metric:ty),*) => {
        $(impl fmt::Display for $metric {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.id())
            }
        })*
    };
}

display_by_id!(EventMetric, CounterMetric, LabeledCounterMetric, TimingMetric);

/// Extra payload some events carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EventExtra {
    ContextMenuItem { named: &'static str },
    Addon { addon_id: String },
}

impl From<ContextMenuItem> for EventExtra {
    fn from(item: ContextMenuItem) -> Self {
        EventExtra::ContextMenuItem { named: item.as_str() }
    }
}
