use std::sync::Arc;

use tracing::{debug, warn};

use super::recorder::MetricsRecorder;
use super::types::{CounterMetric, EventExtra, EventMetric, LabeledCounterMetric, TimingMetric};
use crate::fact::{keys, Action, Component, ContextMenuItem, Fact, Item, TextSelectionOption};
use crate::settings::{SettingKey, SettingValue, SettingsStore};

/// The single side effect a fact maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Event {
        metric: EventMetric,
        extra: Option<EventExtra>,
    },
    Counter(CounterMetric),
    LabeledCounter {
        metric: LabeledCounterMetric,
        label: String,
    },
    Timing {
        metric: TimingMetric,
        sample_ms: u64,
    },
    /// Settings write, not a metric.
    TopSitesSize(i64),
    /// Settings write. Either list may be absent; at least one is present.
    Addons {
        installed: Option<Vec<String>>,
        enabled: Option<Vec<String>>,
    },
}

impl Translation {
    /// Executes the side effect. Metrics go to `recorder`, settings writes to
    /// `settings`; no translation touches both.
    pub fn apply(self, recorder: &dyn MetricsRecorder, settings: &dyn SettingsStore) {
        match self {
            Translation::Event { metric, extra } => recorder.record_event(metric, extra),
            Translation::Counter(metric) => recorder.add_to_counter(metric, 1),
            Translation::LabeledCounter { metric, label } => {
                recorder.add_to_labeled_counter(metric, &label, 1)
            }
            Translation::Timing { metric, sample_ms } => {
                recorder.accumulate_timing(metric, sample_ms)
            }
            Translation::TopSitesSize(size) => {
                settings.put(SettingKey::TopSitesSize, SettingValue::Int(size))
            }
            Translation::Addons { installed, enabled } => {
                if let Some(list) = installed {
                    write_addon_list(
                        settings,
                        SettingKey::InstalledAddonsCount,
                        SettingKey::InstalledAddonsList,
                        &list,
                    );
                }
                if let Some(list) = enabled {
                    write_addon_list(
                        settings,
                        SettingKey::EnabledAddonsCount,
                        SettingKey::EnabledAddonsList,
                        &list,
                    );
                }
            }
        }
    }
}

fn write_addon_list(
    settings: &dyn SettingsStore,
    count_key: SettingKey,
    list_key: SettingKey,
    list: &[String],
) {
    settings.put(count_key, SettingValue::Int(list.len() as i64));
    settings.put(list_key, SettingValue::Text(list.join(",")));
}

fn event(metric: EventMetric) -> Option<Translation> {
    Some(Translation::Event { metric, extra: None })
}

fn counter(metric: CounterMetric) -> Option<Translation> {
    Some(Translation::Counter(metric))
}

/// Maps a fact to the recording it stands for, or `None` when nothing should
/// be recorded.
///
/// Pure: looks only at the fact. The outer match is exhaustive over
/// `Component`, so a new feature area has to be routed (or explicitly
/// ignored) before this compiles.
pub fn translate(fact: &Fact) -> Option<Translation> {
    match fact.component() {
        Component::FeaturePrompts => prompts(fact),
        Component::FeatureMedia => media(fact),
        Component::FeatureCustomTabs => match fact.item() {
            Item::Close => event(EventMetric::CustomTabClosed),
            Item::ActionButton => event(EventMetric::CustomTabActionButton),
            _ => None,
        },
        Component::BrowserToolbar => match fact.item() {
            // Only the custom tab toolbar reports its menu
            Item::Menu if fact.metadata().get_bool(keys::CUSTOM_TAB) == Some(true) => {
                event(EventMetric::CustomTabMenu)
            }
            _ => None,
        },
        Component::BrowserMenu => match fact.item() {
            Item::WebExtensionMenuItem => {
                let addon_id = fact.metadata().get_text(keys::ADDON_ID)?;
                Some(Translation::Event {
                    metric: EventMetric::AddonOpenedInToolbarMenu,
                    extra: Some(EventExtra::Addon {
                        addon_id: addon_id.to_string(),
                    }),
                })
            }
            _ => None,
        },
        Component::FeatureAutofill => autofill(fact),
        Component::FeatureContextMenu => context_menu(fact),
        Component::FeaturePwa => match fact.item() {
            Item::HomescreenIconTap => counter(CounterMetric::PwaHomescreenTap),
            Item::InstallShortcut => counter(CounterMetric::PwaInstallTap),
            _ => None,
        },
        Component::FeatureSyncedTabs => match fact.item() {
            Item::SyncedTabsSuggestionClicked => counter(CounterMetric::SyncedTabsSuggestionClicked),
            _ => None,
        },
        Component::FeatureAwesomeBar => awesome_bar(fact),
        Component::BrowserAwesomeBar => match fact.item() {
            Item::ProviderDuration => provider_duration(fact),
            _ => None,
        },
        Component::FeatureSearch => search(fact),
        Component::FeatureTopSites => match fact.item() {
            Item::Count => top_sites_count(fact),
            _ => None,
        },
        Component::SupportWebExtensions => match fact.item() {
            Item::WebExtensionsInitialized => web_extensions(fact),
            _ => None,
        },
        Component::FeatureDownloads
        | Component::FeatureFindInPage
        | Component::FeatureSitePermissions
        | Component::FeatureTabs
        | Component::FeatureReaderView => None,
    }
}

fn prompts(fact: &Fact) -> Option<Translation> {
    match fact.item() {
        Item::Display => event(EventMetric::LoginDialogDisplayed),
        Item::Cancel => event(EventMetric::LoginDialogCancelled),
        Item::NeverSave => event(EventMetric::LoginDialogNeverSave),
        Item::Save => event(EventMetric::LoginDialogSaved),
        Item::CreditCardFormDetected => event(EventMetric::CreditCardFormDetected),
        Item::CreditCardSuccess => event(EventMetric::CreditCardAutofilled),
        Item::CreditCardPromptShown => event(EventMetric::CreditCardPromptShown),
        Item::CreditCardPromptExpanded => event(EventMetric::CreditCardPromptExpanded),
        Item::CreditCardPromptDismissed => event(EventMetric::CreditCardPromptDismissed),
        _ => None,
    }
}

fn media(fact: &Fact) -> Option<Translation> {
    match (fact.item(), fact.action()) {
        (Item::Notification, Action::Play) => event(EventMetric::MediaNotificationPlay),
        (Item::Notification, Action::Pause) => event(EventMetric::MediaNotificationPause),
        (Item::State, Action::Play) => event(EventMetric::MediaStatePlay),
        (Item::State, Action::Pause) => event(EventMetric::MediaStatePause),
        (Item::State, Action::Stop) => event(EventMetric::MediaStateStop),
        _ => None,
    }
}

fn autofill(fact: &Fact) -> Option<Translation> {
    match fact.item() {
        Item::AutofillRequest => {
            // Missing or non-boolean flag counts as "no matching logins"
            if fact.metadata().get_bool(keys::HAS_MATCHING_LOGINS) == Some(true) {
                event(EventMetric::AutofillRequestMatchingLogins)
            } else {
                event(EventMetric::AutofillRequestNoMatchingLogins)
            }
        }
        Item::AutofillSearch => {
            if fact.action() == Action::Select {
                event(EventMetric::AutofillSearchItemSelected)
            } else {
                event(EventMetric::AutofillSearchDisplayed)
            }
        }
        Item::AutofillLock => {
            if fact.action() == Action::Confirm {
                event(EventMetric::AutofillUnlockSuccessful)
            } else {
                event(EventMetric::AutofillUnlockCancelled)
            }
        }
        Item::AutofillConfirmation => {
            if fact.action() == Action::Confirm {
                event(EventMetric::AutofillConfirmSuccessful)
            } else {
                event(EventMetric::AutofillConfirmCancelled)
            }
        }
        _ => None,
    }
}

fn context_menu(fact: &Fact) -> Option<Translation> {
    match fact.item() {
        Item::TextSelectionOption => {
            let raw = fact.metadata().get_text(keys::TEXT_SELECTION_OPTION)?;
            let metric = match TextSelectionOption::from_wire(raw)? {
                TextSelectionOption::Copy => CounterMetric::ContextMenuCopyButton,
                TextSelectionOption::Search => CounterMetric::ContextMenuSearchButton,
                TextSelectionOption::SelectAll => CounterMetric::ContextMenuSelectAllButton,
                TextSelectionOption::Share => CounterMetric::ContextMenuShareButton,
            };
            counter(metric)
        }
        Item::ContextItem => {
            let raw = fact.metadata().get_text(keys::CONTEXT_MENU_ITEM)?;
            let named = ContextMenuItem::from_wire(raw)?;
            Some(Translation::Event {
                metric: EventMetric::ContextMenuItemTapped,
                extra: Some(named.into()),
            })
        }
        _ => None,
    }
}

fn awesome_bar(fact: &Fact) -> Option<Translation> {
    let metric = match fact.item() {
        Item::BookmarkSuggestionClicked => CounterMetric::AwesomebarBookmarkSuggestionClicked,
        Item::ClipboardSuggestionClicked => CounterMetric::AwesomebarClipboardSuggestionClicked,
        Item::HistorySuggestionClicked => CounterMetric::AwesomebarHistorySuggestionClicked,
        Item::SearchActionClicked => CounterMetric::AwesomebarSearchActionClicked,
        Item::SearchSuggestionClicked => CounterMetric::AwesomebarSearchSuggestionClicked,
        Item::OpenedTabSuggestionClicked => CounterMetric::AwesomebarOpenedTabSuggestionClicked,
        _ => return None,
    };
    counter(metric)
}

fn provider_duration(fact: &Fact) -> Option<Translation> {
    let (provider, duration_ms) = fact.metadata().get_timing(keys::DURATION_PAIR)?;
    let metric = TimingMetric::for_provider(provider)?;
    Some(Translation::Timing {
        metric,
        sample_ms: duration_ms,
    })
}

fn search(fact: &Fact) -> Option<Translation> {
    let metric = match fact.item() {
        Item::SerpAddClicked => LabeledCounterMetric::SearchAdClicks,
        Item::SerpShownWithAdds => LabeledCounterMetric::SearchWithAds,
        Item::InContentSearch => LabeledCounterMetric::SearchInContent,
        _ => return None,
    };
    let label = fact.value().filter(|label| !label.is_empty())?;
    Some(Translation::LabeledCounter {
        metric,
        label: label.to_string(),
    })
}

fn top_sites_count(fact: &Fact) -> Option<Translation> {
    let raw = fact.value()?;
    match raw.trim().parse::<i64>() {
        Ok(size) => Some(Translation::TopSitesSize(size)),
        Err(err) => {
            warn!(value = raw, error = %err, "Ignoring top sites count that is not an integer");
            None
        }
    }
}

fn web_extensions(fact: &Fact) -> Option<Translation> {
    let installed = fact.metadata().get_list(keys::INSTALLED).map(<[String]>::to_vec);
    let enabled = fact.metadata().get_list(keys::ENABLED).map(<[String]>::to_vec);
    if installed.is_none() && enabled.is_none() {
        return None;
    }
    Some(Translation::Addons { installed, enabled })
}

/// Binds `translate` to concrete backends.
#[derive(Clone)]
pub struct FactTranslator {
    recorder: Arc<dyn MetricsRecorder>,
    settings: Arc<dyn SettingsStore>,
}

impl FactTranslator {
    pub fn new(recorder: Arc<dyn MetricsRecorder>, settings: Arc<dyn SettingsStore>) -> Self {
        Self { recorder, settings }
    }

    /// Translates and applies `fact`. Returns what was applied so callers can
    /// log or assert on it.
    pub fn dispatch(&self, fact: &Fact) -> Option<Translation> {
        let Some(translation) = translate(fact) else {
            debug!(component = ?fact.component(), item = %fact.item(), "No metric for fact");
            return None;
        };

        translation.clone().apply(self.recorder.as_ref(), self.settings.as_ref());
        Some(translation)
    }
}

impl std::fmt::Debug for FactTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactTranslator").finish_non_exhaustive()
    }
}
