use crate::model::{EventDefinition, JourneyMap};
use indexmap::IndexSet;
use serde::Serialize;

/// Runtime toggles for one render.
///
/// Mirrors the option form of the journey-map viewer: repeatable `disabledCri` and `flag` values
/// plus presence-only switches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub disabled: IndexSet<String>,
    pub feature_flags: IndexSet<String>,
    pub include_errors: bool,
    pub include_failures: bool,
    pub expand_nested_journeys: bool,
    pub only_orphan_states: bool,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `application/x-www-form-urlencoded` option parameters (a leading `?` is allowed).
    pub fn from_query(query: &str) -> Self {
        let mut options = Self::default();
        options.merge_query(query);
        options
    }

    pub fn merge_query(&mut self, query: &str) {
        let query = query.strip_prefix('?').unwrap_or(query);
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match &*key {
                "disabledCri" => {
                    if !value.is_empty() {
                        self.disabled.insert(value.into_owned());
                    }
                }
                "flag" | "featureFlag" => {
                    if !value.is_empty() {
                        self.feature_flags.insert(value.into_owned());
                    }
                }
                "includeErrors" => self.include_errors = true,
                "includeFailures" => self.include_failures = true,
                "expandNestedJourneys" => self.expand_nested_journeys = true,
                "onlyOrphanStates" => self.only_orphan_states = true,
                other => tracing::debug!(parameter = other, "ignoring unknown render option"),
            }
        }
    }

    pub fn with_disabled(mut self, key: impl Into<String>) -> Self {
        self.disabled.insert(key.into());
        self
    }

    pub fn with_feature_flag(mut self, key: impl Into<String>) -> Self {
        self.feature_flags.insert(key.into());
        self
    }

    pub fn with_include_errors(mut self, include: bool) -> Self {
        self.include_errors = include;
        self
    }

    pub fn with_include_failures(mut self, include: bool) -> Self {
        self.include_failures = include;
        self
    }

    pub fn with_expand_nested_journeys(mut self, expand: bool) -> Self {
        self.expand_nested_journeys = expand;
        self
    }

    pub fn with_only_orphan_states(mut self, only: bool) -> Self {
        self.only_orphan_states = only;
        self
    }

    pub fn is_disabled(&self, key: &str) -> bool {
        self.disabled.contains(key)
    }

    pub fn is_feature_flag_enabled(&self, key: &str) -> bool {
        self.feature_flags.contains(key)
    }
}

/// Option keys referenced by a journey map, for building an option-selection form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectedOptions {
    pub disabled_options: Vec<String>,
    pub feature_flag_options: Vec<String>,
}

/// Collects every `checkIfDisabled` and `checkFeatureFlag` key in first-seen order.
///
/// Works on the raw map: parents and nested journeys do not need to be expanded first.
pub fn collect_options(journey_map: &JourneyMap) -> CollectedOptions {
    let mut disabled = IndexSet::new();
    let mut feature_flags = IndexSet::new();

    for definition in journey_map.values() {
        for event in definition.transitions().into_iter().flat_map(|e| e.values()) {
            add_definition_options(event, &mut disabled, &mut feature_flags);
        }
    }

    CollectedOptions {
        disabled_options: disabled.into_iter().map(str::to_string).collect(),
        feature_flag_options: feature_flags.into_iter().map(str::to_string).collect(),
    }
}

fn add_definition_options<'a>(
    definition: &'a EventDefinition,
    disabled: &mut IndexSet<&'a str>,
    feature_flags: &mut IndexSet<&'a str>,
) {
    for (key, branch) in &definition.check_if_disabled {
        disabled.insert(key);
        add_definition_options(branch, disabled, feature_flags);
    }
    for (key, branch) in &definition.check_feature_flag {
        feature_flags.insert(key);
        add_definition_options(branch, disabled, feature_flags);
    }
}
