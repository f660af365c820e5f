use crate::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Journey maps are keyed by state id. Key order is significant: it decides orphan report order
/// and the order in which nested journeys are inlined.
pub type JourneyMap = IndexMap<String, StateDefinition>;

/// Events keyed by event name (or by option key inside conditional blocks).
pub type EventMap = IndexMap<String, EventDefinition>;

pub type SubjourneyRegistry = IndexMap<String, Subjourney>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(
        default,
        rename = "nestedJourney",
        skip_serializing_if = "Option::is_none"
    )]
    pub nested_journey: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<EventMap>,
    #[serde(default, rename = "exitEvents", skip_serializing_if = "Option::is_none")]
    pub exit_events: Option<EventMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseSpec>,
    /// Fields this crate does not interpret, kept so they survive normalization.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StateDefinition {
    /// The events a traversal follows: `events` when declared, otherwise `exitEvents`.
    pub fn transitions(&self) -> Option<&EventMap> {
        self.events.as_ref().or(self.exit_events.as_ref())
    }

    /// Every declared event, `events` first and then `exitEvents`.
    pub fn all_events(&self) -> impl Iterator<Item = (&String, &EventDefinition)> {
        self.events
            .iter()
            .flatten()
            .chain(self.exit_events.iter().flatten())
    }

    /// Overlays this state onto `parent`.
    ///
    /// Events are merged key by key (parent order first, own entries win); every other field is
    /// taken from this state when present and from the parent otherwise.
    pub fn inherit_from(&self, parent: &StateDefinition) -> StateDefinition {
        let mut events = parent.events.clone().unwrap_or_default();
        for (name, event) in self.events.iter().flatten() {
            events.insert(name.clone(), event.clone());
        }

        let mut extra = parent.extra.clone();
        for (key, value) in &self.extra {
            extra.insert(key.clone(), value.clone());
        }

        StateDefinition {
            parent: self.parent.clone().or_else(|| parent.parent.clone()),
            nested_journey: self
                .nested_journey
                .clone()
                .or_else(|| parent.nested_journey.clone()),
            events: Some(events),
            exit_events: self
                .exit_events
                .clone()
                .or_else(|| parent.exit_events.clone()),
            response: self.response.clone().or_else(|| parent.response.clone()),
            extra,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDefinition {
    #[serde(default, rename = "targetState", skip_serializing_if = "Option::is_none")]
    pub target_state: Option<String>,
    #[serde(
        default,
        rename = "checkIfDisabled",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub check_if_disabled: EventMap,
    #[serde(
        default,
        rename = "checkFeatureFlag",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub check_feature_flag: EventMap,
    #[serde(
        default,
        rename = "exitEventToEmit",
        skip_serializing_if = "Option::is_none"
    )]
    pub exit_event_to_emit: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventDefinition {
    pub fn to_state(target: impl Into<String>) -> Self {
        Self {
            target_state: Some(target.into()),
            ..Default::default()
        }
    }

    pub fn when_disabled(mut self, key: impl Into<String>, branch: EventDefinition) -> Self {
        self.check_if_disabled.insert(key.into(), branch);
        self
    }

    pub fn when_feature_flag(mut self, key: impl Into<String>, branch: EventDefinition) -> Self {
        self.check_feature_flag.insert(key.into(), branch);
        self
    }
}

/// A reusable block of states inlined into host states that reference it via `nestedJourney`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subjourney {
    #[serde(default, rename = "nestedJourneyStates")]
    pub nested_journey_states: JourneyMap,
    #[serde(default, rename = "entryEvents")]
    pub entry_events: EventMap,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `response` object of a state.
///
/// Kept verbatim: the click payload carries every field, including the ones the renderer does not
/// look at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseSpec(Map<String, Value>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind<'a> {
    Process {
        lambda: Option<&'a str>,
    },
    Page {
        page_id: Option<&'a str>,
    },
    Cri {
        cri_id: Option<&'a str>,
        context: Option<LabelValue<'a>>,
        scope: Option<LabelValue<'a>>,
    },
    Error,
    Other,
}

/// A response field shown in a node label. Strings print bare, other values as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelValue<'a>(pub &'a Value);

impl std::fmt::Display for LabelValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

impl ResponseSpec {
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key)?.as_str()
    }

    /// A label field, skipped when absent, `null`, `false`, `0` or empty.
    pub fn get_label(&self, key: &str) -> Option<LabelValue<'_>> {
        let value = self.0.get(key)?;
        let shown = match value {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64() != Some(0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        };
        shown.then_some(LabelValue(value))
    }

    pub fn kind(&self) -> ResponseKind<'_> {
        match self.get_str("type") {
            Some("process") => ResponseKind::Process {
                lambda: self.get_str("lambda"),
            },
            Some("page") => ResponseKind::Page {
                page_id: self.get_str("pageId"),
            },
            Some("cri") => ResponseKind::Cri {
                cri_id: self.get_str("criId"),
                context: self.get_label("context"),
                scope: self.get_label("scope"),
            },
            Some("error") => ResponseKind::Error,
            _ => ResponseKind::Other,
        }
    }

    /// Compact JSON with the declared key order.
    pub fn to_json_string(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}

pub fn journey_map_from_json_str(text: &str) -> Result<JourneyMap> {
    Ok(serde_json::from_str(text)?)
}

pub fn subjourney_registry_from_json_str(text: &str) -> Result<SubjourneyRegistry> {
    Ok(serde_json::from_str(text)?)
}
