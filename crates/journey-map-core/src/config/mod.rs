use crate::{Error, Result};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Entry point of the identity-verification journey.
pub const DEFAULT_ROOT_STATES: &[&str] = &["INITIAL_IPV_JOURNEY"];

pub const DEFAULT_ERROR_STATES: &[&str] = &["ERROR", "CRI_TICF_BEFORE_ERROR"];

pub const DEFAULT_FAILURE_STATES: &[&str] = &[
    "PYI_KBV_FAIL",
    "PYI_NO_MATCH",
    "PYI_ANOTHER_WAY",
    "CRI_TICF_BEFORE_NO_MATCH",
    "CRI_TICF_BEFORE_ANOTHER_WAY",
];

/// State classes that drive traversal and styling.
///
/// Journey maps do not describe where they start or which of their states are error/failure
/// outcomes, so these lists travel alongside the map. Every field falls back to the
/// identity-verification defaults when omitted from a config document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphConfig {
    pub root_states: Vec<String>,
    pub error_states: IndexSet<String>,
    pub failure_states: IndexSet<String>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            root_states: DEFAULT_ROOT_STATES.iter().map(|s| s.to_string()).collect(),
            error_states: DEFAULT_ERROR_STATES.iter().map(|s| s.to_string()).collect(),
            failure_states: DEFAULT_FAILURE_STATES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl GraphConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|err| Error::InvalidConfigYaml {
            message: err.to_string(),
        })
    }

    pub fn with_root_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.root_states = states.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_error_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.error_states = states.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_failure_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failure_states = states.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_root_state(&self, state: &str) -> bool {
        self.root_states.iter().any(|s| s == state)
    }

    pub fn is_error_state(&self, state: &str) -> bool {
        self.error_states.contains(state)
    }

    pub fn is_failure_state(&self, state: &str) -> bool {
        self.failure_states.contains(state)
    }
}
