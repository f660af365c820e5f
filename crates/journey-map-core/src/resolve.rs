//! Conditional event resolution.
//!
//! Keep in sync with the journey engine's event resolution: at every level the first
//! `checkIfDisabled` key (in declared order) that is disabled wins, then the first enabled
//! `checkFeatureFlag` key, and only then the plain `targetState`.

use crate::RenderOptions;
use crate::model::EventDefinition;

/// One resolution step of an [`EventDefinition`] under fixed options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition<'a> {
    Disabled(&'a str, &'a EventDefinition),
    FeatureFlag(&'a str, &'a EventDefinition),
    Base(Option<&'a str>),
}

pub fn select<'a>(definition: &'a EventDefinition, options: &RenderOptions) -> Condition<'a> {
    if let Some((key, branch)) = definition
        .check_if_disabled
        .iter()
        .find(|(key, _)| options.is_disabled(key))
    {
        return Condition::Disabled(key, branch);
    }

    if let Some((key, branch)) = definition
        .check_feature_flag
        .iter()
        .find(|(key, _)| options.is_feature_flag_enabled(key))
    {
        return Condition::FeatureFlag(key, branch);
    }

    Condition::Base(definition.target_state.as_deref())
}

/// Returns the effective target state, or `None` when the selected branch declares no target.
pub fn resolve<'a>(definition: &'a EventDefinition, options: &RenderOptions) -> Option<&'a str> {
    let mut current = definition;
    loop {
        match select(current, options) {
            Condition::Disabled(_, branch) | Condition::FeatureFlag(_, branch) => current = branch,
            Condition::Base(target) => return target,
        }
    }
}

/// Every target the event can reach under any combination of options.
pub fn possible_targets(definition: &EventDefinition) -> Vec<&str> {
    let mut out = Vec::new();
    let mut stack = vec![definition];
    while let Some(def) = stack.pop() {
        if let Some(target) = def.target_state.as_deref() {
            out.push(target);
        }
        // Reversed so branches pop in declared order, disabled before feature flags.
        stack.extend(def.check_feature_flag.values().rev());
        stack.extend(def.check_if_disabled.values().rev());
    }
    out
}
