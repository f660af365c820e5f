//! Journey map normalization.
//!
//! Both passes build a new map from the borrowed input; the caller's map is never touched.

use crate::RenderOptions;
use crate::model::{
    EventDefinition, EventMap, JourneyMap, StateDefinition, Subjourney, SubjourneyRegistry,
};
use indexmap::IndexSet;

/// Expands parents, then (when requested) inlines nested journeys.
pub fn normalize(
    journey_map: &JourneyMap,
    registry: &SubjourneyRegistry,
    options: &RenderOptions,
) -> JourneyMap {
    let expanded = expand_parents(journey_map);
    if options.expand_nested_journeys {
        expand_nested_journeys(&expanded, registry)
    } else {
        expanded
    }
}

/// Merges every state with its `parent` and drops the states used as parents.
///
/// Parents are looked up in the input map, so only one level of inheritance is applied: a parent
/// that itself has a parent contributes its own declared fields only.
pub fn expand_parents(journey_map: &JourneyMap) -> JourneyMap {
    let mut templates: IndexSet<&str> = IndexSet::new();
    let mut out = JourneyMap::with_capacity(journey_map.len());

    for (state, definition) in journey_map {
        let Some(parent_id) = definition.parent.as_deref() else {
            out.insert(state.clone(), definition.clone());
            continue;
        };
        let Some(parent) = journey_map.get(parent_id) else {
            tracing::warn!(
                state = %state,
                parent = %parent_id,
                "parent state not found; state left unmerged"
            );
            out.insert(state.clone(), definition.clone());
            continue;
        };
        out.insert(state.clone(), definition.inherit_from(parent));
        templates.insert(parent_id);
    }

    for template in templates {
        out.shift_remove(template);
    }
    out
}

/// Inlines every state that references a registered nested journey.
///
/// Sub-journey states are renamed `<nestedState>_<outerState>` so that the same sub-journey can be
/// inlined at several sites. Inlined states are appended after the remaining states.
pub fn expand_nested_journeys(
    journey_map: &JourneyMap,
    registry: &SubjourneyRegistry,
) -> JourneyMap {
    let mut out = JourneyMap::with_capacity(journey_map.len());
    let mut inlined = JourneyMap::new();
    let mut sites: Vec<(&str, &Subjourney)> = Vec::new();

    for (state, definition) in journey_map {
        let Some(nested_id) = definition.nested_journey.as_deref() else {
            out.insert(state.clone(), definition.clone());
            continue;
        };
        let Some(subjourney) = registry.get(nested_id) else {
            tracing::warn!(
                state = %state,
                nested_journey = %nested_id,
                "unknown nested journey; state left unexpanded"
            );
            out.insert(state.clone(), definition.clone());
            continue;
        };

        let site = InlineSite {
            outer_state: state,
            exit_events: definition.exit_events.as_ref(),
            subjourney,
        };
        for (nested_state, nested_definition) in &subjourney.nested_journey_states {
            let name = namespaced(nested_state, state);
            if inlined.contains_key(&name) {
                tracing::warn!(state = %name, "two sites inline the same state name; last wins");
            }
            inlined.insert(name, site.inline_state(nested_definition));
        }
        sites.push((state.as_str(), subjourney));
    }

    for (name, definition) in inlined {
        if out.contains_key(&name) {
            tracing::warn!(state = %name, "declared state replaced by an inlined nested state");
        }
        out.insert(name, definition);
    }

    for (outer_state, subjourney) in sites {
        retarget_entry_events(&mut out, outer_state, subjourney);
    }
    out
}

pub fn namespaced(nested_state: &str, outer_state: &str) -> String {
    format!("{nested_state}_{outer_state}")
}

struct InlineSite<'a> {
    outer_state: &'a str,
    exit_events: Option<&'a EventMap>,
    subjourney: &'a Subjourney,
}

impl InlineSite<'_> {
    fn inline_state(&self, definition: &StateDefinition) -> StateDefinition {
        let mut inlined = definition.clone();
        if let Some(events) = inlined.events.take() {
            inlined.events = Some(self.rewrite_events(events));
        }
        inlined
    }

    fn rewrite_events(&self, events: EventMap) -> EventMap {
        events
            .into_iter()
            .filter_map(|(name, event)| {
                let event = self.rewrite_event(&name, event)?;
                Some((name, event))
            })
            .collect()
    }

    /// Returns `None` when the event emits an exit event the outer state does not handle.
    fn rewrite_event(&self, name: &str, mut event: EventDefinition) -> Option<EventDefinition> {
        if let Some(target) = event.target_state.take() {
            event.target_state = Some(
                if self.subjourney.nested_journey_states.contains_key(&target) {
                    namespaced(&target, self.outer_state)
                } else {
                    target
                },
            );
        }

        if let Some(exit_event) = event.exit_event_to_emit.take() {
            let Some(exit) = self.exit_events.and_then(|events| events.get(&exit_event)) else {
                tracing::warn!(
                    state = %self.outer_state,
                    event = %name,
                    exit_event = %exit_event,
                    "unhandled exit event from nested journey; event dropped"
                );
                return None;
            };
            event.target_state = exit.target_state.clone();
        }

        event.check_if_disabled = self.rewrite_events(std::mem::take(&mut event.check_if_disabled));
        event.check_feature_flag =
            self.rewrite_events(std::mem::take(&mut event.check_feature_flag));
        Some(event)
    }
}

/// Points events that entered the (now removed) outer state at the namespaced entry state.
///
/// Conditional branches of an entry event are retargeted with the same rule.
fn retarget_entry_events(
    journey_map: &mut JourneyMap,
    outer_state: &str,
    subjourney: &Subjourney,
) {
    for (entry_event, entry) in &subjourney.entry_events {
        let Some(entry_target) = entry.target_state.as_deref() else {
            continue;
        };
        let entry_state = namespaced(entry_target, outer_state);
        for definition in journey_map.values_mut() {
            let Some(event) = definition
                .events
                .as_mut()
                .and_then(|events| events.get_mut(entry_event))
            else {
                continue;
            };
            retarget_event(event, outer_state, &entry_state);
        }
    }
}

fn retarget_event(event: &mut EventDefinition, outer_state: &str, entry_state: &str) {
    if event.target_state.as_deref() == Some(outer_state) {
        event.target_state = Some(entry_state.to_string());
    }
    for branch in event
        .check_if_disabled
        .values_mut()
        .chain(event.check_feature_flag.values_mut())
    {
        retarget_event(branch, outer_state, entry_state);
    }
}
