use crate::RenderOptions;
use crate::config::GraphConfig;
use crate::model::{JourneyMap, StateDefinition};
use crate::resolve::resolve;
use indexmap::{IndexMap, IndexSet};

/// A rendered transition. Events that resolve to the same target share one edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub events: Vec<String>,
}

impl Edge {
    /// Event names separated by Mermaid's `\n` line break.
    pub fn label(&self) -> String {
        self.events.join("\\n")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Traversal {
    /// Visited states in discovery order, roots first.
    pub states: Vec<String>,
    pub edges: Vec<Edge>,
}

/// Breadth-first walk from the configured roots, following each event's resolved target.
///
/// Targets in the error (failure) class are skipped entirely unless errors (failures) are
/// included, so they contribute neither a node nor an edge.
pub fn traverse(
    journey_map: &JourneyMap,
    options: &RenderOptions,
    config: &GraphConfig,
) -> Traversal {
    let mut visited: IndexSet<String> = config.root_states.iter().cloned().collect();
    let mut edges = Vec::new();

    let mut cursor = 0;
    while let Some(state) = visited.get_index(cursor).cloned() {
        cursor += 1;
        let Some(events) = journey_map.get(&state).and_then(StateDefinition::transitions) else {
            continue;
        };

        let mut events_by_target: IndexMap<&str, Vec<String>> = IndexMap::new();
        for (event_name, definition) in events {
            let Some(target) = resolve(definition, options) else {
                tracing::debug!(state = %state, event = %event_name, "event has no target state");
                continue;
            };
            if config.is_error_state(target) && !options.include_errors {
                continue;
            }
            if config.is_failure_state(target) && !options.include_failures {
                continue;
            }

            if !visited.contains(target) {
                visited.insert(target.to_string());
            }
            events_by_target
                .entry(target)
                .or_default()
                .push(event_name.clone());
        }

        edges.extend(events_by_target.into_iter().map(|(target, events)| Edge {
            from: state.clone(),
            to: target.to_string(),
            events,
        }));
    }

    Traversal {
        states: visited.into_iter().collect(),
        edges,
    }
}
