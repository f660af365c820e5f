use crate::config::GraphConfig;
use crate::model::JourneyMap;
use crate::resolve::possible_targets;
use indexmap::IndexSet;

/// States that no event can target under any option combination (roots excepted), in map order.
pub fn orphan_states(journey_map: &JourneyMap, config: &GraphConfig) -> Vec<String> {
    let mut targeted: IndexSet<&str> = config.root_states.iter().map(String::as_str).collect();
    for definition in journey_map.values() {
        for (_, event) in definition.all_events() {
            targeted.extend(possible_targets(event));
        }
    }

    journey_map
        .keys()
        .filter(|state| !targeted.contains(state.as_str()))
        .cloned()
        .collect()
}
