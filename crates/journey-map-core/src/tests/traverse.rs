use super::*;
use crate::traverse::traverse;
use serde_json::json;

fn edge(from: &str, to: &str, events: &[&str]) -> Edge {
    Edge {
        from: from.to_string(),
        to: to.to_string(),
        events: events.iter().map(|e| e.to_string()).collect(),
    }
}

#[test]
fn traverse_visits_breadth_first_and_groups_events() {
    let map = journey_map(json!({
        "START": {
            "events": {
                "next": { "targetState": "PAGE" },
                "skip": { "targetState": "OTHER_PAGE" },
                "alsoNext": { "targetState": "PAGE" }
            }
        },
        "PAGE": { "events": { "next": { "targetState": "DONE" } } },
        "OTHER_PAGE": { "events": { "back": { "targetState": "START" } } },
        "DONE": {},
        "NEVER_SEEN": {}
    }));

    let result = traverse(&map, &RenderOptions::new(), &config(&["START"]));
    assert_eq!(result.states, vec!["START", "PAGE", "OTHER_PAGE", "DONE"]);
    assert_eq!(
        result.edges,
        vec![
            edge("START", "PAGE", &["next", "alsoNext"]),
            edge("START", "OTHER_PAGE", &["skip"]),
            edge("PAGE", "DONE", &["next"]),
            edge("OTHER_PAGE", "START", &["back"]),
        ]
    );
    assert_eq!(result.edges[0].label(), "next\\nalsoNext");
}

#[test]
fn traverse_hides_error_states_unless_included() {
    let map = journey_map(json!({
        "START": {
            "events": {
                "next": { "targetState": "DONE" },
                "error": { "targetState": "ERROR" }
            }
        },
        "DONE": {},
        "ERROR": { "response": { "type": "error" } }
    }));
    let cfg = config(&["START"]);

    let hidden = traverse(&map, &RenderOptions::new(), &cfg);
    assert_eq!(hidden.states, vec!["START", "DONE"]);
    assert_eq!(hidden.edges, vec![edge("START", "DONE", &["next"])]);

    let shown = traverse(&map, &RenderOptions::new().with_include_errors(true), &cfg);
    assert_eq!(shown.states, vec!["START", "DONE", "ERROR"]);
    assert_eq!(
        shown.edges.iter().filter(|e| e.to == "ERROR").count(),
        1
    );
}

#[test]
fn traverse_hides_failure_states_unless_included() {
    let map = journey_map(json!({
        "START": {
            "events": {
                "fail": { "targetState": "PYI_NO_MATCH" },
                "error": { "targetState": "ERROR" }
            }
        },
        "PYI_NO_MATCH": { "response": { "type": "page", "pageId": "pyi-no-match" } }
    }));
    let cfg = config(&["START"]);

    let hidden = traverse(&map, &RenderOptions::new().with_include_errors(true), &cfg);
    assert_eq!(hidden.states, vec!["START", "ERROR"]);

    let shown = traverse(
        &map,
        &RenderOptions::new().with_include_failures(true),
        &cfg,
    );
    assert_eq!(shown.states, vec!["START", "PYI_NO_MATCH"]);
    assert_eq!(shown.edges, vec![edge("START", "PYI_NO_MATCH", &["fail"])]);
}

#[test]
fn traverse_follows_resolved_conditional_targets() {
    let map = journey_map(json!({
        "START": {
            "events": {
                "next": {
                    "targetState": "APP",
                    "checkIfDisabled": { "dcmaw": { "targetState": "PASSPORT" } }
                },
                "other": {
                    "targetState": "PASSPORT",
                    "checkFeatureFlag": { "newFlow": { "targetState": "NEW_FLOW" } }
                }
            }
        },
        "APP": {},
        "PASSPORT": {},
        "NEW_FLOW": {}
    }));
    let cfg = config(&["START"]);

    let default = traverse(&map, &RenderOptions::new(), &cfg);
    assert_eq!(default.states, vec!["START", "APP", "PASSPORT"]);

    let disabled = traverse(&map, &RenderOptions::new().with_disabled("dcmaw"), &cfg);
    assert_eq!(disabled.states, vec!["START", "PASSPORT"]);
    assert_eq!(disabled.edges, vec![edge("START", "PASSPORT", &["next", "other"])]);

    let flagged = traverse(
        &map,
        &RenderOptions::new()
            .with_disabled("dcmaw")
            .with_feature_flag("newFlow"),
        &cfg,
    );
    assert_eq!(flagged.states, vec!["START", "PASSPORT", "NEW_FLOW"]);
}

#[test]
fn traverse_uses_exit_events_and_tolerates_missing_states() {
    let map = journey_map(json!({
        "START": { "exitEvents": { "done": { "targetState": "UNDECLARED" } } },
        "UNUSED": {}
    }));

    let result = traverse(&map, &RenderOptions::new(), &config(&["START", "ALSO_UNDECLARED"]));
    assert_eq!(result.states, vec!["START", "ALSO_UNDECLARED", "UNDECLARED"]);
    assert_eq!(result.edges, vec![edge("START", "UNDECLARED", &["done"])]);
}

#[test]
fn traverse_skips_events_without_target() {
    let map = journey_map(json!({
        "START": {
            "events": {
                "dangling": { "exitEventToEmit": "nowhere" },
                "next": { "targetState": "START" }
            }
        }
    }));

    let result = traverse(&map, &RenderOptions::new(), &config(&["START"]));
    assert_eq!(result.states, vec!["START"]);
    assert_eq!(result.edges, vec![edge("START", "START", &["next"])]);
}
