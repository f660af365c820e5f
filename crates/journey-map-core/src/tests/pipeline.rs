use super::*;
use serde_json::json;

fn node_ids(mermaid: &str) -> Vec<&str> {
    mermaid
        .lines()
        .filter_map(|line| line.trim_start().strip_prefix("click "))
        .filter_map(|rest| rest.split_whitespace().next())
        .collect()
}

fn edge_lines(mermaid: &str) -> Vec<&str> {
    mermaid
        .lines()
        .filter(|line| line.contains("-->"))
        .map(str::trim)
        .collect()
}

#[test]
fn render_expands_parents_and_hides_templates() {
    let map = journey_map(json!({
        "START": { "events": { "go": { "targetState": "B" } } },
        "A": { "events": { "x": { "targetState": "A2" } } },
        "B": { "parent": "A", "events": { "y": { "targetState": "B2" } } },
        "A2": {},
        "B2": {}
    }));
    let graph = JourneyGraph::new().with_config(config(&["START"]));

    let out = graph.render(&map, &SubjourneyRegistry::new(), &RenderOptions::new());
    assert_eq!(node_ids(&out), vec!["START", "B", "A2", "B2"]);
    assert_eq!(
        edge_lines(&out),
        vec!["START-->|go|B", "B-->|x|A2", "B-->|y|B2"]
    );
}

#[test]
fn render_shows_error_branch_only_when_requested() {
    let map = journey_map(json!({
        "ROOT": { "events": { "boom": { "targetState": "ERROR" } } },
        "ERROR": { "response": { "type": "error" } }
    }));
    let graph = JourneyGraph::new().with_config(config(&["ROOT"]));
    let registry = SubjourneyRegistry::new();

    let hidden = graph.render(&map, &registry, &RenderOptions::new());
    assert_eq!(node_ids(&hidden), vec!["ROOT"]);
    assert!(edge_lines(&hidden).is_empty());

    let shown = graph.render(&map, &registry, &RenderOptions::new().with_include_errors(true));
    assert_eq!(node_ids(&shown), vec!["ROOT", "ERROR"]);
    assert_eq!(edge_lines(&shown), vec!["ROOT-->|boom|ERROR"]);
    assert!(shown.contains("    ERROR:::error_page\n"));
}

#[test]
fn render_orphan_mode_lists_orphans_without_edges() {
    let map = journey_map(json!({
        "ROOT": { "events": { "next": { "targetState": "USED" } } },
        "USED": {},
        "DEAD_END": { "events": { "next": { "targetState": "USED" } } }
    }));
    let graph = JourneyGraph::new().with_config(config(&["ROOT"]));
    let registry = SubjourneyRegistry::new();

    let normal = graph.render(&map, &registry, &RenderOptions::new());
    assert!(!node_ids(&normal).contains(&"DEAD_END"));

    let orphans = graph.render(
        &map,
        &registry,
        &RenderOptions::new().with_only_orphan_states(true),
    );
    assert_eq!(node_ids(&orphans), vec!["DEAD_END"]);
    assert!(edge_lines(&orphans).is_empty());
}

#[test]
fn render_is_a_pure_function_of_its_inputs() {
    let map = journey_map(json!({
        "INITIAL_IPV_JOURNEY": { "events": { "next": { "targetState": "HOST" } } },
        "HOST": {
            "nestedJourney": "SUB",
            "exitEvents": { "done": { "targetState": "END" } }
        },
        "END": { "response": { "type": "page", "pageId": "end" } }
    }));
    let registry = registry(json!({
        "SUB": {
            "entryEvents": { "next": { "targetState": "INNER" } },
            "nestedJourneyStates": {
                "INNER": { "events": { "next": { "exitEventToEmit": "done" } } }
            }
        }
    }));
    let options = RenderOptions::new().with_expand_nested_journeys(true);
    let map_before = map.clone();

    let first = crate::render(&map, &registry, &options);
    let second = crate::render(&map, &registry, &options);
    assert_eq!(first, second);
    assert_eq!(map, map_before);
    assert_eq!(node_ids(&first), vec!["INITIAL_IPV_JOURNEY", "INNER_HOST", "END"]);
    assert_eq!(
        edge_lines(&first),
        vec!["INITIAL_IPV_JOURNEY-->|next|INNER_HOST", "INNER_HOST-->|next|END"]
    );
}

#[test]
fn graph_config_loads_from_json_and_yaml() {
    let from_json = GraphConfig::from_json_str(r#"{ "rootStates": ["START"] }"#).unwrap();
    assert_eq!(from_json.root_states, vec!["START"]);
    assert_eq!(from_json.error_states, GraphConfig::default().error_states);

    let from_yaml = GraphConfig::from_yaml_str(
        "rootStates: [START]\nerrorStates: [OOPS]\nfailureStates: []\n",
    )
    .unwrap();
    assert!(from_yaml.is_root_state("START"));
    assert!(from_yaml.is_error_state("OOPS"));
    assert!(!from_yaml.is_error_state("ERROR"));
    assert!(!from_yaml.is_failure_state("PYI_NO_MATCH"));

    assert!(matches!(
        GraphConfig::from_yaml_str("rootStates: {"),
        Err(Error::InvalidConfigYaml { .. })
    ));
    assert!(matches!(
        GraphConfig::from_json_str("{"),
        Err(Error::Json(_))
    ));
}

#[test]
fn journey_documents_keep_unknown_fields() {
    let map = journey_map_from_json_str(
        r#"{ "START": { "events": { "next": { "targetState": "END", "auditEvent": "x" } }, "note": 1 } }"#,
    )
    .unwrap();
    let start = &map["START"];
    assert_eq!(start.extra["note"], json!(1));
    assert_eq!(
        start.events.as_ref().unwrap()["next"].extra["auditEvent"],
        json!("x")
    );
    assert_eq!(
        serde_json::to_value(&map).unwrap(),
        json!({
            "START": {
                "events": { "next": { "targetState": "END", "auditEvent": "x" } },
                "note": 1
            }
        })
    );
}

#[test]
fn journey_graph_renders_with_its_own_config() {
    assert_eq!(JourneyGraph::new().config(), &GraphConfig::default());

    let custom = config(&["START"]).with_error_states(["BROKEN"]);
    let graph = JourneyGraph::new().with_config(custom.clone());
    assert_eq!(graph.config(), &custom);

    let map = journey_map(json!({
        "START": { "events": { "fail": { "targetState": "BROKEN" } } },
        "BROKEN": {}
    }));
    let out = graph.render(&map, &SubjourneyRegistry::new(), &RenderOptions::new());
    assert_eq!(node_ids(&out), vec!["START"]);
}
