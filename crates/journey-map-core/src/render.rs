//! Mermaid flowchart emission.

use crate::config::GraphConfig;
use crate::model::{JourneyMap, ResponseKind, StateDefinition};
use crate::traverse::Edge;
use base64::Engine as _;
use std::fmt::Write as _;

/// Diagram preamble. The class names are shared with the viewer's legend styles.
pub const MERMAID_HEADER: &str = "graph LR
    classDef process fill:#ffa,stroke:#000;
    classDef page fill:#ae8,stroke:#000;
    classDef error_page fill:#f99,stroke:#000;
    classDef cri fill:#faf,stroke:#000;
    classDef other fill:#f3f2f1,stroke:#000;
";

/// Name of the host-side callback invoked when a node is clicked.
pub const CLICK_CALLBACK: &str = "onStateClick";

/// Renders `states` (node plus click line each, in order) followed by `edges`.
///
/// States missing from `journey_map` still get a node, styled as `other`.
pub fn render_mermaid(
    journey_map: &JourneyMap,
    states: &[String],
    edges: &[Edge],
    config: &GraphConfig,
) -> String {
    let state_lines: Vec<String> = states
        .iter()
        .flat_map(|state| {
            let definition = journey_map.get(state);
            [
                render_state(state, definition, config),
                render_click_handler(state, definition),
            ]
        })
        .collect();
    let edge_lines: Vec<String> = edges.iter().map(render_edge).collect();

    let mut out = String::from(MERMAID_HEADER);
    out.push_str(&state_lines.join("\n"));
    out.push('\n');
    out.push_str(&edge_lines.join("\n"));
    out.push('\n');
    out
}

pub fn render_state(
    state: &str,
    definition: Option<&StateDefinition>,
    config: &GraphConfig,
) -> String {
    let kind = definition
        .and_then(|d| d.response.as_ref())
        .map(|r| r.kind())
        .unwrap_or(ResponseKind::Other);

    let mut out = String::new();
    match kind {
        ResponseKind::Process { lambda } => {
            let _ = write!(
                &mut out,
                "    {state}({state}\\n{}):::process",
                lambda.unwrap_or_default()
            );
        }
        ResponseKind::Page { page_id } => {
            let class = if config.is_failure_state(state) {
                "error_page"
            } else {
                "page"
            };
            let _ = write!(
                &mut out,
                "    {state}[{state}\\n{}]:::{class}",
                page_id.unwrap_or_default()
            );
        }
        ResponseKind::Cri {
            cri_id,
            context,
            scope,
        } => {
            let _ = write!(&mut out, "    {state}([{state}\\n{}", cri_id.unwrap_or_default());
            if let Some(context) = context {
                let _ = write!(&mut out, "\\n context: {context}");
            }
            if let Some(scope) = scope {
                let _ = write!(&mut out, "\\n scope: {scope}");
            }
            out.push_str("]):::cri");
        }
        ResponseKind::Error => {
            let _ = write!(&mut out, "    {state}:::error_page");
        }
        ResponseKind::Other => {
            let _ = write!(&mut out, "    {state}:::other");
        }
    }
    out
}

/// The click payload is base64-encoded JSON so it never needs Mermaid escaping.
pub fn render_click_handler(state: &str, definition: Option<&StateDefinition>) -> String {
    let response = definition
        .and_then(|d| d.response.as_ref())
        .map(|r| r.to_json_string())
        .unwrap_or_else(|| "{}".to_string());
    let payload = base64::engine::general_purpose::STANDARD.encode(response.as_bytes());
    let state_literal = serde_json::Value::from(state).to_string();
    format!("    click {state} call {CLICK_CALLBACK}({state_literal}, {payload})")
}

pub fn render_edge(edge: &Edge) -> String {
    format!("    {}-->|{}|{}", edge.from, edge.label(), edge.to)
}
