#![forbid(unsafe_code)]

//! Journey-map state machine visualizer (headless).
//!
//! Turns a journey map (states, conditional events, parent templates and nested journeys) into a
//! Mermaid `graph LR` flowchart:
//! - parent templates and nested journeys are expanded into a flat map
//! - events are resolved against disabled components and feature flags
//! - the graph is walked from the configured roots, or reduced to its orphan states
//!
//! Rendering is a pure function of its inputs; no input is mutated.

pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod options;
pub mod orphan;
pub mod render;
pub mod resolve;
pub mod traverse;

pub use config::GraphConfig;
pub use error::{Error, Result};
pub use model::{
    EventDefinition, EventMap, JourneyMap, LabelValue, ResponseKind, ResponseSpec, StateDefinition,
    Subjourney, SubjourneyRegistry, journey_map_from_json_str, subjourney_registry_from_json_str,
};
pub use options::{CollectedOptions, RenderOptions, collect_options};
pub use traverse::{Edge, Traversal};

/// Rendering pipeline bound to one [`GraphConfig`].
#[derive(Debug, Clone, Default)]
pub struct JourneyGraph {
    config: GraphConfig,
}

impl JourneyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn normalize(
        &self,
        journey_map: &JourneyMap,
        registry: &SubjourneyRegistry,
        options: &RenderOptions,
    ) -> JourneyMap {
        normalize::normalize(journey_map, registry, options)
    }

    pub fn traverse(&self, normalized: &JourneyMap, options: &RenderOptions) -> Traversal {
        traverse::traverse(normalized, options, &self.config)
    }

    pub fn orphan_states(&self, normalized: &JourneyMap) -> Vec<String> {
        orphan::orphan_states(normalized, &self.config)
    }

    /// Normalizes, then renders either the reachable graph or (with `only_orphan_states`) the
    /// orphan states without edges.
    pub fn render(
        &self,
        journey_map: &JourneyMap,
        registry: &SubjourneyRegistry,
        options: &RenderOptions,
    ) -> String {
        let normalized = self.normalize(journey_map, registry, options);
        let traversal = if options.only_orphan_states {
            Traversal {
                states: self.orphan_states(&normalized),
                edges: Vec::new(),
            }
        } else {
            self.traverse(&normalized, options)
        };
        tracing::debug!(
            states = traversal.states.len(),
            edges = traversal.edges.len(),
            orphans_only = options.only_orphan_states,
            "rendering journey map"
        );
        render::render_mermaid(&normalized, &traversal.states, &traversal.edges, &self.config)
    }
}

/// Renders with the default [`GraphConfig`].
pub fn render(
    journey_map: &JourneyMap,
    registry: &SubjourneyRegistry,
    options: &RenderOptions,
) -> String {
    JourneyGraph::new().render(journey_map, registry, options)
}
