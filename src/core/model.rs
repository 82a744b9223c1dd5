// src/core/model.rs - Typed input model produced by the configuration parser
use serde::Deserialize;
use std::collections::HashMap;

/// One integration application, as parsed from its configuration files.
///
/// Produced by the upstream XML/config parser collaborator and handed to the
/// graph builder as a JSON document. The core never mutates it.
#[derive(Debug, Clone, Deserialize)]
pub struct Interface {
    pub name: String,

    #[serde(default)]
    pub flows: Vec<FlowDescriptor>,
}

/// A named, ordered sequence of processing steps, optionally triggered by an
/// external event source.
#[derive(Debug, Clone, Deserialize)]
pub struct FlowDescriptor {
    /// Declared flow name. Unique within an interface but may be empty.
    #[serde(default)]
    pub id: String,

    /// Optional display name; falls back to `id` when absent.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(rename = "type", default)]
    pub kind: FlowKind,

    /// Trigger configuration. Presence marks an entry-point flow.
    #[serde(default)]
    pub source: Option<SourceDescriptor>,

    #[serde(default)]
    pub processors: Vec<ProcessorDescriptor>,
}

impl FlowDescriptor {
    /// Label shown in diagrams, before escaping.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowKind {
    #[default]
    Flow,
    SubFlow,
}

/// External trigger attached to an entry-point flow.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceDescriptor {
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

/// One processing step inside a flow.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessorDescriptor {
    /// Free-form, platform-defined tag. `flow-ref` denotes an invoke step.
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Structured configuration carrying the invoke target.
    #[serde(default)]
    pub config: Option<ProcessorConfig>,

    /// Flat invoke target, used when no structured configuration is present.
    #[serde(default)]
    pub name: Option<String>,

    /// Nested routes for `choice`-style routers.
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl ProcessorDescriptor {
    /// Invoke target as declared in configuration: the structured field wins,
    /// the flat field is the fallback, empty strings count as absent.
    pub fn target_name(&self) -> Option<&str> {
        self.config
            .as_ref()
            .and_then(|c| c.name.as_deref())
            .filter(|n| !n.is_empty())
            .or_else(|| self.name.as_deref().filter(|n| !n.is_empty()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessorConfig {
    #[serde(default)]
    pub name: Option<String>,
}

/// One conditional branch of a `choice` router, holding its own ordered
/// processor list. Nesting depth is bounded by the configuration itself.
#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub condition: String,

    #[serde(default)]
    pub processors: Vec<ProcessorDescriptor>,
}
