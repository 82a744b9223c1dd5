// src/core/flow_graph/classifier.rs - Visual/semantic flow categories
use crate::core::model::{FlowDescriptor, FlowKind};

/// Category driving node shape, style and visualization type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowCategory {
    /// Flow with a declared trigger source
    Entry,
    /// Sub-flow, invoked only by reference
    Reusable,
    /// Flow with neither trigger nor sub-flow marker
    Plain,
}

impl FlowCategory {
    /// Type string used in the force-directed visualization data.
    pub fn visual_type(&self) -> &'static str {
        match self {
            FlowCategory::Entry => "source",
            FlowCategory::Reusable => "subflow",
            FlowCategory::Plain => "flow",
        }
    }
}

/// Classify a flow from its declared attributes.
///
/// The sub-flow marker is checked first: a malformed record carrying both a
/// sub-flow marker and a trigger source is still classified as reusable.
pub fn classify(flow: &FlowDescriptor) -> FlowCategory {
    if flow.kind == FlowKind::SubFlow {
        FlowCategory::Reusable
    } else if flow.source.is_some() {
        FlowCategory::Entry
    } else {
        FlowCategory::Plain
    }
}
