// src/core/flow_graph/resolver.rs - Flow-reference resolution
use std::collections::HashSet;

use super::identifier::normalize;
use crate::core::model::{FlowDescriptor, ProcessorDescriptor};

/// Reserved processor tag denoting an "invoke another flow" step.
pub const FLOW_REF_TAG: &str = "flow-ref";

/// References resolved for one flow, in processor order.
#[derive(Debug, Clone)]
pub struct ResolvedFlowReferences {
    /// Original id of the referencing flow
    pub flow_id: String,
    /// Normalized id of the referencing flow
    pub flow_safe_id: String,
    pub targets: Vec<ResolvedReference>,
}

#[derive(Debug, Clone)]
pub struct ResolvedReference {
    /// Target name as declared in configuration
    pub raw_name: String,
    /// Normalized target id, guaranteed present in the known-id set
    pub safe_id: String,
}

/// Scan flows in declaration order and resolve their flow references against
/// the set of known normalized ids.
///
/// References whose normalized target is not in `known_safe_ids` are dropped
/// silently. Repeated references from one flow to the same resolved target are
/// recorded once, first occurrence wins. Flows without any resolved reference
/// get no entry. `choice` routes are followed recursively, in route order.
pub fn resolve(
    flows: &[FlowDescriptor],
    known_safe_ids: &HashSet<String>,
) -> Vec<ResolvedFlowReferences> {
    let mut resolved = Vec::new();

    for flow in flows {
        if flow.id.is_empty() {
            continue;
        }

        let mut seen = HashSet::new();
        let mut targets = Vec::new();
        collect_targets(&flow.processors, known_safe_ids, &mut seen, &mut targets);

        if !targets.is_empty() {
            resolved.push(ResolvedFlowReferences {
                flow_id: flow.id.clone(),
                flow_safe_id: normalize(&flow.id),
                targets,
            });
        }
    }

    resolved
}

fn collect_targets(
    processors: &[ProcessorDescriptor],
    known_safe_ids: &HashSet<String>,
    seen: &mut HashSet<String>,
    out: &mut Vec<ResolvedReference>,
) {
    for processor in processors {
        if processor.kind == FLOW_REF_TAG {
            if let Some(target) = processor.target_name() {
                let safe_id = normalize(target);
                if known_safe_ids.contains(&safe_id) && seen.insert(safe_id.clone()) {
                    out.push(ResolvedReference {
                        raw_name: target.to_string(),
                        safe_id,
                    });
                }
            }
        }

        for route in &processor.routes {
            collect_targets(&route.processors, known_safe_ids, seen, out);
        }
    }
}
