// src/core/flow_graph/builder.rs - Reference-graph assembly
use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::classifier::{classify, FlowCategory};
use super::identifier::normalize;
use super::resolver::resolve;
use crate::core::model::Interface;

/// One registered node of the reference graph.
#[derive(Debug, Clone)]
pub struct GraphNode {
    /// Original flow id, arbitrary characters allowed
    pub raw_id: String,
    /// Normalized identifier used in the diagram text
    pub safe_id: String,
    /// Escaped label shown inside the node
    pub display_label: String,
    pub category: FlowCategory,
}

/// Node shape in the diagram notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    /// `id[label]`
    Bracket,
    /// `id(label)`
    Rounded,
}

/// One line of the diagram document. The diagram is assembled as typed line
/// records and joined at the end, keeping the output contract testable
/// independent of formatting.
#[derive(Debug, Clone)]
pub enum DiagramLine {
    Header,
    NodeDecl {
        safe_id: String,
        label: String,
        shape: NodeShape,
    },
    Style {
        safe_id: String,
        fill: &'static str,
        stroke: &'static str,
    },
    Edge {
        from: String,
        to: String,
    },
}

impl fmt::Display for DiagramLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramLine::Header => write!(f, "graph TD"),
            DiagramLine::NodeDecl {
                safe_id,
                label,
                shape,
            } => match shape {
                NodeShape::Bracket => write!(f, "{safe_id}[{label}]"),
                NodeShape::Rounded => write!(f, "{safe_id}({label})"),
            },
            DiagramLine::Style {
                safe_id,
                fill,
                stroke,
            } => write!(f, "style {safe_id} fill:{fill},stroke:{stroke}"),
            DiagramLine::Edge { from, to } => write!(f, "{from} --> {to}"),
        }
    }
}

impl FlowCategory {
    fn diagram_style(&self) -> (NodeShape, &'static str, &'static str) {
        match self {
            FlowCategory::Reusable => (NodeShape::Bracket, "#e1f5fe", "#0277bd"),
            FlowCategory::Entry => (NodeShape::Rounded, "#e8f5e9", "#2e7d32"),
            FlowCategory::Plain => (NodeShape::Bracket, "#f9f9f9", "#333"),
        }
    }
}

/// Insertion-ordered mapping from flow id to the flow ids it references.
/// Built once per generation call and discarded after serialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceIndex {
    entries: Vec<(String, Vec<String>)>,
}

impl ReferenceIndex {
    fn push(&mut self, flow_id: &str, target: &str) {
        match self.entries.iter_mut().find(|(id, _)| id == flow_id) {
            Some((_, targets)) => targets.push(target.to_string()),
            None => self
                .entries
                .push((flow_id.to_string(), vec![target.to_string()])),
        }
    }

    pub fn get(&self, flow_id: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(id, _)| id == flow_id)
            .map(|(_, targets)| targets.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(id, targets)| (id.as_str(), targets.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Index-addressed nodes/links structure for force-directed visualization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualGraph {
    pub nodes: Vec<VisualNode>,
    pub links: Vec<VisualLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualNode {
    pub id: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualLink {
    pub source: usize,
    pub target: usize,
}

/// Everything one generation call produces, mutually consistent: every edge
/// line refers to nodes declared earlier in the text, every link endpoint is
/// a valid node index.
#[derive(Debug, Clone)]
pub struct FlowGraphArtifacts {
    pub diagram_text: String,
    pub reference_index: ReferenceIndex,
    pub visual_graph: VisualGraph,
}

/// Escape a node label for the diagram notation.
///
/// Quotes are stripped; brackets, angle brackets, ampersands and backslashes
/// are replaced in a fixed order. A label that is empty after escaping falls
/// back to `"Unnamed Flow"`.
fn escape_label(text: &str) -> String {
    let escaped = text
        .replace('"', "")
        .replace('[', "(")
        .replace(']', ")")
        .replace('<', "(")
        .replace('>', ")")
        .replace('&', "+")
        .replace('\\', "/");

    if escaped.is_empty() {
        "Unnamed Flow".to_string()
    } else {
        escaped
    }
}

/// Build the reference graph for one interface.
///
/// All state is local to the call; repeated invocations on the same input
/// yield byte-identical diagram text and an identical visual graph.
pub fn build(interface: &Interface) -> FlowGraphArtifacts {
    if interface.flows.is_empty() {
        let lines = [
            DiagramLine::Header,
            DiagramLine::NodeDecl {
                safe_id: "A".to_string(),
                label: "No flows found".to_string(),
                shape: NodeShape::Bracket,
            },
        ];
        return FlowGraphArtifacts {
            diagram_text: join_lines(&lines),
            reference_index: ReferenceIndex::default(),
            visual_graph: VisualGraph::default(),
        };
    }

    let mut lines = vec![DiagramLine::Header];
    let mut registered: HashSet<String> = HashSet::new();
    let mut registry: Vec<GraphNode> = Vec::new();

    // First pass: declare nodes. Distinct ids that normalize identically are
    // merged into the first-seen node; downstream pages key off the same
    // safe-id space, so this stays first-seen-wins.
    for flow in &interface.flows {
        if flow.id.is_empty() {
            continue;
        }

        let safe_id = normalize(&flow.id);
        if !registered.insert(safe_id.clone()) {
            continue;
        }

        let category = classify(flow);
        let display_label = escape_label(flow.display_name());
        let (shape, fill, stroke) = category.diagram_style();

        lines.push(DiagramLine::NodeDecl {
            safe_id: safe_id.clone(),
            label: display_label.clone(),
            shape,
        });
        lines.push(DiagramLine::Style {
            safe_id: safe_id.clone(),
            fill,
            stroke,
        });

        registry.push(GraphNode {
            raw_id: flow.id.clone(),
            safe_id,
            display_label,
            category,
        });
    }

    // Second pass: edges, restricted to nodes declared above. The directed
    // safe-id pair is emitted at most once across the whole diagram; only
    // emitted references make it into the index.
    let resolved = resolve(&interface.flows, &registered);
    let mut emitted: HashSet<(String, String)> = HashSet::new();
    let mut reference_index = ReferenceIndex::default();

    for flow_refs in &resolved {
        for target in &flow_refs.targets {
            let pair = (flow_refs.flow_safe_id.clone(), target.safe_id.clone());
            if emitted.insert(pair) {
                lines.push(DiagramLine::Edge {
                    from: flow_refs.flow_safe_id.clone(),
                    to: target.safe_id.clone(),
                });
                reference_index.push(&flow_refs.flow_id, &target.raw_name);
            }
        }
    }

    let visual_graph = build_visual_graph(&registry, &reference_index);

    FlowGraphArtifacts {
        diagram_text: join_lines(&lines),
        reference_index,
        visual_graph,
    }
}

fn build_visual_graph(registry: &[GraphNode], reference_index: &ReferenceIndex) -> VisualGraph {
    let mut node_map: HashMap<&str, usize> = HashMap::new();
    let mut nodes = Vec::with_capacity(registry.len());

    for (index, node) in registry.iter().enumerate() {
        node_map.insert(node.raw_id.as_str(), index);
        nodes.push(VisualNode {
            id: index,
            name: node.raw_id.clone(),
            node_type: node.category.visual_type().to_string(),
        });
    }

    let mut links = Vec::new();
    for (source_id, targets) in reference_index.iter() {
        if let Some(&source) = node_map.get(source_id) {
            for target_id in targets {
                // Targets are declared names; a name that is not a registered
                // raw id is skipped even when its safe id resolved
                if let Some(&target) = node_map.get(target_id.as_str()) {
                    links.push(VisualLink { source, target });
                }
            }
        }
    }

    VisualGraph { nodes, links }
}

fn join_lines(lines: &[DiagramLine]) -> String {
    lines
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{
        FlowDescriptor, FlowKind, ProcessorDescriptor, SourceDescriptor,
    };
    use std::collections::HashMap as StdHashMap;

    fn flow_ref(target: &str) -> ProcessorDescriptor {
        ProcessorDescriptor {
            kind: "flow-ref".to_string(),
            config: None,
            name: Some(target.to_string()),
            routes: vec![],
        }
    }

    fn flow(id: &str, kind: FlowKind, with_source: bool, refs: &[&str]) -> FlowDescriptor {
        FlowDescriptor {
            id: id.to_string(),
            name: None,
            kind,
            source: with_source.then(|| SourceDescriptor {
                kind: "http:listener".to_string(),
                attributes: StdHashMap::new(),
            }),
            processors: refs.iter().map(|r| flow_ref(r)).collect(),
        }
    }

    fn interface(flows: Vec<FlowDescriptor>) -> Interface {
        Interface {
            name: "test".to_string(),
            flows,
        }
    }

    #[test]
    fn test_empty_interface_yields_placeholder_diagram() {
        let artifacts = build(&interface(vec![]));
        assert_eq!(artifacts.diagram_text, "graph TD\nA[No flows found]");
        assert!(artifacts.reference_index.is_empty());
        assert!(artifacts.visual_graph.nodes.is_empty());
        assert!(artifacts.visual_graph.links.is_empty());
    }

    #[test]
    fn test_end_to_end_four_flow_scenario() {
        let artifacts = build(&interface(vec![
            flow("A", FlowKind::Flow, true, &["B"]),
            flow("B", FlowKind::Flow, false, &["C"]),
            flow("C", FlowKind::SubFlow, false, &[]),
            flow("D", FlowKind::Flow, false, &[]),
        ]));

        let lines: Vec<&str> = artifacts.diagram_text.lines().collect();
        assert_eq!(lines[0], "graph TD");
        // Node declaration + style pairs, entry flows rounded
        assert_eq!(lines[1], "A(A)");
        assert_eq!(lines[2], "style A fill:#e8f5e9,stroke:#2e7d32");
        assert_eq!(lines[3], "B[B]");
        assert_eq!(lines[4], "style B fill:#f9f9f9,stroke:#333");
        assert_eq!(lines[5], "C[C]");
        assert_eq!(lines[6], "style C fill:#e1f5fe,stroke:#0277bd");
        assert_eq!(lines[7], "D[D]");
        assert_eq!(lines[8], "style D fill:#f9f9f9,stroke:#333");
        assert_eq!(lines[9], "A --> B");
        assert_eq!(lines[10], "B --> C");
        assert_eq!(lines.len(), 11);

        assert_eq!(artifacts.reference_index.len(), 2);
        assert_eq!(artifacts.reference_index.get("A"), Some(&["B".to_string()][..]));
        assert_eq!(artifacts.reference_index.get("B"), Some(&["C".to_string()][..]));
        assert_eq!(artifacts.reference_index.get("C"), None);

        let graph = &artifacts.visual_graph;
        assert_eq!(graph.nodes.len(), 4);
        let types: Vec<&str> = graph.nodes.iter().map(|n| n.node_type.as_str()).collect();
        assert_eq!(types, vec!["source", "flow", "subflow", "flow"]);
        assert_eq!(
            graph.links,
            vec![
                VisualLink { source: 0, target: 1 },
                VisualLink { source: 1, target: 2 },
            ]
        );
    }

    #[test]
    fn test_colliding_ids_merge_first_seen_wins() {
        let artifacts = build(&interface(vec![
            flow("My Flow", FlowKind::Flow, true, &[]),
            flow("My_Flow", FlowKind::SubFlow, false, &[]),
        ]));

        assert_eq!(artifacts.visual_graph.nodes.len(), 1);
        assert_eq!(artifacts.visual_graph.nodes[0].name, "My Flow");
        assert_eq!(artifacts.visual_graph.nodes[0].node_type, "source");
        assert_eq!(
            artifacts
                .diagram_text
                .lines()
                .filter(|l| l.starts_with("My_Flow"))
                .count(),
            1
        );
    }

    #[test]
    fn test_unresolvable_reference_dropped() {
        let artifacts = build(&interface(vec![flow("A", FlowKind::Flow, false, &["ghost"])]));
        assert!(artifacts.reference_index.is_empty());
        assert!(!artifacts.diagram_text.contains("-->"));
        assert!(artifacts.visual_graph.links.is_empty());
    }

    #[test]
    fn test_duplicate_reference_yields_one_edge() {
        let artifacts = build(&interface(vec![
            flow("A", FlowKind::Flow, false, &["B", "B"]),
            flow("B", FlowKind::Flow, false, &[]),
        ]));

        let edges: Vec<&str> = artifacts
            .diagram_text
            .lines()
            .filter(|l| l.contains("-->"))
            .collect();
        assert_eq!(edges, vec!["A --> B"]);
        assert_eq!(artifacts.reference_index.get("A"), Some(&["B".to_string()][..]));
    }

    #[test]
    fn test_build_is_idempotent() {
        let input = interface(vec![
            flow("A", FlowKind::Flow, true, &["B"]),
            flow("B", FlowKind::SubFlow, false, &[]),
        ]);

        let first = build(&input);
        let second = build(&input);
        assert_eq!(first.diagram_text, second.diagram_text);
        assert_eq!(first.visual_graph, second.visual_graph);
        assert_eq!(first.reference_index, second.reference_index);
    }

    #[test]
    fn test_label_escaping() {
        let artifacts = build(&interface(vec![flow(
            "batch <job> [v2] \"fast\" & co\\",
            FlowKind::Flow,
            false,
            &[],
        )]));

        assert!(artifacts
            .diagram_text
            .contains("[batch (job) (v2) fast + co/]"));
    }

    #[test]
    fn test_normalized_id_with_space_and_bang() {
        let artifacts = build(&interface(vec![flow("My Flow!", FlowKind::Flow, false, &[])]));
        let lines: Vec<&str> = artifacts.diagram_text.lines().collect();
        // Identifier is sanitized, label keeps the original text
        assert_eq!(lines[1], "My_Flow_[My Flow!]");
    }

    #[test]
    fn test_leading_digit_gets_prefix() {
        let artifacts = build(&interface(vec![flow("1Flow", FlowKind::Flow, false, &[])]));
        assert!(artifacts.diagram_text.contains("f_1Flow[1Flow]"));
    }

    #[test]
    fn test_flows_with_empty_ids_are_skipped() {
        let artifacts = build(&interface(vec![
            flow("", FlowKind::Flow, false, &[]),
            flow("A", FlowKind::Flow, false, &[]),
        ]));
        assert_eq!(artifacts.visual_graph.nodes.len(), 1);
        assert_eq!(artifacts.visual_graph.nodes[0].name, "A");
    }
}
