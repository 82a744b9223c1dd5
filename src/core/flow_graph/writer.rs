// src/core/flow_graph/writer.rs - On-disk serialization of graph artifacts
use std::path::{Path, PathBuf};

use super::builder::FlowGraphArtifacts;
use crate::error::Result;

/// Diagram file, relative to the documentation output root.
pub const DIAGRAM_FILE: &str = "static/flow_diagram.mmd";
/// Visualization data file, relative to the documentation output root.
pub const GRAPH_DATA_FILE: &str = "static/flow_data.json";

/// Relative paths handed back to the page-rendering collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramPaths {
    pub diagram: PathBuf,
    pub graph_data: PathBuf,
}

/// Write the diagram text and visualization data under `output_dir`.
///
/// The `static` asset subdirectory is created if absent; calling this again
/// for the same directory overwrites both files. I/O failures propagate
/// unmodified, nothing attempts partial-state recovery.
pub fn write(
    artifacts: &FlowGraphArtifacts,
    output_dir: &Path,
    pretty_graph_data: bool,
) -> Result<DiagramPaths> {
    let static_dir = output_dir.join("static");
    std::fs::create_dir_all(&static_dir)?;

    std::fs::write(output_dir.join(DIAGRAM_FILE), &artifacts.diagram_text)?;

    let graph_json = if pretty_graph_data {
        serde_json::to_string_pretty(&artifacts.visual_graph)?
    } else {
        serde_json::to_string(&artifacts.visual_graph)?
    };
    std::fs::write(output_dir.join(GRAPH_DATA_FILE), graph_json)?;

    Ok(DiagramPaths {
        diagram: PathBuf::from(DIAGRAM_FILE),
        graph_data: PathBuf::from(GRAPH_DATA_FILE),
    })
}
