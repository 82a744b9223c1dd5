// src/core/engine.rs
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::FlowdocError;
use super::flow_graph;
use super::model::Interface;

/// Main orchestration engine: loads a parsed interface document, builds the
/// reference graph and writes the diagram artifacts.
pub struct Engine {
    config: Config,
}

impl Engine {
    /// Create a new engine instance
    pub async fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load_or_default(config_path)?;

        debug!("Loaded configuration: {:?}", config);

        Ok(Self { config })
    }

    /// Generate diagram artifacts for one interface document
    pub async fn generate(&self, input: PathBuf, output: Option<PathBuf>) -> Result<()> {
        let output_dir = output.unwrap_or_else(|| self.config.project.docs_dir.clone());

        info!("Input: {}", input.display());
        info!("Output: {}", output_dir.display());

        let interface = self.load_interface(&input)?;
        info!(
            "Building flow graph for '{}' ({} flows)",
            interface.name,
            interface.flows.len()
        );

        let artifacts = flow_graph::build(&interface);
        info!(
            "Graph built: {} nodes, {} links, {} flows with references",
            artifacts.visual_graph.nodes.len(),
            artifacts.visual_graph.links.len(),
            artifacts.reference_index.len()
        );

        let paths = flow_graph::write(
            &artifacts,
            &output_dir,
            self.config.output.pretty_graph_data,
        )?;

        info!("Diagram written to {}", paths.diagram.display());
        info!("Visualization data written to {}", paths.graph_data.display());

        Ok(())
    }

    /// Print the diagram and per-flow references without touching the disk
    pub async fn inspect(&self, input: PathBuf) -> Result<()> {
        let interface = self.load_interface(&input)?;
        let artifacts = flow_graph::build(&interface);

        println!("{}", artifacts.diagram_text);
        println!();

        if artifacts.reference_index.is_empty() {
            println!("No flow references found");
        } else {
            for (flow_id, targets) in artifacts.reference_index.iter() {
                println!("{} -> {}", flow_id, targets.join(", "));
            }
        }

        Ok(())
    }

    fn load_interface(&self, path: &Path) -> Result<Interface> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FlowdocError::Model(format!("cannot read {}: {}", path.display(), e)))?;
        let interface = serde_json::from_str(&content)
            .map_err(|e| FlowdocError::Model(format!("invalid interface document: {}", e)))?;
        Ok(interface)
    }
}
