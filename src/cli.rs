use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::Engine;

#[derive(Parser)]
#[command(name = "flowdoc")]
#[command(about = "Flow-graph extraction and diagram generation for integration applications")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate diagram artifacts from a parsed interface document
    Generate {
        /// Interface document (JSON) produced by the configuration parser
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for generated artifacts
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the diagram and flow references without writing files
    Inspect {
        /// Interface document (JSON) produced by the configuration parser
        #[arg(short, long)]
        input: PathBuf,
    },
}

impl Cli {
    pub async fn execute(self, engine: Engine) -> Result<()> {
        match self.command {
            Commands::Generate { input, output } => engine.generate(input, output).await,
            Commands::Inspect { input } => engine.inspect(input).await,
        }
    }
}
