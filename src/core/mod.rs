mod engine;
mod model;

// Configuration-to-graph extraction pipeline
mod flow_graph;

// Export the main engine
pub use engine::Engine;
