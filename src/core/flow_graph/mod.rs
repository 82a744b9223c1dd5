// Configuration-to-graph extraction and diagram generation
mod builder;
mod classifier;
mod identifier;
mod resolver;
mod writer;

pub use builder::build;
pub use writer::write;
