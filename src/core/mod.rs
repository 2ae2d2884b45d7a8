mod engine;
mod project_files;
mod exporter;

// Navigation graph construction
mod nav_graph;

pub use project_files::{ProjectFiles, FsProjectFiles, CompanionSource};
pub use exporter::GraphExporter;
pub use nav_graph::{
    NavNode, NodeType, EdgeKind, FileClassifier, CallExtractor, GraphAssembler, BuildReport
};

// Export the main engine
pub use engine::Engine;
