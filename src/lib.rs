//! # sysml2rdf
//!
//! Converts a UML/SysML model serialized as XMI into an RDF graph written
//! as Turtle.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! cli     → Command-line entry point
//!   ↓
//! mapper  → ElementStore → RDF graph
//!   ↓
//! xmi     → XML document tree, model extraction
//!   ↓
//! rdf     → Triple set, vocabulary, Turtle writer
//!   ↓
//! model   → ElementId, ElementType, ElementStore
//! ```

// ============================================================================
// MODULES
// ============================================================================

/// Command-line arguments and the conversion run
pub mod cli;

/// Namespace and output vocabulary settings
pub mod config;

/// Error type shared by every fallible operation
pub mod error;

/// Store-to-graph mapping
pub mod mapper;

/// Element records keyed by XMI ID
pub mod model;

/// RDF graph and Turtle serialization
pub mod rdf;

/// XMI parsing and model extraction
pub mod xmi;

pub use config::Config;
pub use error::ConvertError;
pub use mapper::GraphMapper;
pub use model::{ElementId, ElementRecord, ElementStore, ElementType};
pub use rdf::Graph;

use std::path::Path;

use tracing::info;

use xmi::{Extractor, XmlDocument};

/// Read and extract an XMI file.
pub fn parse_sysml_file(path: &Path, config: &Config) -> Result<ElementStore, ConvertError> {
    let bytes = std::fs::read(path).map_err(|e| ConvertError::read(path, e))?;
    info!(path = %path.display(), bytes = bytes.len(), "Read XMI");

    let doc = XmlDocument::parse(&bytes)?;
    Ok(Extractor::new(config.namespaces.clone()).extract(&doc))
}

/// Map an extracted store onto an RDF graph.
pub fn create_rdf_model(store: &ElementStore, config: &Config) -> Graph {
    GraphMapper::new(store, config).map()
}

/// Convert `input` to Turtle at `output`.
///
/// The output file is written once, after the whole graph is built, so a
/// failed conversion never leaves a partial file behind.
pub fn convert_file(input: &Path, output: &Path, config: &Config) -> Result<Graph, ConvertError> {
    let store = parse_sysml_file(input, config)?;
    let graph = create_rdf_model(&store, config);
    write_turtle_file(&graph, output)?;
    Ok(graph)
}

/// Serialize `graph` as Turtle into `output` with a single write.
pub fn write_turtle_file(graph: &Graph, output: &Path) -> Result<(), ConvertError> {
    std::fs::write(output, graph.to_turtle()).map_err(|e| ConvertError::write(output, e))?;
    info!(path = %output.display(), triples = graph.len(), "Wrote Turtle");
    Ok(())
}
