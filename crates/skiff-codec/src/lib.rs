// SPDX-License-Identifier: Apache-2.0
//! Canonical YAML codec for skiff deployment charts.
//!
//! [`serialize`] converts a *valid* graph into a deterministic YAML document
//! (re-serializing an unmodified graph is byte-identical); [`deserialize`]
//! is its tolerant inverse, returning an empty-graph sentinel on parse
//! failure instead of an error. [`layout_graph`] assigns cosmetic grid
//! positions after a load.
//!
//! A freshly deserialized graph is *not* trusted: callers must re-run
//! `skiff_rules::analyze` before re-serializing or acting on it.

mod de;
mod doc;
mod layout;
mod ser;

pub use de::{deserialize, Deserialized};
pub use doc::{ChartDoc, ChartInfo, API_VERSION, KIND, SCHEMA_VERSION};
pub use layout::layout_graph;
pub use ser::SerializeVisitor;

use skiff_graph::{is_valid, DiagnosticMap, Graph};
use thiserror::Error;

/// Why a chart could not be encoded.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The graph has error-severity diagnostics; nothing was emitted.
    #[error("graph has validation errors; serialization refused")]
    Invalid(DiagnosticMap),
    /// YAML encoding failed.
    #[error("failed to encode chart document")]
    Yaml(#[from] serde_yaml::Error),
}

/// Serializes a graph to its canonical YAML document.
///
/// Validation is re-run first (normalizing the graph as a side effect); any
/// error-severity finding refuses serialization and returns the full
/// diagnostic map. Warnings never block.
pub fn serialize(graph: &mut Graph, info: &ChartInfo) -> Result<String, CodecError> {
    let diagnostics = skiff_rules::analyze(graph);
    if !is_valid(&diagnostics) {
        return Err(CodecError::Invalid(diagnostics));
    }
    let mut visitor = SerializeVisitor::new(info.clone());
    skiff_graph::run(graph, &mut visitor);
    Ok(serde_yaml::to_string(&visitor.into_document())?)
}
