// SPDX-License-Identifier: Apache-2.0
//! Validation rules for skiff deployment charts.
//!
//! Two layers:
//! - [`format`]: stateless field-syntax predicates (paths, image refs,
//!   network descriptors, port mappings, volumes, targets, env vars, memory
//!   quantities, names).
//! - [`RuleVisitor`]: the semantic visitor that applies field defaults and
//!   emits every structural and field diagnostic in one traversal.
//!
//! The convenience entry point is [`analyze`]; gate follow-up work on
//! [`is_valid`].

pub mod format;
mod semantics;

pub use semantics::RuleVisitor;
pub use skiff_graph::is_valid;

use skiff_graph::{DiagnosticMap, Graph};

/// Validates one graph snapshot, returning diagnostics grouped by node.
///
/// This is normalize-then-validate: omitted optional fields (a data source's
/// `data_type`) are defaulted on the nodes as a documented side effect, so
/// later rules in the same run (and the caller afterwards) observe the
/// defaulted values.
pub fn analyze(graph: &mut Graph) -> DiagnosticMap {
    let mut visitor = RuleVisitor::new();
    skiff_graph::run(graph, &mut visitor)
}
