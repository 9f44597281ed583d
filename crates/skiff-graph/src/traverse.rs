// SPDX-License-Identifier: Apache-2.0
//! Two-pass traversal engine.

use tracing::debug;

use crate::diag::{DiagnosticMap, Reporter};
use crate::graph::{Edge, Graph};
use crate::visitor::GraphVisitor;

/// Runs `visitor` over one graph snapshot and groups its findings by node.
///
/// The run is strictly two-pass: every node is visited (and possibly
/// normalized) before any edge is, because edge rules assume fully defaulted
/// endpoints. The passes must never be fused. Adjacency entries whose
/// destination id is absent from the graph are skipped silently.
///
/// Grouping drops findings whose origin is `None` or does not resolve to a
/// node in the graph. That mirrors the editor's behavior for graph-wide
/// findings; whether such findings deserve their own bucket is an open
/// product decision, so the behavior is kept as-is rather than changed here.
///
/// The graph snapshot must not be mutated by anyone but the visitor for the
/// duration of the run; there is no internal guard.
pub fn run(graph: &mut Graph, visitor: &mut dyn GraphVisitor) -> DiagnosticMap {
    let mut reporter = Reporter::new();
    visitor.enter_graph(graph);

    // Pass 1: nodes, in stored order.
    for node in &mut graph.nodes {
        visitor.visit_node(node, &mut reporter);
    }

    // Pass 2: edges, derived from the (now normalized) nodes.
    let edges: Vec<Edge> = graph.edges().collect();
    debug!(nodes = graph.len(), edges = edges.len(), "visiting edges");
    for edge in &edges {
        let Some(to) = graph.node(&edge.to) else {
            // Unresolved destination: tolerated, not an error.
            continue;
        };
        let Some(from) = graph.node(&edge.from) else {
            continue;
        };
        visitor.visit_edge(edge.kind, from, to, &mut reporter);
    }

    visitor.exit_graph(graph, &mut reporter);

    let mut grouped = DiagnosticMap::new();
    let mut dropped = 0_usize;
    for finding in reporter.into_findings() {
        match &finding.origin {
            Some(origin) if graph.contains(origin) => {
                grouped.entry(origin.clone()).or_default().push(finding);
            }
            _ => dropped += 1,
        }
    }
    if dropped > 0 {
        debug!(dropped, "findings without a resolvable origin were dropped");
    }
    grouped
}
