// SPDX-License-Identifier: Apache-2.0
//! The visitor protocol the traversal engine drives.

use crate::diag::Reporter;
use crate::graph::Graph;
use crate::node::Node;
use crate::policy::LinkKind;

/// Callback contract for one traversal run.
///
/// All methods are required: visitors that need no edge or lifecycle hooks
/// implement them as explicit no-ops rather than omitting them, so the
/// contract stays visible at every implementation site.
///
/// Per-visitor state is reset in [`enter_graph`](Self::enter_graph) and is
/// unsafe to reuse across runs without that reset; the engine calls it first
/// on every run.
pub trait GraphVisitor {
    /// Run start. Reset all per-run state here.
    fn enter_graph(&mut self, graph: &Graph);

    /// Pass 1: called once per node in stored order.
    ///
    /// The node is mutable so normalizing visitors can apply field defaults;
    /// this is the only sanctioned mutation during a run.
    fn visit_node(&mut self, node: &mut Node, reporter: &mut Reporter);

    /// Pass 2: called once per resolvable adjacency entry, lists in
    /// (hard, soft, event) order. Runs only after every node was visited.
    fn visit_edge(&mut self, kind: LinkKind, from: &Node, to: &Node, reporter: &mut Reporter);

    /// Run end. Assemble any aggregate output here.
    fn exit_graph(&mut self, graph: &Graph, reporter: &mut Reporter);
}
