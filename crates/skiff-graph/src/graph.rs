// SPDX-License-Identifier: Apache-2.0
//! Ordered node collection with derived edges.

use serde::{Deserialize, Serialize};

use crate::ident::NodeId;
use crate::node::Node;
use crate::policy::{LinkKind, LINK_KINDS};

/// A derived `(from, to, kind)` triple.
///
/// Edges are never stored independently; they are read off the source node's
/// adjacency lists. The triple owns clones of the endpoint ids so callers can
/// hold edge listings across graph mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Source node id.
    pub from: NodeId,
    /// Destination node id.
    pub to: NodeId,
    /// Relation flavor.
    pub kind: LinkKind,
}

/// Ordered collection of chart nodes.
///
/// Node order is insertion order; it never affects validity, only the
/// deterministic names derived during canonical serialization. Lookups are
/// linear: charts are canvas-sized, not database-sized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    /// All nodes in insertion order.
    pub nodes: Vec<Node>,
}

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` when the graph holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends a node, replacing any existing node with the same id in place.
    pub fn insert(&mut self, node: Node) {
        if let Some(existing) = self.nodes.iter_mut().find(|n| n.id == node.id) {
            *existing = node;
        } else {
            self.nodes.push(node);
        }
    }

    /// Removes a node by id. Returns `true` when a node was removed.
    ///
    /// Adjacency entries pointing at the removed node are left dangling;
    /// traversal tolerates them by skipping unresolved destinations.
    pub fn remove(&mut self, id: &NodeId) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| &n.id != id);
        self.nodes.len() != before
    }

    /// Returns `true` when a node with `id` exists.
    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.iter().any(|n| &n.id == id)
    }

    /// Shared reference to the node with `id`, when present.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// Mutable reference to the node with `id`, when present.
    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| &n.id == id)
    }

    /// Iterates nodes in stored order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Derives every edge in traversal order: nodes in stored order, each
    /// node's lists in (hard, soft, event) order, entries in list order.
    ///
    /// Unresolved destinations are included; it is the consumer's choice to
    /// skip them (the traversal engine does).
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.nodes.iter().flat_map(|node| {
            LINK_KINDS.into_iter().flat_map(move |kind| {
                node.links(kind).iter().map(move |to| Edge {
                    from: node.id.clone(),
                    to: to.clone(),
                    kind,
                })
            })
        })
    }
}
