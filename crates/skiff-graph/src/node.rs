// SPDX-License-Identifier: Apache-2.0
//! Node types and payloads.
//!
//! A node is a typed entity on the chart canvas: a data source or one of the
//! three workload flavors (stored procedure, event trigger, event). The
//! type-specific fields live in a tagged [`Payload`] union so validators and
//! codecs dispatch on the tag, never on ad hoc field presence.

use serde::{Deserialize, Serialize};

use crate::ident::NodeId;
use crate::policy::LinkKind;

/// Node classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// File or folder consumed/produced by workloads.
    DataSource,
    /// Long-lived callable workload.
    StoredProcedure,
    /// Workload that fires events.
    EventTrigger,
    /// Workload invoked when its topic fires.
    Event,
}

impl NodeKind {
    /// Returns `true` for the three workload flavors.
    #[must_use]
    pub fn is_workload(self) -> bool {
        !matches!(self, Self::DataSource)
    }
}

/// Data-source content classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Single file.
    #[default]
    File,
    /// Directory tree.
    Folder,
}

/// Canvas position. Cosmetic only: never part of validity or canonical output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

/// Fields specific to [`NodeKind::DataSource`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourcePayload {
    /// Filesystem path of the source.
    pub path: String,
    /// Resource name the workloads mount it under.
    pub resource_name: String,
    /// File/folder classification. `None` until validation defaults it to
    /// [`DataType::File`] (normalize-then-validate contract).
    pub data_type: Option<DataType>,
    /// Free-form description. Never validated.
    pub description: String,
}

/// Fields shared by the three workload flavors.
///
/// `topic` is meaningful only on [`NodeKind::Event`] nodes; the rule visitor
/// enforces its presence there and ignores it elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadPayload {
    /// Image reference, `scheme://path` shaped.
    pub image: String,
    /// Kernel command-line arguments. Never validated.
    pub kernel_args: String,
    /// Optional name prefix for spawned instances.
    pub prefix: String,
    /// Disable hardware virtualization.
    pub disable_virtualization: bool,
    /// Detach from the controlling session on start.
    pub run_detached: bool,
    /// Remove instance state on stop.
    pub remove_on_stop: bool,
    /// Memory quantity, `[1-9][0-9]*[KMG]i?`.
    pub memory: Option<String>,
    /// Network descriptors.
    pub networks: Option<Vec<String>>,
    /// `hostPort:containerPort` mappings.
    pub ports: Option<Vec<String>>,
    /// `hostPath:containerPath` mounts.
    pub volumes: Option<Vec<String>>,
    /// `platform/architecture` deployment targets.
    pub targets: Option<Vec<String>>,
    /// `KEY` or `KEY=value` environment entries.
    pub env_vars: Option<Vec<String>>,
    /// Event topic (Event nodes only).
    pub topic: Option<String>,
}

/// Type-specific payload, tagged by node flavor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// Payload for data-source nodes.
    DataSource(DataSourcePayload),
    /// Payload shared by stored procedures, event triggers, and events.
    Workload(WorkloadPayload),
}

impl Payload {
    /// Shared view of the data-source payload, when this is one.
    #[must_use]
    pub fn as_data_source(&self) -> Option<&DataSourcePayload> {
        match self {
            Self::DataSource(p) => Some(p),
            Self::Workload(_) => None,
        }
    }

    /// Mutable view of the data-source payload, when this is one.
    pub fn as_data_source_mut(&mut self) -> Option<&mut DataSourcePayload> {
        match self {
            Self::DataSource(p) => Some(p),
            Self::Workload(_) => None,
        }
    }

    /// Shared view of the workload payload, when this is one.
    #[must_use]
    pub fn as_workload(&self) -> Option<&WorkloadPayload> {
        match self {
            Self::DataSource(_) => None,
            Self::Workload(p) => Some(p),
        }
    }

    /// Mutable view of the workload payload, when this is one.
    pub fn as_workload_mut(&mut self) -> Option<&mut WorkloadPayload> {
        match self {
            Self::DataSource(_) => None,
            Self::Workload(p) => Some(p),
        }
    }
}

/// A chart node: identity, classification, presentation, links, payload.
///
/// Adjacency entries reference destination ids that *should* exist in the
/// graph; unresolved entries are tolerated (skipped during traversal), never
/// guaranteed absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Stable unique identifier.
    pub id: NodeId,
    /// Node classification. Must agree with the payload tag; the
    /// constructors guarantee it.
    pub kind: NodeKind,
    /// Display name shown on the canvas.
    pub name: String,
    /// Canvas position.
    pub position: Position,
    /// Exclusive data-source relations (singleton per data source).
    pub hard_links: Vec<NodeId>,
    /// Non-exclusive data-source relations.
    pub soft_links: Vec<NodeId>,
    /// Trigger-fires-event relations.
    pub event_links: Vec<NodeId>,
    /// Type-specific fields.
    pub payload: Payload,
}

impl Node {
    /// Creates a node of `kind` with the matching empty payload.
    pub fn new(id: impl Into<NodeId>, kind: NodeKind, name: impl Into<String>) -> Self {
        let payload = match kind {
            NodeKind::DataSource => Payload::DataSource(DataSourcePayload::default()),
            _ => Payload::Workload(WorkloadPayload::default()),
        };
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            position: Position::default(),
            hard_links: Vec::new(),
            soft_links: Vec::new(),
            event_links: Vec::new(),
            payload,
        }
    }

    /// Adjacency list for `kind`.
    #[must_use]
    pub fn links(&self, kind: LinkKind) -> &[NodeId] {
        match kind {
            LinkKind::Hard => &self.hard_links,
            LinkKind::Soft => &self.soft_links,
            LinkKind::Event => &self.event_links,
        }
    }

    /// Mutable adjacency list for `kind`.
    pub fn links_mut(&mut self, kind: LinkKind) -> &mut Vec<NodeId> {
        match kind {
            LinkKind::Hard => &mut self.hard_links,
            LinkKind::Soft => &mut self.soft_links,
            LinkKind::Event => &mut self.event_links,
        }
    }

    /// Appends a destination to the adjacency list for `kind`.
    pub fn add_link(&mut self, kind: LinkKind, to: impl Into<NodeId>) {
        self.links_mut(kind).push(to.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_matches_payload_to_kind() {
        let ds = Node::new("a", NodeKind::DataSource, "input");
        assert!(ds.payload.as_data_source().is_some());
        let ev = Node::new("b", NodeKind::Event, "on-upload");
        assert!(ev.payload.as_workload().is_some());
    }

    #[test]
    fn add_link_targets_the_right_bucket() {
        let mut n = Node::new("a", NodeKind::StoredProcedure, "svc");
        n.add_link(LinkKind::Hard, "b");
        n.add_link(LinkKind::Event, "c");
        assert_eq!(n.links(LinkKind::Hard), [NodeId::new("b")]);
        assert!(n.links(LinkKind::Soft).is_empty());
        assert_eq!(n.links(LinkKind::Event), [NodeId::new("c")]);
    }

    #[test]
    fn workload_kinds() {
        assert!(!NodeKind::DataSource.is_workload());
        assert!(NodeKind::StoredProcedure.is_workload());
        assert!(NodeKind::EventTrigger.is_workload());
        assert!(NodeKind::Event.is_workload());
    }
}
