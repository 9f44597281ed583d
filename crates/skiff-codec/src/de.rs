// SPDX-License-Identifier: Apache-2.0
//! Inverse mapping from chart documents back to graphs.

use std::collections::BTreeMap;

use skiff_graph::{
    DataSourcePayload, Edge, Graph, LinkKind, Node, NodeId, NodeKind, Payload, WorkloadPayload,
};
use tracing::debug;

use crate::doc::{ChartBody, ChartDoc, ChartInfo, WorkloadDoc, WorkloadLinksDoc};

/// Result of a successful parse: the graph, the chart metadata, and the
/// resolved edges grouped by kind (for the canvas to draw).
///
/// The default value doubles as the empty-graph sentinel returned on parse
/// failure. A deserialized graph is unvalidated: re-run
/// `skiff_rules::analyze` before trusting or re-serializing it.
#[derive(Debug, Default)]
pub struct Deserialized {
    /// Reconstructed graph. Positions are all-zero until
    /// [`crate::layout_graph`] runs.
    pub graph: Graph,
    /// Chart-level metadata, ready to feed back into [`crate::serialize`].
    pub info: ChartInfo,
    /// Resolved edges grouped by link kind.
    pub edges_by_kind: BTreeMap<LinkKind, Vec<Edge>>,
}

/// Parses a chart document.
///
/// Any parse failure (malformed YAML, non-mapping root) yields the
/// empty-graph sentinel, never an error. A well-formed document without a
/// `chart` key is a legitimate empty graph, not a failure.
#[must_use]
pub fn deserialize(text: &str) -> Deserialized {
    let doc: ChartDoc = match serde_yaml::from_str(text) {
        Ok(doc) => doc,
        Err(err) => {
            debug!(%err, "chart parse failed; returning the empty-graph sentinel");
            return Deserialized::default();
        }
    };

    let info = ChartInfo {
        name: doc.metadata.name,
        maintainer: doc.metadata.maintainer,
        description: doc.metadata.description,
        visibility: doc.metadata.visibility,
        engine: doc.metadata.engine,
        labels: doc
            .metadata
            .labels
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect(),
    };

    let Some(body) = doc.chart else {
        return Deserialized {
            info,
            ..Deserialized::default()
        };
    };

    let names = collect_ids(&body);
    let mut out = Deserialized {
        info,
        ..Deserialized::default()
    };
    build_nodes(&body, &names, &mut out);
    out
}

/// Pass 1: ensure every entry has an id and build the name→id map.
///
/// This pass runs to completion before any node is reconstructed, mirroring
/// the traversal engine's two-pass discipline: link resolution in pass 2
/// must see every entry, not just the ones already rebuilt.
fn collect_ids(body: &ChartBody) -> BTreeMap<String, NodeId> {
    let mut names = BTreeMap::new();
    let mut ensure = |canon: &String, raw_id: &str| {
        let id = if raw_id.is_empty() {
            NodeId::generate()
        } else {
            NodeId::new(raw_id)
        };
        names.entry(canon.clone()).or_insert(id);
    };
    for (canon, entry) in &body.data_sources {
        ensure(canon, &entry.id);
    }
    for section in [&body.stored_procedures, &body.event_triggers, &body.events] {
        for (canon, entry) in section {
            ensure(canon, &entry.metadata.id);
        }
    }
    names
}

/// Pass 2: reconstruct one node per entry and resolve its links.
fn build_nodes(body: &ChartBody, names: &BTreeMap<String, NodeId>, out: &mut Deserialized) {
    for (canon, entry) in &body.data_sources {
        let Some(id) = names.get(canon) else { continue };
        let mut node = Node::new(id.clone(), NodeKind::DataSource, entry.name.clone());
        node.payload = Payload::DataSource(DataSourcePayload {
            path: entry.path.clone(),
            resource_name: entry.resource_name.clone(),
            data_type: Some(entry.data_type),
            description: entry.description.clone(),
        });
        out.graph.insert(node);
    }
    let sections = [
        (NodeKind::StoredProcedure, &body.stored_procedures),
        (NodeKind::EventTrigger, &body.event_triggers),
        (NodeKind::Event, &body.events),
    ];
    for (kind, section) in sections {
        for (canon, entry) in section {
            let Some(id) = names.get(canon) else { continue };
            let mut node = workload_node(id.clone(), kind, entry);
            if let Some(links) = &entry.links {
                resolve_links(&mut node, links, names, out);
            }
            out.graph.insert(node);
        }
    }
}

fn workload_node(id: NodeId, kind: NodeKind, entry: &WorkloadDoc) -> Node {
    let mut node = Node::new(id, kind, entry.metadata.name.clone());
    let features = entry.features.clone().unwrap_or_default();
    node.payload = Payload::Workload(WorkloadPayload {
        image: entry.metadata.image.clone(),
        kernel_args: entry.control.kernel_args.clone().unwrap_or_default(),
        prefix: entry.metadata.prefix.clone(),
        disable_virtualization: entry.control.disable_virtualization,
        run_detached: entry.control.run_detached,
        remove_on_stop: entry.control.remove_on_stop,
        memory: entry.control.memory.clone(),
        networks: features.networks,
        ports: features.ports,
        volumes: features.volumes,
        targets: features.targets,
        env_vars: features.env_vars,
        topic: entry.metadata.topic.clone(),
    });
    node
}

/// Resolves `{destination: name}` references via the name→id map.
///
/// An unresolved destination yields a missing adjacency entry, tolerated and
/// unreported; whether it should be a hard failure is an open product
/// decision, so the lenient behavior is preserved.
fn resolve_links(
    node: &mut Node,
    links: &WorkloadLinksDoc,
    names: &BTreeMap<String, NodeId>,
    out: &mut Deserialized,
) {
    let buckets = [
        (LinkKind::Hard, &links.hard_links),
        (LinkKind::Soft, &links.soft_links),
        (LinkKind::Event, &links.event_links),
    ];
    for (kind, bucket) in buckets {
        for link in bucket {
            let Some(to) = names.get(&link.destination) else {
                debug!(destination = %link.destination, "unresolved link destination skipped");
                continue;
            };
            node.add_link(kind, to.clone());
            out.edges_by_kind.entry(kind).or_default().push(Edge {
                from: node.id.clone(),
                to: to.clone(),
                kind,
            });
        }
    }
}
