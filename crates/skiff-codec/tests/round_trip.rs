// SPDX-License-Identifier: Apache-2.0
//! End-to-end codec properties: determinism, round-trip equivalence,
//! canonical edge direction, and the refusal contract.

use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use skiff_codec::{deserialize, serialize, ChartInfo, CodecError};
use skiff_graph::{Graph, LinkKind, Node, NodeId, NodeKind, Payload};

fn data_source(id: &str, name: &str, path: &str) -> Node {
    let mut n = Node::new(id, NodeKind::DataSource, name);
    if let Payload::DataSource(d) = &mut n.payload {
        d.path = path.into();
        d.resource_name = "input".into();
        d.description = "test data".into();
    }
    n
}

fn workload(id: &str, kind: NodeKind, name: &str) -> Node {
    let mut n = Node::new(id, kind, name);
    if let Payload::Workload(w) = &mut n.payload {
        w.image = "hvt://repo/app".into();
        w.memory = Some("128Mi".into());
        if kind == NodeKind::Event {
            w.topic = Some("uploads".into());
        }
    }
    n
}

/// A small valid pipeline: two data sources, a procedure, a trigger, an
/// event, with one link of each kind.
fn pipeline() -> Graph {
    let mut g = Graph::new();
    let mut sp = workload("sp", NodeKind::StoredProcedure, "processor");
    sp.add_link(LinkKind::Hard, "ds1");
    if let Payload::Workload(w) = &mut sp.payload {
        w.ports = Some(vec!["80:8080".into()]);
        w.targets = Some(vec!["qemu/x86_64".into()]);
        w.env_vars = Some(vec!["MODE=fast".into()]);
    }
    g.insert(sp);
    g.insert(data_source("ds1", "inbox", "/data/in"));
    let mut ds2 = data_source("ds2", "outbox", "/data/out");
    ds2.add_link(LinkKind::Soft, "tr");
    g.insert(ds2);
    let mut tr = workload("tr", NodeKind::EventTrigger, "watcher");
    tr.add_link(LinkKind::Event, "ev");
    g.insert(tr);
    g.insert(workload("ev", NodeKind::Event, "on upload"));
    g
}

fn info() -> ChartInfo {
    ChartInfo {
        name: "upload pipeline".into(),
        maintainer: "ops@example.org".into(),
        labels: vec!["team=data".into(), "tier=batch".into()],
        ..ChartInfo::default()
    }
}

/// Unordered endpoint pair + kind, the direction-insensitive edge key.
fn edge_keys(g: &Graph) -> BTreeSet<(NodeId, NodeId, LinkKind)> {
    g.edges()
        .map(|e| {
            let (a, b) = if e.from <= e.to {
                (e.from, e.to)
            } else {
                (e.to, e.from)
            };
            (a, b, e.kind)
        })
        .collect()
}

#[test]
fn reserializing_an_unmodified_graph_is_byte_identical() {
    let mut g = pipeline();
    let first = serialize(&mut g, &info()).unwrap_or_default();
    let second = serialize(&mut g, &info()).unwrap_or_default();
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn round_trip_preserves_semantics_and_canonical_bytes() {
    let mut g = pipeline();
    let yaml = serialize(&mut g, &info()).unwrap_or_default();

    let out = deserialize(&yaml);
    let mut restored = out.graph;
    assert_eq!(restored.len(), g.len());

    // Per-type counts survive.
    for kind in [
        NodeKind::DataSource,
        NodeKind::StoredProcedure,
        NodeKind::EventTrigger,
        NodeKind::Event,
    ] {
        assert_eq!(
            restored.iter().filter(|n| n.kind == kind).count(),
            g.iter().filter(|n| n.kind == kind).count(),
            "{kind:?}"
        );
    }

    // Ids are carried in the document, so nodes are directly comparable.
    for node in g.iter() {
        let twin = restored.node(&node.id).unwrap_or_else(|| {
            panic!("node {} missing after round trip", node.id);
        });
        assert_eq!(twin.name, node.name);
        assert_eq!(twin.payload, node.payload, "payload of {}", node.id);
    }

    // Edge set matches up to canonical direction.
    assert_eq!(edge_keys(&restored), edge_keys(&g));

    // Chart metadata round-trips, and the canonical form is a fixed point.
    assert_eq!(out.info, info());
    let again = serialize(&mut restored, &out.info).unwrap_or_default();
    assert_eq!(again, yaml);
}

#[test]
fn data_source_links_are_recorded_from_the_workload_side() {
    let mut g = pipeline();
    let yaml = serialize(&mut g, &info()).unwrap_or_default();

    // The raw ds2 -> tr soft link must appear under the trigger's bucket.
    assert!(yaml.contains("softLinks"));
    let out = deserialize(&yaml);
    let tr = out.graph.node(&NodeId::new("tr"));
    assert_eq!(
        tr.map(|n| n.soft_links.clone()),
        Some(vec![NodeId::new("ds2")])
    );
    // And the data source carries none.
    let ds2 = out.graph.node(&NodeId::new("ds2"));
    assert_eq!(ds2.map(|n| n.soft_links.len()), Some(0));
}

#[test]
fn workloads_without_links_lose_the_links_key() {
    let mut g = Graph::new();
    g.insert(workload("ev", NodeKind::Event, "on upload"));
    let yaml = serialize(&mut g, &ChartInfo::default()).unwrap_or_default();
    assert!(!yaml.contains("links"));
    assert!(yaml.contains("events"));
}

#[test]
fn empty_graph_serializes_without_a_chart_key_and_loads_back_empty() {
    let mut g = Graph::new();
    let yaml = serialize(&mut g, &ChartInfo::default()).unwrap_or_default();
    assert!(yaml.contains("apiVersion"));
    assert!(!yaml.contains("chart:"));

    let out = deserialize(&yaml);
    assert!(out.graph.is_empty());
    assert!(out.edges_by_kind.is_empty());
}

#[test]
fn omitted_data_type_serializes_as_file() {
    let mut g = Graph::new();
    g.insert(data_source("ds", "inbox", "/data/in"));
    // data_type starts as None; serialization validates (and defaults) first.
    let yaml = serialize(&mut g, &ChartInfo::default()).unwrap_or_default();
    assert!(yaml.contains("type: file"));
}

#[test]
fn serialization_refuses_invalid_graphs_with_the_full_map() {
    let mut g = pipeline();
    let mut bad = workload("bad", NodeKind::StoredProcedure, "bad#name");
    bad.add_link(LinkKind::Hard, "bad");
    g.insert(bad);

    match serialize(&mut g, &ChartInfo::default()) {
        Err(CodecError::Invalid(map)) => {
            let codes: Vec<&str> = map
                .get(&NodeId::new("bad"))
                .map(|ds| ds.iter().map(|d| d.code.as_str()).collect())
                .unwrap_or_default();
            assert!(codes.contains(&"node.name.invalid"), "{codes:?}");
            assert!(codes.contains(&"edge.self-loop"), "{codes:?}");
        }
        other => panic!("expected refusal, got {other:?}"),
    }
}

#[test]
fn edges_by_kind_lists_every_resolved_edge() {
    let mut g = pipeline();
    let yaml = serialize(&mut g, &info()).unwrap_or_default();
    let out = deserialize(&yaml);
    assert_eq!(out.edges_by_kind.get(&LinkKind::Hard).map(Vec::len), Some(1));
    assert_eq!(out.edges_by_kind.get(&LinkKind::Soft).map(Vec::len), Some(1));
    assert_eq!(
        out.edges_by_kind.get(&LinkKind::Event).map(Vec::len),
        Some(1)
    );
}
