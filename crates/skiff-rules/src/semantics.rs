// SPDX-License-Identifier: Apache-2.0
//! The semantic rule visitor: every structural and field rule in one pass.

use std::collections::{BTreeMap, BTreeSet};

use skiff_graph::{
    is_allowed, DataSourcePayload, DataType, Diagnostic, Graph, GraphVisitor, LinkKind, Node,
    NodeId, NodeKind, Reporter, WorkloadPayload,
};
use tracing::debug;

use crate::format;

/// Validates nodes and edges against the chart rules, applying field
/// defaults as it goes.
///
/// Per-run state is reset in `enter_graph`; a visitor instance is unsafe to
/// reuse across runs without it. Rule violations are reported, never thrown:
/// one run surfaces the complete set.
#[derive(Debug, Default)]
pub struct RuleVisitor {
    seen_names: BTreeSet<String>,
    seen_pairs: BTreeSet<(NodeId, NodeId)>,
    hard_links: BTreeMap<NodeId, u32>,
}

impl RuleVisitor {
    /// Creates a visitor with empty per-run state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn check_name(&mut self, node: &Node, reporter: &mut Reporter) {
        if !format::is_alphanumeric(&node.name) {
            reporter.report(
                Diagnostic::error(
                    "node.name.invalid",
                    format!("name {:?} must be non-empty alphanumeric", node.name),
                )
                .with_origin(node.id.clone()),
            );
        }
        if !self.seen_names.insert(node.name.clone()) {
            reporter.report(
                Diagnostic::warning(
                    "node.name.repeat",
                    format!("name {:?} is used by another node", node.name),
                )
                .with_origin(node.id.clone()),
            );
        }
    }

    fn check_data_source(node_id: &NodeId, p: &mut DataSourcePayload, reporter: &mut Reporter) {
        if !format::is_path(&p.path) {
            reporter.report(
                Diagnostic::error(
                    "datasource.path.invalid",
                    format!("path {:?} must be a non-empty filesystem path", p.path),
                )
                .with_origin(node_id.clone()),
            );
        }
        if !format::is_alphanumeric(&p.resource_name) {
            reporter.report(
                Diagnostic::error(
                    "datasource.resource-name.invalid",
                    format!(
                        "resource name {:?} must be non-empty alphanumeric",
                        p.resource_name
                    ),
                )
                .with_origin(node_id.clone()),
            );
        }
        // Normalize-then-validate: an omitted data type becomes `file` on the
        // node itself, visible to later rules in the same run. Not flagged.
        if p.data_type.is_none() {
            p.data_type = Some(DataType::File);
        }
        // `description` is unconstrained.
    }

    fn check_workload(
        node_id: &NodeId,
        kind: NodeKind,
        p: &WorkloadPayload,
        reporter: &mut Reporter,
    ) {
        if !format::is_image(&p.image) {
            reporter.report(
                Diagnostic::error(
                    "workload.image.invalid",
                    format!("image {:?} must look like scheme://path", p.image),
                )
                .with_origin(node_id.clone()),
            );
        }
        // `kernel_args` is unconstrained; the booleans are never flagged.
        if !p.prefix.is_empty() && !format::is_alphanumeric(&p.prefix) {
            reporter.report(
                Diagnostic::error(
                    "workload.prefix.invalid",
                    format!("prefix {:?} must be alphanumeric", p.prefix),
                )
                .with_origin(node_id.clone()),
            );
        }
        if let Some(memory) = &p.memory {
            if !format::is_memory(memory) {
                reporter.report(
                    Diagnostic::error(
                        "workload.memory.invalid",
                        format!("memory {memory:?} must match [1-9][0-9]*[KMG]i?"),
                    )
                    .with_origin(node_id.clone()),
                );
            }
        }
        Self::check_list(node_id, "networks", &p.networks, format::is_network, reporter);
        Self::check_list(node_id, "ports", &p.ports, format::is_port_mapping, reporter);
        Self::check_list(node_id, "volumes", &p.volumes, format::is_volume, reporter);
        Self::check_list(node_id, "targets", &p.targets, format::is_target, reporter);
        Self::check_list(node_id, "env-vars", &p.env_vars, format::is_env_var, reporter);
        if kind == NodeKind::Event {
            let topic_ok = p
                .topic
                .as_deref()
                .is_some_and(format::is_alphanumeric);
            if !topic_ok {
                reporter.report(
                    Diagnostic::error(
                        "event.topic.invalid",
                        "event nodes require a non-empty alphanumeric topic",
                    )
                    .with_origin(node_id.clone()),
                );
            }
        }
    }

    /// Validates one optional list field entry-by-entry; all invalid entries
    /// of the field are collected into a single diagnostic.
    fn check_list(
        node_id: &NodeId,
        field: &str,
        entries: &Option<Vec<String>>,
        valid: fn(&str) -> bool,
        reporter: &mut Reporter,
    ) {
        let Some(entries) = entries else { return };
        let invalid: Vec<String> = entries.iter().filter(|e| !valid(e)).cloned().collect();
        if !invalid.is_empty() {
            reporter.report(
                Diagnostic::error(
                    format!("workload.{field}.invalid"),
                    format!("{field} contains {} invalid entries", invalid.len()),
                )
                .with_origin(node_id.clone())
                .with_details(invalid),
            );
        }
    }

    /// Unordered endpoint pair, the duplicate-edge key (kind-insensitive).
    fn pair_key(a: &NodeId, b: &NodeId) -> (NodeId, NodeId) {
        if a <= b {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        }
    }

    fn count_hard_touch(&mut self, ds: &NodeId, origin: &NodeId, reporter: &mut Reporter) {
        let count = self.hard_links.entry(ds.clone()).or_insert(0);
        *count += 1;
        if *count >= 2 {
            reporter.report(
                Diagnostic::error(
                    "edge.hard-link-exclusive",
                    format!("data source {ds} already has a hard link"),
                )
                .with_origin(origin.clone()),
            );
        }
    }
}

impl GraphVisitor for RuleVisitor {
    fn enter_graph(&mut self, graph: &Graph) {
        self.seen_names.clear();
        self.seen_pairs.clear();
        self.hard_links.clear();
        debug!(nodes = graph.len(), "rule pass started");
    }

    fn visit_node(&mut self, node: &mut Node, reporter: &mut Reporter) {
        self.check_name(node, reporter);
        let id = node.id.clone();
        let kind = node.kind;
        match &mut node.payload {
            skiff_graph::Payload::DataSource(p) => Self::check_data_source(&id, p, reporter),
            skiff_graph::Payload::Workload(p) => Self::check_workload(&id, kind, p, reporter),
        }
    }

    fn visit_edge(&mut self, kind: LinkKind, from: &Node, to: &Node, reporter: &mut Reporter) {
        // 1. Self-loops are always invalid.
        if from.id == to.id {
            reporter.report(
                Diagnostic::error(
                    "edge.self-loop",
                    format!("node {:?} links to itself", from.name),
                )
                .with_origin(from.id.clone()),
            );
        }

        // 2. At most one edge (of any kind, in either direction) per
        //    endpoint pair; the second occurrence is flagged.
        if !self.seen_pairs.insert(Self::pair_key(&from.id, &to.id)) {
            reporter.report(
                Diagnostic::error(
                    "edge.duplicate",
                    format!("{:?} and {:?} are already connected", from.name, to.name),
                )
                .with_origin(from.id.clone()),
            );
        }

        // 3. The pair must be in the connection-policy table for this kind.
        if !is_allowed(from.kind, to.kind, kind) {
            reporter.report(
                Diagnostic::error(
                    "edge.kind-not-allowed",
                    format!(
                        "{:?} may not have a {kind:?} link to {:?}",
                        from.kind, to.kind
                    ),
                )
                .with_origin(from.id.clone()),
            );
        }

        // 4. Hard links are exclusive per data source, counted globally
        //    across both directions.
        if kind == LinkKind::Hard {
            if from.kind == NodeKind::DataSource {
                self.count_hard_touch(&from.id, &from.id, reporter);
            }
            if to.kind == NodeKind::DataSource && from.id != to.id {
                self.count_hard_touch(&to.id, &from.id, reporter);
            }
        }
    }

    fn exit_graph(&mut self, _graph: &Graph, reporter: &mut Reporter) {
        debug!(findings = reporter.len(), "rule pass finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skiff_graph::Payload;

    fn workload(id: &str, kind: NodeKind, name: &str) -> Node {
        let mut n = Node::new(id, kind, name);
        if let Payload::Workload(w) = &mut n.payload {
            w.image = "hvt://repo/app".into();
            if kind == NodeKind::Event {
                w.topic = Some("uploads".into());
            }
        }
        n
    }

    fn data_source(id: &str, name: &str) -> Node {
        let mut n = Node::new(id, NodeKind::DataSource, name);
        if let Payload::DataSource(d) = &mut n.payload {
            d.path = "/data/in".into();
            d.resource_name = "input".into();
        }
        n
    }

    fn codes_for<'a>(map: &'a skiff_graph::DiagnosticMap, id: &str) -> Vec<&'a str> {
        map.get(&NodeId::new(id))
            .map(|ds| ds.iter().map(|d| d.code.as_str()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn valid_pipeline_has_no_findings() {
        let mut g = Graph::new();
        let mut sp = workload("sp", NodeKind::StoredProcedure, "processor");
        sp.add_link(LinkKind::Hard, "ds");
        g.insert(sp);
        g.insert(data_source("ds", "input"));
        let mut tr = workload("tr", NodeKind::EventTrigger, "watcher");
        tr.add_link(LinkKind::Event, "ev");
        g.insert(tr);
        g.insert(workload("ev", NodeKind::Event, "on upload"));

        let map = crate::analyze(&mut g);
        assert!(map.is_empty(), "{map:?}");
    }

    #[test]
    fn data_type_defaults_to_file_without_a_finding() {
        let mut g = Graph::new();
        g.insert(data_source("ds", "input"));
        let map = crate::analyze(&mut g);
        assert!(map.is_empty());
        let dt = g.nodes[0].payload.as_data_source().and_then(|d| d.data_type);
        assert_eq!(dt, Some(DataType::File));
    }

    #[test]
    fn repeated_name_warns_and_does_not_block() {
        let mut g = Graph::new();
        g.insert(data_source("a", "shared"));
        g.insert(data_source("b", "shared"));
        let map = crate::analyze(&mut g);
        assert_eq!(codes_for(&map, "b"), ["node.name.repeat"]);
        assert!(crate::is_valid(&map));
    }

    #[test]
    fn invalid_fields_are_each_flagged() {
        let mut g = Graph::new();
        let mut ev = workload("ev", NodeKind::Event, "bad#name");
        if let Payload::Workload(w) = &mut ev.payload {
            w.image = "no-scheme".into();
            w.prefix = "pre_fix".into();
            w.memory = Some("128X".into());
            w.topic = None;
        }
        g.insert(ev);
        let map = crate::analyze(&mut g);
        let mut codes = codes_for(&map, "ev");
        codes.sort_unstable();
        assert_eq!(
            codes,
            [
                "event.topic.invalid",
                "node.name.invalid",
                "workload.image.invalid",
                "workload.memory.invalid",
                "workload.prefix.invalid",
            ]
        );
    }

    #[test]
    fn list_fields_aggregate_into_one_finding() {
        let mut g = Graph::new();
        let mut sp = workload("sp", NodeKind::StoredProcedure, "svc");
        if let Payload::Workload(w) = &mut sp.payload {
            w.ports = Some(vec!["80:8080".into(), "80:99999".into(), "x:y".into()]);
        }
        g.insert(sp);
        let map = crate::analyze(&mut g);
        let findings = &map[&NodeId::new("sp")];
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, "workload.ports.invalid");
        assert_eq!(findings[0].details, ["80:99999", "x:y"]);
    }

    #[test]
    fn self_loop_is_an_error() {
        let mut g = Graph::new();
        let mut sp = workload("sp", NodeKind::StoredProcedure, "svc");
        sp.add_link(LinkKind::Hard, "sp");
        g.insert(sp);
        let map = crate::analyze(&mut g);
        assert!(codes_for(&map, "sp").contains(&"edge.self-loop"));
    }

    #[test]
    fn reverse_direction_duplicate_is_flagged_on_second_visit() {
        let mut g = Graph::new();
        let mut sp = workload("sp", NodeKind::StoredProcedure, "svc");
        sp.add_link(LinkKind::Hard, "ds");
        g.insert(sp);
        let mut ds = data_source("ds", "input");
        ds.add_link(LinkKind::Soft, "sp");
        g.insert(ds);
        let map = crate::analyze(&mut g);
        // Second-visited edge originates at ds.
        assert!(codes_for(&map, "ds").contains(&"edge.duplicate"));
        assert!(!codes_for(&map, "sp").contains(&"edge.duplicate"));
    }

    #[test]
    fn second_hard_link_to_a_data_source_is_an_error() {
        let mut g = Graph::new();
        let mut sp = workload("sp", NodeKind::StoredProcedure, "svc a");
        sp.add_link(LinkKind::Hard, "ds");
        g.insert(sp);
        let mut ds = data_source("ds", "input");
        ds.add_link(LinkKind::Hard, "tr");
        g.insert(ds);
        g.insert(workload("tr", NodeKind::EventTrigger, "svc b"));
        let map = crate::analyze(&mut g);
        assert!(codes_for(&map, "ds").contains(&"edge.hard-link-exclusive"));
    }

    #[test]
    fn disallowed_pairs_are_flagged() {
        let mut g = Graph::new();
        let mut ev = workload("ev", NodeKind::Event, "on upload");
        ev.add_link(LinkKind::Event, "tr");
        g.insert(ev);
        g.insert(workload("tr", NodeKind::EventTrigger, "watcher"));
        let map = crate::analyze(&mut g);
        assert!(codes_for(&map, "ev").contains(&"edge.kind-not-allowed"));
    }
}
