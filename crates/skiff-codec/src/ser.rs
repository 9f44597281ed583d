// SPDX-License-Identifier: Apache-2.0
//! The canonical serialization visitor.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use skiff_graph::{
    DataType, Graph, GraphVisitor, LinkKind, Node, NodeId, NodeKind, Payload, Reporter,
    WorkloadPayload,
};
use tracing::debug;

use crate::doc::{
    ChartBody, ChartDoc, ChartInfo, DataSourceDoc, LinkRefDoc, MetadataDoc, WorkloadControlDoc,
    WorkloadDoc, WorkloadFeaturesDoc, WorkloadLinksDoc, WorkloadMetaDoc, API_VERSION, KIND,
    SCHEMA_VERSION,
};

fn type_prefix(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::DataSource => "datasource",
        NodeKind::StoredProcedure => "procedure",
        NodeKind::EventTrigger => "trigger",
        NodeKind::Event => "event",
    }
}

/// Builds the canonical chart document over one traversal run.
///
/// Each node is assigned a deterministic name `{type_prefix}_{ordinal}`
/// (ordinal = same-type nodes already visited this run); that name, not the
/// id, keys the output sections. Edge direction is canonicalized: a link
/// touching a data source is always recorded from the workload side, since
/// data sources consume relations and never initiate them.
///
/// Run the visitor with [`skiff_graph::run`], then take the result with
/// [`into_document`](Self::into_document). The graph must already be valid;
/// the [`crate::serialize`] facade enforces that.
#[derive(Debug)]
pub struct SerializeVisitor {
    info: ChartInfo,
    names: BTreeMap<NodeId, String>,
    ordinals: BTreeMap<NodeKind, usize>,
    body: ChartBody,
    document: ChartDoc,
}

impl SerializeVisitor {
    /// Creates a visitor that will stamp `info` into the document metadata.
    #[must_use]
    pub fn new(info: ChartInfo) -> Self {
        Self {
            info,
            names: BTreeMap::new(),
            ordinals: BTreeMap::new(),
            body: ChartBody::default(),
            document: ChartDoc::default(),
        }
    }

    /// Consumes the visitor, yielding the assembled document.
    ///
    /// Meaningful only after a traversal run; before one it yields the
    /// document of an empty graph.
    #[must_use]
    pub fn into_document(self) -> ChartDoc {
        self.document
    }

    fn metadata(info: &ChartInfo) -> MetadataDoc {
        let mut labels = IndexMap::new();
        for raw in &info.labels {
            let (key, value) = raw.split_once('=').unwrap_or((raw.as_str(), ""));
            labels.insert(key.to_owned(), value.to_owned());
        }
        MetadataDoc {
            name: info.name.clone(),
            maintainer: info.maintainer.clone(),
            description: info.description.clone(),
            visibility: info.visibility.clone(),
            engine: info.engine.clone(),
            labels,
        }
    }

    fn workload_doc(node: &Node, w: &WorkloadPayload) -> WorkloadDoc {
        let features = WorkloadFeaturesDoc {
            networks: w.networks.clone().filter(|v| !v.is_empty()),
            ports: w.ports.clone().filter(|v| !v.is_empty()),
            volumes: w.volumes.clone().filter(|v| !v.is_empty()),
            targets: w.targets.clone().filter(|v| !v.is_empty()),
            env_vars: w.env_vars.clone().filter(|v| !v.is_empty()),
        };
        WorkloadDoc {
            metadata: WorkloadMetaDoc {
                id: node.id.to_string(),
                name: node.name.clone(),
                image: w.image.clone(),
                prefix: w.prefix.clone(),
                topic: if node.kind == NodeKind::Event {
                    w.topic.clone().filter(|t| !t.is_empty())
                } else {
                    None
                },
            },
            control: WorkloadControlDoc {
                disable_virtualization: w.disable_virtualization,
                run_detached: w.run_detached,
                remove_on_stop: w.remove_on_stop,
                memory: w.memory.clone().filter(|m| !m.is_empty()),
                kernel_args: Some(w.kernel_args.clone()).filter(|a| !a.is_empty()),
            },
            features: Some(features).filter(|f| !f.is_empty()),
            // Pre-allocated empty buckets; pruned in exit_graph when they
            // stay empty.
            links: Some(WorkloadLinksDoc::default()),
        }
    }

    /// Workload section for `kind`; `None` for data sources, which have
    /// their own section type and never carry links.
    fn section_mut(&mut self, kind: NodeKind) -> Option<&mut IndexMap<String, WorkloadDoc>> {
        match kind {
            NodeKind::StoredProcedure => Some(&mut self.body.stored_procedures),
            NodeKind::EventTrigger => Some(&mut self.body.event_triggers),
            NodeKind::Event => Some(&mut self.body.events),
            NodeKind::DataSource => None,
        }
    }
}

impl GraphVisitor for SerializeVisitor {
    fn enter_graph(&mut self, graph: &Graph) {
        self.names.clear();
        self.ordinals.clear();
        self.body = ChartBody::default();
        self.document = ChartDoc::default();
        debug!(nodes = graph.len(), "serialization pass started");
    }

    fn visit_node(&mut self, node: &mut Node, _reporter: &mut Reporter) {
        let ordinal = self.ordinals.entry(node.kind).or_insert(0);
        let name = format!("{}_{}", type_prefix(node.kind), *ordinal);
        *ordinal += 1;
        self.names.insert(node.id.clone(), name.clone());

        match &node.payload {
            Payload::DataSource(d) => {
                self.body.data_sources.insert(
                    name,
                    DataSourceDoc {
                        id: node.id.to_string(),
                        name: node.name.clone(),
                        data_type: d.data_type.unwrap_or(DataType::File),
                        path: d.path.clone(),
                        resource_name: d.resource_name.clone(),
                        description: d.description.clone(),
                    },
                );
            }
            Payload::Workload(w) => {
                let doc = Self::workload_doc(node, w);
                if let Some(section) = self.section_mut(node.kind) {
                    section.insert(name, doc);
                }
            }
        }
    }

    fn visit_edge(&mut self, kind: LinkKind, from: &Node, to: &Node, _reporter: &mut Reporter) {
        // Canonical direction: data sources are consumers, never initiators.
        let (source, destination) = if from.kind == NodeKind::DataSource {
            (to, from)
        } else {
            (from, to)
        };
        let Some(source_name) = self.names.get(&source.id).cloned() else {
            return;
        };
        let Some(destination_name) = self.names.get(&destination.id).cloned() else {
            return;
        };
        let Some(section) = self.section_mut(source.kind) else {
            return;
        };
        let Some(entry) = section.get_mut(&source_name) else {
            return;
        };
        let Some(links) = entry.links.as_mut() else {
            return;
        };
        let bucket = match kind {
            LinkKind::Hard => &mut links.hard_links,
            LinkKind::Soft => &mut links.soft_links,
            LinkKind::Event => &mut links.event_links,
        };
        bucket.push(LinkRefDoc {
            destination: destination_name,
        });
    }

    fn exit_graph(&mut self, _graph: &Graph, _reporter: &mut Reporter) {
        let mut body = std::mem::take(&mut self.body);
        for section in [
            &mut body.stored_procedures,
            &mut body.event_triggers,
            &mut body.events,
        ] {
            for entry in section.values_mut() {
                if entry.links.as_ref().is_some_and(WorkloadLinksDoc::is_empty) {
                    entry.links = None;
                }
            }
        }
        self.document = ChartDoc {
            api_version: API_VERSION.into(),
            schema_version: SCHEMA_VERSION.into(),
            kind: KIND.into(),
            metadata: Self::metadata(&self.info),
            chart: Some(body).filter(|b| !b.is_empty()),
        };
    }
}
