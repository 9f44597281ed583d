// SPDX-License-Identifier: Apache-2.0
//! The chart document shape.
//!
//! These types mirror the on-disk YAML one-to-one. Maps are insertion-ordered
//! (`IndexMap`) so the serializer's visitation order survives encoding and
//! re-serializing an unmodified graph stays byte-identical. Every field is
//! defaultable on input: deserialization tolerates sparse documents.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use skiff_graph::DataType;

/// Document API version descriptor.
pub const API_VERSION: &str = "skiff.dev/v1alpha1";
/// Chart schema revision.
pub const SCHEMA_VERSION: &str = "v1";
/// Document kind descriptor.
pub const KIND: &str = "DeploymentChart";

/// Chart-level metadata supplied by the caller (the editor's chart form).
///
/// `labels` holds raw `key=value` strings; the serializer parses them into
/// pairs on output and the deserializer re-joins them on input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartInfo {
    /// Chart name.
    pub name: String,
    /// Maintainer contact.
    pub maintainer: String,
    /// Free-form description.
    pub description: String,
    /// Publication visibility, e.g. `private`.
    pub visibility: String,
    /// Deployment engine the chart targets.
    pub engine: String,
    /// Raw `key=value` label strings.
    pub labels: Vec<String>,
}

impl Default for ChartInfo {
    fn default() -> Self {
        Self {
            name: "untitled".into(),
            maintainer: String::new(),
            description: String::new(),
            visibility: "private".into(),
            engine: "unikraft".into(),
            labels: Vec::new(),
        }
    }
}

/// Root document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDoc {
    /// Always [`API_VERSION`] on output.
    #[serde(default)]
    pub api_version: String,
    /// Always [`SCHEMA_VERSION`] on output.
    #[serde(default)]
    pub schema_version: String,
    /// Always [`KIND`] on output.
    #[serde(default)]
    pub kind: String,
    /// Chart metadata.
    #[serde(default)]
    pub metadata: MetadataDoc,
    /// Node sections. Omitted entirely for an empty graph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartBody>,
}

/// `metadata` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDoc {
    /// Chart name.
    #[serde(default)]
    pub name: String,
    /// Maintainer contact.
    #[serde(default)]
    pub maintainer: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Publication visibility.
    #[serde(default)]
    pub visibility: String,
    /// Deployment engine.
    #[serde(default)]
    pub engine: String,
    /// Parsed label pairs.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub labels: IndexMap<String, String>,
}

/// `chart` section: one map per node type, keyed by canonical name.
/// Empty sections are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartBody {
    /// Data-source entries.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub data_sources: IndexMap<String, DataSourceDoc>,
    /// Stored-procedure entries.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub stored_procedures: IndexMap<String, WorkloadDoc>,
    /// Event-trigger entries.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub event_triggers: IndexMap<String, WorkloadDoc>,
    /// Event entries (no links section).
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub events: IndexMap<String, WorkloadDoc>,
}

impl ChartBody {
    /// Returns `true` when every section is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data_sources.is_empty()
            && self.stored_procedures.is_empty()
            && self.event_triggers.is_empty()
            && self.events.is_empty()
    }
}

/// One data-source entry: a flat map, absent/empty fields omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceDoc {
    /// Stable node id.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// File/folder classification.
    #[serde(rename = "type", default)]
    pub data_type: DataType,
    /// Filesystem path.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    /// Mounted resource name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// One workload entry (stored procedure, event trigger, or event).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadDoc {
    /// Identity and image sub-tree.
    #[serde(default)]
    pub metadata: WorkloadMetaDoc,
    /// Runtime control sub-tree.
    #[serde(default)]
    pub control: WorkloadControlDoc,
    /// Optional feature lists; omitted when all are absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<WorkloadFeaturesDoc>,
    /// Outgoing links; removed entirely when all three buckets are empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<WorkloadLinksDoc>,
}

/// Workload `metadata` sub-tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadMetaDoc {
    /// Stable node id.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Image reference.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
    /// Instance name prefix.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prefix: String,
    /// Event topic (event entries only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

/// Workload `control` sub-tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadControlDoc {
    /// Disable hardware virtualization.
    #[serde(default)]
    pub disable_virtualization: bool,
    /// Detach on start.
    #[serde(default)]
    pub run_detached: bool,
    /// Remove instance state on stop.
    #[serde(default)]
    pub remove_on_stop: bool,
    /// Memory quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    /// Kernel command-line arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernel_args: Option<String>,
}

/// Workload `features` sub-tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadFeaturesDoc {
    /// Network descriptors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<Vec<String>>,
    /// Port mappings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<Vec<String>>,
    /// Volume mounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<String>>,
    /// Deployment targets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<String>>,
    /// Environment entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_vars: Option<Vec<String>>,
}

impl WorkloadFeaturesDoc {
    /// Returns `true` when every list is absent or empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        fn blank(v: &Option<Vec<String>>) -> bool {
            v.as_ref().map_or(true, Vec::is_empty)
        }
        blank(&self.networks)
            && blank(&self.ports)
            && blank(&self.volumes)
            && blank(&self.targets)
            && blank(&self.env_vars)
    }
}

/// Workload `links` sub-tree: one bucket per link kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadLinksDoc {
    /// Hard links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hard_links: Vec<LinkRefDoc>,
    /// Soft links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub soft_links: Vec<LinkRefDoc>,
    /// Event links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event_links: Vec<LinkRefDoc>,
}

impl WorkloadLinksDoc {
    /// Returns `true` when all three buckets are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hard_links.is_empty() && self.soft_links.is_empty() && self.event_links.is_empty()
    }
}

/// One link entry: the canonical name of the destination node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRefDoc {
    /// Canonical destination name.
    pub destination: String,
}
