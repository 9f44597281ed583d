// SPDX-License-Identifier: Apache-2.0
//! Connection policy: which link kinds may join which node kinds.

use serde::{Deserialize, Serialize};

use crate::node::NodeKind;

/// Relation flavor between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Exclusive workload–data-source relation (singleton per data source).
    Hard,
    /// Non-exclusive workload–data-source relation.
    Soft,
    /// Trigger-fires-event relation.
    Event,
}

/// All link kinds in traversal order (hard, soft, event).
pub const LINK_KINDS: [LinkKind; 3] = [LinkKind::Hard, LinkKind::Soft, LinkKind::Event];

/// Permitted link kinds for a `(source, destination)` node-kind pair.
///
/// Workload–data-source pairs permit hard/soft in both directions; only
/// `EventTrigger -> Event` carries event links. Every other pair is
/// unconnectable.
#[must_use]
pub fn allowed_kinds(from: NodeKind, to: NodeKind) -> &'static [LinkKind] {
    use NodeKind::{DataSource, Event, EventTrigger, StoredProcedure};
    match (from, to) {
        (StoredProcedure, DataSource)
        | (DataSource, StoredProcedure)
        | (DataSource, EventTrigger)
        | (EventTrigger, DataSource) => &[LinkKind::Hard, LinkKind::Soft],
        (EventTrigger, Event) => &[LinkKind::Event],
        _ => &[],
    }
}

/// Returns `true` when `kind` may join `from` to `to`.
#[must_use]
pub fn is_allowed(from: NodeKind, to: NodeKind, kind: LinkKind) -> bool {
    allowed_kinds(from, to).contains(&kind)
}
