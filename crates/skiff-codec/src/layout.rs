// SPDX-License-Identifier: Apache-2.0
//! Grid placement for freshly loaded graphs.

use skiff_graph::{Graph, NodeKind, Position};

/// Column order: data sources leftmost, then the workload flavors.
const COLUMN_ORDER: [NodeKind; 4] = [
    NodeKind::DataSource,
    NodeKind::StoredProcedure,
    NodeKind::EventTrigger,
    NodeKind::Event,
];

const ORIGIN_X: f64 = 80.0;
const ORIGIN_Y: f64 = 80.0;
const COLUMN_WIDTH: f64 = 280.0;
const ROW_GAP: f64 = 140.0;

/// Places nodes in fixed-width columns grouped by type, top to bottom.
///
/// Cosmetic only: positions never affect validity or canonical output.
#[allow(clippy::cast_precision_loss)] // row/column counts are tiny
pub fn layout_graph(graph: &mut Graph) {
    for (column, kind) in COLUMN_ORDER.iter().enumerate() {
        let x = (column as f64).mul_add(COLUMN_WIDTH, ORIGIN_X);
        for (row, node) in graph
            .nodes
            .iter_mut()
            .filter(|n| n.kind == *kind)
            .enumerate()
        {
            node.position = Position {
                x,
                y: (row as f64).mul_add(ROW_GAP, ORIGIN_Y),
            };
        }
    }
}
