use crate::graph::{Graph, Layout};
use ahash::AHashMap;

const ORIGIN: f64 = 50.0;
const COLUMN_STEP: f64 = 350.0;
const ROW_STEP: f64 = 300.0;

/// Places every node of `graph`, honouring layout hints.
///
/// Nodes without a hint land in a layered grid: the column is the longest path from a
/// node without references, the row is the node's position within its column.
pub(super) fn place_nodes(graph: &Graph) -> Vec<Layout> {
    let mut depths: Vec<usize> = Vec::with_capacity(graph.len());
    let mut rows: AHashMap<usize, usize> = AHashMap::new();
    let mut placed = Vec::with_capacity(graph.len());

    for node in graph.nodes() {
        // Producers always precede consumers, so their depth is already known.
        let depth = node
            .references()
            .filter_map(|(_, source)| depths.get(source.node as usize - 1))
            .map(|d| d + 1)
            .max()
            .unwrap_or(0);
        depths.push(depth);

        let row = rows.entry(depth).or_insert(0);
        let layout = node.layout().unwrap_or_else(|| {
            Layout::new(
                [
                    ORIGIN + COLUMN_STEP * depth as f64,
                    ORIGIN + ROW_STEP * *row as f64,
                ],
                node.kind().default_size(),
            )
        });
        *row += 1;
        placed.push(layout);
    }
    placed
}
