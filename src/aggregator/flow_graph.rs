//! Flow graph of traffic through client -> protocol -> host -> path -> method.
//!
//! Nodes are keyed by label alone, so the same string seen at two stages
//! (say a path equal to a hostname) becomes one node. Edges are keyed by the
//! ordered pair of node indices and accumulate one unit of weight per record.

use crate::parser::schema::{FlowGraph, GraphEdge, GraphNode, LogRecord};
use crate::utils::config::PROTOCOL_LABEL;
use log::debug;
use std::collections::HashMap;

/// Arena of nodes and edges with index lookups, local to one build
#[derive(Debug, Default)]
struct GraphArena<'a> {
    nodes: Vec<GraphNode>,
    node_index: HashMap<&'a str, usize>,
    edges: Vec<GraphEdge>,
    edge_index: HashMap<(usize, usize), usize>,
}

impl<'a> GraphArena<'a> {
    fn node(&mut self, label: &'a str) -> usize {
        if let Some(&index) = self.node_index.get(label) {
            return index;
        }

        let index = self.nodes.len();
        self.nodes.push(GraphNode {
            label: label.to_string(),
            index,
        });
        self.node_index.insert(label, index);
        index
    }

    fn link(&mut self, source_index: usize, target_index: usize) {
        match self.edge_index.get(&(source_index, target_index)) {
            Some(&slot) => self.edges[slot].weight += 1,
            None => {
                self.edge_index.insert((source_index, target_index), self.edges.len());
                self.edges.push(GraphEdge {
                    source_index,
                    target_index,
                    weight: 1,
                });
            }
        }
    }

    fn into_graph(self) -> FlowGraph {
        FlowGraph {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}

/// Label chain for one record
fn chain(record: &LogRecord) -> [&str; 5] {
    [
        record.client_ip(),
        PROTOCOL_LABEL,
        record.hostname.as_str(),
        record.path.as_str(),
        record.method.as_str(),
    ]
}

/// Build the flow graph from records
///
/// **Public** - main entry point for flow graph construction
///
/// # Returns
/// Nodes and edges in first-seen order; empty for empty input
pub fn build(records: &[LogRecord]) -> FlowGraph {
    let mut arena = GraphArena::default();

    for record in records {
        let indices = chain(record).map(|label| arena.node(label));
        for pair in indices.windows(2) {
            arena.link(pair[0], pair[1]);
        }
    }

    let graph = arena.into_graph();

    debug!(
        "Built flow graph: {} nodes, {} edges from {} records",
        graph.nodes.len(),
        graph.edges.len(),
        records.len()
    );

    graph
}
