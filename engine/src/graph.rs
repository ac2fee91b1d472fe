use petgraph::algo::{has_path_connecting, is_cyclic_directed};
use petgraph::graphmap::DiGraphMap;

use crate::genome::{Genome, Innovation, NodeId};

/// Directed graph of a genome, keyed by node id with innovation-weighted edges.
pub fn build_graph(genome: &Genome) -> DiGraphMap<NodeId, Innovation> {
    let mut graph = DiGraphMap::with_capacity(genome.num_nodes(), genome.num_conns());
    for node in genome.nodes() {
        graph.add_node(node.id());
    }
    for conn in genome.conns() {
        graph.add_edge(conn.input(), conn.output(), conn.innovation());
    }
    graph
}

/// Whether adding `input -> output` would close a directed cycle.
pub fn creates_cycle(genome: &Genome, input: NodeId, output: NodeId) -> bool {
    if input == output {
        return true;
    }
    let graph = build_graph(genome);
    graph.contains_node(output)
        && graph.contains_node(input)
        && has_path_connecting(&graph, output, input, None)
}

pub fn is_feed_forward(genome: &Genome) -> bool {
    !is_cyclic_directed(&build_graph(genome))
}
