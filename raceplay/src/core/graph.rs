use std::collections::BTreeSet;

/// Directed track connection between two nodes.
/// * `from` - Source node
/// * `to` - Target node
/// * `weight` - Travel cost of the connection, consumed as fuel and added as tyre distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub weight: f64,
}

/// Graph is the track as seen by the playback: nodes are 0-indexed and smaller than
/// `node_count`, edges are kept in their original order since lookups always use the first match.
#[derive(Debug, Clone)]
pub struct Graph {
    pub node_count: usize,
    pub pit_nodes: BTreeSet<usize>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new(node_count: usize, pit_nodes: &[usize], edges: Vec<Edge>) -> Graph {
        Graph {
            node_count,
            pit_nodes: pit_nodes.iter().copied().collect(),
            edges,
        }
    }

    /// The method checks if the node is able to host a pit stop.
    pub fn is_pit_node(&self, node: usize) -> bool {
        self.pit_nodes.contains(&node)
    }

    /// The method returns all edges leaving the given node in their original order.
    pub fn outgoing(&self, node: usize) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |edge| edge.from == node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pit_nodes_are_deduplicated() {
        let graph = Graph::new(4, &[3, 1, 3], Vec::new());
        assert_eq!(graph.pit_nodes.len(), 2);
        assert!(graph.is_pit_node(1));
        assert!(graph.is_pit_node(3));
        assert!(!graph.is_pit_node(0));
    }

    #[test]
    fn outgoing_keeps_edge_order() {
        let edges = vec![
            Edge { from: 0, to: 1, weight: 4.0 },
            Edge { from: 1, to: 2, weight: 1.0 },
            Edge { from: 0, to: 2, weight: 9.0 },
        ];
        let graph = Graph::new(3, &[], edges);
        let targets: Vec<usize> = graph.outgoing(0).map(|edge| edge.to).collect();
        assert_eq!(targets, vec![1, 2]);
    }
}
