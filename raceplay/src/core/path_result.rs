use serde::Deserialize;

/// * `total_time` - Race time of the optimal strategy
/// * `pit_stops` - Pit stops as (marker, node) pairs, the marker is the lap of the stop
/// * `node_sequence` - Visited nodes in traversal order, starting with the start node
#[derive(Debug, Deserialize, Clone)]
pub struct PathPars {
    pub total_time: f64,
    pub pit_stops: Vec<(f64, usize)>,
    pub node_sequence: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitStopEntry {
    pub marker: f64,
    pub node: usize,
}

/// PathResult is the optimal strategy of one car as computed by the backend. It is trusted as-is,
/// the playback only checks its structure.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    pub node_sequence: Vec<usize>,
    pub pit_stops: Vec<PitStopEntry>,
    pub total_time: f64,
}

impl PathResult {
    pub fn new(path_pars: &PathPars) -> PathResult {
        PathResult {
            node_sequence: path_pars.node_sequence.to_owned(),
            pit_stops: path_pars
                .pit_stops
                .iter()
                .map(|&(marker, node)| PitStopEntry { marker, node })
                .collect(),
            total_time: path_pars.total_time,
        }
    }

    pub fn start_node(&self) -> Option<usize> {
        self.node_sequence.first().copied()
    }

    /// The method returns the nodes of the pit stops in the order they are listed.
    pub fn pit_stop_nodes(&self) -> Vec<usize> {
        self.pit_stops.iter().map(|entry| entry.node).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pit_stops_keep_order_and_markers() {
        let path_pars = PathPars {
            total_time: 42.0,
            pit_stops: vec![(2.0, 5), (0.0, 1)],
            node_sequence: vec![0, 1, 5, 6],
        };
        let path = PathResult::new(&path_pars);
        assert_eq!(path.start_node(), Some(0));
        assert_eq!(path.pit_stop_nodes(), vec![5, 1]);
        assert_eq!(path.pit_stops[0], PitStopEntry { marker: 2.0, node: 5 });
    }
}
