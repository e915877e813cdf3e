use crate::core::car::Car;
use crate::core::graph::{Edge, Graph};
use crate::core::path_result::PitStopEntry;

/// PlaybackState contains the resources of the car that is currently played back.
/// * `fuel` - Remaining fuel, may become negative (the playback does not enforce the tank size)
/// * `tyre_distance` - Distance driven on the current tyre set
/// * `step` - Index of the next node in the node sequence
/// * `current_node` - Node the car is located at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub fuel: f64,
    pub tyre_distance: f64,
    pub step: usize,
    pub current_node: usize,
}

impl PlaybackState {
    pub fn new(car: &Car, start_node: usize) -> PlaybackState {
        PlaybackState {
            fuel: car.fuel_capacity,
            tyre_distance: 0.0,
            step: 0,
            current_node: start_node,
        }
    }
}

/// find_edge returns the first edge from `from` to `to`, None if the nodes are not connected.
pub fn find_edge(graph: &Graph, from: usize, to: usize) -> Option<&Edge> {
    graph
        .edges
        .iter()
        .find(|edge| edge.from == from && edge.to == to)
}

/// advance moves the car to node `to`. The edge weight is burnt as fuel and added to the tyre
/// distance. Without a connecting edge only the position changes.
pub fn advance(state: &PlaybackState, graph: &Graph, to: usize) -> PlaybackState {
    let mut new_state = *state;

    if let Some(edge) = find_edge(graph, state.current_node, to) {
        new_state.fuel -= edge.weight;
        new_state.tyre_distance += edge.weight;
    }
    new_state.current_node = to;

    new_state
}

/// is_pit_stop checks if visiting `node` is a pit stop for the car, i.e. the node is a pit node
/// and it is listed in the pit stops of the car's path.
pub fn is_pit_stop(graph: &Graph, pit_stops: &[PitStopEntry], node: usize) -> bool {
    graph.is_pit_node(node) && pit_stops.iter().any(|entry| entry.node == node)
}

/// apply_pit_stop refuels the car to its capacity and mounts a fresh tyre set.
pub fn apply_pit_stop(state: &PlaybackState, car: &Car) -> PlaybackState {
    PlaybackState {
        fuel: car.fuel_capacity,
        tyre_distance: 0.0,
        ..*state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn car(fuel_capacity: f64) -> Car {
        Car {
            car_no: 1,
            fuel_capacity,
            tyre_cost: 1.0,
        }
    }

    fn graph() -> Graph {
        Graph::new(
            3,
            &[1],
            vec![
                Edge { from: 0, to: 1, weight: 5.0 },
                Edge { from: 1, to: 2, weight: 5.0 },
                Edge { from: 0, to: 1, weight: 7.5 },
            ],
        )
    }

    #[test]
    fn find_edge_returns_first_match() {
        let graph = graph();
        let edge = find_edge(&graph, 0, 1).unwrap();
        assert_abs_diff_eq!(edge.weight, 5.0);
        assert!(find_edge(&graph, 2, 0).is_none());
    }

    #[test]
    fn advance_burns_fuel_and_wears_tyres() {
        let graph = graph();
        let state = PlaybackState::new(&car(8.0), 0);
        let state = advance(&state, &graph, 1);
        assert_abs_diff_eq!(state.fuel, 3.0);
        assert_abs_diff_eq!(state.tyre_distance, 5.0);
        assert_eq!(state.current_node, 1);
    }

    #[test]
    fn advance_allows_negative_fuel() {
        let graph = graph();
        let state = PlaybackState::new(&car(4.0), 0);
        let state = advance(&advance(&state, &graph, 1), &graph, 2);
        assert_abs_diff_eq!(state.fuel, -6.0);
        assert_abs_diff_eq!(state.tyre_distance, 10.0);
    }

    #[test]
    fn advance_without_edge_only_moves() {
        let graph = graph();
        let state = PlaybackState::new(&car(8.0), 2);
        let moved = advance(&state, &graph, 0);
        assert_eq!(moved.current_node, 0);
        assert_abs_diff_eq!(moved.fuel, state.fuel);
        assert_abs_diff_eq!(moved.tyre_distance, state.tyre_distance);
    }

    #[test]
    fn pit_stop_requires_pit_node_and_listing() {
        let graph = graph();
        let listed = [PitStopEntry { marker: 0.0, node: 1 }];
        let listed_non_pit = [PitStopEntry { marker: 0.0, node: 2 }];

        assert!(is_pit_stop(&graph, &listed, 1));
        assert!(!is_pit_stop(&graph, &[], 1));
        assert!(!is_pit_stop(&graph, &listed_non_pit, 2));
        assert!(!is_pit_stop(&graph, &listed, 0));
    }

    proptest! {
        #[test]
        fn apply_pit_stop_always_resets(
            fuel in -1.0e6f64..1.0e6,
            tyre_distance in 0.0f64..1.0e6,
            step in 0usize..100,
            node in 0usize..3,
            capacity in 0.1f64..1.0e4,
        ) {
            let state = PlaybackState { fuel, tyre_distance, step, current_node: node };
            let refreshed = apply_pit_stop(&state, &car(capacity));
            prop_assert_eq!(refreshed.fuel, capacity);
            prop_assert_eq!(refreshed.tyre_distance, 0.0);
            prop_assert_eq!(refreshed.current_node, node);
            prop_assert_eq!(refreshed.step, step);
        }

        #[test]
        fn advance_without_edge_keeps_resources(
            fuel in -1.0e3f64..1.0e3,
            tyre_distance in 0.0f64..1.0e3,
            to in 0usize..3,
        ) {
            // node 2 has no outgoing edges
            let graph = graph();
            let state = PlaybackState { fuel, tyre_distance, step: 1, current_node: 2 };
            let moved = advance(&state, &graph, to);
            prop_assert_eq!(moved.fuel, fuel);
            prop_assert_eq!(moved.tyre_distance, tyre_distance);
            prop_assert_eq!(moved.current_node, to);
        }

        #[test]
        fn pit_stop_iff_both_conditions(
            pit_nodes in proptest::collection::vec(0usize..6, 0..4),
            listed in proptest::collection::vec(0usize..6, 0..4),
            node in 0usize..6,
        ) {
            let graph = Graph::new(6, &pit_nodes, Vec::new());
            let pit_stops: Vec<PitStopEntry> = listed
                .iter()
                .map(|&node| PitStopEntry { marker: 0.0, node })
                .collect();
            let expected = pit_nodes.contains(&node) && listed.contains(&node);
            prop_assert_eq!(is_pit_stop(&graph, &pit_stops, node), expected);
        }
    }
}
