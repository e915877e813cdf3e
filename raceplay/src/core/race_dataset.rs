use crate::core::car::{Car, CarPars};
use crate::core::graph::{Edge, Graph};
use crate::core::path_result::{PathPars, PathResult};
use serde::Deserialize;
use std::error::Error;
use std::fmt;

/// * `n` - Number of nodes in the track graph
/// * `pit_nodes` - Nodes that are able to host a pit stop
/// * `cars` - Fleet in playback order
#[derive(Debug, Deserialize, Clone)]
pub struct RacePars {
    pub n: usize,
    pub pit_nodes: Vec<usize>,
    pub cars: Vec<CarPars>,
}

/// DatasetError is used if the race data cannot be loaded (`FetchFailure`) or does not fulfill
/// the structural requirements of the playback (`MalformedDataset`). In both cases playback does
/// not start.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetError {
    FetchFailure(String),
    MalformedDataset(String),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DatasetError::FetchFailure(msg) => write!(f, "Failed to load race data: {}", msg),
            DatasetError::MalformedDataset(msg) => write!(f, "Malformed race data: {}", msg),
        }
    }
}

impl Error for DatasetError {}

/// RaceDataset is the immutable, validated form of the fetched payload. Path results are aligned
/// by index with the fleet, `None` marks a car without a feasible strategy.
#[derive(Debug, Clone)]
pub struct RaceDataset {
    graph: Graph,
    fleet: Vec<Car>,
    path_results: Vec<Option<PathResult>>,
}

impl RaceDataset {
    pub fn new(
        race_pars: &RacePars,
        graph_edges: &[(usize, usize, f64)],
        optimal_paths: &[Option<PathPars>],
    ) -> Result<RaceDataset, DatasetError> {
        let n = race_pars.n;

        if optimal_paths.len() != race_pars.cars.len() {
            return Err(malformed(format!(
                "fleet has {} cars but {} path results were provided",
                race_pars.cars.len(),
                optimal_paths.len()
            )));
        }

        if let Some(pit_node) = race_pars.pit_nodes.iter().find(|&&node| node >= n) {
            return Err(malformed(format!(
                "pit node {} is out of range for {} nodes",
                pit_node, n
            )));
        }

        let mut edges = Vec::with_capacity(graph_edges.len());
        for (i, &(from, to, weight)) in graph_edges.iter().enumerate() {
            if from >= n || to >= n {
                return Err(malformed(format!(
                    "edge {} ({} -> {}) references a node out of range for {} nodes",
                    i, from, to, n
                )));
            }
            if !weight.is_finite() || weight < 0.0 {
                return Err(malformed(format!(
                    "edge {} ({} -> {}) has invalid weight {}",
                    i, from, to, weight
                )));
            }
            edges.push(Edge { from, to, weight });
        }
        let graph = Graph::new(n, &race_pars.pit_nodes, edges);

        let mut fleet = Vec::with_capacity(race_pars.cars.len());
        for (i, car_pars) in race_pars.cars.iter().enumerate() {
            if !car_pars.fuel_capacity.is_finite() || car_pars.fuel_capacity <= 0.0 {
                return Err(malformed(format!(
                    "car {} has invalid fuel capacity {}",
                    i + 1,
                    car_pars.fuel_capacity
                )));
            }
            fleet.push(Car::new(i, car_pars));
        }

        let mut path_results = Vec::with_capacity(optimal_paths.len());
        for (i, path_pars) in optimal_paths.iter().enumerate() {
            let path_pars = match path_pars {
                Some(path_pars) => path_pars,
                None => {
                    path_results.push(None);
                    continue;
                }
            };

            if path_pars.node_sequence.is_empty() {
                return Err(malformed(format!("path of car {} is empty", i + 1)));
            }
            if let Some(node) = path_pars.node_sequence.iter().find(|&&node| node >= n) {
                return Err(malformed(format!(
                    "path of car {} visits node {} which is out of range for {} nodes",
                    i + 1,
                    node,
                    n
                )));
            }
            if let Some(&(_, node)) = path_pars
                .pit_stops
                .iter()
                .find(|&&(_, node)| !graph.is_pit_node(node))
            {
                return Err(malformed(format!(
                    "path of car {} lists a pit stop at node {} which is not a pit node",
                    i + 1,
                    node
                )));
            }

            path_results.push(Some(PathResult::new(path_pars)));
        }

        Ok(RaceDataset {
            graph,
            fleet,
            path_results,
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn fleet(&self) -> &[Car] {
        &self.fleet
    }

    pub fn path_results(&self) -> &[Option<PathResult>] {
        &self.path_results
    }

    /// The method returns the path result of the car at the given fleet position, None if the car
    /// has no feasible strategy or the position is out of range.
    pub fn path_result(&self, fleet_idx: usize) -> Option<&PathResult> {
        self.path_results.get(fleet_idx).and_then(|path| path.as_ref())
    }
}

fn malformed(msg: String) -> DatasetError {
    DatasetError::MalformedDataset(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn race_pars(n: usize, pit_nodes: Vec<usize>, no_cars: usize) -> RacePars {
        RacePars {
            n,
            pit_nodes,
            cars: (0..no_cars)
                .map(|_| CarPars {
                    fuel_capacity: 8.0,
                    tyre_cost: 1.0,
                })
                .collect(),
        }
    }

    fn path(node_sequence: Vec<usize>, pit_stops: Vec<(f64, usize)>) -> Option<PathPars> {
        Some(PathPars {
            total_time: 10.0,
            pit_stops,
            node_sequence,
        })
    }

    #[test]
    fn valid_dataset_is_aligned() {
        let dataset = RaceDataset::new(
            &race_pars(3, vec![1], 2),
            &[(0, 1, 5.0), (1, 2, 5.0)],
            &[path(vec![0, 1, 2], vec![(0.0, 1)]), None],
        )
        .unwrap();
        assert_eq!(dataset.fleet().len(), dataset.path_results().len());
        assert_eq!(dataset.fleet()[1].car_no, 2);
        assert!(dataset.path_result(0).is_some());
        assert!(dataset.path_result(1).is_none());
        assert!(dataset.path_result(2).is_none());
    }

    #[test]
    fn misaligned_path_results_are_rejected() {
        let err = RaceDataset::new(&race_pars(3, vec![], 2), &[], &[None]).unwrap_err();
        assert!(matches!(err, DatasetError::MalformedDataset(_)));
    }

    #[test]
    fn out_of_range_nodes_are_rejected() {
        let pars = race_pars(3, vec![], 1);
        assert!(RaceDataset::new(&pars, &[(0, 3, 1.0)], &[None]).is_err());
        assert!(RaceDataset::new(&pars, &[], &[path(vec![0, 7], vec![])]).is_err());
        assert!(RaceDataset::new(&race_pars(3, vec![3], 1), &[], &[None]).is_err());
    }

    #[test]
    fn pit_stop_outside_pit_nodes_is_rejected() {
        let err = RaceDataset::new(
            &race_pars(3, vec![1], 1),
            &[],
            &[path(vec![0, 2], vec![(0.0, 2)])],
        )
        .unwrap_err();
        assert_eq!(
            err,
            DatasetError::MalformedDataset(
                "path of car 1 lists a pit stop at node 2 which is not a pit node".to_owned()
            )
        );
    }

    #[test]
    fn empty_path_and_bad_values_are_rejected() {
        let pars = race_pars(2, vec![], 1);
        assert!(RaceDataset::new(&pars, &[], &[path(vec![], vec![])]).is_err());
        assert!(RaceDataset::new(&pars, &[(0, 1, -1.0)], &[None]).is_err());

        let mut empty_tank = race_pars(2, vec![], 1);
        empty_tank.cars[0].fuel_capacity = 0.0;
        assert!(RaceDataset::new(&empty_tank, &[], &[None]).is_err());
    }

    #[test]
    fn empty_fleet_is_valid() {
        let dataset = RaceDataset::new(&race_pars(0, vec![], 0), &[], &[]).unwrap();
        assert!(dataset.fleet().is_empty());
        assert_eq!(dataset.graph().node_count, 0);
    }
}
