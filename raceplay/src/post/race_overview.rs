use crate::core::car::Car;
use crate::core::graph::Graph;
use crate::core::path_result::PathResult;
use crate::core::race_dataset::RaceDataset;
use std::fmt::Write;

/// format_track_overview returns the layout of the track (connections of every node, pit nodes)
/// and the configurations of all cars as text.
pub fn format_track_overview(dataset: &RaceDataset) -> anyhow::Result<String> {
    let graph = dataset.graph();
    let mut content = String::new();

    writeln!(&mut content, "=== TRACK OVERVIEW ===")?;
    writeln!(
        &mut content,
        "Track: {} nodes, {} edges, {} pit nodes",
        graph.node_count,
        graph.edges.len(),
        graph.pit_nodes.len()
    )?;

    writeln!(&mut content, "Track Layout:")?;
    for node in 0..graph.node_count {
        let connections: Vec<String> = graph
            .outgoing(node)
            .map(|edge| format!("{} (dist:{})", node_label(graph, edge.to), edge.weight))
            .collect();
        if connections.is_empty() {
            writeln!(&mut content, "  Node {}: DEAD END", node_label(graph, node))?;
        } else {
            writeln!(
                &mut content,
                "  Node {}: {}",
                node_label(graph, node),
                connections.join(" -> ")
            )?;
        }
    }

    if !graph.pit_nodes.is_empty() {
        writeln!(&mut content, "Pit Stop Locations:")?;
        for pit_node in graph.pit_nodes.iter() {
            writeln!(
                &mut content,
                "  Node {}: [PIT] - refuel and change tires",
                pit_node
            )?;
        }
    }

    writeln!(&mut content, "Car Configurations:")?;
    for car in dataset.fleet().iter() {
        writeln!(
            &mut content,
            "  Car {}: Fuel={}, Tyre Cost={}",
            car.car_no, car.fuel_capacity, car.tyre_cost
        )?;
    }

    Ok(content)
}

/// format_race_strategy returns the strategy of a car as text, pit nodes in the path are marked
/// with a leading P.
pub fn format_race_strategy(
    car: &Car,
    path: Option<&PathResult>,
    graph: &Graph,
) -> anyhow::Result<String> {
    let mut content = String::new();
    writeln!(&mut content, "=== CAR {} RACE STRATEGY ===", car.car_no)?;

    let path = match path {
        Some(path) => path,
        None => {
            writeln!(&mut content, "No feasible race strategy found.")?;
            return Ok(content);
        }
    };

    writeln!(&mut content, "Total Race Time: {} units", path.total_time)?;
    if path.pit_stops.is_empty() {
        writeln!(&mut content, "Pit Stops: None")?;
    } else {
        writeln!(&mut content, "Pit Stops:")?;
        for entry in path.pit_stops.iter() {
            writeln!(
                &mut content,
                "  Lap {} at Node {} (PIT)",
                entry.marker, entry.node
            )?;
        }
    }

    let tmp_nodes: Vec<String> = path
        .node_sequence
        .iter()
        .map(|&node| format!("[{}]", node_label(graph, node)))
        .collect();
    writeln!(&mut content, "Race Path: {}", tmp_nodes.join(" -> "))?;

    Ok(content)
}

fn node_label(graph: &Graph, node: usize) -> String {
    if graph.is_pit_node(node) {
        format!("P{}", node)
    } else {
        node.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pre::read_race_data::parse_race_data;

    fn dataset() -> RaceDataset {
        parse_race_data(
            r#"{
                "race_data": {"n": 3, "pit_nodes": [1], "cars": [{"fuel_capacity": 8, "tyre_cost": 1}]},
                "graph_edges": [[0, 1, 5], [1, 2, 5]],
                "optimal_paths": [{"total_time": 10, "pit_stops": [[0, 1]], "node_sequence": [0, 1, 2]}]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn overview_lists_connections_and_cars() {
        let text = format_track_overview(&dataset()).unwrap();
        assert!(text.contains("Track: 3 nodes, 2 edges, 1 pit nodes"));
        assert!(text.contains("  Node 0: P1 (dist:5)"));
        assert!(text.contains("  Node 2: DEAD END"));
        assert!(text.contains("  Node 1: [PIT] - refuel and change tires"));
        assert!(text.contains("  Car 1: Fuel=8, Tyre Cost=1"));
    }

    #[test]
    fn strategy_marks_pit_nodes() {
        let dataset = dataset();
        let text = format_race_strategy(
            &dataset.fleet()[0],
            dataset.path_result(0),
            dataset.graph(),
        )
        .unwrap();
        assert!(text.contains("Total Race Time: 10 units"));
        assert!(text.contains("  Lap 0 at Node 1 (PIT)"));
        assert!(text.contains("Race Path: [0] -> [P1] -> [2]"));
    }

    #[test]
    fn strategy_of_infeasible_car() {
        let dataset = dataset();
        let text = format_race_strategy(&dataset.fleet()[0], None, dataset.graph()).unwrap();
        assert!(text.ends_with("No feasible race strategy found.\n"));
    }
}
