use std::fmt;

/// NarrationLine is one status line of the playback. The order in which the kinds are emitted
/// per car is fixed, the text itself is only presentation.
#[derive(Debug, Clone, PartialEq)]
pub enum NarrationLine {
    CarHeader {
        car_no: u32,
        fuel_capacity: f64,
        tyre_cost: f64,
    },
    Summary {
        total_time: f64,
        pit_stop_nodes: Vec<usize>,
    },
    PitStop {
        node: usize,
    },
    Move {
        node: usize,
        fuel: f64,
        tyre_distance: f64,
    },
    Infeasible {
        car_no: u32,
    },
    AllCarsVisualized,
}

impl fmt::Display for NarrationLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NarrationLine::CarHeader {
                car_no,
                fuel_capacity,
                tyre_cost,
            } => write!(
                f,
                "Car {} (Fuel: {}, Tyre Cost: {})",
                car_no, fuel_capacity, tyre_cost
            ),
            NarrationLine::Summary {
                total_time,
                pit_stop_nodes,
            } => {
                write!(f, "Total Time: {}, Pit Stops: ", total_time)?;
                if pit_stop_nodes.is_empty() {
                    write!(f, "None")
                } else {
                    let tmp_nodes: Vec<String> = pit_stop_nodes
                        .iter()
                        .map(|node| format!("Node {}", node))
                        .collect();
                    write!(f, "{}", tmp_nodes.join(", "))
                }
            }
            NarrationLine::PitStop { node } => write!(
                f,
                "PIT STOP at Node {}! Fuel reset, tires changed.",
                node
            ),
            NarrationLine::Move {
                node,
                fuel,
                tyre_distance,
            } => write!(
                f,
                "Moving to Node {} (Fuel: {}, Tyre: {})",
                node, fuel, tyre_distance
            ),
            NarrationLine::Infeasible { car_no } => {
                write!(f, "Car {}: No feasible race strategy found.", car_no)
            }
            NarrationLine::AllCarsVisualized => write!(f, "All cars visualized!"),
        }
    }
}

/// NarrationSink is an append-only, ordered text surface.
pub trait NarrationSink {
    fn append(&mut self, line: &NarrationLine) -> anyhow::Result<()>;
    /// clear empties the surface before a new playback run.
    fn clear(&mut self) -> anyhow::Result<()>;
}

/// Transcript keeps all lines in memory and optionally echoes them to the console.
#[derive(Debug, Default)]
pub struct Transcript {
    lines: Vec<NarrationLine>,
    echo: bool,
}

impl Transcript {
    pub fn new(echo: bool) -> Transcript {
        Transcript {
            lines: Vec::new(),
            echo,
        }
    }

    pub fn lines(&self) -> &[NarrationLine] {
        &self.lines
    }
}

impl NarrationSink for Transcript {
    fn append(&mut self, line: &NarrationLine) -> anyhow::Result<()> {
        if self.echo {
            println!("{}", line);
        }
        self.lines.push(line.to_owned());
        Ok(())
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        self.lines.clear();
        Ok(())
    }
}
