use helpers::general::{max, min};
use std::f64::consts::PI;

/// Physics parameters of the force-directed layout.
/// * `gravitational_constant` - Node repulsion (negative values repel)
/// * `central_gravity` - Constant pull of every node towards the origin
/// * `spring_length` - Rest length of the edge springs
/// * `spring_constant` - Stiffness of the edge springs
/// * `damping` - Velocity damping per step
/// * `timestep` - Integration step
/// * `min_velocity` - The layout is stable once every node moves slower than this
/// * `max_iterations` - The layout is frozen after this many steps in any case
#[derive(Debug, Clone)]
pub struct LayoutPars {
    pub gravitational_constant: f64,
    pub central_gravity: f64,
    pub spring_length: f64,
    pub spring_constant: f64,
    pub damping: f64,
    pub timestep: f64,
    pub min_velocity: f64,
    pub max_iterations: u32,
}

impl Default for LayoutPars {
    fn default() -> Self {
        LayoutPars {
            gravitational_constant: -2000.0,
            central_gravity: 0.3,
            spring_length: 95.0,
            spring_constant: 0.04,
            damping: 0.09,
            timestep: 0.5,
            min_velocity: 0.1,
            max_iterations: 1000,
        }
    }
}

const MAX_VELOCITY: f64 = 50.0;
const MIN_DISTANCE: f64 = 0.01;

/// GraphLayout places the nodes of the track graph in the plane. Nodes start on a circle such
/// that the result is deterministic, afterwards `step()` is called once per frame until the
/// layout has settled.
#[derive(Debug, Clone)]
pub struct GraphLayout {
    pars: LayoutPars,
    positions: Vec<[f64; 2]>,
    velocities: Vec<[f64; 2]>,
    edges: Vec<(usize, usize)>,
    no_iterations: u32,
    stabilized: bool,
}

impl GraphLayout {
    pub fn new(node_count: usize, edges: &[(usize, usize)], pars: LayoutPars) -> GraphLayout {
        let radius = pars.spring_length * (node_count as f64 / (2.0 * PI)).max(1.0);
        let positions = (0..node_count)
            .map(|i| {
                let angle = 2.0 * PI * i as f64 / node_count as f64;
                [radius * angle.cos(), radius * angle.sin()]
            })
            .collect();

        GraphLayout {
            pars,
            positions,
            velocities: vec![[0.0, 0.0]; node_count],
            // edges with unknown endpoints cannot pull anything
            edges: edges
                .iter()
                .copied()
                .filter(|&(from, to)| from < node_count && to < node_count && from != to)
                .collect(),
            no_iterations: 0,
            stabilized: false,
        }
    }

    /// step performs one integration step. It returns true exactly once, in the step the layout
    /// settles. Afterwards the layout is frozen and step() does nothing.
    pub fn step(&mut self) -> bool {
        if self.stabilized {
            return false;
        }

        let forces = self.calc_forces();

        let mut max_vel = 0.0f64;
        for (i, force) in forces.iter().enumerate() {
            for dim in 0..2 {
                let damping_force = self.pars.damping * self.velocities[i][dim];
                let acc = force[dim] - damping_force;
                let vel = (self.velocities[i][dim] + acc * self.pars.timestep)
                    .max(-MAX_VELOCITY)
                    .min(MAX_VELOCITY);
                self.velocities[i][dim] = vel;
                self.positions[i][dim] += vel * self.pars.timestep;
            }
            max_vel = max_vel.max(self.velocities[i][0].hypot(self.velocities[i][1]));
        }

        self.no_iterations += 1;
        if max_vel < self.pars.min_velocity || self.no_iterations >= self.pars.max_iterations {
            self.stabilized = true;
            self.velocities.iter_mut().for_each(|vel| *vel = [0.0, 0.0]);
            return true;
        }
        false
    }

    fn calc_forces(&self) -> Vec<[f64; 2]> {
        let no_nodes = self.positions.len();
        let mut forces = vec![[0.0, 0.0]; no_nodes];

        // central gravity
        for (force, pos) in forces.iter_mut().zip(self.positions.iter()) {
            let dist = pos[0].hypot(pos[1]);
            if dist > 0.0 {
                let gravity = self.pars.central_gravity / dist;
                force[0] -= pos[0] * gravity;
                force[1] -= pos[1] * gravity;
            }
        }

        // node repulsion
        for i in 0..no_nodes {
            for j in (i + 1)..no_nodes {
                let dx = self.positions[j][0] - self.positions[i][0];
                let dy = self.positions[j][1] - self.positions[i][1];
                let dist = dx.hypot(dy).max(MIN_DISTANCE);
                let gravity = self.pars.gravitational_constant / dist.powi(3);
                forces[i][0] += dx * gravity;
                forces[i][1] += dy * gravity;
                forces[j][0] -= dx * gravity;
                forces[j][1] -= dy * gravity;
            }
        }

        // edge springs
        for &(from, to) in self.edges.iter() {
            let dx = self.positions[from][0] - self.positions[to][0];
            let dy = self.positions[from][1] - self.positions[to][1];
            let dist = dx.hypot(dy).max(MIN_DISTANCE);
            let spring = self.pars.spring_constant * (self.pars.spring_length - dist) / dist;
            forces[from][0] += dx * spring;
            forces[from][1] += dy * spring;
            forces[to][0] -= dx * spring;
            forces[to][1] -= dy * spring;
        }

        forces
    }

    pub fn is_stabilized(&self) -> bool {
        self.stabilized
    }

    pub fn no_iterations(&self) -> u32 {
        self.no_iterations
    }

    pub fn position(&self, node: usize) -> Option<[f64; 2]> {
        self.positions.get(node).copied()
    }

    /// bounds returns [x_min, x_max, y_min, y_max] of all node positions, expanded by `margin`.
    pub fn bounds(&self, margin: f64) -> Option<[f64; 4]> {
        let xs: Vec<f64> = self.positions.iter().map(|pos| pos[0]).collect();
        let ys: Vec<f64> = self.positions.iter().map(|pos| pos[1]).collect();

        Some([
            min(&xs)? - margin,
            max(&xs)? + margin,
            min(&ys)? - margin,
            max(&ys)? + margin,
        ])
    }
}
