use crate::core::graph::Graph;
use crate::interfaces::gui_interface::RgbColor;
use anyhow::Context;

pub const BASE_NODE_COLOR: &str = "#97C2E5";
pub const PIT_NODE_COLOR: &str = "#FFA500";
pub const CAR_COLORS: [&str; 5] = ["#FF0000", "#0000FF", "#00FF00", "#FFFF00", "#FF00FF"];

pub const DEFAULT_BORDER_WIDTH: f32 = 2.0;
pub const ACTIVE_BORDER_WIDTH: f32 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub id: usize,
    pub label: String,
    pub color: RgbColor,
}

/// * `label` - Edge weight as text
/// * `arrows` - True if an arrow head is drawn at the target node
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSpec {
    pub from: usize,
    pub to: usize,
    pub label: String,
    pub arrows: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeVisual {
    pub color: RgbColor,
    pub border_width: f32,
}

/// GraphRenderer is the boundary to the layout and drawing engine. The node and edge sets are
/// fixed after `initialize`; afterwards only node visuals change (last write wins).
pub trait GraphRenderer {
    fn initialize(&mut self, nodes: Vec<NodeSpec>, edges: Vec<EdgeSpec>) -> anyhow::Result<()>;
    fn set_node_visual(&mut self, node: usize, color: RgbColor, border_width: f32)
        -> anyhow::Result<()>;
    /// poll_stabilized returns true once the layout has settled and auto-layout is frozen.
    fn poll_stabilized(&mut self) -> bool;
}

/// Palette holds the parsed colors of the playback.
#[derive(Debug, Clone)]
pub struct Palette {
    pub base: RgbColor,
    pub pit: RgbColor,
    pub cars: Vec<RgbColor>,
}

impl Palette {
    pub fn new() -> anyhow::Result<Palette> {
        let mut cars = Vec::with_capacity(CAR_COLORS.len());
        for car_color in CAR_COLORS.iter() {
            cars.push(parse_color(car_color)?);
        }

        Ok(Palette {
            base: parse_color(BASE_NODE_COLOR)?,
            pit: parse_color(PIT_NODE_COLOR)?,
            cars,
        })
    }

    /// The method returns the color of a node while no car is located at it.
    pub fn default_color(&self, graph: &Graph, node: usize) -> RgbColor {
        if graph.is_pit_node(node) {
            self.pit
        } else {
            self.base
        }
    }

    /// The method returns the color of the car at the given fleet position (colors are cycled).
    pub fn car_color(&self, fleet_idx: usize) -> RgbColor {
        if self.cars.is_empty() {
            return self.base;
        }
        self.cars[fleet_idx % self.cars.len()]
    }
}

pub fn parse_color(hex: &str) -> anyhow::Result<RgbColor> {
    let tmp_color = hex
        .parse::<css_color_parser::Color>()
        .context(format!("Could not parse hex color {}!", hex))?;

    Ok(RgbColor {
        r: tmp_color.r,
        g: tmp_color.g,
        b: tmp_color.b,
    })
}

/// build_scene creates the node and edge lists handed to the renderer. Every node gets the color
/// returned by `default_color`, every edge is labelled with its weight.
pub fn build_scene<F>(graph: &Graph, default_color: F) -> (Vec<NodeSpec>, Vec<EdgeSpec>)
where
    F: Fn(usize) -> RgbColor,
{
    let nodes = (0..graph.node_count)
        .map(|id| NodeSpec {
            id,
            label: format!("Node {}", id),
            color: default_color(id),
        })
        .collect();

    let edges = graph
        .edges
        .iter()
        .map(|edge| EdgeSpec {
            from: edge.from,
            to: edge.to,
            label: format!("{}", edge.weight),
            arrows: true,
        })
        .collect();

    (nodes, edges)
}

/// SceneRecorder is an in-memory renderer. It keeps the latest visual of every node and counts
/// the visual updates, which makes it usable for headless playback and tests.
#[derive(Debug, Default)]
pub struct SceneRecorder {
    nodes: Vec<NodeSpec>,
    edges: Vec<EdgeSpec>,
    visuals: Vec<NodeVisual>,
    stabilized: bool,
    no_updates: usize,
}

impl SceneRecorder {
    pub fn nodes(&self) -> &[NodeSpec] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeSpec] {
        &self.edges
    }

    pub fn visual(&self, node: usize) -> Option<NodeVisual> {
        self.visuals.get(node).copied()
    }

    pub fn no_updates(&self) -> usize {
        self.no_updates
    }
}

impl GraphRenderer for SceneRecorder {
    fn initialize(&mut self, nodes: Vec<NodeSpec>, edges: Vec<EdgeSpec>) -> anyhow::Result<()> {
        if !self.nodes.is_empty() {
            anyhow::bail!("Scene was already initialized!");
        }
        self.visuals = nodes
            .iter()
            .map(|node| NodeVisual {
                color: node.color,
                border_width: DEFAULT_BORDER_WIDTH,
            })
            .collect();
        self.nodes = nodes;
        self.edges = edges;
        // no physics involved, the layout is settled right away
        self.stabilized = true;
        Ok(())
    }

    fn set_node_visual(
        &mut self,
        node: usize,
        color: RgbColor,
        border_width: f32,
    ) -> anyhow::Result<()> {
        let visual = self
            .visuals
            .get_mut(node)
            .context(format!("Node {} is not part of the scene!", node))?;
        *visual = NodeVisual {
            color,
            border_width,
        };
        self.no_updates += 1;
        Ok(())
    }

    fn poll_stabilized(&mut self) -> bool {
        self.stabilized
    }
}
