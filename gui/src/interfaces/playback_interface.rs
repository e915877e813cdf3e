use flume::{Receiver, Sender};
use raceplay::core::narration::NarrationLine;
use raceplay::core::renderer::{EdgeSpec, NodeSpec, NodeVisual, DEFAULT_BORDER_WIDTH};
use raceplay::interfaces::gui_interface::GuiMessage;

/// ViewState is the GUI-side copy of everything the playback has drawn or narrated so far.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub nodes: Vec<NodeSpec>,
    pub edges: Vec<EdgeSpec>,
    pub visuals: Vec<NodeVisual>,
    pub narration: Vec<String>,
    /// Incremented with every received scene such that the layout can be rebuilt
    pub scene_version: u32,
    pub finished: bool,
}

impl ViewState {
    /// has_scene returns true once the playback has sent its scene, even if the graph is empty.
    pub fn has_scene(&self) -> bool {
        self.scene_version > 0
    }
}

#[derive(Debug)]
pub struct PlaybackInterface {
    pub rx: Receiver<GuiMessage>,
    pub stabilized_tx: Sender<()>,
    pub view_state: ViewState,
    stabilized_sent: bool,
}

impl PlaybackInterface {
    pub fn new(rx: Receiver<GuiMessage>, stabilized_tx: Sender<()>) -> PlaybackInterface {
        PlaybackInterface {
            rx,
            stabilized_tx,
            view_state: Default::default(),
            stabilized_sent: false,
        }
    }

    /// update applies all messages that arrived since the last call to the view state.
    pub fn update(&mut self) {
        for msg in self.rx.try_iter() {
            match msg {
                GuiMessage::InitScene { nodes, edges } => {
                    self.view_state.visuals = nodes
                        .iter()
                        .map(|node| NodeVisual {
                            color: node.color,
                            border_width: DEFAULT_BORDER_WIDTH,
                        })
                        .collect();
                    self.view_state.nodes = nodes;
                    self.view_state.edges = edges;
                    self.view_state.scene_version += 1;
                    self.stabilized_sent = false;
                }
                GuiMessage::NodeVisual { node, visual } => {
                    match self.view_state.visuals.get_mut(node) {
                        Some(tmp_visual) => *tmp_visual = visual,
                        None => eprintln!("WARNING: Received visual for unknown node {}!", node),
                    }
                }
                GuiMessage::Narration(line) => {
                    if line == NarrationLine::AllCarsVisualized {
                        self.view_state.finished = true;
                    }
                    self.view_state.narration.push(line.to_string());
                }
                GuiMessage::ClearNarration => {
                    self.view_state.narration.clear();
                    self.view_state.finished = false;
                }
            }
        }
    }

    /// notify_stabilized tells the playback once per scene that the layout has settled.
    pub fn notify_stabilized(&mut self) {
        if self.stabilized_sent {
            return;
        }
        if self.stabilized_tx.send(()).is_err() {
            eprintln!("WARNING: Playback is not listening for the layout state anymore!");
        }
        self.stabilized_sent = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raceplay::interfaces::gui_interface::RgbColor;

    fn node(id: usize) -> NodeSpec {
        NodeSpec {
            id,
            label: format!("Node {}", id),
            color: RgbColor {
                r: 151,
                g: 194,
                b: 229,
            },
        }
    }

    #[test]
    fn messages_are_applied_to_view_state() {
        let (tx, rx) = flume::unbounded();
        let (stabilized_tx, _stabilized_rx) = flume::unbounded();
        let mut interface = PlaybackInterface::new(rx, stabilized_tx);

        tx.send(GuiMessage::InitScene {
            nodes: vec![node(0), node(1)],
            edges: vec![],
        })
        .unwrap();
        tx.send(GuiMessage::NodeVisual {
            node: 1,
            visual: NodeVisual {
                color: RgbColor { r: 255, g: 0, b: 0 },
                border_width: 5.0,
            },
        })
        .unwrap();
        tx.send(GuiMessage::Narration(NarrationLine::PitStop { node: 1 }))
            .unwrap();
        interface.update();

        let view_state = &interface.view_state;
        assert_eq!(view_state.scene_version, 1);
        assert_eq!(view_state.visuals[0].border_width, DEFAULT_BORDER_WIDTH);
        assert_eq!(view_state.visuals[1].color, RgbColor { r: 255, g: 0, b: 0 });
        assert_eq!(
            view_state.narration,
            vec!["PIT STOP at Node 1! Fuel reset, tires changed."]
        );
        assert!(!view_state.finished);

        tx.send(GuiMessage::Narration(NarrationLine::AllCarsVisualized))
            .unwrap();
        interface.update();
        assert!(interface.view_state.finished);

        tx.send(GuiMessage::ClearNarration).unwrap();
        interface.update();
        assert!(interface.view_state.narration.is_empty());
        assert!(!interface.view_state.finished);
    }

    #[test]
    fn empty_scene_still_shows_narration() {
        let (tx, rx) = flume::unbounded();
        let (stabilized_tx, _stabilized_rx) = flume::unbounded();
        let mut interface = PlaybackInterface::new(rx, stabilized_tx);
        assert!(!interface.view_state.has_scene());

        tx.send(GuiMessage::InitScene {
            nodes: vec![],
            edges: vec![],
        })
        .unwrap();
        tx.send(GuiMessage::Narration(NarrationLine::AllCarsVisualized))
            .unwrap();
        interface.update();

        assert!(interface.view_state.has_scene());
        assert!(interface.view_state.finished);
        assert_eq!(interface.view_state.narration, vec!["All cars visualized!"]);
    }

    #[test]
    fn stabilization_is_sent_once_per_scene() {
        let (tx, rx) = flume::unbounded();
        let (stabilized_tx, stabilized_rx) = flume::unbounded();
        let mut interface = PlaybackInterface::new(rx, stabilized_tx);

        interface.notify_stabilized();
        interface.notify_stabilized();
        assert_eq!(stabilized_rx.try_iter().count(), 1);

        tx.send(GuiMessage::InitScene {
            nodes: vec![node(0)],
            edges: vec![],
        })
        .unwrap();
        interface.update();
        interface.notify_stabilized();
        assert_eq!(stabilized_rx.try_iter().count(), 1);
    }
}
