use crate::core::narration::{NarrationLine, NarrationSink};
use crate::core::renderer::{EdgeSpec, GraphRenderer, NodeSpec, NodeVisual};
use anyhow::Context;
use flume::{Receiver, Sender};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// GuiMessage is sent from the playback thread to the GUI.
#[derive(Debug, Clone)]
pub enum GuiMessage {
    InitScene {
        nodes: Vec<NodeSpec>,
        edges: Vec<EdgeSpec>,
    },
    NodeVisual {
        node: usize,
        visual: NodeVisual,
    },
    Narration(NarrationLine),
    ClearNarration,
}

/// GuiLink forwards renderer and narration calls of the playback to the GUI thread. The GUI
/// answers once on `stabilized_rx` when its layout has settled.
#[derive(Debug, Clone)]
pub struct GuiLink {
    tx: Sender<GuiMessage>,
    stabilized_rx: Receiver<()>,
    stabilized: bool,
}

impl GuiLink {
    pub fn new(tx: Sender<GuiMessage>, stabilized_rx: Receiver<()>) -> GuiLink {
        GuiLink {
            tx,
            stabilized_rx,
            stabilized: false,
        }
    }

    fn send(&self, msg: GuiMessage) -> anyhow::Result<()> {
        self.tx
            .send(msg)
            .context("Failed to send playback state to GUI!")
    }
}

impl GraphRenderer for GuiLink {
    fn initialize(&mut self, nodes: Vec<NodeSpec>, edges: Vec<EdgeSpec>) -> anyhow::Result<()> {
        self.send(GuiMessage::InitScene { nodes, edges })
    }

    fn set_node_visual(
        &mut self,
        node: usize,
        color: RgbColor,
        border_width: f32,
    ) -> anyhow::Result<()> {
        self.send(GuiMessage::NodeVisual {
            node,
            visual: NodeVisual {
                color,
                border_width,
            },
        })
    }

    fn poll_stabilized(&mut self) -> bool {
        if !self.stabilized && self.stabilized_rx.try_recv().is_ok() {
            self.stabilized = true;
        }
        self.stabilized
    }
}

impl NarrationSink for GuiLink {
    fn append(&mut self, line: &NarrationLine) -> anyhow::Result<()> {
        self.send(GuiMessage::Narration(line.to_owned()))
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        self.send(GuiMessage::ClearNarration)
    }
}
