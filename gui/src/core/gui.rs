use crate::core::layout::{GraphLayout, LayoutPars};
use crate::interfaces::playback_interface::PlaybackInterface;
use eframe::{egui, epi};
use flume::{Receiver, Sender};
use helpers::buffer::RingBuffer;
use raceplay::interfaces::gui_interface::{GuiMessage, RgbColor};
use std::time::Instant;

const NODE_RADIUS: f32 = 18.0;
const ARROW_LENGTH: f32 = 10.0;

fn to_color32(color: RgbColor) -> egui::Color32 {
    egui::Color32::from_rgb(color.r, color.g, color.b)
}

#[derive(Debug)]
pub struct GraphPlot {
    pub playback_interface: PlaybackInterface,
    pub layout: Option<GraphLayout>,
    pub layout_version: u32,
    pub prev_update: Instant,
    pub prev_update_durations: RingBuffer<u32>,
}

impl GraphPlot {
    pub fn new(rx: Receiver<GuiMessage>, stabilized_tx: Sender<()>) -> GraphPlot {
        GraphPlot {
            playback_interface: PlaybackInterface::new(rx, stabilized_tx),
            layout: None,
            layout_version: 0,
            prev_update: Instant::now(),
            prev_update_durations: RingBuffer::new(10),
        }
    }

    /// update_layout rebuilds the layout if a new scene arrived and advances it by one step
    /// until it has settled.
    fn update_layout(&mut self) {
        let view_state = &self.playback_interface.view_state;

        if view_state.scene_version != self.layout_version {
            let edges: Vec<(usize, usize)> = view_state
                .edges
                .iter()
                .map(|edge| (edge.from, edge.to))
                .collect();
            self.layout = Some(GraphLayout::new(
                view_state.nodes.len(),
                &edges,
                LayoutPars::default(),
            ));
            self.layout_version = view_state.scene_version;
        }

        let stabilized = match self.layout.as_mut() {
            Some(layout) => layout.step(),
            None => false,
        };
        if stabilized {
            self.playback_interface.notify_stabilized();
        }
    }

    pub fn set_ui_content(&mut self, ui: &mut egui::Ui) -> egui::Response {
        // PREPARATIONS ----------------------------------------------------------------------------
        let (response, painter) =
            ui.allocate_painter(ui.available_size_before_wrap_finite(), egui::Sense::hover());

        let layout = match &self.layout {
            Some(layout) => layout,
            None => return response,
        };
        let [x_min, x_max, y_min, y_max] = match layout.bounds(2.0 * NODE_RADIUS as f64) {
            Some(bounds) => bounds,
            None => return response,
        };

        // keep the aspect ratio of the layout
        let layout_width = (x_max - x_min).abs() as f32;
        let layout_height = (y_max - y_min).abs() as f32;
        let layout_aspect = if layout_height != 0.0 {
            layout_width / layout_height
        } else {
            1.0
        };
        let screen_width = response.rect.width();
        let screen_height = response.rect.height();

        let dest_rect = if screen_width / screen_height > layout_aspect {
            let new_width = screen_height * layout_aspect;
            egui::Rect::from_min_size(
                egui::Pos2::new(
                    response.rect.min.x + (screen_width - new_width) / 2.0,
                    response.rect.min.y,
                ),
                egui::Vec2::new(new_width, screen_height),
            )
        } else {
            let new_height = screen_width / layout_aspect;
            egui::Rect::from_min_size(
                egui::Pos2::new(
                    response.rect.min.x,
                    response.rect.min.y + (screen_height - new_height) / 2.0,
                ),
                egui::Vec2::new(screen_width, new_height),
            )
        };

        let to_screen = egui::emath::RectTransform::from_to(
            egui::Rect::from_min_max(
                egui::Pos2::new(x_min as f32, y_min as f32),
                egui::Pos2::new(x_max as f32, y_max as f32),
            ),
            dest_rect,
        );
        let node_pos = |node: usize| -> Option<egui::Pos2> {
            let pos = layout.position(node)?;
            Some(to_screen * egui::Pos2::new(pos[0] as f32, pos[1] as f32))
        };

        let view_state = &self.playback_interface.view_state;
        let mut shapes = vec![];

        // EDGES DRAWING ---------------------------------------------------------------------------
        let edge_color = egui::Color32::from_gray(160);

        for edge in view_state.edges.iter() {
            let (p_from, p_to) = match (node_pos(edge.from), node_pos(edge.to)) {
                (Some(p_from), Some(p_to)) => (p_from, p_to),
                _ => continue,
            };
            if (p_to - p_from).length() < 1e-3 {
                continue;
            }
            let dir = (p_to - p_from).normalized();
            let p_start = p_from + dir * NODE_RADIUS;
            let p_end = p_to - dir * NODE_RADIUS;

            shapes.push(egui::Shape::line_segment(
                [p_start, p_end],
                egui::Stroke::new(1.5, edge_color),
            ));

            if edge.arrows {
                let p_base = p_end - dir * ARROW_LENGTH;
                let normal = dir.rot90() * (ARROW_LENGTH / 2.0);
                shapes.push(egui::Shape::convex_polygon(
                    vec![p_end, p_base + normal, p_base - normal],
                    edge_color,
                    egui::Stroke::none(),
                ));
            }

            shapes.push(egui::Shape::text(
                ui.fonts(),
                p_start + (p_end - p_start) * 0.5,
                egui::Align2::CENTER_BOTTOM,
                &edge.label,
                egui::TextStyle::Small,
                egui::Color32::WHITE,
            ));
        }

        // NODES DRAWING ---------------------------------------------------------------------------
        for (node, visual) in view_state.nodes.iter().zip(view_state.visuals.iter()) {
            let pos = match node_pos(node.id) {
                Some(pos) => pos,
                None => continue,
            };

            shapes.push(egui::Shape::circle_filled(
                pos,
                NODE_RADIUS,
                to_color32(visual.color),
            ));
            shapes.push(egui::Shape::circle_stroke(
                pos,
                NODE_RADIUS,
                egui::Stroke::new(visual.border_width, egui::Color32::from_gray(40)),
            ));
            shapes.push(egui::Shape::text(
                ui.fonts(),
                pos,
                egui::Align2::CENTER_CENTER,
                &node.label,
                egui::TextStyle::Small,
                egui::Color32::BLACK,
            ));
        }

        // UPDATE GENERAL INFORMATION TEXT IN GUI --------------------------------------------------
        // calculate current UI update duration, append it to the buffer, and set update time
        self.prev_update_durations
            .push(self.prev_update.elapsed().as_millis() as u32);
        self.prev_update = Instant::now();

        let mut gen_info_text = if layout.is_stabilized() {
            String::from("Layout: stable\n")
        } else {
            format!("Layout: settling ({} iterations)\n", layout.no_iterations())
        };
        if let Some(avg_duration) = self.prev_update_durations.get_avg() {
            if avg_duration > 0.0 {
                gen_info_text.push_str(&format!(
                    "GUI update frequency: {:.0} Hz",
                    1000.0 / avg_duration
                ));
            }
        }

        shapes.push(egui::Shape::text(
            ui.fonts(),
            response.rect.min + egui::Vec2::new(10.0, 10.0),
            egui::Align2::LEFT_TOP,
            &gen_info_text,
            egui::TextStyle::Body,
            egui::Color32::WHITE,
        ));

        // DRAWING ---------------------------------------------------------------------------------
        painter.extend(shapes);
        response
    }

    fn set_narration_content(&self, ui: &mut egui::Ui) {
        let view_state = &self.playback_interface.view_state;

        ui.heading("Race Narration");
        ui.separator();
        if !view_state.has_scene() {
            ui.label("Waiting for race data...");
            return;
        }

        egui::ScrollArea::auto_sized().show(ui, |ui| {
            for line in view_state.narration.iter() {
                ui.label(line);
            }
        });

        if view_state.finished {
            ui.separator();
            ui.heading("Playback finished");
        }
    }
}

impl epi::App for GraphPlot {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::CtxRef, _frame: &mut epi::Frame) {
        // update playback interface and layout
        self.playback_interface.update();
        self.update_layout();

        egui::SidePanel::right("narration_panel")
            .default_width(320.0)
            .show(ctx, |ui| {
                self.set_narration_content(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Frame::dark_canvas(ui.style()).show(ui, |ui| {
                self.set_ui_content(ui);
            });
        });

        // request repaint of the UI
        ctx.request_repaint();
    }

    fn name(&self) -> &str {
        "Race Strategy Playback"
    }
}
