//! Flat preview of the layout: layer index on x, centred offset on y.

use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints, Points};
use nn_visualizer_3d::{Edge, NetworkGraph, SceneStyle, scene::edge_color};

/// Edges beyond this are left out of the window; the saved file keeps them.
const PREVIEW_EDGE_LIMIT: usize = 5_000;

fn visible_edges(graph: &NetworkGraph) -> &[Edge] {
    &graph.edges[..graph.edges.len().min(PREVIEW_EDGE_LIMIT)]
}

pub fn show(ui: &mut egui::Ui, graph: &NetworkGraph, style: &SceneStyle) {
    let neuron_color = color32(&style.neuron_color);
    let edges = visible_edges(graph);
    Plot::new("layout_preview")
        .height(240.0)
        .data_aspect(1.0)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for edge in edges {
                let segment = vec![[edge.from.x, edge.from.y], [edge.to.x, edge.to.y]];
                plot_ui.line(
                    Line::new(PlotPoints::new(segment))
                        .color(color32(edge_color(style, edge.sign())))
                        .width(1.0),
                );
            }
            let neurons: Vec<[f64; 2]> = graph
                .neurons
                .iter()
                .map(|n| [n.position.x, n.position.y])
                .collect();
            plot_ui.points(
                Points::new(PlotPoints::new(neurons))
                    .radius(4.0)
                    .color(neuron_color),
            );
        });
    if edges.len() < graph.edges.len() {
        ui.label(format!(
            "Preview shows {} of {} edges; the saved file has all of them.",
            edges.len(),
            graph.edges.len()
        ));
    }
}

/// Named colours used by the scene, or `#rrggbb`; anything else is gray.
fn color32(name: &str) -> egui::Color32 {
    if let Some(hex) = name.strip_prefix('#') {
        if hex.len() == 6 {
            if let Ok(rgb) = u32::from_str_radix(hex, 16) {
                return egui::Color32::from_rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8);
            }
        }
    }
    match name.to_ascii_lowercase().as_str() {
        "red" => egui::Color32::RED,
        "green" => egui::Color32::GREEN,
        "blue" => egui::Color32::from_rgb(100, 200, 255),
        "black" => egui::Color32::BLACK,
        "white" => egui::Color32::WHITE,
        "yellow" => egui::Color32::YELLOW,
        _ => egui::Color32::GRAY,
    }
}
