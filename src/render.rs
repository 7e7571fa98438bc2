//! HTML output.
//!
//! The figure is built as plotly.js-shaped JSON. By default the page inlines
//! a small canvas viewer that draws that figure, so the file opens offline.
//! When the style names a plotly.js URL the page loads it and hands the same
//! figure to `Plotly.newPlot`. Both templates are embedded at compile time
//! and carry `{{TOKEN}}` placeholders.

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde_json::{Value, json};

use crate::error::Result;
use crate::graph::Position;
use crate::scene::Scene;

const TEMPLATE: &str = include_str!("assets/scene.html");
const PLOTLY_TEMPLATE: &str = include_str!("assets/scene_plotly.html");
const VIEWER_JS: &str = include_str!("assets/viewer.js");

/// Serializes an assembled scene into a standalone document.
pub trait Renderer {
    fn render(&self, scene: &Scene) -> Result<String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, scene: &Scene) -> Result<String> {
        let data = script_json(&Value::Array(traces(scene)))?;
        let layout = script_json(&layout(scene))?;
        let div_id = random_div_id();

        let title = escape_html(&scene.style.title);
        let html = match &scene.style.plotly_js_src {
            Some(src) => {
                let src = escape_html(src);
                fill_template(
                    PLOTLY_TEMPLATE,
                    &[
                        ("TITLE", title.as_str()),
                        ("PLOTLY_SRC", src.as_str()),
                        ("DIV_ID", div_id.as_str()),
                        ("LAYOUT", layout.as_str()),
                        ("DATA", data.as_str()),
                    ],
                )
            }
            None => fill_template(
                TEMPLATE,
                &[
                    ("TITLE", title.as_str()),
                    ("VIEWER_JS", VIEWER_JS),
                    ("DIV_ID", div_id.as_str()),
                    ("LAYOUT", layout.as_str()),
                    ("DATA", data.as_str()),
                ],
            ),
        };
        Ok(html)
    }
}

/// Replaces each `{{KEY}}` in one left-to-right pass. Substituted text is
/// never rescanned; unknown keys are left as written.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let replaced = after.find("}}").and_then(|end| {
            let key = &after[..end];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, end))
        });
        match replaced {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn random_div_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();
    format!("nn-scene-{suffix}")
}

/// Markers, then edge lines, then one cone per arrow.
pub fn traces(scene: &Scene) -> Vec<Value> {
    let neurons = &scene.neurons;
    let mut traces = Vec::with_capacity(2 + scene.arrows.len());
    traces.push(json!({
        "type": "scatter3d",
        "mode": "markers",
        "x": neurons.positions.iter().map(|p| p.x).collect::<Vec<_>>(),
        "y": neurons.positions.iter().map(|p| p.y).collect::<Vec<_>>(),
        "z": neurons.positions.iter().map(|p| p.z).collect::<Vec<_>>(),
        "marker": { "size": neurons.size, "color": neurons.color },
        "hoverinfo": "none",
    }));

    let axis = |f: fn(&Position) -> f64| -> Vec<Option<f64>> {
        scene.edges.vertices.iter().map(|v| v.as_ref().map(f)).collect()
    };
    traces.push(json!({
        "type": "scatter3d",
        "mode": "lines",
        "x": axis(|p| p.x),
        "y": axis(|p| p.y),
        "z": axis(|p| p.z),
        "line": { "color": scene.edges.colors, "width": scene.edges.width },
        "hoverinfo": "none",
    }));

    for arrow in &scene.arrows {
        traces.push(json!({
            "type": "cone",
            "x": [arrow.at.x],
            "y": [arrow.at.y],
            "z": [arrow.at.z],
            "u": [arrow.direction.x],
            "v": [arrow.direction.y],
            "w": [arrow.direction.z],
            "sizemode": "absolute",
            "sizeref": scene.style.arrow_sizeref,
            "showscale": false,
            "colorscale": [[0, arrow.color], [1, arrow.color]],
        }));
    }
    traces
}

pub fn layout(scene: &Scene) -> Value {
    let style = &scene.style;
    let [x_title, y_title, z_title] = &style.axis_titles;
    let [ax, ay, az] = style.aspect_ratio;
    let [ex, ey, ez] = style.camera_eye;
    json!({
        "title": { "text": style.title },
        "scene": {
            "xaxis": { "title": { "text": x_title }, "tickmode": "linear", "dtick": 1 },
            "yaxis": { "title": { "text": y_title } },
            "zaxis": { "title": { "text": z_title } },
            "aspectmode": "manual",
            "aspectratio": { "x": ax, "y": ay, "z": az },
            "camera": { "eye": { "x": ex, "y": ey, "z": ez } },
        },
        "showlegend": style.show_legend,
    })
}

/// JSON safe to inline inside a `<script>` element.
fn script_json(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneStyle;
    use crate::graph;
    use crate::model::{LayerDescriptor, LayerKind};

    fn scene() -> Scene {
        let descriptors = vec![
            LayerDescriptor {
                index: 0,
                kind: LayerKind::Dense,
                neuron_count: Some(2),
                incoming_weights: None,
            },
            LayerDescriptor {
                index: 1,
                kind: LayerKind::Dense,
                neuron_count: Some(2),
                incoming_weights: Some(vec![vec![1.0, -1.0], vec![0.0, 2.0]]),
            },
        ];
        let graph = graph::build(&descriptors).unwrap().unwrap();
        Scene::assemble(&graph, &SceneStyle::default())
    }

    #[test]
    fn figure_has_markers_lines_and_cones() {
        let traces = traces(&scene());
        assert_eq!(traces.len(), 2 + 4);
        assert_eq!(traces[0]["mode"], "markers");
        assert_eq!(traces[1]["mode"], "lines");
        assert_eq!(traces[1]["x"].as_array().unwrap().len(), 12);
        assert!(traces[1]["x"][2].is_null());
        assert!(traces[2..].iter().all(|t| t["type"] == "cone"));
        assert_eq!(traces[2]["colorscale"][0][1], "red");
        assert_eq!(traces[3]["colorscale"][0][1], "green");
        assert_eq!(traces[2]["u"][0], 1.0);
    }

    #[test]
    fn layout_carries_fixed_cosmetics() {
        let layout = layout(&scene());
        assert_eq!(layout["scene"]["xaxis"]["title"]["text"], "Layers");
        assert_eq!(layout["scene"]["yaxis"]["title"]["text"], "Neurons");
        assert_eq!(layout["scene"]["zaxis"]["title"]["text"], "Depth");
        assert_eq!(layout["scene"]["aspectratio"]["x"], 2.0);
        assert_eq!(layout["scene"]["camera"]["eye"]["z"], 0.5);
        assert_eq!(layout["showlegend"], false);
    }

    #[test]
    fn default_page_is_self_contained() {
        let html = HtmlRenderer.render(&scene()).unwrap();
        assert!(!html.contains("{{"));
        assert!(!html.contains("src="));
        assert!(!html.contains("Plotly"));
        assert!(html.contains("window.renderNnScene = renderNnScene"));
        assert!(html.contains("renderNnScene(\"nn-scene-"));
        assert!(html.contains("<title>3D Neural Network Visualization</title>"));
    }

    #[test]
    fn plotly_url_switches_to_the_cdn_page() {
        let mut scene = scene();
        scene.style.plotly_js_src = Some(crate::config::PLOTLY_JS_CDN.to_string());
        let html = HtmlRenderer.render(&scene).unwrap();
        assert!(!html.contains("{{"));
        assert!(html.contains("<script src=\"https://cdn.plot.ly/plotly-2.35.2.min.js\""));
        assert!(html.contains("Plotly.newPlot(\"nn-scene-"));
        assert!(!html.contains("renderNnScene"));
    }

    #[test]
    fn title_tokens_are_not_expanded() {
        let mut scene = scene();
        scene.style.title = "{{DATA}} {{DIV_ID}}".to_string();
        let html = HtmlRenderer.render(&scene).unwrap();
        assert!(html.contains("<title>{{DATA}} {{DIV_ID}}</title>"));
        assert_eq!(html.matches("\"type\":\"cone\"").count(), 4);
    }

    #[test]
    fn fill_template_is_single_pass() {
        let out = fill_template(
            "{{A}}-{{B}}-{{C}}-{{",
            &[("A", "{{B}}"), ("B", "b")],
        );
        assert_eq!(out, "{{B}}-b-{{C}}-{{");
    }

    #[test]
    fn title_cannot_break_out_of_the_page() {
        let mut scene = scene();
        scene.style.title = "</script><b>".to_string();
        let html = HtmlRenderer.render(&scene).unwrap();
        assert!(html.contains("<title>&lt;/script&gt;&lt;b&gt;</title>"));
        assert_eq!(html.matches("</script>").count(), 2);
    }
}
