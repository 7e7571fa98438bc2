use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Directory created next to the model file for interactive runs.
pub const DOWNLOADS_DIR: &str = "downloads";
pub const OUTPUT_PREFIX: &str = "neural_network_3d";
pub const PLOTLY_JS_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Cosmetic parameters of the rendered scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneStyle {
    pub title: String,
    pub axis_titles: [String; 3],
    pub neuron_color: String,
    pub neuron_size: f64,
    pub positive_color: String,
    pub non_positive_color: String,
    pub edge_width: f64,
    pub arrow_sizeref: f64,
    pub aspect_ratio: [f64; 3],
    pub camera_eye: [f64; 3],
    pub show_legend: bool,
    /// Load plotly.js from this URL instead of embedding the built-in viewer.
    pub plotly_js_src: Option<String>,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            title: "3D Neural Network Visualization".to_string(),
            axis_titles: ["Layers".to_string(), "Neurons".to_string(), "Depth".to_string()],
            neuron_color: "blue".to_string(),
            neuron_size: 10.0,
            positive_color: "red".to_string(),
            non_positive_color: "green".to_string(),
            edge_width: 1.0,
            arrow_sizeref: 0.001,
            aspect_ratio: [2.0, 1.0, 0.5],
            camera_eye: [1.5, 1.5, 0.5],
            show_legend: false,
            plotly_js_src: None,
        }
    }
}

impl SceneStyle {
    /// Reads a style override; missing fields keep their defaults.
    pub fn load_json(path: &Path) -> Result<SceneStyle> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::StyleRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| Error::StyleParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// `<model dir>/downloads/neural_network_3d_<model stem>.html`
pub fn downloads_output_path(model_path: &Path) -> PathBuf {
    let dir = model_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(DOWNLOADS_DIR);
    let stem = model_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    dir.join(format!("{OUTPUT_PREFIX}_{stem}.html"))
}
