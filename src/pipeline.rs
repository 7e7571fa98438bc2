use std::path::{Path, PathBuf};

use crate::config::{SceneStyle, downloads_output_path};
use crate::error::{Error, Result};
use crate::graph::{self, NetworkGraph};
use crate::loader::{FileModelLoader, ModelLoader};
use crate::render::{HtmlRenderer, Renderer};
use crate::scene::Scene;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Written { path: PathBuf, graph: NetworkGraph },
    /// The model has no layer with a neuron count; nothing was written.
    NothingToVisualize,
}

/// Load, lay out, render and write, in one synchronous call.
pub struct Visualizer<L = FileModelLoader, R = HtmlRenderer> {
    pub loader: L,
    pub renderer: R,
    pub style: SceneStyle,
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new(FileModelLoader, HtmlRenderer, SceneStyle::default())
    }
}

impl<L: ModelLoader, R: Renderer> Visualizer<L, R> {
    pub fn new(loader: L, renderer: R, style: SceneStyle) -> Self {
        Self {
            loader,
            renderer,
            style,
        }
    }

    pub fn visualize(&self, model_path: &Path, output_path: &Path) -> Result<Outcome> {
        tracing::info!(model = %model_path.display(), "loading model");
        let descriptors = self.loader.load(model_path)?;

        let Some(graph) = graph::build(&descriptors)? else {
            tracing::warn!(
                model = %model_path.display(),
                layers = descriptors.len(),
                "no suitable layers found for visualization"
            );
            return Ok(Outcome::NothingToVisualize);
        };

        let scene = Scene::assemble(&graph, &self.style);
        let document = self.renderer.render(&scene)?;
        write_document(output_path, &document)?;
        tracing::info!(
            output = %output_path.display(),
            neurons = graph.neurons.len(),
            edges = graph.edges.len(),
            "visualization saved"
        );
        Ok(Outcome::Written {
            path: output_path.to_path_buf(),
            graph,
        })
    }

    /// Writes to `<model dir>/downloads/`, the layout the window uses.
    pub fn visualize_to_downloads(&self, model_path: &Path) -> Result<Outcome> {
        self.visualize(model_path, &downloads_output_path(model_path))
    }
}

fn write_document(path: &Path, document: &str) -> Result<()> {
    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(write_err)?;
    }
    std::fs::write(path, document).map_err(write_err)
}

/// One-line status for a finished run.
pub fn status_message(result: &Result<Outcome>) -> String {
    match result {
        Ok(Outcome::Written { path, .. }) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            format!("Visualization saved: {name}")
        }
        Ok(Outcome::NothingToVisualize) => "No suitable layers found for visualization.".to_string(),
        Err(err) => format!("Error: {err}"),
    }
}
