pub mod config;
pub mod demo;
pub mod error;
pub mod graph;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod scene;

pub use config::SceneStyle;
pub use error::{Error, Result};
pub use graph::{Edge, LayerRef, NetworkGraph, Neuron, Position, Sign};
pub use loader::{FileModelLoader, ModelLoader};
pub use model::{LayerDescriptor, LayerKind, ModelInfo};
pub use pipeline::{Outcome, Visualizer, status_message};
pub use render::{HtmlRenderer, Renderer};
pub use scene::Scene;
