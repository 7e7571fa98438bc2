use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// `weights[from][to]`: rows are the previous layer's neurons.
pub type WeightMatrix = Vec<Vec<f32>>;

/// One layer as written in a native model file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LayerInfo {
    #[serde(rename = "type")]
    pub layer_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_dim: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dim: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<WeightMatrix>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ModelInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub layers: Vec<LayerInfo>,
}

impl ModelInfo {
    /// Serializes the model to a pretty-printed JSON file.
    pub fn save_json(&self, path: &std::path::Path) -> Result<()> {
        let body = serde_json::to_string_pretty(self)?;
        std::fs::write(path, body).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Architecture JSON as produced by Keras' `model.to_json()`.
#[derive(Debug, Deserialize, Clone)]
pub struct KerasModel {
    pub class_name: String,
    pub config: KerasModelConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KerasModelConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub layers: Vec<KerasLayer>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KerasLayer {
    pub class_name: String,
    #[serde(default)]
    pub config: serde_json::Value,
}

/// Either dialect a model file may be written in.
#[derive(Debug, Clone)]
pub enum ModelDocument {
    Native(ModelInfo),
    Keras(KerasModel),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerKind {
    Dense,
    Other(String),
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerKind::Dense => f.write_str("Dense"),
            LayerKind::Other(name) => f.write_str(name),
        }
    }
}

/// A layer of the loaded model, classified once at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerDescriptor {
    pub index: usize,
    pub kind: LayerKind,
    /// `None` for layers without a countable neuron set.
    pub neuron_count: Option<usize>,
    pub incoming_weights: Option<WeightMatrix>,
}

fn is_dense(layer_type: &str) -> bool {
    layer_type.eq_ignore_ascii_case("dense") || layer_type.eq_ignore_ascii_case("linear")
}

impl ModelDocument {
    /// Keras documents carry a top-level `class_name`; anything else is read
    /// as the native dialect, so its own field errors come through.
    pub fn from_value(value: serde_json::Value) -> serde_json::Result<ModelDocument> {
        if value.get("class_name").is_some() {
            serde_json::from_value(value).map(ModelDocument::Keras)
        } else {
            serde_json::from_value(value).map(ModelDocument::Native)
        }
    }

    pub fn from_json_str(text: &str) -> serde_json::Result<ModelDocument> {
        Self::from_value(serde_json::from_str(text)?)
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            ModelDocument::Native(info) => info.name.as_deref(),
            ModelDocument::Keras(model) => model.config.name.as_deref(),
        }
    }

    /// Flattens the document into descriptors in model order.
    pub fn into_descriptors(self) -> Result<Vec<LayerDescriptor>> {
        match self {
            ModelDocument::Native(info) => info
                .layers
                .into_iter()
                .enumerate()
                .map(|(index, layer)| native_descriptor(index, layer))
                .collect(),
            ModelDocument::Keras(model) => model
                .config
                .layers
                .into_iter()
                // Keras lists the input placeholder in the config but not in `model.layers`.
                .filter(|layer| layer.class_name != "InputLayer")
                .enumerate()
                .map(|(index, layer)| keras_descriptor(index, layer))
                .collect(),
        }
    }
}

fn native_descriptor(index: usize, layer: LayerInfo) -> Result<LayerDescriptor> {
    if !is_dense(&layer.layer_type) {
        return Ok(LayerDescriptor {
            index,
            kind: LayerKind::Other(layer.layer_type),
            neuron_count: None,
            incoming_weights: None,
        });
    }
    let neuron_count = layer.output_dim.ok_or_else(|| Error::MissingUnits {
        index,
        kind: layer.layer_type.clone(),
    })?;
    Ok(LayerDescriptor {
        index,
        kind: LayerKind::Dense,
        neuron_count: Some(neuron_count),
        incoming_weights: layer.weights,
    })
}

/// Any layer whose config has `units` is countable; a `Dense` without it is
/// malformed, as in the native dialect.
fn keras_descriptor(index: usize, layer: KerasLayer) -> Result<LayerDescriptor> {
    let neuron_count = layer
        .config
        .get("units")
        .and_then(serde_json::Value::as_u64)
        .map(|units| units as usize);
    let kind = if is_dense(&layer.class_name) {
        if neuron_count.is_none() {
            return Err(Error::MissingUnits {
                index,
                kind: layer.class_name,
            });
        }
        LayerKind::Dense
    } else {
        LayerKind::Other(layer.class_name)
    };
    Ok(LayerDescriptor {
        index,
        kind,
        neuron_count,
        incoming_weights: None,
    })
}
