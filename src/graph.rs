//! Layered graph derived from a model's dense layers.
//!
//! Only layers with a neuron count take part. Neurons sit on a grid: the
//! layer's original index on `x`, the offset centred around zero on `y`, and
//! `z = 0`. Edges join every neuron of a layer to every neuron of the layer
//! directly after it, provided that layer carries an incoming weight matrix.

use crate::error::{Error, Result};
use crate::model::{LayerDescriptor, WeightMatrix};

/// A layer that has a countable neuron set and is therefore drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerRef {
    pub layer_index: usize,
    pub neuron_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn to(self, other: Position) -> Position {
        Position {
            x: other.x - self.x,
            y: other.y - self.y,
            z: other.z - self.z,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Positive,
    NonPositive,
}

impl Sign {
    /// Strictly greater than zero is positive; zero and NaN are not.
    pub fn of(weight: f32) -> Sign {
        if weight > 0.0 {
            Sign::Positive
        } else {
            Sign::NonPositive
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neuron {
    pub layer_index: usize,
    pub offset: usize,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from_layer: usize,
    pub from_offset: usize,
    pub to_layer: usize,
    pub to_offset: usize,
    pub weight: f32,
    pub from: Position,
    pub to: Position,
}

impl Edge {
    pub fn sign(&self) -> Sign {
        Sign::of(self.weight)
    }

    pub fn direction(&self) -> Position {
        self.from.to(self.to)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkGraph {
    pub layers: Vec<LayerRef>,
    pub neurons: Vec<Neuron>,
    pub edges: Vec<Edge>,
}

/// Keeps the layers that expose a neuron count, in order, with their
/// original indices.
pub fn filter_layers(layers: &[LayerDescriptor]) -> Vec<LayerRef> {
    layers
        .iter()
        .filter_map(|layer| {
            layer.neuron_count.map(|neuron_count| LayerRef {
                layer_index: layer.index,
                neuron_count,
            })
        })
        .collect()
}

pub fn neuron_position(layer_index: usize, neuron_count: usize, offset: usize) -> Position {
    Position {
        x: layer_index as f64,
        y: offset as f64 - neuron_count as f64 / 2.0,
        z: 0.0,
    }
}

pub fn place_neurons(layers: &[LayerRef]) -> Vec<Neuron> {
    layers
        .iter()
        .flat_map(|layer| {
            (0..layer.neuron_count).map(move |offset| Neuron {
                layer_index: layer.layer_index,
                offset,
                position: neuron_position(layer.layer_index, layer.neuron_count, offset),
            })
        })
        .collect()
}

/// Emits one edge per neuron pair of every adjacent layer pair whose later
/// layer carries an incoming weight matrix.
pub fn extract_edges(descriptors: &[LayerDescriptor], layers: &[LayerRef]) -> Result<Vec<Edge>> {
    let mut edges = Vec::new();
    for pair in layers.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        if prev.layer_index + 1 != curr.layer_index {
            continue;
        }
        let Some(weights) = descriptors
            .iter()
            .find(|d| d.index == curr.layer_index)
            .and_then(|d| d.incoming_weights.as_ref())
        else {
            continue;
        };
        check_shape(curr.layer_index, weights, prev.neuron_count, curr.neuron_count)?;

        edges.reserve(prev.neuron_count * curr.neuron_count);
        for from_offset in 0..prev.neuron_count {
            let from = neuron_position(prev.layer_index, prev.neuron_count, from_offset);
            for to_offset in 0..curr.neuron_count {
                edges.push(Edge {
                    from_layer: prev.layer_index,
                    from_offset,
                    to_layer: curr.layer_index,
                    to_offset,
                    weight: weights[from_offset][to_offset],
                    from,
                    to: neuron_position(curr.layer_index, curr.neuron_count, to_offset),
                });
            }
        }
    }
    Ok(edges)
}

fn check_shape(index: usize, weights: &WeightMatrix, rows: usize, cols: usize) -> Result<()> {
    if weights.len() == rows && weights.iter().all(|row| row.len() == cols) {
        return Ok(());
    }
    let found = match weights.first() {
        Some(first) if weights.iter().all(|row| row.len() == first.len()) => {
            format!("{}x{}", weights.len(), first.len())
        }
        Some(_) => format!("{} rows of uneven length", weights.len()),
        None => "0 rows".to_string(),
    };
    Err(Error::WeightShape {
        index,
        expected_rows: rows,
        expected_cols: cols,
        found,
    })
}

/// Builds the drawable graph, or `None` when no layer has a neuron count.
pub fn build(descriptors: &[LayerDescriptor]) -> Result<Option<NetworkGraph>> {
    let layers = filter_layers(descriptors);
    if layers.is_empty() {
        return Ok(None);
    }
    let neurons = place_neurons(&layers);
    let edges = extract_edges(descriptors, &layers)?;
    tracing::debug!(
        layers = layers.len(),
        neurons = neurons.len(),
        edges = edges.len(),
        "built network graph"
    );
    Ok(Some(NetworkGraph {
        layers,
        neurons,
        edges,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LayerKind;

    fn dense(index: usize, units: usize, weights: Option<WeightMatrix>) -> LayerDescriptor {
        LayerDescriptor {
            index,
            kind: LayerKind::Dense,
            neuron_count: Some(units),
            incoming_weights: weights,
        }
    }

    fn other(index: usize, name: &str) -> LayerDescriptor {
        LayerDescriptor {
            index,
            kind: LayerKind::Other(name.to_string()),
            neuron_count: None,
            incoming_weights: None,
        }
    }

    fn matrix(rows: usize, cols: usize, value: f32) -> WeightMatrix {
        vec![vec![value; cols]; rows]
    }

    #[test]
    fn three_layer_sequential_model() {
        let descriptors = vec![
            dense(0, 2, Some(matrix(4, 2, 0.5))),
            dense(1, 3, Some(matrix(2, 3, 0.5))),
            dense(2, 4, Some(matrix(3, 4, -0.5))),
        ];
        let graph = build(&descriptors).unwrap().unwrap();

        assert_eq!(graph.layers.len(), 3);
        assert_eq!(graph.neurons.len(), 9);
        assert_eq!(graph.edges.len(), 18);
        assert_eq!(graph.edges.iter().filter(|e| e.to_layer == 1).count(), 6);
        assert_eq!(graph.edges.iter().filter(|e| e.to_layer == 2).count(), 12);

        let ys: Vec<f64> = graph
            .neurons
            .iter()
            .filter(|n| n.layer_index == 1)
            .map(|n| n.position.y)
            .collect();
        assert_eq!(ys, vec![-1.5, -0.5, 0.5]);
    }

    #[test]
    fn filter_keeps_order_and_original_indices() {
        let descriptors = vec![
            other(0, "Flatten"),
            dense(1, 5, None),
            other(2, "Dropout"),
            dense(3, 2, None),
        ];
        let layers = filter_layers(&descriptors);
        assert_eq!(
            layers,
            vec![
                LayerRef { layer_index: 1, neuron_count: 5 },
                LayerRef { layer_index: 3, neuron_count: 2 },
            ]
        );
    }

    #[test]
    fn no_edges_across_a_skipped_layer() {
        let descriptors = vec![
            dense(0, 2, None),
            other(1, "Dropout"),
            dense(2, 2, Some(matrix(2, 2, 1.0))),
        ];
        let graph = build(&descriptors).unwrap().unwrap();
        assert_eq!(graph.neurons.len(), 4);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn layer_without_weights_is_isolated() {
        let descriptors = vec![dense(0, 3, None), dense(1, 2, None)];
        let graph = build(&descriptors).unwrap().unwrap();
        assert_eq!(graph.neurons.len(), 5);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn edges_read_weights_by_from_then_to() {
        let weights = vec![vec![1.0, -2.0, 0.0], vec![-4.0, 5.0, 6.0]];
        let descriptors = vec![dense(0, 2, None), dense(1, 3, Some(weights.clone()))];
        let edges = extract_edges(&descriptors, &filter_layers(&descriptors)).unwrap();
        for edge in &edges {
            assert!(edge.from_offset < 2 && edge.to_offset < 3);
            assert_eq!(edge.weight, weights[edge.from_offset][edge.to_offset]);
            assert_eq!(edge.from, neuron_position(0, 2, edge.from_offset));
            assert_eq!(edge.to, neuron_position(1, 3, edge.to_offset));
        }
        let positive = edges.iter().filter(|e| e.sign() == Sign::Positive).count();
        assert_eq!(positive, 3);
    }

    #[test]
    fn zero_weight_is_not_positive() {
        assert_eq!(Sign::of(0.0), Sign::NonPositive);
        assert_eq!(Sign::of(-0.0), Sign::NonPositive);
        assert_eq!(Sign::of(f32::NAN), Sign::NonPositive);
        assert_eq!(Sign::of(1e-9), Sign::Positive);
    }

    #[test]
    fn even_layer_offsets_span_parity() {
        let ys: Vec<f64> = (0..4).map(|k| neuron_position(7, 4, k).y).collect();
        assert_eq!(ys, vec![-2.0, -1.0, 0.0, 1.0]);
        assert!((0..4).all(|k| neuron_position(7, 4, k).x == 7.0));
        assert!((0..4).all(|k| neuron_position(7, 4, k).z == 0.0));
    }

    #[test]
    fn mismatched_matrix_is_rejected() {
        let descriptors = vec![dense(0, 2, None), dense(1, 3, Some(matrix(3, 2, 1.0)))];
        let err = build(&descriptors).unwrap_err();
        match err {
            Error::WeightShape {
                index,
                expected_rows,
                expected_cols,
                found,
            } => {
                assert_eq!((index, expected_rows, expected_cols), (1, 2, 3));
                assert_eq!(found, "3x2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unused_matrix_is_not_checked() {
        // The first layer's matrix is against the raw input, which is never drawn.
        let descriptors = vec![dense(0, 2, Some(matrix(7, 9, 1.0))), dense(1, 1, None)];
        assert!(build(&descriptors).unwrap().is_some());
    }

    #[test]
    fn nothing_to_visualize() {
        assert_eq!(build(&[]).unwrap(), None);
        assert_eq!(build(&[other(0, "Flatten")]).unwrap(), None);
    }

    #[test]
    fn building_twice_is_identical() {
        let descriptors = vec![dense(0, 3, None), dense(1, 2, Some(matrix(3, 2, -1.0)))];
        assert_eq!(build(&descriptors).unwrap(), build(&descriptors).unwrap());
    }
}
