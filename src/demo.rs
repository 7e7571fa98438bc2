use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::{LayerInfo, ModelInfo, WeightMatrix};

/// A sequential model of dense layers with weights drawn from [-1, 1).
///
/// Each layer's matrix is shaped `previous size x size`; the first one is
/// against the raw input of width `input_dim`.
pub fn demo_model(sizes: &[usize], input_dim: usize, seed: Option<u64>) -> ModelInfo {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut layers = Vec::with_capacity(sizes.len());
    let mut prev_dim = input_dim;
    for (i, &size) in sizes.iter().enumerate() {
        let weights: WeightMatrix = (0..prev_dim)
            .map(|_| (0..size).map(|_| rng.gen_range(-1.0..1.0)).collect())
            .collect();
        let is_last = i + 1 == sizes.len();
        layers.push(LayerInfo {
            layer_type: "Dense".to_string(),
            input_dim: Some(prev_dim),
            output_dim: Some(size),
            activation: (!is_last).then(|| "relu".to_string()),
            weights: Some(weights),
        });
        prev_dim = size;
    }
    ModelInfo {
        name: Some("demo".to_string()),
        layers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_chain_through_the_layers() {
        let model = demo_model(&[2, 3, 4], 4, Some(7));
        let shapes: Vec<(usize, usize)> = model
            .layers
            .iter()
            .map(|l| {
                let w = l.weights.as_ref().unwrap();
                (w.len(), w[0].len())
            })
            .collect();
        assert_eq!(shapes, vec![(4, 2), (2, 3), (3, 4)]);
        assert_eq!(model.layers[2].activation, None);
        assert!(
            model
                .layers
                .iter()
                .flat_map(|l| l.weights.iter().flatten().flatten())
                .all(|w| (-1.0..1.0).contains(w))
        );
    }

    #[test]
    fn seeded_models_repeat() {
        assert_eq!(demo_model(&[3, 2], 2, Some(1)), demo_model(&[3, 2], 2, Some(1)));
    }
}
