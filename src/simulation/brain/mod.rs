//! Neural network implementation for bird controllers.
//!
//! A fixed-topology feed-forward network with tanh activations, plus the
//! genetic operators (mutation, crossover, distance) the evolutionary search
//! needs.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

pub mod mlp;

pub use mlp::Mlp;

/// Feed-forward network that controls a bird.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brain {
    /// Ordered layers from input to output.
    pub layers: Vec<Mlp>,
}

impl Brain {
    /// Creates a new brain with random weights.
    ///
    /// `layer_sizes` lists the input size, any hidden sizes and the output
    /// size, so `[3, 1]` is a direct three-input, one-output network.
    pub fn new(layer_sizes: &[usize], scale: f32) -> Self {
        let layers = layer_sizes
            .windows(2)
            .map(|pair| Mlp::new_random(pair[0], pair[1], scale))
            .collect();

        Brain { layers }
    }

    /// Runs a forward pass through the brain.
    #[inline]
    pub fn think(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = inputs.clone();
        for layer in &self.layers {
            output = layer.forward(&output);
        }
        output
    }

    /// Number of inputs, or 0 for an empty brain.
    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, Mlp::input_size)
    }

    /// Number of outputs, or 0 for an empty brain.
    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, Mlp::output_size)
    }

    /// Layer sizes from input to output, in the form [`Brain::new`] accepts.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self.layers.first().map(Mlp::input_size).into_iter().collect();
        sizes.extend(self.layers.iter().map(Mlp::output_size));
        sizes
    }

    /// Total number of weights and biases.
    pub fn num_parameters(&self) -> usize {
        self.layers
            .iter()
            .map(|layer| layer.weights.len() + layer.biases.len())
            .sum()
    }

    /// Creates a new brain by weighted averaging two parent brains.
    ///
    /// `weight1` is the weight for parent1, `1.0 - weight1` for parent2.
    /// Parents with different shapes cannot be blended; parent1 is cloned.
    pub fn crossover_weighted(parent1: &Brain, parent2: &Brain, weight1: f32) -> Self {
        if !parent1.same_shape(parent2) {
            return parent1.clone();
        }

        let layers = parent1
            .layers
            .iter()
            .zip(&parent2.layers)
            .map(|(layer1, layer2)| Mlp::crossover_weighted(layer1, layer2, weight1))
            .collect();
        Brain { layers }
    }

    /// Mutates all parameters in the brain.
    pub fn mutate(&mut self, power: f32, rate: f32) {
        for layer in &mut self.layers {
            layer.mutate(power, rate);
        }
    }

    /// Calculates the Euclidean distance between two brains' parameters.
    ///
    /// Brains of different shapes are infinitely far apart.
    pub fn distance(brain1: &Brain, brain2: &Brain) -> f32 {
        if !brain1.same_shape(brain2) {
            return f32::MAX;
        }

        let mut sum_sq = 0.0;
        for (layer1, layer2) in brain1.layers.iter().zip(&brain2.layers) {
            for (w1, w2) in layer1.weights.iter().zip(layer2.weights.iter()) {
                let diff = w1 - w2;
                sum_sq += diff * diff;
            }
            for (b1, b2) in layer1.biases.iter().zip(layer2.biases.iter()) {
                let diff = b1 - b2;
                sum_sq += diff * diff;
            }
        }
        sum_sq.sqrt()
    }

    /// Flattens all weights and biases into a single vector.
    pub fn to_flat_vector(&self) -> Vec<f32> {
        let mut flat = Vec::with_capacity(self.num_parameters());
        for layer in &self.layers {
            flat.extend(layer.weights.iter().copied());
            flat.extend(layer.biases.iter().copied());
        }
        flat
    }

    fn same_shape(&self, other: &Brain) -> bool {
        self.layers.len() == other.layers.len()
            && self
                .layers
                .iter()
                .zip(&other.layers)
                .all(|(a, b)| a.weights.dim() == b.weights.dim())
    }
}
