//! Multi-layer perceptron implementation.

use ndarray::{Array1, Array2, Zip};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use serde::{Deserialize, Serialize};

/// A single layer of a multi-layer perceptron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mlp {
    /// Weight matrix (`output_size` × `input_size`).
    pub weights: Array2<f32>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f32>,
}

impl Mlp {
    /// Creates a new layer with random weights and biases.
    pub fn new_random(input_size: usize, output_size: usize, scale: f32) -> Self {
        Self {
            weights: Array2::random((output_size, input_size), Uniform::new(-scale, scale)),
            biases: Array1::random(output_size, Uniform::new(-scale, scale)),
        }
    }

    /// Number of inputs the layer expects.
    pub fn input_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Number of outputs the layer produces.
    pub fn output_size(&self) -> usize {
        self.weights.nrows()
    }

    /// Performs forward pass with tanh activation.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = self.weights.dot(inputs);
        output += &self.biases;
        output.mapv_inplace(f32::tanh);
        output
    }

    /// Perturbs each weight and bias with probability `rate` by uniform noise
    /// in `[-power, power]`.
    pub fn mutate(&mut self, power: f32, rate: f32) {
        let weight_noise = Array2::random(self.weights.dim(), Uniform::new(-power, power));
        let weight_roll = Array2::random(self.weights.dim(), Uniform::new(0.0, 1.0));
        Zip::from(&mut self.weights)
            .and(&weight_noise)
            .and(&weight_roll)
            .for_each(|w, &noise, &roll| {
                if roll < rate {
                    *w += noise;
                }
            });

        let bias_noise = Array1::random(self.biases.len(), Uniform::new(-power, power));
        let bias_roll = Array1::random(self.biases.len(), Uniform::new(0.0, 1.0));
        Zip::from(&mut self.biases)
            .and(&bias_noise)
            .and(&bias_roll)
            .for_each(|b, &noise, &roll| {
                if roll < rate {
                    *b += noise;
                }
            });
    }

    /// Creates a new layer by weighted averaging two parent layers.
    pub fn crossover_weighted(parent1: &Mlp, parent2: &Mlp, weight1: f32) -> Self {
        let weight2 = 1.0 - weight1;
        Self {
            weights: &parent1.weights * weight1 + &parent2.weights * weight2,
            biases: &parent1.biases * weight1 + &parent2.biases * weight2,
        }
    }
}
