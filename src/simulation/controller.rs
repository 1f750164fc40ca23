//! Controllers decide when a bird jumps.
//!
//! The simulation only needs a numeric function from the three sensor values
//! to an output vector whose first element is compared against the jump
//! threshold. Evolved brains implement it, and so does any closure, which lets
//! tests script a bird's behaviour.

use ndarray::Array1;

use super::brain::Brain;

/// Maps sensor inputs to action outputs.
pub trait Controller {
    /// Evaluates the controller. Only the first output is consumed.
    fn activate(&mut self, inputs: &Array1<f32>) -> Array1<f32>;
}

impl Controller for Brain {
    fn activate(&mut self, inputs: &Array1<f32>) -> Array1<f32> {
        self.think(inputs)
    }
}

impl<F> Controller for F
where
    F: FnMut(&Array1<f32>) -> Array1<f32>,
{
    fn activate(&mut self, inputs: &Array1<f32>) -> Array1<f32> {
        self(inputs)
    }
}
