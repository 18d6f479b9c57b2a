use serde::{Deserialize, Serialize};

use crate::{activation::activation::ActivationFunction, math::matrix::Matrix};

/// A fully connected layer: `a = f(x · W + b)`.
///
/// Layers are read-only at inference time; `forward` borrows `self` immutably
/// so one loaded network can serve concurrent requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub weights: Matrix,
    pub biases: Vec<f32>,
    pub activation: ActivationFunction,
}

impl Layer {
    pub fn new(weights: Matrix, biases: Vec<f32>, activation: ActivationFunction) -> Layer {
        Layer { weights, biases, activation }
    }

    /// Number of values this layer consumes.
    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    /// Number of neurons, i.e. values this layer produces.
    pub fn size(&self) -> usize {
        self.weights.cols
    }

    /// Runs one forward step. Returns `None` if `input` has the wrong width.
    pub fn forward(&self, input: &[f32]) -> Option<Vec<f32>> {
        let mut z = self.weights.row_product(input)?;
        for (v, b) in z.iter_mut().zip(self.biases.iter()) {
            *v += b;
        }
        self.activation.apply(&mut z);
        Some(z)
    }

    /// Checks internal consistency of a deserialized layer.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(err) = self.weights.shape_error() {
            return Err(format!("weights {}", err));
        }
        if self.weights.rows == 0 || self.weights.cols == 0 {
            return Err("weights must be non-empty".into());
        }
        if self.biases.len() != self.weights.cols {
            return Err(format!(
                "{} biases for {} neurons",
                self.biases.len(),
                self.weights.cols
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_adds_bias_then_activates() {
        let layer = Layer::new(
            Matrix::from_data(vec![vec![1.0, -1.0], vec![1.0, -1.0]]),
            vec![0.5, 0.0],
            ActivationFunction::ReLU,
        );
        assert_eq!(layer.forward(&[1.0, 1.0]).unwrap(), vec![2.5, 0.0]);
        assert!(layer.forward(&[1.0]).is_none());
    }

    #[test]
    fn validate_catches_bias_mismatch() {
        let layer = Layer::new(Matrix::zeros(2, 3), vec![0.0; 2], ActivationFunction::Identity);
        assert!(layer.validate().unwrap_err().contains("biases"));
    }
}
