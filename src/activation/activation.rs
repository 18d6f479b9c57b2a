use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Sigmoid,
    ReLU,
    Identity,
    /// Softmax is vector-valued; `apply()` handles it over the whole layer
    /// output rather than element by element.
    Softmax,
    Tanh,
    LeakyReLU { alpha: f32 },
    Elu { alpha: f32 },
    Gelu,
    Swish,
}

impl ActivationFunction {
    /// Applies the activation in place to one layer's pre-activation values.
    pub fn apply(&self, z: &mut [f32]) {
        match self {
            ActivationFunction::Softmax => softmax(z),
            _ => z.iter_mut().for_each(|x| *x = self.scalar(*x)),
        }
    }

    /// Element-wise activation. `Softmax` is only meaningful over a vector and
    /// is routed through `apply()`, so here it acts as identity.
    fn scalar(&self, x: f32) -> f32 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Identity | ActivationFunction::Softmax => x,
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::LeakyReLU { alpha } => if x > 0.0 { x } else { alpha * x },
            ActivationFunction::Elu { alpha } => {
                if x > 0.0 { x } else { alpha * (x.exp() - 1.0) }
            }
            ActivationFunction::Gelu => {
                let c = (2.0_f32 / PI).sqrt();
                0.5 * x * (1.0 + (c * (x + 0.044715 * x.powi(3))).tanh())
            }
            ActivationFunction::Swish => x / (1.0 + (-x).exp()),
        }
    }
}

/// Numerically stable softmax: shifts by the max before exponentiating.
fn softmax(z: &mut [f32]) {
    let max = z.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut sum = 0.0;
    for x in z.iter_mut() {
        *x = (*x - max).exp();
        sum += *x;
    }
    if sum > 0.0 {
        z.iter_mut().for_each(|x| *x /= sum);
    }
}
