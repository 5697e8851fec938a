//! Scalar activation functions.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fmt;

/// Activation function applied to `partial_activation + bias`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivationMethod {
    #[default]
    Sigmoid,
    LeakyRelu,
    Sin,
}

impl ActivationMethod {
    pub const ALL: [ActivationMethod; 3] = [Self::Sigmoid, Self::LeakyRelu, Self::Sin];

    #[inline]
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Self::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Self::LeakyRelu => (0.1 * x).max(x),
            // removable singularity at 0
            Self::Sin => {
                if x.abs() < 0.01 {
                    1.0
                } else {
                    (2.0 * PI * x).sin() / x
                }
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sigmoid => "sigmoid",
            Self::LeakyRelu => "lRELU",
            Self::Sin => "sin",
        }
    }
}

impl fmt::Display for ActivationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid() {
        assert!((ActivationMethod::Sigmoid.apply(0.0) - 0.5).abs() < 1e-6);
        assert!((ActivationMethod::Sigmoid.apply(0.5) - 0.622_459).abs() < 1e-5);
    }

    #[test]
    fn test_leaky_relu() {
        assert_eq!(ActivationMethod::LeakyRelu.apply(2.0), 2.0);
        assert!((ActivationMethod::LeakyRelu.apply(-2.0) + 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_sin_singularity() {
        assert_eq!(ActivationMethod::Sin.apply(0.0), 1.0);
        assert_eq!(ActivationMethod::Sin.apply(0.005), 1.0);
        // sin(2π·0.25) / 0.25 = 4
        assert!((ActivationMethod::Sin.apply(0.25) - 4.0).abs() < 1e-4);
    }
}
