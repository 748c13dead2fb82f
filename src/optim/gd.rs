use crate::network::network::Network;

/// `p -= rate * g` for every weight and bias of `net`.
///
/// # Panics
/// Panics if `grad` does not mirror `net`'s architecture; an accumulator is
/// always built from the same layer widths as the network it serves.
pub fn apply(net: &mut Network, grad: &Network, rate: f64) {
    assert_eq!(
        net.arch(),
        grad.arch(),
        "gradient accumulator architecture must match the network"
    );
    for p in 0..net.param_matrix_count() {
        let (rows, cols) = net.param(p).shape();
        let g = grad.param(p);
        let param = net.param_mut(p);
        for j in 0..rows {
            for k in 0..cols {
                *param.at_mut(j, k) -= rate * g.at(j, k);
            }
        }
    }
}

/// Plain steepest descent: no momentum, decay or clipping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientDescent {
    pub learning_rate: f64,
}

impl GradientDescent {
    pub fn new(learning_rate: f64) -> GradientDescent {
        GradientDescent { learning_rate }
    }

    /// Applies one update to `net` from the gradients held in `grad`.
    pub fn step(&self, net: &mut Network, grad: &Network) {
        apply(net, grad, self.learning_rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_subtracts_scaled_gradient() {
        let mut net = Network::build(&[2, 1]).unwrap();
        net.weights[0].fill(1.0);
        net.biases[0].fill(0.5);

        let mut grad = Network::build(&[2, 1]).unwrap();
        grad.weights[0].set(0, 0, 2.0);
        grad.weights[0].set(1, 0, -4.0);
        grad.biases[0].set(0, 0, 1.0);
        grad.activations[1].fill(100.0);

        GradientDescent::new(0.25).step(&mut net, &grad);

        assert_eq!(net.weights(0).as_slice(), &[0.5, 2.0]);
        assert_eq!(net.biases(0).as_slice(), &[0.25]);
        assert_eq!(net.output().as_slice(), &[0.0]);
    }

    #[test]
    #[should_panic(expected = "architecture must match")]
    fn mismatched_accumulator_is_a_programming_error() {
        let mut net = Network::build(&[2, 1]).unwrap();
        let grad = Network::build(&[2, 2]).unwrap();
        apply(&mut net, &grad, 1.0);
    }
}
