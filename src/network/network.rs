use rand::Rng;
use std::fmt;

use crate::error::{Error, Result};
use crate::math::matrix::{Matrix, MatrixView};

/// A linear stack of fully-connected sigmoid layers.
///
/// For an architecture `[n0, n1, ..., nL]` the network owns
/// - `weights[i]`: `(n_i, n_{i+1})`
/// - `biases[i]`: `(1, n_{i+1})`
/// - `activations[i]`: `(1, n_i)` for `i in 0..=L`
///
/// `activations[0]` is the input buffer and `activations[L]` the output. A
/// second network of the same architecture doubles as a gradient
/// accumulator, in which case its activation buffers hold per-example error
/// scratch rather than real activations.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    pub(crate) weights: Vec<Matrix>,
    pub(crate) biases: Vec<Matrix>,
    pub(crate) activations: Vec<Matrix>,
}

impl Network {
    /// Allocates a zeroed network for the given layer widths.
    pub fn build(arch: &[usize]) -> Result<Network> {
        if arch.len() < 2 {
            return Err(Error::InvalidArchitecture(format!(
                "need at least 2 layer widths, got {}",
                arch.len()
            )));
        }
        if let Some(i) = arch.iter().position(|&width| width == 0) {
            return Err(Error::InvalidArchitecture(format!("layer {i} has zero width")));
        }

        let layers = arch.len() - 1;
        let mut weights = Vec::with_capacity(layers);
        let mut biases = Vec::with_capacity(layers);
        let mut activations = Vec::with_capacity(arch.len());

        activations.push(Matrix::alloc(1, arch[0])?);
        for pair in arch.windows(2) {
            weights.push(Matrix::alloc(pair[0], pair[1])?);
            biases.push(Matrix::alloc(1, pair[1])?);
            activations.push(Matrix::alloc(1, pair[1])?);
        }

        Ok(Network { weights, biases, activations })
    }

    /// Layer widths, input first.
    pub fn arch(&self) -> Vec<usize> {
        self.activations.iter().map(Matrix::cols).collect()
    }

    /// Number of weight layers (`arch().len() - 1`).
    pub fn layer_count(&self) -> usize {
        self.weights.len()
    }

    /// Total number of scalar weights and biases.
    pub fn param_count(&self) -> usize {
        self.weights
            .iter()
            .chain(&self.biases)
            .map(|m| m.rows() * m.cols())
            .sum()
    }

    /// Uniform draws in `[low, high)` for every weight and bias. Activations
    /// are left as they are.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, low: f64, high: f64) {
        for (w, b) in self.weights.iter_mut().zip(self.biases.iter_mut()) {
            w.randomize(rng, low, high);
            b.randomize(rng, low, high);
        }
    }

    /// Fills every weight, bias and activation buffer with 0.
    pub fn zero(&mut self) {
        self.weights
            .iter_mut()
            .chain(self.biases.iter_mut())
            .chain(self.activations.iter_mut())
            .for_each(|m| m.fill(0.0));
    }

    /// `activations[i+1] = sigmoid(activations[i] . weights[i] + biases[i])`
    /// for every layer in order. The caller fills `input_mut()` first.
    pub fn forward(&mut self) {
        for i in 0..self.layer_count() {
            let (prev, next) = self.activations.split_at_mut(i + 1);
            let mut out = next[0].view_mut();
            out.dot_unchecked(prev[i].view(), self.weights[i].view());
            out.add_unchecked(self.biases[i].view());
            out.sigmoid_in_place();
        }
    }

    /// Copies `input` into the input buffer, runs `forward` and returns the
    /// output buffer.
    pub fn predict<'b>(&mut self, input: impl Into<MatrixView<'b>>) -> Result<&Matrix> {
        self.input_mut().copy_from(input)?;
        self.forward();
        Ok(self.output())
    }

    pub fn input(&self) -> &Matrix {
        &self.activations[0]
    }

    pub fn input_mut(&mut self) -> &mut Matrix {
        &mut self.activations[0]
    }

    pub fn output(&self) -> &Matrix {
        &self.activations[self.layer_count()]
    }

    pub fn output_mut(&mut self) -> &mut Matrix {
        let last = self.layer_count();
        &mut self.activations[last]
    }

    pub fn weights(&self, layer: usize) -> &Matrix {
        &self.weights[layer]
    }

    pub fn biases(&self, layer: usize) -> &Matrix {
        &self.biases[layer]
    }

    pub fn activation(&self, index: usize) -> &Matrix {
        &self.activations[index]
    }

    /// Parameter matrices in canonical order: layer 0 weights, layer 0
    /// biases, layer 1 weights, ...
    pub(crate) fn param_matrix_count(&self) -> usize {
        2 * self.layer_count()
    }

    pub(crate) fn param(&self, p: usize) -> &Matrix {
        if p % 2 == 0 {
            &self.weights[p / 2]
        } else {
            &self.biases[p / 2]
        }
    }

    pub(crate) fn param_mut(&mut self, p: usize) -> &mut Matrix {
        if p % 2 == 0 {
            &mut self.weights[p / 2]
        } else {
            &mut self.biases[p / 2]
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[")?;
        for i in 0..self.layer_count() {
            self.weights[i].write_named(f, &format!("ws{i}"), 2)?;
            self.biases[i].write_named(f, &format!("bs{i}"), 2)?;
        }
        writeln!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn build_rejects_short_or_zero_width_architectures() {
        assert!(matches!(Network::build(&[]), Err(Error::InvalidArchitecture(_))));
        assert!(matches!(Network::build(&[3]), Err(Error::InvalidArchitecture(_))));
        assert!(matches!(Network::build(&[2, 0, 1]), Err(Error::InvalidArchitecture(_))));
    }

    #[test]
    fn build_allocates_documented_shapes() {
        let arch = [4, 5, 3, 2];
        let net = Network::build(&arch).unwrap();

        assert_eq!(net.layer_count(), 3);
        assert_eq!(net.arch(), arch.to_vec());
        for i in 0..net.layer_count() {
            assert_eq!(net.weights(i).shape(), (arch[i], arch[i + 1]));
            assert_eq!(net.biases(i).shape(), (1, arch[i + 1]));
            assert_eq!(net.activation(i + 1).shape(), (1, arch[i + 1]));
        }
        assert_eq!(net.input().shape(), (1, 4));
        assert_eq!(net.output().shape(), (1, 2));
        assert_eq!(net.param_count(), 4 * 5 + 5 + 5 * 3 + 3 + 3 * 2 + 2);
    }

    #[test]
    fn zeroed_network_outputs_one_half() {
        let mut net = Network::build(&[2, 3, 1]).unwrap();
        net.input_mut().fill(1.0);
        net.forward();
        assert_eq!(net.output().at(0, 0), 0.5);
    }

    #[test]
    fn forward_is_deterministic() {
        let mut net = Network::build(&[2, 2, 1]).unwrap();
        net.randomize(&mut StdRng::seed_from_u64(3), -1.0, 1.0);
        net.input_mut().set(0, 0, 0.25);
        net.input_mut().set(0, 1, 0.75);

        net.forward();
        let first = net.output().clone();
        net.forward();
        assert_eq!(net.output().as_slice(), first.as_slice());
    }

    #[test]
    fn forward_matches_hand_computation() {
        let mut net = Network::build(&[2, 1]).unwrap();
        net.weights[0].set(0, 0, 2.0);
        net.weights[0].set(1, 0, -1.0);
        net.biases[0].set(0, 0, 0.5);

        let out = net.predict(&Matrix::from_data(vec![vec![1.0, 3.0]]).unwrap()).unwrap();
        let expected = crate::activation::sigmoid(2.0 - 3.0 + 0.5);
        assert_eq!(out.at(0, 0), expected);
    }

    #[test]
    fn randomize_leaves_activations_alone_and_zero_clears_everything() {
        let mut net = Network::build(&[2, 2, 1]).unwrap();
        net.input_mut().fill(0.3);
        net.randomize(&mut StdRng::seed_from_u64(11), 0.0, 1.0);

        assert!(net.input().as_slice().iter().all(|&x| x == 0.3));
        assert!(net.weights(0).as_slice().iter().any(|&x| x != 0.0));

        net.zero();
        assert_eq!(net, Network::build(&[2, 2, 1]).unwrap());
    }

    #[test]
    fn param_order_alternates_weights_and_biases() {
        let net = Network::build(&[3, 2, 1]).unwrap();
        assert_eq!(net.param_matrix_count(), 4);
        assert_eq!(net.param(0).shape(), (3, 2));
        assert_eq!(net.param(1).shape(), (1, 2));
        assert_eq!(net.param(2).shape(), (2, 1));
        assert_eq!(net.param(3).shape(), (1, 1));
    }

    #[test]
    fn display_lists_every_layer() {
        let net = Network::build(&[2, 2, 1]).unwrap();
        let text = net.to_string();
        assert!(text.contains("ws0 = ["));
        assert!(text.contains("bs1 = ["));
    }
}
