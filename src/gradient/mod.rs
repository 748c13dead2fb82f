pub mod backprop;
pub mod finite_difference;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::math::matrix::MatrixView;
use crate::network::network::Network;

pub use backprop::{backprop, backprop_parallel};
pub use finite_difference::fdiff;

/// Selects how the training loop computes parameter gradients.
///
/// - `Backprop`                     — exact, one forward/backward per example
/// - `ParallelBackprop { workers }` — `Backprop` split across a rayon pool
/// - `FiniteDifference { eps }`     — numerical oracle; slow, for validation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GradientMethod {
    #[default]
    Backprop,
    ParallelBackprop { workers: usize },
    FiniteDifference { eps: f64 },
}

impl GradientMethod {
    /// Fills `grad`'s weights and biases with the mean gradient of the cost
    /// over `inputs`/`targets`.
    pub fn compute<'a, 'b>(
        &self,
        net: &mut Network,
        grad: &mut Network,
        inputs: impl Into<MatrixView<'a>>,
        targets: impl Into<MatrixView<'b>>,
    ) -> Result<()> {
        match *self {
            GradientMethod::Backprop => backprop(net, grad, inputs, targets),
            GradientMethod::ParallelBackprop { workers } => {
                backprop_parallel(net, grad, inputs, targets, workers)
            }
            GradientMethod::FiniteDifference { eps } => fdiff(net, grad, eps, inputs, targets),
        }
    }
}

/// `grad` must mirror `net` parameter for parameter.
pub(crate) fn check_accumulator(net: &Network, grad: &Network) -> Result<()> {
    if net.layer_count() != grad.layer_count() {
        return Err(Error::ShapeMismatch {
            op: "gradient accumulator",
            left: (1, net.layer_count() + 1),
            right: (1, grad.layer_count() + 1),
        });
    }
    for p in 0..net.param_matrix_count() {
        if net.param(p).shape() != grad.param(p).shape() {
            return Err(Error::ShapeMismatch {
                op: "gradient accumulator",
                left: net.param(p).shape(),
                right: grad.param(p).shape(),
            });
        }
    }
    Ok(())
}
