use crate::error::{Error, Result};
use crate::loss::mse::cost;
use crate::math::matrix::MatrixView;
use crate::network::network::Network;

use super::check_accumulator;

/// Forward-difference gradient estimate, `(cost(p + eps) - cost(p)) / eps`
/// for every weight and bias of `net`, written into `grad`.
///
/// Parameters are visited layer by layer, weights before biases, row-major
/// inside each matrix. Every parameter is restored after its probe. This is
/// a validation oracle for [`backprop`](super::backprop::backprop): it costs
/// one full pass over the dataset per parameter.
pub fn fdiff<'a, 'b>(
    net: &mut Network,
    grad: &mut Network,
    eps: f64,
    inputs: impl Into<MatrixView<'a>>,
    targets: impl Into<MatrixView<'b>>,
) -> Result<()> {
    if eps == 0.0 || !eps.is_finite() {
        return Err(Error::InvalidEpsilon(eps));
    }
    check_accumulator(net, grad)?;
    let (inputs, targets) = (inputs.into(), targets.into());

    let c0 = cost(net, inputs, targets)?;

    for p in 0..net.param_matrix_count() {
        let (rows, cols) = net.param(p).shape();
        for j in 0..rows {
            for k in 0..cols {
                let saved = net.param(p).at(j, k);
                net.param_mut(p).set(j, k, saved + eps);
                let c1 = cost(net, inputs, targets);
                net.param_mut(p).set(j, k, saved);
                let c1 = c1?;
                grad.param_mut(p).set(j, k, (c1 - c0) / eps);
            }
        }
    }

    Ok(())
}
