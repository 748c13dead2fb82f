use rayon::prelude::*;

use crate::activation::activation::sigmoid_prime_from_output;
use crate::error::Result;
use crate::loss::mse::check_dataset;
use crate::math::matrix::MatrixView;
use crate::network::network::Network;

use super::check_accumulator;

/// Exact mean gradient of the cost over the dataset, written into `grad`.
///
/// One forward and one backward traversal per example. `grad`'s activation
/// buffers are used as per-example error scratch; only its weights and
/// biases are meaningful afterwards.
pub fn backprop<'a, 'b>(
    net: &mut Network,
    grad: &mut Network,
    inputs: impl Into<MatrixView<'a>>,
    targets: impl Into<MatrixView<'b>>,
) -> Result<()> {
    let (inputs, targets) = (inputs.into(), targets.into());
    check_accumulator(net, grad)?;
    check_dataset(net, &inputs, &targets)?;

    grad.zero();
    for i in 0..inputs.rows() {
        accumulate_example(net, grad, inputs.row(i), targets.row(i))?;
    }
    average(grad, inputs.rows());

    Ok(())
}

/// Same result as [`backprop`] with the dataset split into contiguous
/// chunks, one per worker, on the rayon pool.
///
/// Each worker runs its own copy of `net` and its own accumulator; the
/// partial sums are added in chunk order before the single division by the
/// dataset size. `net`'s activation buffers are not touched.
pub fn backprop_parallel<'a, 'b>(
    net: &Network,
    grad: &mut Network,
    inputs: impl Into<MatrixView<'a>>,
    targets: impl Into<MatrixView<'b>>,
    workers: usize,
) -> Result<()> {
    let (inputs, targets) = (inputs.into(), targets.into());
    check_accumulator(net, grad)?;
    check_dataset(net, &inputs, &targets)?;

    let n = inputs.rows();
    let workers = workers.clamp(1, n);
    let chunk = n.div_ceil(workers);

    let partials: Vec<Result<Network>> = (0..workers)
        .into_par_iter()
        .map(|w| -> Result<Network> {
            let mut local = net.clone();
            let mut acc = net.clone();
            acc.zero();
            for i in (w * chunk)..((w + 1) * chunk).min(n) {
                accumulate_example(&mut local, &mut acc, inputs.row(i), targets.row(i))?;
            }
            Ok(acc)
        })
        .collect();

    grad.zero();
    for partial in partials {
        let partial = partial?;
        for p in 0..grad.param_matrix_count() {
            grad.param_mut(p).add_in_place(partial.param(p))?;
        }
    }
    average(grad, n);

    Ok(())
}

/// Adds one example's weight and bias gradients (not yet averaged) to
/// `grad`.
fn accumulate_example(
    net: &mut Network,
    grad: &mut Network,
    input: MatrixView<'_>,
    target: MatrixView<'_>,
) -> Result<()> {
    net.input_mut().copy_from(input)?;
    net.forward();

    for scratch in grad.activations.iter_mut() {
        scratch.fill(0.0);
    }

    // The scratch holds half of dC/da; the factor 2 of the squared error is
    // applied once per layer through `delta`.
    let last = net.layer_count();
    for j in 0..target.cols() {
        grad.activations[last].set(0, j, net.activations[last].at(0, j) - target.at(0, j));
    }

    for l in (1..=last).rev() {
        for j in 0..net.activations[l].cols() {
            let a = net.activations[l].at(0, j);
            let da = grad.activations[l].at(0, j);
            let half_delta = da * sigmoid_prime_from_output(a);
            let delta = 2.0 * half_delta;

            *grad.biases[l - 1].at_mut(0, j) += delta;
            for k in 0..net.activations[l - 1].cols() {
                let pa = net.activations[l - 1].at(0, k);
                let w = net.weights[l - 1].at(k, j);
                *grad.weights[l - 1].at_mut(k, j) += delta * pa;
                *grad.activations[l - 1].at_mut(0, k) += half_delta * w;
            }
        }
    }

    Ok(())
}

fn average(grad: &mut Network, n: usize) {
    let inv = 1.0 / n as f64;
    for p in 0..grad.param_matrix_count() {
        grad.param_mut(p).scale(inv);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::math::matrix::Matrix;
    use rand::{rngs::StdRng, SeedableRng};

    fn dataset() -> (Matrix, Matrix) {
        let inputs = Matrix::from_data(vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.5, 0.5],
        ])
        .unwrap();
        let targets = Matrix::from_data(vec![vec![0.0], vec![1.0], vec![1.0], vec![0.0], vec![0.5]]).unwrap();
        (inputs, targets)
    }

    #[test]
    fn single_unit_gradient_matches_closed_form() {
        let mut net = Network::build(&[1, 1]).unwrap();
        net.weights[0].set(0, 0, 0.4);
        net.biases[0].set(0, 0, -0.2);
        let mut grad = net.clone();
        let x = Matrix::from_data(vec![vec![1.5]]).unwrap();
        let t = Matrix::from_data(vec![vec![1.0]]).unwrap();

        backprop(&mut net, &mut grad, &x, &t).unwrap();

        let s = crate::activation::sigmoid(0.4 * 1.5 - 0.2);
        let db = 2.0 * (s - 1.0) * s * (1.0 - s);
        assert!((grad.biases(0).at(0, 0) - db).abs() < 1e-12);
        assert!((grad.weights(0).at(0, 0) - db * 1.5).abs() < 1e-12);
    }

    #[test]
    fn stale_accumulator_contents_are_discarded() {
        let mut net = Network::build(&[2, 3, 1]).unwrap();
        net.randomize(&mut StdRng::seed_from_u64(1), -1.0, 1.0);
        let (inputs, targets) = dataset();

        let mut fresh = Network::build(&[2, 3, 1]).unwrap();
        backprop(&mut net, &mut fresh, &inputs, &targets).unwrap();

        let mut dirty = Network::build(&[2, 3, 1]).unwrap();
        dirty.randomize(&mut StdRng::seed_from_u64(2), 5.0, 6.0);
        backprop(&mut net, &mut dirty, &inputs, &targets).unwrap();

        for p in 0..net.param_matrix_count() {
            assert_eq!(fresh.param(p), dirty.param(p));
        }
    }

    #[test]
    fn parallel_matches_sequential() {
        let mut net = Network::build(&[2, 4, 3, 1]).unwrap();
        net.randomize(&mut StdRng::seed_from_u64(9), -1.0, 1.0);
        let (inputs, targets) = dataset();

        let mut seq = Network::build(&[2, 4, 3, 1]).unwrap();
        backprop(&mut net, &mut seq, &inputs, &targets).unwrap();

        for workers in [1, 2, 3, 16] {
            let mut par = Network::build(&[2, 4, 3, 1]).unwrap();
            backprop_parallel(&net, &mut par, &inputs, &targets, workers).unwrap();
            for p in 0..net.param_matrix_count() {
                for (a, b) in seq.param(p).as_slice().iter().zip(par.param(p).as_slice()) {
                    assert!((a - b).abs() < 1e-12, "workers={workers}: {a} vs {b}");
                }
            }
        }
    }

    #[test]
    fn rejects_accumulator_of_another_architecture() {
        let mut net = Network::build(&[2, 2, 1]).unwrap();
        let mut grad = Network::build(&[2, 3, 1]).unwrap();
        let (inputs, targets) = dataset();
        assert!(matches!(
            backprop(&mut net, &mut grad, &inputs, &targets),
            Err(Error::ShapeMismatch { op: "gradient accumulator", .. })
        ));
    }

    #[test]
    fn rejects_mismatched_dataset_rows() {
        let mut net = Network::build(&[2, 2, 1]).unwrap();
        let mut grad = net.clone();
        let (inputs, _) = dataset();
        let targets = Matrix::alloc(3, 1).unwrap();
        assert!(backprop(&mut net, &mut grad, &inputs, &targets).is_err());
    }
}
