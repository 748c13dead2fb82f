use crate::error::{Error, Result};
use crate::math::matrix::MatrixView;
use crate::network::network::Network;

/// Checks that `inputs`/`targets` describe the same number of examples and
/// match the network's input and output widths.
pub(crate) fn check_dataset(
    net: &Network,
    inputs: &MatrixView<'_>,
    targets: &MatrixView<'_>,
) -> Result<()> {
    if inputs.rows() != targets.rows() {
        return Err(Error::ShapeMismatch {
            op: "dataset rows",
            left: inputs.shape(),
            right: targets.shape(),
        });
    }
    if inputs.cols() != net.input().cols() {
        return Err(Error::ShapeMismatch {
            op: "network input",
            left: inputs.shape(),
            right: net.input().shape(),
        });
    }
    if targets.cols() != net.output().cols() {
        return Err(Error::ShapeMismatch {
            op: "network output",
            left: targets.shape(),
            right: net.output().shape(),
        });
    }
    if inputs.rows() == 0 {
        return Err(Error::EmptyDataset);
    }
    Ok(())
}

/// Mean over examples of `Σ_j (output_j - target_j)²`.
///
/// Runs one forward pass per row, so `net` is left holding the last
/// example's activations.
pub fn cost<'a, 'b>(
    net: &mut Network,
    inputs: impl Into<MatrixView<'a>>,
    targets: impl Into<MatrixView<'b>>,
) -> Result<f64> {
    let (inputs, targets) = (inputs.into(), targets.into());
    check_dataset(net, &inputs, &targets)?;

    let n = inputs.rows();
    let mut total = 0.0;
    for i in 0..n {
        net.input_mut().copy_from(inputs.row(i))?;
        net.forward();
        let out = net.output();
        for j in 0..targets.cols() {
            let d = out.at(0, j) - targets.at(i, j);
            total += d * d;
        }
    }

    Ok(total / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::matrix::Matrix;

    #[test]
    fn zeroed_network_costs_a_quarter_per_output() {
        // Every output is 0.5, so each squared error is 0.25.
        let mut net = Network::build(&[2, 1]).unwrap();
        let inputs = Matrix::from_data(vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let targets = Matrix::from_data(vec![vec![0.0], vec![1.0]]).unwrap();
        assert_eq!(cost(&mut net, &inputs, &targets).unwrap(), 0.25);
    }

    #[test]
    fn cost_rejects_mismatched_datasets() {
        let mut net = Network::build(&[2, 1]).unwrap();
        let inputs = Matrix::alloc(4, 2).unwrap();

        let short = Matrix::alloc(3, 1).unwrap();
        assert!(matches!(
            cost(&mut net, &inputs, &short),
            Err(Error::ShapeMismatch { op: "dataset rows", .. })
        ));

        let wide = Matrix::alloc(4, 2).unwrap();
        assert!(matches!(
            cost(&mut net, &inputs, &wide),
            Err(Error::ShapeMismatch { op: "network output", .. })
        ));

        let narrow_inputs = Matrix::alloc(4, 1).unwrap();
        let targets = Matrix::alloc(4, 1).unwrap();
        assert!(matches!(
            cost(&mut net, &narrow_inputs, &targets),
            Err(Error::ShapeMismatch { op: "network input", .. })
        ));
    }

    #[test]
    fn cost_of_empty_dataset_is_an_error() {
        let mut net = Network::build(&[2, 1]).unwrap();
        let inputs = Matrix::alloc(0, 2).unwrap();
        let targets = Matrix::alloc(0, 1).unwrap();
        assert_eq!(cost(&mut net, &inputs, &targets), Err(Error::EmptyDataset));
    }

    #[test]
    fn cost_leaves_last_example_in_activations() {
        let mut net = Network::build(&[2, 1]).unwrap();
        let inputs = Matrix::from_data(vec![vec![0.0, 1.0], vec![0.7, 0.2]]).unwrap();
        let targets = Matrix::alloc(2, 1).unwrap();
        cost(&mut net, &inputs, &targets).unwrap();
        assert_eq!(net.input().as_slice(), &[0.7, 0.2]);
    }
}
