use std::f64::consts::E;

/// Logistic sigmoid `1 / (1 + e^-x)`, evaluated directly.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + E.powf(-x))
}

/// Sigmoid derivative expressed through the activation `a = sigmoid(x)`.
///
/// Backprop only keeps post-activation values around, so the derivative is
/// taken from `a` instead of the pre-activation `x`.
pub fn sigmoid_prime_from_output(a: f64) -> f64 {
    a * (1.0 - a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_centered_and_saturates() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(40.0) > 1.0 - 1e-12);
        assert!(sigmoid(-40.0) < 1e-12);
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let x = 0.3;
        let h = 1e-6;
        let numeric = (sigmoid(x + h) - sigmoid(x - h)) / (2.0 * h);
        assert!((sigmoid_prime_from_output(sigmoid(x)) - numeric).abs() < 1e-9);
    }
}
