pub mod error;
pub mod math;
pub mod activation;
pub mod network;
pub mod loss;
pub mod gradient;
pub mod optim;
pub mod train;
pub mod dataset;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::matrix::{Matrix, MatrixView, MatrixViewMut};
pub use network::network::Network;
pub use loss::mse::cost;
pub use gradient::{backprop, backprop_parallel, fdiff, GradientMethod};
pub use optim::gd::{apply, GradientDescent};
pub use train::{train_loop, StepStats, TrainConfig};
pub use dataset::Dataset;
