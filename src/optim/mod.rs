pub mod gd;

pub use gd::{apply, GradientDescent};
