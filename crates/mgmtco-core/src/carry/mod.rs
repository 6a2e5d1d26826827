pub mod curve;
pub mod estimator;
