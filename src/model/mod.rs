// model/ — Classifier architectures.

pub mod simple_cnn;

pub use simple_cnn::SimpleCnn;
