//! Tensor I/O and Result Processing

pub mod common;
pub mod preprocessor;
pub mod postprocessor;
pub mod performance;

pub use common::{INPUT_LEN, INPUT_SHAPE, OUTPUT_LEN, OUTPUT_SHAPE};
pub use preprocessor::{InputTensor, read_input};
pub use postprocessor::{ClassScore, argmax, top_k};
pub use performance::LatencyStats;
