//! ONNX Inference Module

pub mod model;
pub mod session;
pub mod inference;

pub use model::ModelMetadata;
pub use session::{ClassifierSession, ExecutionProvider, SessionConfig, SessionInfo};
pub use inference::{BenchmarkConfig, BenchmarkEngine, BenchmarkResult, Infer};
