//! ONNX Runtime session module
//!
//! Wraps an `ort` session configured with the requested execution provider
//! and binds the classifier's single input and output by name.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use ndarray::Array4;
use ort::execution_providers::{
    CUDAExecutionProvider, ExecutionProviderDispatch, TensorRTExecutionProvider,
};
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::tensor::TensorElementType;
use ort::value::{TensorRef, ValueType};
use serde::{Deserialize, Serialize};
use crate::error::{BenchError, Result};

/// Execution provider selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExecutionProvider {
    #[default]
    #[serde(rename = "CPU")]
    Cpu,
    #[serde(rename = "CUDA")]
    Cuda,
    #[serde(rename = "TensorRT")]
    TensorRt,
}

impl ExecutionProvider {
    pub const NAMES: [&'static str; 3] = ["CPU", "CUDA", "TensorRT"];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            Self::Cuda => "CUDA",
            Self::TensorRt => "TensorRT",
        }
    }

    /// Provider registration for the session builder.
    ///
    /// CPU needs none; ONNX Runtime always falls back to it. GPU providers
    /// fail session creation instead of silently running on the CPU.
    fn dispatch(&self, device_id: i32) -> Option<ExecutionProviderDispatch> {
        match self {
            Self::Cpu => None,
            Self::Cuda => Some(
                CUDAExecutionProvider::default()
                    .with_device_id(device_id)
                    .build()
                    .error_on_failure(),
            ),
            Self::TensorRt => Some(
                TensorRTExecutionProvider::default()
                    .with_device_id(device_id)
                    .build()
                    .error_on_failure(),
            ),
        }
    }
}

impl FromStr for ExecutionProvider {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "CPU" => Ok(Self::Cpu),
            "CUDA" => Ok(Self::Cuda),
            "TensorRT" => Ok(Self::TensorRt),
            other => Err(BenchError::UnsupportedProvider(other.to_string())),
        }
    }
}

impl fmt::Display for ExecutionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub provider: ExecutionProvider,
    pub device_id: i32,
    /// 0 disables graph optimization, 3 enables all of it
    pub optimization_level: u8,
    /// 0 lets ONNX Runtime choose
    pub intra_op_num_threads: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            provider: ExecutionProvider::Cpu,
            device_id: 0,
            optimization_level: 3,
            intra_op_num_threads: 0,
        }
    }
}

impl SessionConfig {
    fn graph_optimization_level(&self) -> GraphOptimizationLevel {
        match self.optimization_level {
            0 => GraphOptimizationLevel::Disable,
            1 => GraphOptimizationLevel::Level1,
            2 => GraphOptimizationLevel::Level2,
            _ => GraphOptimizationLevel::Level3,
        }
    }
}

/// Classifier inference session
pub struct ClassifierSession {
    session: Session,
    provider: ExecutionProvider,
    input_name: String,
    output_name: String,
}

impl fmt::Debug for ClassifierSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierSession")
            .field("provider", &self.provider)
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .finish()
    }
}

impl ClassifierSession {
    /// Load the model and bind its first input and output.
    pub fn new(model_path: &Path, config: &SessionConfig) -> Result<Self> {
        if !model_path.exists() {
            return Err(BenchError::onnx(format!(
                "ONNX model file does not exist: {}",
                model_path.display()
            )));
        }

        let mut builder = Session::builder()
            .map_err(builder_err)?
            .with_optimization_level(config.graph_optimization_level())
            .map_err(builder_err)?;

        if config.intra_op_num_threads > 0 {
            builder = builder
                .with_intra_threads(config.intra_op_num_threads)
                .map_err(builder_err)?;
        }

        if let Some(provider) = config.provider.dispatch(config.device_id) {
            builder = builder.with_execution_providers([provider]).map_err(|e| {
                BenchError::onnx(format!("Failed to register {} provider: {}", config.provider, e))
            })?;
        }

        let session = builder.commit_from_file(model_path).map_err(|e| {
            BenchError::onnx(format!("Failed to load model {}: {}", model_path.display(), e))
        })?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| BenchError::onnx("Model has no inputs"))?;
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| BenchError::onnx("Model has no outputs"))?;

        log::info!("ONNX model loaded successfully ({} provider)", config.provider);
        log::info!("Input: {}, output: {}", input_name, output_name);

        Ok(Self {
            session,
            provider: config.provider,
            input_name,
            output_name,
        })
    }

    pub fn input_count(&self) -> usize {
        self.session.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.session.outputs.len()
    }

    /// Problems with the model signature that do not prevent a run.
    pub fn signature_warnings(&self) -> Vec<String> {
        log::debug!("Model has {} inputs, {} outputs", self.input_count(), self.output_count());

        let input_types: Vec<Option<TensorElementType>> = self
            .session
            .inputs
            .iter()
            .map(|input| element_type(&input.input_type))
            .collect();
        let output_types: Vec<Option<TensorElementType>> = self
            .session
            .outputs
            .iter()
            .map(|output| element_type(&output.output_type))
            .collect();

        signature_warnings(&input_types, &output_types)
    }

    /// Run one blocking inference and copy the first output into `output`.
    pub fn run(&mut self, input: &Array4<f32>, output: &mut [f32]) -> Result<()> {
        let tensor = TensorRef::from_array_view(input)?;
        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => tensor])
            .map_err(|e| BenchError::onnx(format!("ONNX inference failed: {}", e)))?;

        let (_shape, data) = outputs[self.output_name.as_str()].try_extract_tensor::<f32>()?;
        copy_output(data, output);

        Ok(())
    }

    /// Get session information
    pub fn session_info(&self) -> SessionInfo {
        SessionInfo {
            provider: self.provider,
            inputs: self
                .session
                .inputs
                .iter()
                .map(|input| (input.name.clone(), input.input_type.to_string()))
                .collect(),
            outputs: self
                .session
                .outputs
                .iter()
                .map(|output| (output.name.clone(), output.output_type.to_string()))
                .collect(),
        }
    }
}

/// Copy the session output into the caller's buffer.
///
/// On a length mismatch only the common prefix is copied; the rest of
/// `output` keeps its previous contents.
fn copy_output(data: &[f32], output: &mut [f32]) {
    if data.len() != output.len() {
        log::warn!(
            "Output has {} elements, expected {}; copying the common prefix",
            data.len(),
            output.len()
        );
    }
    let n = data.len().min(output.len());
    output[..n].copy_from_slice(&data[..n]);
}

fn element_type(value_type: &ValueType) -> Option<TensorElementType> {
    match value_type {
        ValueType::Tensor { ty, .. } => Some(*ty),
        _ => None,
    }
}

fn builder_err<E: fmt::Display>(e: E) -> BenchError {
    BenchError::onnx(format!("Failed to configure session: {}", e))
}

/// Count and element-type checks for a single-input, single-output f32 classifier.
fn signature_warnings(
    input_types: &[Option<TensorElementType>],
    output_types: &[Option<TensorElementType>],
) -> Vec<String> {
    let mut warnings = Vec::new();

    if input_types.len() != 1 || output_types.len() != 1 {
        warnings.push(format!(
            "Unsupported Model: expected 1 input and 1 output, found {} and {}",
            input_types.len(),
            output_types.len()
        ));
    }
    if let Some(ty) = input_types.first() {
        if *ty != Some(TensorElementType::Float32) {
            warnings.push(format!("Unsupported input type: {:?}, expected float32 tensor", ty));
        }
    }
    if let Some(ty) = output_types.first() {
        if *ty != Some(TensorElementType::Float32) {
            warnings.push(format!("Unsupported output type: {:?}, expected float32 tensor", ty));
        }
    }

    warnings
}

/// Session information
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub provider: ExecutionProvider,
    /// (name, type) pairs
    pub inputs: Vec<(String, String)>,
    pub outputs: Vec<(String, String)>,
}

impl SessionInfo {
    pub fn print(&self) {
        println!("=== ONNX Session Information ===");
        println!("Execution provider: {}", self.provider);

        println!("\nInput information:");
        for (i, (name, ty)) in self.inputs.iter().enumerate() {
            println!("  [{}] {} - {}", i, name, ty);
        }

        println!("\nOutput information:");
        for (i, (name, ty)) in self.outputs.iter().enumerate() {
            println!("  [{}] {} - {}", i, name, ty);
        }
        println!("==================");
    }
}
