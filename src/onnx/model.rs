//! ONNX model file metadata

use std::path::{Path, PathBuf};
use crate::error::{BenchError, Result};

/// ONNX model metadata
#[derive(Debug, Clone)]
pub struct ModelMetadata {
    /// Model file path
    pub model_path: PathBuf,
    /// Model name (extracted from filename)
    pub model_name: String,
    /// Model size in bytes
    pub model_size: u64,
}

impl ModelMetadata {
    /// Create metadata from model file path
    pub fn from_path<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            return Err(BenchError::config(format!(
                "Model file does not exist: {}",
                model_path.display()
            )));
        }

        let metadata = std::fs::metadata(model_path)
            .map_err(|e| BenchError::io(format!("Failed to read model file metadata: {}", e)))?;

        let model_name = model_path
            .file_stem()
            .and_then(|name| name.to_str())
            .unwrap_or("unknown")
            .to_string();

        Ok(Self {
            model_path: model_path.to_path_buf(),
            model_name,
            model_size: metadata.len(),
        })
    }

    /// Get human-readable format of model file size
    pub fn size_human_readable(&self) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
        let mut size_f = self.model_size as f64;
        let mut unit_index = 0;

        while size_f >= 1024.0 && unit_index < UNITS.len() - 1 {
            size_f /= 1024.0;
            unit_index += 1;
        }

        format!("{:.2} {}", size_f, UNITS[unit_index])
    }

    pub fn print(&self) {
        println!("=== ONNX Model Information ===");
        println!("Model path: {}", self.model_path.display());
        println!("Model name: {}", self.model_name);
        println!("Model size: {}", self.size_human_readable());
        if self.model_path.extension().is_none_or(|ext| ext != "onnx") {
            println!("Warning: file extension is not .onnx");
        }
    }
}
