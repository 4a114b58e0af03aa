//! Input Loading - raw little-endian f32 tensor files

use std::fs::File;
use std::io::Read;
use std::path::Path;
use ndarray::Array4;
use crate::error::{BenchError, Result};
use super::common::{INPUT_LEN, INPUT_SHAPE};

/// Size in bytes of one input element
const ELEMENT_SIZE: usize = std::mem::size_of::<f32>();

/// Classifier input buffer
#[derive(Debug, Clone)]
pub struct InputTensor {
    data: Vec<f32>,
    /// Number of elements actually read from the file
    filled: usize,
}

impl InputTensor {
    /// Decode a raw little-endian f32 byte buffer.
    ///
    /// Only the first `INPUT_LEN` complete floats are used. Elements the
    /// buffer does not cover stay zero, and a trailing partial float is
    /// ignored.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut data = vec![0.0f32; INPUT_LEN];
        let mut filled = 0;

        for (slot, chunk) in data.iter_mut().zip(bytes.chunks_exact(ELEMENT_SIZE)) {
            *slot = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            filled += 1;
        }

        Self { data, filled }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn filled(&self) -> usize {
        self.filled
    }

    pub fn is_complete(&self) -> bool {
        self.filled == INPUT_LEN
    }

    /// Shape the buffer as a `[1, 3, 224, 224]` array.
    pub fn into_array(self) -> Result<Array4<f32>> {
        let [n, c, h, w] = INPUT_SHAPE;
        Array4::from_shape_vec((n, c, h, w), self.data)
            .map_err(|e| BenchError::input(format!("Tensor shape conversion failed: {}", e)))
    }
}

/// Read the classifier input from a headerless f32 file.
///
/// Reads at most `INPUT_LEN * 4` bytes. A short file is not an error; it is
/// logged and the remaining elements stay zero.
pub fn read_input<P: AsRef<Path>>(path: P) -> Result<InputTensor> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| {
            BenchError::io(format!("Failed to open input file {}: {}", path.display(), e))
        })?;

    let mut bytes = Vec::with_capacity(INPUT_LEN * ELEMENT_SIZE);
    file.take((INPUT_LEN * ELEMENT_SIZE) as u64)
        .read_to_end(&mut bytes)
        .map_err(|e| {
            BenchError::io(format!("Failed to read input file {}: {}", path.display(), e))
        })?;

    let tensor = InputTensor::from_bytes(&bytes);
    if !tensor.is_complete() {
        log::warn!(
            "Input file {} holds {} of {} floats, remaining elements are zero",
            path.display(),
            tensor.filled(),
            INPUT_LEN
        );
    }
    log::debug!("Loaded {} input bytes from {}", bytes.len(), path.display());

    Ok(tensor)
}
