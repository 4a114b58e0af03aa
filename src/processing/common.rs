//! Tensor geometry shared by the loader, the session and the postprocessor

/// Input tensor shape (NCHW) of ResNet/VGG style classifiers.
pub const INPUT_SHAPE: [usize; 4] = [1, 3, 224, 224];

/// Element count of the input tensor.
pub const INPUT_LEN: usize = INPUT_SHAPE[0] * INPUT_SHAPE[1] * INPUT_SHAPE[2] * INPUT_SHAPE[3];

/// Number of classes scored by the model.
pub const OUTPUT_LEN: usize = 1000;

/// Output tensor shape.
pub const OUTPUT_SHAPE: [usize; 2] = [1, OUTPUT_LEN];

/// Format a microsecond count as milliseconds with microsecond precision.
pub fn format_ms(micros: f64) -> String {
    format!("{:.3} ms", micros / 1000.0)
}
