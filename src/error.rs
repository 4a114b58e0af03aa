//! Error Types

use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("Config error: {message}")]
    Config { message: String },

    #[error("ONNX error: {message}")]
    Onnx { message: String },

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("Input error: {message}")]
    Input { message: String },

    #[error("Unsupported Option `{0}`")]
    UnsupportedProvider(String),
}

impl BenchError {
    pub fn config<S: Into<String>>(msg: S) -> Self { Self::Config { message: msg.into() } }
    pub fn onnx<S: Into<String>>(msg: S) -> Self { Self::Onnx { message: msg.into() } }
    pub fn io<S: Into<String>>(msg: S) -> Self { Self::Io { message: msg.into() } }
    pub fn input<S: Into<String>>(msg: S) -> Self { Self::Input { message: msg.into() } }

    /// Process exit code for this error.
    ///
    /// Only an unknown provider exits with -1, matching the usage error
    /// raised for malformed arguments. Everything else, including config
    /// validation failures such as a zero run count, exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnsupportedProvider(_) => -1,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;

impl From<std::io::Error> for BenchError {
    fn from(err: std::io::Error) -> Self { Self::io(err.to_string()) }
}

impl From<ort::Error> for BenchError {
    fn from(err: ort::Error) -> Self { Self::onnx(format!("ORT: {}", err)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = BenchError::config("test");
        assert!(e.to_string().contains("Config"));

        let e = BenchError::UnsupportedProvider("OpenVINO".to_string());
        assert_eq!(e.to_string(), "Unsupported Option `OpenVINO`");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(BenchError::UnsupportedProvider("x".into()).exit_code(), -1);
        assert_eq!(BenchError::onnx("load failed").exit_code(), 1);
        assert_eq!(BenchError::io("missing").exit_code(), 1);
        assert_eq!(BenchError::config("Run count must be greater than 0").exit_code(), 1);
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let e: BenchError = io.into();
        assert!(matches!(e, BenchError::Io { .. }));
        assert!(e.to_string().contains("no such file"));
    }
}
