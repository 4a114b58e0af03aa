//! Configuration management for the benchmark

use crate::error::{BenchError, Result};
use crate::onnx::{BenchmarkConfig, ExecutionProvider, SessionConfig};
use crate::processing::OUTPUT_LEN;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Upper bound on timed runs
const MAX_RUNS: usize = 100_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input_path: PathBuf,
    pub model: ModelConfig,
    pub benchmark: RunConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: PathBuf,
    pub provider: ExecutionProvider,
    pub device_id: i32,
    pub optimization_level: u8,
    pub inference_threads: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub runs: usize,
    pub warmup_runs: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub top_k: usize,
    pub verbose: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("model.onnx"),
            provider: ExecutionProvider::Cpu,
            device_id: 0,
            optimization_level: 3,
            inference_threads: 0,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            runs: 20,
            warmup_runs: 0,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            top_k: 1,
            verbose: false,
        }
    }
}

impl Config {
    /// Get model path (convenience method)
    pub fn model_path(&self) -> &PathBuf {
        &self.model.path
    }

    pub fn provider(&self) -> ExecutionProvider {
        self.model.provider
    }

    pub fn verbose(&self) -> bool {
        self.output.verbose
    }

    pub fn top_k(&self) -> usize {
        self.output.top_k
    }

    /// Session settings derived from the model section
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            provider: self.model.provider,
            device_id: self.model.device_id,
            optimization_level: self.model.optimization_level,
            intra_op_num_threads: self.model.inference_threads,
        }
    }

    /// Loop settings derived from the benchmark section
    pub fn benchmark_config(&self) -> BenchmarkConfig {
        BenchmarkConfig {
            runs: self.benchmark.runs,
            warmup_runs: self.benchmark.warmup_runs,
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "classbench", about = "ONNX Runtime image-classifier latency benchmark", version)]
pub struct Args {
    #[arg(value_name = "MODEL_PATH", help = "ONNX model file path")]
    pub model: PathBuf,

    #[arg(
        value_name = "INPUT_PATH",
        help = "Raw little-endian float32 input tensor (1x3x224x224)"
    )]
    pub input: PathBuf,

    #[arg(value_name = "CPU|CUDA|TensorRT", help = "Execution provider")]
    pub provider: String,

    #[arg(short = 'n', long = "runs", help = "Number of timed inference runs [default: 20]")]
    pub runs: Option<usize>,

    #[arg(short = 'w', long = "warmup", help = "Number of untimed warm-up runs [default: 0]")]
    pub warmup: Option<usize>,

    #[arg(
        short = 't',
        long = "threads",
        help = "Intra-op thread count, 0 lets ONNX Runtime decide"
    )]
    pub threads: Option<usize>,

    #[arg(short = 'd', long = "device-id", help = "GPU device id for CUDA/TensorRT")]
    pub device_id: Option<i32>,

    #[arg(short = 'O', long = "opt-level", help = "Graph optimization level (0-3)")]
    pub opt_level: Option<u8>,

    #[arg(short = 'k', long = "top-k", help = "Also print the K best classes")]
    pub top_k: Option<usize>,

    #[arg(short = 'c', long = "config", help = "Config file path (TOML format)")]
    pub config_file: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", help = "Enable verbose output mode")]
    pub verbose: bool,
}

impl Config {
    /// Create config from command line arguments and config file
    ///
    /// The provider flag is checked first, so an unknown provider fails
    /// before any file is touched.
    pub fn from_args_and_config(args: Args) -> Result<Self> {
        let provider: ExecutionProvider = args.provider.parse()?;

        let mut config = if let Some(config_path) = &args.config_file {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };

        // Command line arguments override config file settings
        config.model.path = args.model;
        config.input_path = args.input;
        config.model.provider = provider;
        if let Some(runs) = args.runs {
            config.benchmark.runs = runs;
        }
        if let Some(warmup) = args.warmup {
            config.benchmark.warmup_runs = warmup;
        }
        if let Some(threads) = args.threads {
            config.model.inference_threads = threads;
        }
        if let Some(device_id) = args.device_id {
            config.model.device_id = device_id;
        }
        if let Some(level) = args.opt_level {
            config.model.optimization_level = level;
        }
        if let Some(top_k) = args.top_k {
            config.output.top_k = top_k;
        }
        config.output.verbose |= args.verbose;

        config.validate()?;

        Ok(config)
    }

    /// Load config from TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| BenchError::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| BenchError::config(format!("Failed to parse config file: {}", e)))
    }

    /// Validate configuration parameter validity
    pub fn validate(&self) -> Result<()> {
        if self.benchmark.runs == 0 {
            return Err(BenchError::config("Run count must be greater than 0"));
        }
        if self.benchmark.runs > MAX_RUNS {
            return Err(BenchError::config(format!("Run count cannot exceed {}", MAX_RUNS)));
        }

        if self.model.optimization_level > 3 {
            return Err(BenchError::config("Optimization level must be in range [0, 3]"));
        }

        if self.model.device_id < 0 {
            return Err(BenchError::config("Device id cannot be negative"));
        }

        if self.model.inference_threads > num_cpus::get() * 2 {
            return Err(BenchError::config(
                "Inference thread count cannot exceed 2x logical CPU cores",
            ));
        }

        if self.output.top_k == 0 || self.output.top_k > OUTPUT_LEN {
            return Err(BenchError::config(format!("Top-k must be in range [1, {}]", OUTPUT_LEN)));
        }

        Ok(())
    }

    /// Save config to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| BenchError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| BenchError::config(format!("Failed to write config file: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(provider: &str) -> Args {
        Args::try_parse_from(["classbench", "resnet50.onnx", "input.bin", provider]).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.benchmark.runs, 20);
        assert_eq!(config.benchmark.warmup_runs, 0);
        assert_eq!(config.provider(), ExecutionProvider::Cpu);
        assert_eq!(config.top_k(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.benchmark.runs = 0;
        assert!(config.validate().is_err());
        config.benchmark.runs = 20;

        config.model.optimization_level = 4;
        assert!(config.validate().is_err());
        config.model.optimization_level = 3;

        config.model.device_id = -1;
        assert!(config.validate().is_err());
        config.model.device_id = 0;

        config.output.top_k = OUTPUT_LEN + 1;
        assert!(config.validate().is_err());
        config.output.top_k = 5;

        config.model.inference_threads = num_cpus::get() * 2 + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_positional_arguments() {
        let config = Config::from_args_and_config(args("TensorRT")).unwrap();
        assert_eq!(config.model_path(), &PathBuf::from("resnet50.onnx"));
        assert_eq!(config.input_path, PathBuf::from("input.bin"));
        assert_eq!(config.provider(), ExecutionProvider::TensorRt);
        assert_eq!(config.benchmark.runs, 20);
    }

    #[test]
    fn test_wrong_argument_count() {
        assert!(Args::try_parse_from(["classbench", "model.onnx", "input.bin"]).is_err());
        assert!(Args::try_parse_from(["classbench", "a", "b", "CPU", "extra"]).is_err());
    }

    #[test]
    fn test_unsupported_provider_fails_before_loading() {
        // Config file does not exist; the provider check must come first.
        let mut a = args("Vulkan");
        a.config_file = Some(PathBuf::from("missing/config.toml"));

        match Config::from_args_and_config(a) {
            Err(BenchError::UnsupportedProvider(name)) => assert_eq!(name, "Vulkan"),
            other => panic!("expected unsupported provider, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_overrides() {
        let a = Args::try_parse_from([
            "classbench", "m.onnx", "i.bin", "CUDA", "-n", "1", "-w", "3", "-d", "1", "-O", "0",
            "-k", "5", "-v",
        ])
        .unwrap();
        let config = Config::from_args_and_config(a).unwrap();

        assert_eq!(config.benchmark.runs, 1);
        assert_eq!(config.benchmark.warmup_runs, 3);
        assert_eq!(config.model.device_id, 1);
        assert_eq!(config.model.optimization_level, 0);
        assert_eq!(config.top_k(), 5);
        assert!(config.verbose());

        let session = config.session_config();
        assert_eq!(session.provider, ExecutionProvider::Cuda);
        assert_eq!(session.device_id, 1);
        assert_eq!(config.benchmark_config().runs, 1);
    }

    #[test]
    fn test_config_file_operations() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.benchmark.runs = 50;
        config.model.provider = ExecutionProvider::Cuda;

        assert!(config.save_to_file(&config_path).is_ok());
        assert!(config_path.exists());

        let loaded_config = Config::from_file(&config_path).unwrap();
        assert_eq!(loaded_config.benchmark.runs, 50);
        assert_eq!(loaded_config.provider(), ExecutionProvider::Cuda);
    }

    #[test]
    fn test_config_file_is_overridden_by_cli() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bench.toml");
        std::fs::write(
            &config_path,
            concat!(
                "[model]\nprovider = \"CUDA\"\ninference_threads = 1\n\n",
                "[benchmark]\nruns = 7\nwarmup_runs = 2\n",
            ),
        )
        .unwrap();

        let mut a = args("CPU");
        a.config_file = Some(config_path);
        a.runs = Some(9);
        let config = Config::from_args_and_config(a).unwrap();

        // provider positional always wins, unset flags keep file values
        assert_eq!(config.provider(), ExecutionProvider::Cpu);
        assert_eq!(config.benchmark.runs, 9);
        assert_eq!(config.benchmark.warmup_runs, 2);
        assert_eq!(config.model.inference_threads, 1);
    }

    #[test]
    fn test_bad_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bad.toml");
        std::fs::write(&config_path, "[benchmark]\nruns = \"many\"\n").unwrap();

        assert!(matches!(Config::from_file(&config_path), Err(BenchError::Config { .. })));
    }
}
