//! Benchmark engine: timed inference loop over a classifier session

use std::time::{Duration, Instant};
use ndarray::Array4;
use crate::error::{BenchError, Result};
use crate::processing::{LatencyStats, OUTPUT_LEN};
use super::ClassifierSession;

#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Timed runs
    pub runs: usize,
    /// Untimed runs before measuring
    pub warmup_runs: usize,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            runs: 20,
            warmup_runs: 0,
        }
    }
}

/// Something that can score one input into a caller-owned buffer.
///
/// Implemented by [`ClassifierSession`]; the loop itself does not depend on
/// ONNX Runtime.
pub trait Infer {
    fn infer(&mut self, input: &Array4<f32>, output: &mut [f32]) -> Result<()>;
}

impl Infer for ClassifierSession {
    fn infer(&mut self, input: &Array4<f32>, output: &mut [f32]) -> Result<()> {
        self.run(input, output)
    }
}

#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub stats: LatencyStats,
    /// Scores from the last timed run
    pub output: Vec<f32>,
}

impl BenchmarkResult {
    pub fn print(&self) {
        self.stats.print();
    }
}

#[derive(Debug)]
pub struct BenchmarkEngine<S: Infer = ClassifierSession> {
    session: S,
    config: BenchmarkConfig,
}

impl<S: Infer> BenchmarkEngine<S> {
    pub fn new(session: S, config: BenchmarkConfig) -> Self {
        log::info!(
            "Creating benchmark engine: {} timed runs, {} warm-up runs",
            config.runs,
            config.warmup_runs
        );
        Self { session, config }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Run the configured number of untimed inferences.
    pub fn warm_up(&mut self, input: &Array4<f32>) -> Result<()> {
        if self.config.warmup_runs == 0 {
            return Ok(());
        }

        log::info!("Starting warm-up...");
        let mut output = vec![0.0f32; OUTPUT_LEN];
        for _ in 0..self.config.warmup_runs {
            self.session.infer(input, &mut output)?;
        }
        log::info!("Warm-up completed");
        Ok(())
    }

    /// Run the timed loop and summarize the latencies.
    pub fn run(&mut self, input: &Array4<f32>) -> Result<BenchmarkResult> {
        if self.config.runs == 0 {
            return Err(BenchError::config("Benchmark needs at least one run"));
        }

        let mut output = vec![0.0f32; OUTPUT_LEN];
        let mut timings: Vec<Duration> = Vec::with_capacity(self.config.runs);

        for i in 0..self.config.runs {
            let start = Instant::now();
            self.session.infer(input, &mut output)?;
            let elapsed = start.elapsed();

            log::debug!("Run {}: {} us", i + 1, elapsed.as_micros());
            timings.push(elapsed);
        }

        let stats = LatencyStats::from_durations(&timings)
            .ok_or_else(|| BenchError::config("No latency samples collected"))?;

        Ok(BenchmarkResult { stats, output })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::INPUT_SHAPE;

    /// Writes the call number into a fixed class slot.
    struct CountingSession {
        calls: usize,
        fail_after: Option<usize>,
    }

    impl Infer for CountingSession {
        fn infer(&mut self, input: &Array4<f32>, output: &mut [f32]) -> Result<()> {
            if self.fail_after.is_some_and(|n| self.calls >= n) {
                return Err(BenchError::onnx("device lost"));
            }
            self.calls += 1;
            output[42] = input[[0, 0, 0, 0]] + self.calls as f32;
            Ok(())
        }
    }

    fn zero_input() -> Array4<f32> {
        let [n, c, h, w] = INPUT_SHAPE;
        Array4::zeros((n, c, h, w))
    }

    #[test]
    fn test_benchmark_config_default() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.runs, 20);
        assert_eq!(config.warmup_runs, 0);
    }

    #[test]
    fn test_run_collects_one_sample_per_run() {
        let session = CountingSession { calls: 0, fail_after: None };
        let mut engine = BenchmarkEngine::new(session, BenchmarkConfig::default());

        let result = engine.run(&zero_input()).unwrap();
        assert_eq!(result.stats.run_count(), 20);
        assert_eq!(engine.session().calls, 20);
        assert_eq!(result.output.len(), OUTPUT_LEN);
        assert_eq!(result.output[42], 20.0);
    }

    #[test]
    fn test_warm_up_is_untimed() {
        let session = CountingSession { calls: 0, fail_after: None };
        let config = BenchmarkConfig { runs: 3, warmup_runs: 2 };
        let mut engine = BenchmarkEngine::new(session, config);

        let input = zero_input();
        engine.warm_up(&input).unwrap();
        let result = engine.run(&input).unwrap();

        assert_eq!(engine.session().calls, 5);
        assert_eq!(result.stats.run_count(), 3);
    }

    #[test]
    fn test_single_run() {
        let session = CountingSession { calls: 0, fail_after: None };
        let config = BenchmarkConfig { runs: 1, warmup_runs: 0 };
        let mut engine = BenchmarkEngine::new(session, config);

        let result = engine.run(&zero_input()).unwrap();
        assert_eq!(result.stats.run_count(), 1);
        assert_eq!(result.stats.min_us, result.stats.max_us);
    }

    #[test]
    fn test_zero_runs_rejected() {
        let session = CountingSession { calls: 0, fail_after: None };
        let config = BenchmarkConfig { runs: 0, warmup_runs: 0 };
        let mut engine = BenchmarkEngine::new(session, config);
        assert!(engine.run(&zero_input()).is_err());
    }

    #[test]
    fn test_inference_error_propagates() {
        let session = CountingSession { calls: 0, fail_after: Some(4) };
        let mut engine = BenchmarkEngine::new(session, BenchmarkConfig::default());

        let err = engine.run(&zero_input()).unwrap_err();
        assert!(matches!(err, BenchError::Onnx { .. }));
        assert_eq!(engine.session().calls, 4);
    }
}
