//! Latency Statistics Module
//!
//! Summarizes per-run inference latencies collected by the benchmark loop.
//! Samples are whole microseconds measured with a monotonic clock.

use std::fmt;
use std::time::Duration;
use super::common::format_ms;

/// Latency statistics over a set of timed runs
#[derive(Debug, Clone, PartialEq)]
pub struct LatencyStats {
    /// Samples in ascending order (microseconds)
    samples_us: Vec<u64>,
    /// Fastest run
    pub min_us: u64,
    /// Slowest run
    pub max_us: u64,
    /// Arithmetic mean over all runs
    pub mean_us: f64,
    /// Median run
    pub median_us: f64,
    /// Mean without the single fastest and slowest run
    pub trimmed_mean_us: f64,
}

impl LatencyStats {
    /// Build statistics from raw samples. Returns `None` for an empty set.
    pub fn from_samples(mut samples_us: Vec<u64>) -> Option<Self> {
        if samples_us.is_empty() {
            return None;
        }
        samples_us.sort_unstable();

        let n = samples_us.len();
        let min_us = samples_us[0];
        let max_us = samples_us[n - 1];
        let sum: u128 = samples_us.iter().map(|&s| s as u128).sum();
        let mean_us = sum as f64 / n as f64;

        let median_us = if n % 2 == 1 {
            samples_us[n / 2] as f64
        } else {
            (samples_us[n / 2 - 1] as f64 + samples_us[n / 2] as f64) / 2.0
        };

        // Nothing remains after trimming fewer than three samples.
        let trimmed_mean_us = if n > 2 {
            (sum - min_us as u128 - max_us as u128) as f64 / (n - 2) as f64
        } else {
            mean_us
        };

        Some(Self {
            samples_us,
            min_us,
            max_us,
            mean_us,
            median_us,
            trimmed_mean_us,
        })
    }

    /// Build statistics from measured durations, truncated to microseconds.
    pub fn from_durations(durations: &[Duration]) -> Option<Self> {
        Self::from_samples(durations.iter().map(|d| d.as_micros() as u64).collect())
    }

    /// Sorted samples in microseconds
    pub fn samples(&self) -> &[u64] {
        &self.samples_us
    }

    pub fn run_count(&self) -> usize {
        self.samples_us.len()
    }

    /// Whether the average excludes the extreme samples
    pub fn is_trimmed(&self) -> bool {
        self.samples_us.len() > 2
    }

    /// Inferences per second implied by the trimmed mean
    pub fn throughput(&self) -> f64 {
        if self.trimmed_mean_us > 0.0 {
            1_000_000.0 / self.trimmed_mean_us
        } else {
            0.0
        }
    }

    pub fn print(&self) {
        print!("{}", self);
        log::debug!(
            "Median {}, untrimmed mean {}, {:.1} inferences/s",
            format_ms(self.median_us),
            format_ms(self.mean_us),
            self.throughput()
        );
    }
}

/// Report lines: run count, min, max and trimmed average.
impl fmt::Display for LatencyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run inference {} times.", self.run_count())?;
        writeln!(f, "Min time = {}", format_ms(self.min_us as f64))?;
        writeln!(f, "Max time = {}", format_ms(self.max_us as f64))?;
        writeln!(f, "Average time = {}", format_ms(self.trimmed_mean_us))
    }
}
