//! Performance regression gate
//!
//! Runs a fixed workload three times, one after another, and compares the
//! median wall-clock duration against a limit normalized by the host's clock
//! speed: `limit_ms = multiplier / cpu_mhz`.
//!
//! The median (second of three after sorting) is the decision statistic, so a
//! single cold-cache run cannot fail the gate on its own.

use crate::core::error::{ConfigError, GateError, GateResult, ValidationError};
use crate::core::exec::{CommandRunner, CommandSpec};
use std::time::Instant;

/// Number of timed trials per invocation
pub const TRIALS: usize = 3;

/// Limit in milliseconds for a host of the given clock speed
pub fn threshold_ms(multiplier: f64, cpu_mhz: f64) -> f64 {
  multiplier / cpu_mhz
}

/// Median of the samples: sort ascending, take the middle element
///
/// For an even count the upper middle is used.
pub fn median(samples: &[f64]) -> GateResult<f64> {
  if samples.is_empty() {
    return Err(GateError::Validation(ValidationError::NoSamples));
  }
  let mut sorted = samples.to_vec();
  sorted.sort_by(|a, b| a.total_cmp(b));
  Ok(sorted[sorted.len() / 2])
}

/// Result of one gate invocation
#[derive(Debug, Clone, PartialEq)]
pub struct PerfOutcome {
  /// Durations in trial order (milliseconds)
  pub samples: Vec<f64>,
  pub median_ms: f64,
  pub limit_ms: f64,
}

impl PerfOutcome {
  /// Apply the decision rule to collected samples
  pub fn decide(samples: Vec<f64>, limit_ms: f64) -> GateResult<Self> {
    let median_ms = median(&samples)?;
    Ok(Self {
      samples,
      median_ms,
      limit_ms,
    })
  }

  pub fn passed(&self) -> bool {
    self.median_ms <= self.limit_ms
  }

  /// Convert a failing outcome into a `PerformanceRegression` error
  pub fn into_result(self) -> GateResult<Self> {
    if self.passed() {
      Ok(self)
    } else {
      Err(GateError::Validation(ValidationError::PerformanceRegression {
        median_ms: self.median_ms,
        limit_ms: self.limit_ms,
      }))
    }
  }
}

/// Where the gate is in its run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
  /// About to run trial n (1-based)
  Trial(usize),
  Decide,
}

impl Phase {
  fn next(self) -> Self {
    match self {
      Phase::Trial(n) if n < TRIALS => Phase::Trial(n + 1),
      Phase::Trial(_) | Phase::Decide => Phase::Decide,
    }
  }
}

/// Timed, strictly sequential trials of one workload
pub struct PerfGate<'a> {
  runner: &'a dyn CommandRunner,
  workload: CommandSpec,
  limit_ms: f64,
}

impl<'a> PerfGate<'a> {
  pub fn new(runner: &'a dyn CommandRunner, workload: CommandSpec, limit_ms: f64) -> Self {
    Self {
      runner,
      workload,
      limit_ms,
    }
  }

  /// Run all trials and decide
  ///
  /// A trial whose command fails aborts the gate immediately; no median is
  /// computed from a partial sample set.
  pub fn run(&self, mut on_sample: impl FnMut(usize, f64)) -> GateResult<PerfOutcome> {
    let mut samples = Vec::with_capacity(TRIALS);
    let mut phase = Phase::Trial(1);

    loop {
      match phase {
        Phase::Trial(n) => {
          let started = Instant::now();
          // Output is captured so terminal I/O does not count against the budget
          self.runner.capture(&self.workload)?;
          let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
          log::debug!("perf trial {}/{}: {:.1}ms", n, TRIALS, elapsed_ms);
          on_sample(n, elapsed_ms);
          samples.push(elapsed_ms);
        }
        Phase::Decide => return PerfOutcome::decide(samples, self.limit_ms),
      }
      phase = phase.next();
    }
  }
}

/// Detect the processor clock speed in MHz
///
/// Tries `/proc/cpuinfo` first, then `sysctl -n hw.cpufrequency` (Hz).
pub fn detect_cpu_mhz(runner: &dyn CommandRunner) -> GateResult<f64> {
  if let Ok(cpuinfo) = std::fs::read_to_string("/proc/cpuinfo")
    && let Some(mhz) = parse_cpuinfo_mhz(&cpuinfo)
  {
    return Ok(mhz);
  }

  let sysctl = CommandSpec::new("sysctl", ".").arg("-n").arg("hw.cpufrequency");
  if let Ok(out) = runner.capture(&sysctl)
    && let Ok(hz) = out.trim().parse::<f64>()
    && hz > 0.0
  {
    return Ok(hz / 1_000_000.0);
  }

  Err(GateError::Config(ConfigError::CpuSpeedUnknown))
}

/// First `cpu MHz` value in /proc/cpuinfo text
fn parse_cpuinfo_mhz(cpuinfo: &str) -> Option<f64> {
  cpuinfo
    .lines()
    .filter_map(|line| line.split_once(':'))
    .filter(|(key, _)| key.trim() == "cpu MHz")
    .filter_map(|(_, value)| value.trim().parse::<f64>().ok())
    .find(|mhz| *mhz > 0.0)
}
