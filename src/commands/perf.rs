//! `gantry perf` - performance regression gate

use super::command_for;
use crate::core::context::GateContext;
use crate::core::error::GateResult;
use crate::core::exec::Vars;
use crate::quality::perf::{PerfGate, TRIALS, detect_cpu_mhz, threshold_ms};

/// Run the performance gate
pub fn run_perf(ctx: &GateContext) -> GateResult<()> {
  let perf = &ctx.config.perf;

  let cpu_mhz = match perf.cpu_mhz {
    Some(mhz) => mhz,
    None => detect_cpu_mhz(ctx.runner.as_ref())?,
  };
  let limit_ms = threshold_ms(perf.multiplier, cpu_mhz);
  let workload = command_for("perf", "perf.command", &perf.command, ctx.root(), &[], &Vars::new())?;

  println!(
    "⏱️  Performance check: {} trials of `{}` (CPU {:.0} MHz, limit {:.0}ms)",
    TRIALS,
    workload.display(),
    cpu_mhz,
    limit_ms
  );

  let outcome = PerfGate::new(ctx.runner.as_ref(), workload, limit_ms)
    .run(|n, ms| println!("   Trial {}/{}: {:.0}ms", n, TRIALS, ms))?
    .into_result()?;

  println!("✅ Median {:.0}ms ≤ limit {:.0}ms", outcome.median_ms, outcome.limit_ms);
  Ok(())
}
