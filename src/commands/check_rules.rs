//! `gantry check-rules` - rule consistency validation
//!
//! Each violation is printed as it is found; the task fails once at the end
//! with the total count.

use crate::checks::check_project;
use crate::core::context::GateContext;
use crate::core::error::{GateResult, ValidationError};

/// Run the consistency validator
pub fn run_check_rules(ctx: &GateContext) -> GateResult<()> {
  println!("🔍 Checking rule consistency");

  let report = check_project(ctx.root(), &ctx.config.files, |violation| {
    eprintln!("   ❌ {}", violation);
  })?;

  if !report.passed() {
    return Err(
      ValidationError::Consistency {
        errors: report.error_count(),
        rules: report.rules_checked,
      }
      .into(),
    );
  }

  println!("✅ {} rule(s) consistent", report.rules_checked);
  Ok(())
}
