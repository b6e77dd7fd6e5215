mod checks;
mod commands;
mod core;
mod quality;
mod release;
mod tasks;
mod ui;
mod utils;

use clap::Parser;
use core::context::GateContext;
use core::error::{GateError, GateResult, print_error};
use std::path::PathBuf;
use tasks::{Orchestrator, TaskRegistry};

/// Build, validate and release a rule-based JavaScript project
#[derive(Parser)]
#[command(name = "gantry")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  /// Tasks to run, in order (prerequisites run first, each task at most once)
  #[arg(value_name = "TASK", default_value = "all")]
  tasks: Vec<String>,

  /// List registered tasks and their prerequisites
  #[arg(long)]
  list: bool,

  /// Print the execution order without running anything
  #[arg(long)]
  dry_run: bool,

  /// Path to gantry.toml (default: searched from the project root)
  #[arg(long, value_name = "PATH")]
  config: Option<PathBuf>,

  /// Project root (default: current directory)
  #[arg(short = 'C', long = "dir", value_name = "PATH")]
  dir: Option<PathBuf>,

  /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn init_logging(verbose: u8) {
  let level = match verbose {
    0 => "warn",
    1 => "debug",
    _ => "trace",
  };
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
    .format_timestamp(None)
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  if let Err(err) = run(cli) {
    handle_error(err);
  }
}

fn run(cli: Cli) -> GateResult<()> {
  let root = match cli.dir {
    Some(dir) => dir,
    None => std::env::current_dir().map_err(|e| GateError::message(format!("Failed to get current directory: {}", e)))?,
  };

  let ctx = GateContext::build(&root, cli.config.as_deref())?;
  let registry = TaskRegistry::builtin(&ctx.config)?;

  if cli.list {
    print_tasks(&registry);
    return Ok(());
  }

  if cli.dry_run {
    let plan = registry.plan(&cli.tasks)?;
    println!("DRY RUN: Would run {} task(s):", plan.len());
    for (i, task) in plan.iter().enumerate() {
      println!("  {}. {}", i + 1, task.name);
    }
    return Ok(());
  }

  Orchestrator::new(&ctx, &registry).run(&cli.tasks)?;
  println!("\n✅ Done: {}", cli.tasks.join(", "));
  Ok(())
}

fn print_tasks(registry: &TaskRegistry) {
  let width = registry.tasks().map(|t| t.name.len()).max().unwrap_or(0);
  println!("📋 Tasks:");
  for task in registry.tasks() {
    if task.deps.is_empty() {
      println!("  {:width$}  {}", task.name, task.description, width = width);
    } else {
      println!(
        "  {:width$}  {} (after: {})",
        task.name,
        task.description,
        task.deps.join(", "),
        width = width
      );
    }
  }
}

fn handle_error(err: GateError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
