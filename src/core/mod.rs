//! Core building blocks shared by every task
//!
//! - **config**: gantry.toml parsing and validation
//! - **context**: project root, config and command runner, built once per run
//! - **error**: error categories, help messages and exit codes
//! - **exec**: external command execution (argv templates, fail on non-zero)
//! - **files**: directory + extension file set resolution
//! - **vcs**: git operations via the system git binary

pub mod config;
pub mod context;
pub mod error;
pub mod exec;
pub mod files;
pub mod vcs;
