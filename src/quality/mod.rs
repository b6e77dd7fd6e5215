//! Quality gates that mine or measure the project
//!
//! - **changelog**: changelog entries mined from the latest tag range
//! - **perf**: median-of-three performance regression gate

pub mod changelog;
pub mod perf;
