//! Project consistency checks
//!
//! - **consistency**: every rule implementation has docs (linked from the
//!   index), a default config entry and tests

pub mod consistency;

pub use consistency::check_project;
