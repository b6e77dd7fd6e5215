//! Release orchestration
//!
//! - **version**: release types and the semver bump they announce
//! - **pipeline**: the strictly forward release state machine
//! - **site**: documentation site staging and publishing
//!
//! A release is only ever started after the full test chain passes; once a
//! step with external effect has run (push, publish) a later failure leaves it
//! in place and the remaining steps must be finished by hand.

pub mod pipeline;
pub mod site;
pub mod version;

pub use pipeline::{ReleaseDriver, ReleasePipeline, ReleaseStep};
pub use version::ReleaseType;
