//! recipe2unit — component recipes to systemd units.
//!
//! Reads a Greengrass-style component recipe, picks the lifecycle that
//! applies to Linux, writes its install and run scripts, and emits a
//! `ggl.<component>.service` unit that starts the run script through the
//! recipe runner.

pub mod cli;
pub mod core;
pub mod error;

pub use error::{Error, Result};
