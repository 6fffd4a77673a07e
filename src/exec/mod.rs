// src/exec/mod.rs

//! Task actions backed by shell commands.
//!
//! The scheduler runs actions synchronously inside a sweep, so commands are
//! spawned with `std::process` and waited on before the sweep continues.
//!
//! - [`command`] provides [`CommandAction`], an [`Action`](crate::task::Action)
//!   that runs one configured command.

pub mod command;

pub use command::{CommandAction, CommandOutcome};
