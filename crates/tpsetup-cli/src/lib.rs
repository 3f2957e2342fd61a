//! Command-line adapter for tpsetup.
//!
//! The binary in `main.rs` parses [`Cli`], composes a [`CliContext`] in
//! [`bootstrap`] and dispatches to [`handlers`].

#![deny(unused_crate_dependencies)]

// Used only by the binary target
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

// Dev-dependencies only exercised by some test modules
#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use zip as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;

pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;
