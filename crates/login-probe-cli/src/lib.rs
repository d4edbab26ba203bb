//! login-probe CLI library
//!
//! Argument parsing, configuration layering, and result reporting for the
//! `login-probe` binary.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
pub mod logging;
mod output;
mod runner;

pub use commands::{Cli, ColorArg, Commands, ConfigArgs, FormatArg, RunArgs, ScenarioArg, TargetArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{summary_line, Reporter};
pub use runner::{execute, harness_config, selected_scenarios};
