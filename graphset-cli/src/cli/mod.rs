//! Command-line interface for building graphset datasets.
//!
//! `single` decorates the karate club graph and `multi` samples random
//! regular graphs; both print a plain-text summary.

mod commands;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, MultiCommand, SingleCommand, render_summary,
    run_cli,
};

#[cfg(test)]
mod tests;
