//! Worklog report CLI library.
//!
//! This crate provides the CLI interface for the worklog reports.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, FetchArgs, PeriodArgs, ReportArgs};
pub use config::Config;
