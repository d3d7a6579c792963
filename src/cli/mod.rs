//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for LabRelay using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// LabRelay - offline-resilient lab test sync
#[derive(Parser, Debug)]
#[command(name = "labrelay")]
#[command(version, about, long_about = None)]
#[command(author = "LabRelay Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "labrelay.toml", env = "LABRELAY_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LABRELAY_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit a batch of lab tests, queueing locally on delivery failure
    Submit(commands::submit::SubmitArgs),

    /// Retry every locally queued batch once
    Drain(commands::drain::DrainArgs),

    /// Show queue contents and abandoned entries
    Status(commands::status::StatusArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
