//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    completions::CompletionsArgs, run::RunArgs, schema::SchemaArgs, submit::SubmitArgs,
    validate::ValidateArgs,
};

#[derive(Parser)]
#[command(name = "regwiz")]
#[command(author, version, about = "Multi-step registration wizard")]
#[command(long_about = "A multi-step registration wizard for the terminal: each step's fields are validated against the registration schema before the wizard moves on.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the registration wizard interactively
    Run(RunArgs),

    /// Drive the wizard non-interactively from a record file
    Submit(SubmitArgs),

    /// Validate record files against the registration schema
    Validate(ValidateArgs),

    /// List the wizard steps and the fields each one collects
    Steps,

    /// Show the registration schema
    Schema(SchemaArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// JSON format (for programming)
    Json,
}
