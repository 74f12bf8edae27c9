//! `regwiz submit` command - drive the wizard from a record file

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::commands::run::load_values;
use crate::cli::helpers::{masked_values, print_completion, print_field_errors, print_progress};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::submit::SimulatedSubmitter;
use crate::core::wizard::{Advance, WizardController};
use crate::schema::FormSchema;

#[derive(clap::Args, Debug)]
pub struct SubmitArgs {
    /// Record file (YAML or JSON) with the field values
    pub file: PathBuf,

    /// Delay of the simulated submission in milliseconds (default: 2000)
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

pub fn run(args: SubmitArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let values = load_values(&args.file)?;
    let schema = FormSchema::new()?;
    let submitter = SimulatedSubmitter::new(config.submit_delay(args.delay_ms));
    let mut wizard = WizardController::new(schema, Box::new(submitter)).with_values(values);
    let human = global.format == OutputFormat::Auto && !global.quiet;

    while !wizard.is_terminal() {
        if human {
            print_progress(&wizard.progress());
            if wizard.is_submission_step() {
                println!("{} Please wait...", style("⠿").cyan());
            }
        }

        match wizard.advance()? {
            Advance::Moved { .. } | Advance::Submitted { .. } => {}
            Advance::AtTerminal => break,
            Advance::Blocked(errors) => {
                let step = wizard.current_step();
                eprintln!(
                    "{} {} ({}) has {} invalid field(s):",
                    style("✗").red(),
                    step.id,
                    step.name,
                    errors.len()
                );
                print_field_errors(&errors);
                return Err(miette::miette!(
                    "Registration stopped at {}: fix the fields above and retry",
                    step.id
                ));
            }
            Advance::Busy => {
                return Err(miette::miette!("A submission is already in progress"));
            }
        }
    }

    let mut snapshot = wizard.snapshot();
    snapshot.values = masked_values(&snapshot.values);

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&snapshot).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&snapshot).into_diagnostic()?);
        }
        OutputFormat::Auto => {
            if global.quiet {
                if let Some(receipt) = wizard.receipt() {
                    println!("{}", receipt.id);
                }
            } else {
                print_progress(&wizard.progress());
                print_completion(wizard.receipt());
            }
        }
    }

    Ok(())
}
