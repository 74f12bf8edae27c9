//! `regwiz run` command - interactive registration wizard

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use tracing::info;

use crate::cli::prompt::{SessionEnd, StepPrompter};
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::form::FormValues;
use crate::core::submit::SimulatedSubmitter;
use crate::core::wizard::WizardController;
use crate::schema::FormSchema;

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Pre-fill the wizard from a YAML or JSON record file
    #[arg(long)]
    pub from: Option<PathBuf>,

    /// Delay of the simulated submission in milliseconds (default: 2000)
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

pub fn run(args: RunArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let delay = config.submit_delay(args.delay_ms);

    let values = match &args.from {
        Some(path) => load_values(path)?,
        None => FormValues::default(),
    };

    let schema = FormSchema::new()?;
    let mut wizard = WizardController::new(schema, Box::new(SimulatedSubmitter::new(delay)))
        .with_values(values);

    if !global.quiet {
        println!(
            "{} New registration ({} steps)",
            style("◆").cyan(),
            wizard.steps().len()
        );
    }

    let prompter = StepPrompter::new(config.theme());
    match prompter.run(&mut wizard)? {
        SessionEnd::Completed => {
            info!("registration completed");
            Ok(())
        }
        SessionEnd::Quit => {
            if !global.quiet {
                println!("{} Registration cancelled", style("!").yellow());
            }
            Ok(())
        }
    }
}

/// Read a record file into form values; missing keys keep their defaults
///
/// Field values are not checked here, so a bad value surfaces as a field
/// error on its step.
pub fn load_values(path: &std::path::Path) -> Result<FormValues> {
    let content = std::fs::read_to_string(path).into_diagnostic()?;
    let record: serde_json::Value = serde_yml::from_str(&content)
        .map_err(|e| miette::miette!("Failed to parse {}: {}", path.display(), e))?;
    FormValues::from_record(&record)
        .map_err(|e| miette::miette!("Invalid record {}: {}", path.display(), e))
}
