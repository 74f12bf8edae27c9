//! `regwiz steps` command - show the step table

use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::steps::registration_steps;

pub fn run(global: &GlobalOpts) -> Result<()> {
    let steps = registration_steps();

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&steps).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&steps).into_diagnostic()?);
        }
        OutputFormat::Auto => {
            let mut builder = Builder::default();
            builder.push_record(["#", "ID", "NAME", "FIELDS"]);
            for (index, step) in steps.iter().enumerate() {
                let fields = if step.fields.is_empty() {
                    "(completion)".to_string()
                } else {
                    step.fields
                        .iter()
                        .map(|f| format!("{} [{}]", f.key, f.kind.as_str()))
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                builder.push_record([
                    index.to_string(),
                    step.id.to_string(),
                    step.name.to_string(),
                    fields,
                ]);
            }
            println!("{}", builder.build().with(Style::rounded()));
        }
    }

    Ok(())
}
