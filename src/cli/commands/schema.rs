//! `regwiz schema` command - show the registration schema

use miette::{IntoDiagnostic, Result};
use serde_json::Value;

use crate::cli::helpers::truncate_str;
use crate::core::form::FieldKey;
use crate::core::steps::registration_steps;
use crate::schema::validator::{constraint_message, PASSWORD_MISMATCH};
use crate::schema::REGISTRATION_SCHEMA;

#[derive(clap::Args, Debug)]
pub struct SchemaArgs {
    /// Show raw JSON schema instead of formatted summary
    #[arg(long)]
    pub raw: bool,
}

pub fn run(args: SchemaArgs) -> Result<()> {
    if args.raw {
        println!("{}", REGISTRATION_SCHEMA);
        return Ok(());
    }

    let schema: Value = serde_json::from_str(REGISTRATION_SCHEMA).into_diagnostic()?;

    let title = schema["title"].as_str().unwrap_or("Registration");
    let desc = schema["description"].as_str().unwrap_or("");
    println!("{}", title);
    println!("{}", "=".repeat(title.len()));
    if !desc.is_empty() {
        println!("{}\n", desc);
    }

    let steps = registration_steps();

    println!("Fields:");
    println!(
        "{:<16} {:<8} {:<8} {:<8} {}",
        "NAME", "TYPE", "STEP", "MIN", "RULE"
    );
    println!("{}", "-".repeat(80));

    for key in FieldKey::all() {
        let prop = &schema["properties"][key.as_str()];
        let prop_type = prop["type"].as_str().unwrap_or("any");
        let limit = prop["minLength"]
            .as_u64()
            .or_else(|| prop["minimum"].as_u64())
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        let step = steps
            .iter()
            .find(|s| s.fields.iter().any(|f| f.key == *key))
            .map(|s| s.id)
            .unwrap_or("-");
        println!(
            "{:<16} {:<8} {:<8} {:<8} {}",
            key.as_str(),
            prop_type,
            step,
            limit,
            truncate_str(constraint_message(*key), 40)
        );
    }

    println!("\nCross-field rules:");
    println!(
        "  {} must equal {} ({:?})",
        FieldKey::ConfirmPassword,
        FieldKey::Password,
        PASSWORD_MISMATCH
    );

    println!("\nUse --raw for full JSON schema");
    Ok(())
}
