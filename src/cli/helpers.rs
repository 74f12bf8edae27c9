//! Shared rendering helpers for CLI commands
//!
//! The progress bar, inline errors and completion view are printed the same
//! way by the interactive and the non-interactive commands.

use console::style;

use crate::core::form::{FieldKey, FormValues};
use crate::core::progress::{StepProgress, StepStatus};
use crate::core::submit::Receipt;
use crate::schema::FieldErrors;

/// Replace every character of a secret with `*`
pub fn mask_secret(s: &str) -> String {
    "*".repeat(s.chars().count())
}

/// Copy of `values` safe to print
pub fn masked_values(values: &FormValues) -> FormValues {
    let mut masked = values.clone();
    for key in FieldKey::all().iter().filter(|k| k.is_secret()) {
        let hidden = mask_secret(&values.get_field(*key));
        masked.set_field(*key, &hidden);
    }
    masked
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Plain-text label of one progress entry
pub fn progress_label(step: &StepProgress) -> String {
    if step.status.is_ticked() {
        format!("{} ✔", step.id)
    } else {
        step.id.to_string()
    }
}

/// Print the progress bar: one column per step
pub fn print_progress(steps: &[StepProgress]) {
    let labels: Vec<String> = steps
        .iter()
        .map(|step| {
            let label = format!("{} · {}", progress_label(step), step.name);
            match step.status {
                StepStatus::Completed => style(label).cyan().to_string(),
                StepStatus::Current => style(label).cyan().bold().to_string(),
                StepStatus::Upcoming => style(label).dim().to_string(),
            }
        })
        .collect();
    println!("{}", labels.join("   "));
    println!("{}", style("─".repeat(60)).dim());
}

/// Print each field error the way it appears next to the input
pub fn print_field_errors(errors: &FieldErrors) {
    for (key, message) in errors.iter() {
        eprintln!(
            "  {} {}: {}",
            style("✗").red(),
            style(key.label()).bold(),
            style(message).red()
        );
    }
}

/// Print the completion view
pub fn print_completion(receipt: Option<&Receipt>) {
    println!();
    println!("{} {}", style("✓").green().bold(), style("Registration Complete!").bold());
    println!("Thank you for registering. We've sent you an email with further instructions.");
    if let Some(receipt) = receipt {
        println!(
            "{} {}",
            style("Confirmation:").dim(),
            style(&receipt.id).cyan()
        );
    }
}
