//! Interactive terminal front end for the wizard
//!
//! Prompts the fields of the current step, then asks which way to go. All
//! navigation goes through the controller; this module only renders its
//! state and forwards edits.

use console::style;
use dialoguer::theme::{ColorfulTheme, SimpleTheme, Theme as PromptTheme};
use dialoguer::{Input, Password, Select};
use miette::{IntoDiagnostic, Result};
use tracing::warn;

use crate::cli::helpers::{print_completion, print_field_errors, print_progress};
use crate::core::config::Theme;
use crate::core::steps::{FieldDescriptor, InputKind};
use crate::core::wizard::{Advance, StepView, WizardController};

/// How an interactive session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Completed,
    Quit,
}

/// A choice offered below the fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Forward,
    Previous,
    Quit,
}

/// Dialoguer-driven renderer for a [`WizardController`]
pub struct StepPrompter {
    theme: Box<dyn PromptTheme>,
}

impl StepPrompter {
    pub fn new(theme: Theme) -> Self {
        let theme: Box<dyn PromptTheme> = match theme {
            Theme::Colorful => Box::new(ColorfulTheme::default()),
            Theme::Simple => Box::new(SimpleTheme),
        };
        Self { theme }
    }

    /// Run until the completion view is reached or the user quits
    pub fn run(&self, wizard: &mut WizardController) -> Result<SessionEnd> {
        loop {
            println!();
            print_progress(&wizard.progress());

            let fields: Vec<FieldDescriptor> = match wizard.view() {
                StepView::Complete => {
                    print_completion(wizard.receipt());
                    return Ok(SessionEnd::Completed);
                }
                StepView::Fields(fields) => fields.to_vec(),
            };

            println!(
                "{} {}",
                style("◆").cyan(),
                style(wizard.current_step().name).bold()
            );
            println!();

            for field in &fields {
                if let Some(message) = wizard.errors().get(field.key) {
                    println!("  {}", style(message).red());
                }
                let current = wizard.values().get_field(field.key);
                let value = self.prompt_field(field, &current)?;
                wizard.set_field(field.key, &value);
            }

            match self.prompt_action(wizard)? {
                Action::Quit => return Ok(SessionEnd::Quit),
                Action::Previous => {
                    wizard.retreat();
                }
                Action::Forward => {
                    if wizard.is_submission_step() {
                        println!("{} Please wait...", style("⠿").cyan());
                    }
                    step_forward(wizard);
                }
            }
        }
    }

    /// Offer the navigation controls that are currently enabled
    fn prompt_action(&self, wizard: &WizardController) -> Result<Action> {
        let Some(controls) = wizard.controls() else {
            return Ok(Action::Quit);
        };

        let mut actions = Vec::new();
        let mut labels = Vec::new();
        if controls.forward_enabled {
            actions.push(Action::Forward);
            labels.push(controls.forward_label.as_str());
        }
        if controls.previous_enabled {
            actions.push(Action::Previous);
            labels.push("Previous");
        }
        actions.push(Action::Quit);
        labels.push("Quit");

        let selection = Select::with_theme(&*self.theme)
            .items(&labels)
            .default(0)
            .interact()
            .into_diagnostic()?;

        Ok(actions[selection])
    }

    /// Prompt for one field, pre-filled with its current value
    fn prompt_field(&self, field: &FieldDescriptor, current: &str) -> Result<String> {
        let prompt = format_prompt(field);

        match field.kind {
            InputKind::Password => {
                let prompt = if current.is_empty() {
                    prompt
                } else {
                    format!("{} {}", prompt, style("(leave empty to keep)").dim())
                };
                let value = Password::with_theme(&*self.theme)
                    .with_prompt(prompt)
                    .allow_empty_password(true)
                    .interact()
                    .into_diagnostic()?;
                if value.is_empty() {
                    Ok(current.to_string())
                } else {
                    Ok(value)
                }
            }

            InputKind::Text | InputKind::Email | InputKind::Number => {
                let input = Input::<String>::with_theme(&*self.theme)
                    .with_prompt(prompt)
                    .allow_empty(true);
                let input = if current.is_empty() {
                    input
                } else {
                    input.default(current.to_string())
                };
                input.interact_text().into_diagnostic()
            }
        }
    }
}

/// Advance once and report the outcome
///
/// A failed submission leaves the wizard on its step so the user can retry.
fn step_forward(wizard: &mut WizardController) {
    match wizard.advance() {
        Ok(Advance::Blocked(errors)) => {
            println!();
            print_field_errors(&errors);
        }
        Ok(_) => {}
        Err(e) => {
            warn!(error = %e, "submission failed");
            eprintln!("  {} {}", style("✗").red(), style(e).red());
        }
    }
}

/// Label plus a dim placeholder hint
fn format_prompt(field: &FieldDescriptor) -> String {
    if field.placeholder == field.label {
        field.label.to_string()
    } else {
        format!("{} ({})", field.label, style(field.placeholder).dim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::form::FormValues;
    use crate::core::steps::registration_steps;
    use crate::core::submit::{Receipt, SubmitError, Submitter};
    use crate::schema::FormSchema;

    /// Rejects the first submission, accepts the rest
    struct FlakySubmitter {
        attempts: usize,
    }

    impl Submitter for FlakySubmitter {
        fn submit(&mut self, _values: &FormValues) -> Result<Receipt, SubmitError> {
            self.attempts += 1;
            if self.attempts == 1 {
                Err(SubmitError::Rejected("service unavailable".to_string()))
            } else {
                Ok(Receipt::new())
            }
        }
    }

    fn security_step_wizard() -> WizardController {
        let values = FormValues {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            age: Some(36),
            country: "United Kingdom".to_string(),
            password: "abc123".to_string(),
            confirm_password: "abc123".to_string(),
        };
        let mut wizard = WizardController::new(
            FormSchema::new().unwrap(),
            Box::new(FlakySubmitter { attempts: 0 }),
        )
        .with_values(values);
        wizard.advance().unwrap();
        wizard.advance().unwrap();
        wizard
    }

    #[test]
    fn test_prompter_creation() {
        let _ = StepPrompter::new(Theme::Colorful);
        let _ = StepPrompter::new(Theme::Simple);
    }

    #[test]
    fn test_format_prompt_uses_label() {
        let steps = registration_steps();
        assert_eq!(format_prompt(&steps[2].fields[1]), "Confirm Password");
    }

    #[test]
    fn test_failed_submission_keeps_session_on_step() {
        let mut wizard = security_step_wizard();
        assert_eq!(wizard.current_step_index(), 2);

        step_forward(&mut wizard);
        assert_eq!(wizard.current_step_index(), 2);
        assert!(!wizard.is_submitting());
        assert!(wizard.receipt().is_none());

        step_forward(&mut wizard);
        assert!(wizard.is_terminal());
        assert!(wizard.receipt().is_some());
    }
}
