//! Step wizard controller
//!
//! Owns the step table, the current position, the record being built and the
//! errors from the last validation. Navigation only happens through
//! [`WizardController::advance`] and [`WizardController::retreat`]; everything
//! a renderer needs is derived from the controller's state.

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::form::{FieldKey, FormValues};
use crate::core::progress::{progress, StepProgress};
use crate::core::steps::{registration_steps, FieldDescriptor, Step};
use crate::core::submit::{BusyFlag, Receipt, SubmitError, Submitter};
use crate::schema::{FieldErrors, FormSchema};

/// Errors from driving the wizard
#[derive(Debug, Error, Diagnostic)]
pub enum WizardError {
    #[error("A wizard needs at least one step")]
    #[diagnostic(code(regwiz::wizard::no_steps))]
    NoSteps,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Submission(#[from] SubmitError),
}

/// Result of a forward navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the next step
    Moved { from: usize, to: usize },
    /// Submitted the record, then moved to the terminal step
    Submitted { from: usize, to: usize, receipt: Receipt },
    /// The current step has invalid fields; nothing changed
    Blocked(FieldErrors),
    /// Already on the terminal step
    AtTerminal,
    /// A submission is in flight
    Busy,
}

/// Position of the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WizardState {
    pub current_step_index: usize,
    pub previous_step_index: usize,
    pub is_submitting: bool,
}

/// What the renderer should show for the current step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepView<'a> {
    Fields(&'a [FieldDescriptor]),
    Complete,
}

/// Label of the forward button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ForwardLabel {
    Next,
    Submit,
    PleaseWait,
}

impl ForwardLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForwardLabel::Next => "Next",
            ForwardLabel::Submit => "Submit",
            ForwardLabel::PleaseWait => "Please wait",
        }
    }
}

/// Navigation controls for a non-terminal step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub previous_enabled: bool,
    pub forward_enabled: bool,
    pub forward_label: ForwardLabel,
    /// Busy indicator on the forward button
    pub busy: bool,
}

/// Everything a renderer consumes
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    pub steps: Vec<Step>,
    pub current_step_index: usize,
    pub previous_step_index: usize,
    pub is_submitting: bool,
    pub errors: FieldErrors,
    pub values: FormValues,
    pub receipt: Option<Receipt>,
}

/// One wizard session
pub struct WizardController {
    steps: Vec<Step>,
    current: usize,
    previous: usize,
    values: FormValues,
    errors: FieldErrors,
    schema: FormSchema,
    submitter: Box<dyn Submitter>,
    busy: BusyFlag,
    receipt: Option<Receipt>,
}

impl WizardController {
    /// Wizard over the registration steps with default values
    pub fn new(schema: FormSchema, submitter: Box<dyn Submitter>) -> Self {
        Self {
            steps: registration_steps(),
            current: 0,
            previous: 0,
            values: FormValues::default(),
            errors: FieldErrors::new(),
            schema,
            submitter,
            busy: BusyFlag::new(),
            receipt: None,
        }
    }

    /// Wizard over a custom step table; the last step is the terminal one
    pub fn with_steps(
        steps: Vec<Step>,
        schema: FormSchema,
        submitter: Box<dyn Submitter>,
    ) -> Result<Self, WizardError> {
        if steps.is_empty() {
            return Err(WizardError::NoSteps);
        }
        let mut wizard = Self::new(schema, submitter);
        wizard.steps = steps;
        Ok(wizard)
    }

    /// Start from prefilled values
    pub fn with_values(mut self, values: FormValues) -> Self {
        self.values = values;
        self
    }

    /// Share an externally owned busy flag, e.g. one held by a spinner
    pub fn with_busy_flag(mut self, busy: BusyFlag) -> Self {
        self.busy = busy;
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        self.receipt.as_ref()
    }

    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    pub fn current_step_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> &Step {
        &self.steps[self.current]
    }

    pub fn is_submitting(&self) -> bool {
        self.busy.is_set()
    }

    pub fn state(&self) -> WizardState {
        WizardState {
            current_step_index: self.current,
            previous_step_index: self.previous,
            is_submitting: self.is_submitting(),
        }
    }

    fn terminal_index(&self) -> usize {
        self.steps.len() - 1
    }

    pub fn is_terminal(&self) -> bool {
        self.current == self.terminal_index()
    }

    /// Whether advancing from the current step submits the record
    pub fn is_submission_step(&self) -> bool {
        self.current + 1 == self.terminal_index()
    }

    /// Record an edit. A field already showing an error is re-checked so the
    /// message clears as soon as the input becomes valid.
    pub fn set_field(&mut self, key: FieldKey, raw: &str) {
        self.values.set_field(key, raw);
        if self.errors.contains(key) {
            match self.schema.validate(&self.values, &[key]) {
                Ok(()) => self.errors.remove(key),
                Err(errors) => self.errors.extend(errors),
            }
        }
    }

    /// Validate the current step and move forward, submitting first when
    /// leaving the step before the terminal one.
    pub fn advance(&mut self) -> Result<Advance, WizardError> {
        if self.is_submitting() {
            warn!("advance ignored while a submission is in flight");
            return Ok(Advance::Busy);
        }
        if self.is_terminal() {
            debug!(step = self.current, "advance ignored on terminal step");
            return Ok(Advance::AtTerminal);
        }

        let fields = self.current_step().field_keys();
        if let Err(errors) = self.schema.validate(&self.values, &fields) {
            debug!(step = self.current, invalid = ?errors.fields(), "step blocked");
            self.errors.extend(errors.clone());
            return Ok(Advance::Blocked(errors));
        }
        for field in &fields {
            self.errors.remove(*field);
        }

        let from = self.current;
        let receipt = if self.is_submission_step() {
            let Some(_busy) = self.busy.acquire() else {
                return Ok(Advance::Busy);
            };
            info!(step = from, "submitting registration");
            Some(self.submitter.submit(&self.values)?)
        } else {
            None
        };

        self.previous = from;
        self.current = from + 1;
        debug!(from, to = self.current, "advanced");

        Ok(match receipt {
            Some(receipt) => {
                self.receipt = Some(receipt.clone());
                Advance::Submitted {
                    from,
                    to: self.current,
                    receipt,
                }
            }
            None => Advance::Moved {
                from,
                to: self.current,
            },
        })
    }

    /// Move back one step without validating. Returns whether it moved.
    pub fn retreat(&mut self) -> bool {
        if self.current == 0 || self.is_submitting() {
            return false;
        }
        self.previous = self.current;
        self.current -= 1;
        debug!(from = self.previous, to = self.current, "retreated");
        true
    }

    pub fn view(&self) -> StepView<'_> {
        if self.is_terminal() {
            StepView::Complete
        } else {
            StepView::Fields(&self.current_step().fields)
        }
    }

    /// Button state, or `None` on the terminal step where there are no buttons
    pub fn controls(&self) -> Option<Controls> {
        if self.is_terminal() {
            return None;
        }
        let submitting = self.is_submitting();
        let forward_label = if submitting {
            ForwardLabel::PleaseWait
        } else if self.is_submission_step() {
            ForwardLabel::Submit
        } else {
            ForwardLabel::Next
        };
        Some(Controls {
            previous_enabled: self.current > 0 && !submitting,
            forward_enabled: !submitting,
            forward_label,
            busy: submitting,
        })
    }

    pub fn progress(&self) -> Vec<StepProgress> {
        progress(&self.steps, self.current)
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            steps: self.steps.clone(),
            current_step_index: self.current,
            previous_step_index: self.previous,
            is_submitting: self.is_submitting(),
            errors: self.errors.clone(),
            values: self.values.clone(),
            receipt: self.receipt.clone(),
        }
    }
}
