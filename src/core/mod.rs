//! Core module - wizard state machine and its data

pub mod config;
pub mod form;
pub mod progress;
pub mod steps;
pub mod submit;
pub mod wizard;

pub use config::{Config, Theme};
pub use form::{FieldKey, FormValues, RecordShapeError};
pub use progress::{progress, StepProgress, StepStatus};
pub use steps::{registration_steps, FieldDescriptor, InputKind, Step};
pub use submit::{BusyFlag, BusyGuard, Receipt, SimulatedSubmitter, SubmitError, Submitter};
pub use wizard::{
    Advance, Controls, ForwardLabel, StepView, WizardController, WizardError, WizardSnapshot,
    WizardState,
};
