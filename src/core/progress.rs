//! Progress indicator state derived from the step list

use serde::Serialize;

use crate::core::steps::Step;

/// Visual state of a step in the progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Completed,
    Current,
    Upcoming,
}

impl StepStatus {
    /// Completed and current steps are shown ticked
    pub fn is_ticked(&self) -> bool {
        !matches!(self, StepStatus::Upcoming)
    }
}

/// One entry of the progress bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepProgress {
    pub id: &'static str,
    pub name: &'static str,
    pub status: StepStatus,
}

/// Compute the progress bar for `current`
pub fn progress(steps: &[Step], current: usize) -> Vec<StepProgress> {
    steps
        .iter()
        .enumerate()
        .map(|(index, step)| StepProgress {
            id: step.id,
            name: step.name,
            status: match index.cmp(&current) {
                std::cmp::Ordering::Less => StepStatus::Completed,
                std::cmp::Ordering::Equal => StepStatus::Current,
                std::cmp::Ordering::Greater => StepStatus::Upcoming,
            },
        })
        .collect()
}
