//! Submission seam and the busy flag that guards it

use chrono::{DateTime, Utc};
use miette::Diagnostic;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;
use ulid::Ulid;

use crate::core::form::FormValues;

/// Default delay of the simulated submission
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(2000);

/// Confirmation returned by a successful submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: String,
    pub submitted_at: DateTime<Utc>,
}

impl Receipt {
    /// New receipt with a fresh `REG-<ULID>` id
    pub fn new() -> Self {
        Self {
            id: format!("REG-{}", Ulid::new()),
            submitted_at: Utc::now(),
        }
    }
}

impl Default for Receipt {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors from a submitter
#[derive(Debug, Error, Diagnostic)]
pub enum SubmitError {
    #[error("submission rejected: {0}")]
    #[diagnostic(code(regwiz::submit::rejected))]
    Rejected(String),
}

/// Something that accepts a completed registration
pub trait Submitter {
    fn submit(&mut self, values: &FormValues) -> Result<Receipt, SubmitError>;
}

/// Stand-in for a network call: waits a fixed delay, then succeeds
#[derive(Debug, Clone)]
pub struct SimulatedSubmitter {
    delay: Duration,
}

impl SimulatedSubmitter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedSubmitter {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_DELAY)
    }
}

impl Submitter for SimulatedSubmitter {
    fn submit(&mut self, values: &FormValues) -> Result<Receipt, SubmitError> {
        info!(
            applicant = %values.name,
            email = %values.email,
            delay_ms = self.delay.as_millis() as u64,
            "submitting registration"
        );
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        let receipt = Receipt::new();
        info!(receipt = %receipt.id, "registration accepted");
        Ok(receipt)
    }
}

/// Shared "submission in flight" flag
///
/// Clones observe the same flag, so a renderer can hold one while the
/// controller holds another.
#[derive(Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Mark busy until the returned guard is dropped. Returns `None` if the
    /// flag is already held.
    pub fn acquire(&self) -> Option<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| BusyGuard { flag: self.clone() })
    }
}

impl fmt::Debug for BusyFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BusyFlag").field(&self.is_set()).finish()
    }
}

/// Holds the busy flag; releases it on drop, including on early return
#[must_use = "the flag is released as soon as the guard is dropped"]
pub struct BusyGuard {
    flag: BusyFlag,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.0.store(false, Ordering::SeqCst);
    }
}
