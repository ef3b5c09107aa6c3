//! Common error types for Coursegate components.

use thiserror::Error;

use crate::types::WizardStage;

/// Errors surfaced by the enrollment engine
#[derive(Debug, Error)]
pub enum EnrollError {
    /// Email failed the syntactic check
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// Human-verification challenge not solved yet
    #[error("Human verification not completed")]
    ChallengeUnsolved,

    /// One-time code has the wrong length
    #[error("Verification code must be {expected} characters, got {got}")]
    MalformedCode { expected: usize, got: usize },

    /// Operation does not apply to the wizard's current stage
    #[error("Operation not valid in the {0:?} stage")]
    WrongStage(WizardStage),

    /// Offering price carries no parseable amount
    #[error("Offering has no parseable price: {0}")]
    UnpricedOffering(String),

    /// Checkout overlay failed to open (script blocked, load failure)
    #[error("Payment gateway unavailable: {0}")]
    PaymentUnavailable(String),

    /// Enrollment store read/write failure
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The wizard was dismissed while the operation was in flight
    #[error("Wizard was dismissed")]
    Dismissed,
}

impl EnrollError {
    /// Returns true if re-invoking the same action may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::PaymentUnavailable(_) | Self::Store(_))
    }

    /// Returns true for field-level validation failures, which block the
    /// transition but preserve all entered data
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidEmail(_) | Self::ChallengeUnsolved | Self::MalformedCode { .. }
        )
    }
}
