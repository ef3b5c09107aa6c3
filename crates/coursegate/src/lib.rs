//! # Coursegate - Enrollment Engine
//!
//! The core of the Coursegate enrollment flow: a retype-to-verify
//! challenge, a staged email/one-time-code wizard, and idempotent
//! enrollment persistence behind injectable capabilities.
//!
//! ## Architecture
//! ```text
//! Caller UI → EnrollmentWizard → PaymentGateway (external checkout)
//!                   ↓
//!            EnrollmentStore (local JSON)
//! ```
//!
//! Everything "network-shaped" in the flow (code dispatch, code
//! confirmation) is simulated with timers; the only real external boundary
//! is the checkout overlay behind [`payment::PaymentGateway`].

pub mod challenge;
pub mod clock;
pub mod config;
pub mod payment;
pub mod store;
pub mod wizard;

pub use coursegate_common as common;

pub use config::WizardConfig;
pub use wizard::{EnrollmentWizard, WizardDeps};
