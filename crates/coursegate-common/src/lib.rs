//! # Coursegate Common
//!
//! Shared types, errors, and constants used across Coursegate components.
//!
//! ## Modules
//! - `types` - Core data structures (Offering, EnrollmentRecord, WizardStage, etc.)
//! - `error` - Common error types
//! - `constants` - Shared configuration constants

pub mod constants;
pub mod error;
pub mod types;

pub use error::EnrollError;
pub use types::*;
