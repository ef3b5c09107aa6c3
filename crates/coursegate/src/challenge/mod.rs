//! Human-verification challenge: a retype-this-text puzzle.
//!
//! This is a cosmetic interaction gate, not a security control: the answer
//! lives on the same side as the input, there is no rate limiting, and a
//! script defeats it trivially. Real bot resistance is a requirement
//! change, not a refactor of this module.

mod generator;
mod session;

pub use generator::{
    ChallengeSource, RandomChallengeSource, SeededChallengeSource, challenge_text,
};
pub use session::{ChallengeSession, SubmitOutcome};
