//! Challenge text generation.

use coursegate_common::constants::{CHALLENGE_ALPHABET, CHALLENGE_LEN};
use rand::Rng;

/// Produces challenge strings. Injectable so embedders can seed the RNG
/// and tests stay deterministic.
pub trait ChallengeSource: Send + Sync {
    fn next_text(&self) -> String;
}

/// Draws from the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomChallengeSource;

impl ChallengeSource for RandomChallengeSource {
    fn next_text(&self) -> String {
        challenge_text(&mut rand::rng())
    }
}

/// Deterministic source backed by a seeded RNG
pub struct SeededChallengeSource(std::sync::Mutex<rand::rngs::StdRng>);

impl SeededChallengeSource {
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(std::sync::Mutex::new(rand::rngs::StdRng::seed_from_u64(
            seed,
        )))
    }
}

impl ChallengeSource for SeededChallengeSource {
    fn next_text(&self) -> String {
        let mut rng = self.0.lock().unwrap_or_else(|e| e.into_inner());
        challenge_text(&mut *rng)
    }
}

/// Generate a challenge string: exactly [`CHALLENGE_LEN`] characters drawn
/// uniformly from the approved alphabet (no digits, no ambiguous glyphs).
pub fn challenge_text(rng: &mut impl Rng) -> String {
    (0..CHALLENGE_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHALLENGE_ALPHABET.len());
            CHALLENGE_ALPHABET[idx] as char
        })
        .collect()
}
