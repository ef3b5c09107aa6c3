//! Delay scheduling behind a trait so tests can skip real time.

use async_trait::async_trait;
use std::time::Duration;

/// Sleeps for the simulated network latency of the wizard's fake
/// round-trips. Production wiring uses Tokio's timer; tests substitute an
/// immediate or gated implementation.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Tokio-backed sleeper
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Resolves immediately, collapsing every simulated delay
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSleeper;

#[async_trait]
impl Sleeper for NoopSleeper {
    async fn sleep(&self, _duration: Duration) {}
}
