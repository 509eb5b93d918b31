//! Local stand-in for a provider's network round trip.
//!
//! The reference adapters have no real network behind them. Each one owns a
//! [`SimulatedNetwork`] whose outcome is drawn from an injected
//! [`OutcomeSource`], so tests pin outcomes with [`FixedOutcome`] while the
//! binary uses [`RandomOutcome`] with the provider's failure rate.

use {
    crate::domain::{context::RequestContext, error::InvokeError},
    rand::Rng,
    std::{sync::Arc, time::Duration},
};

pub trait OutcomeSource: Send + Sync {
    /// `true` when the next call should come back as a provider error.
    fn next_is_failure(&self) -> bool;
}

#[derive(Debug, Clone, Copy)]
pub struct RandomOutcome {
    failure_rate: f64,
}

impl RandomOutcome {
    /// Rate is clamped to `[0, 1]`; NaN counts as zero.
    pub fn new(failure_rate: f64) -> Self {
        let failure_rate = if failure_rate.is_nan() {
            0.0
        } else {
            failure_rate.clamp(0.0, 1.0)
        };
        Self { failure_rate }
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }
}

impl OutcomeSource for RandomOutcome {
    fn next_is_failure(&self) -> bool {
        rand::thread_rng().gen_bool(self.failure_rate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedOutcome {
    Succeed,
    Fail,
}

impl OutcomeSource for FixedOutcome {
    fn next_is_failure(&self) -> bool {
        matches!(self, Self::Fail)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Approved,
    Declined,
}

#[derive(Clone)]
pub struct SimulatedNetwork {
    outcomes: Arc<dyn OutcomeSource>,
    latency: Duration,
}

impl SimulatedNetwork {
    pub fn new(outcomes: impl OutcomeSource + 'static) -> Self {
        Self {
            outcomes: Arc::new(outcomes),
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Waits out the simulated latency while racing `ctx`.
    pub async fn round_trip(&self, ctx: &RequestContext) -> Result<Reply, InvokeError> {
        ctx.check()?;

        if !self.latency.is_zero() {
            tokio::select! {
                reason = ctx.done() => return Err(reason),
                _ = tokio::time::sleep(self.latency) => {}
            }
        }

        if self.outcomes.next_is_failure() {
            Ok(Reply::Declined)
        } else {
            Ok(Reply::Approved)
        }
    }
}
