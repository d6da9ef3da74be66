//! Frame clock and loop bookkeeping.

use crate::constants::{
    ACQUIRE_RETRY_ATTEMPTS, ACQUIRE_RETRY_INTERVAL_SEC, MAX_CONSECUTIVE_DRAW_FAILURES,
};

/// Converts frame timestamps into non-negative deltas.
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    last: Option<f64>,
    elapsed: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous tick; 0 on the first tick or for a
    /// timestamp that went backwards or is not finite.
    pub fn tick(&mut self, now_sec: f64) -> f32 {
        if !now_sec.is_finite() {
            return 0.0;
        }
        let dt = match self.last {
            Some(last) => (now_sec - last).max(0.0),
            None => 0.0,
        };
        self.last = Some(now_sec);
        self.elapsed += dt;
        dt as f32
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn last(&self) -> Option<f64> {
        self.last
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameToken(pub i64);

/// Host hook for one-shot display-frame callbacks.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> Option<FrameToken>;
    fn cancel_frame(&mut self, token: FrameToken);
    /// Drops whatever keeps the callback alive. Called once after cancellation.
    fn shutdown(&mut self) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Pending(FrameToken),
    Cancelled,
}

/// At most one outstanding frame request; inert after cancellation.
#[derive(Debug)]
pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    state: LoopState,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            state: LoopState::Idle,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == LoopState::Cancelled
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, LoopState::Pending(_))
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Request the next frame unless one is pending or the loop is cancelled.
    pub fn schedule(&mut self) {
        if self.state != LoopState::Idle {
            return;
        }
        if let Some(token) = self.scheduler.request_frame() {
            self.state = LoopState::Pending(token);
        }
    }

    /// Marks the pending request as delivered. Returns false once cancelled.
    pub fn begin_frame(&mut self) -> bool {
        match self.state {
            LoopState::Cancelled => false,
            _ => {
                self.state = LoopState::Idle;
                true
            }
        }
    }

    /// Stops the loop after the current tick without tearing it down.
    pub fn pause(&mut self) {
        if let LoopState::Pending(token) = self.state {
            self.scheduler.cancel_frame(token);
            self.state = LoopState::Idle;
        }
    }

    /// Cancels exactly once; later calls do nothing.
    pub fn cancel(&mut self) {
        match self.state {
            LoopState::Cancelled => return,
            LoopState::Pending(token) => self.scheduler.cancel_frame(token),
            LoopState::Idle => {}
        }
        self.state = LoopState::Cancelled;
        self.scheduler.shutdown();
        log::debug!("[loop] cancelled");
    }
}

/// Consecutive draw failures before giving up.
#[derive(Debug, Clone)]
pub struct FailureBudget {
    limit: u32,
    consecutive: u32,
}

impl Default for FailureBudget {
    fn default() -> Self {
        Self::new(MAX_CONSECUTIVE_DRAW_FAILURES)
    }
}

impl FailureBudget {
    pub fn new(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            consecutive: 0,
        }
    }

    pub fn success(&mut self) {
        self.consecutive = 0;
    }

    /// Returns true when the budget is exhausted.
    pub fn failure(&mut self) -> bool {
        self.consecutive = self.consecutive.saturating_add(1);
        self.consecutive >= self.limit
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }
}

/// Retry schedule for deferred surface acquisition.
#[derive(Debug, Clone)]
pub struct AcquireRetry {
    remaining: u32,
    interval: f64,
    next_at: Option<f64>,
}

impl Default for AcquireRetry {
    fn default() -> Self {
        Self::new(ACQUIRE_RETRY_ATTEMPTS, ACQUIRE_RETRY_INTERVAL_SEC)
    }
}

impl AcquireRetry {
    pub fn new(attempts: u32, interval: f64) -> Self {
        Self {
            remaining: attempts,
            interval: interval.max(0.0),
            next_at: None,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn exhausted(&self) -> bool {
        self.remaining == 0
    }

    pub fn is_armed(&self) -> bool {
        self.next_at.is_some()
    }

    /// Arms the next attempt relative to `now`.
    pub fn arm(&mut self, now: f64) {
        self.next_at = Some(now + self.interval);
    }

    /// Consumes one attempt if one is due at `now`.
    pub fn due(&mut self, now: f64) -> bool {
        match self.next_at {
            Some(at) if now >= at && self.remaining > 0 => {
                self.remaining -= 1;
                self.next_at = None;
                true
            }
            _ => false,
        }
    }

    /// Consumes one attempt immediately (e.g. a non-zero resize arrived).
    pub fn take_now(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.next_at = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_zero_and_backwards_time_clamps() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(10.0), 0.0);
        assert!((clock.tick(10.5) - 0.5).abs() < 1e-6);
        assert_eq!(clock.tick(10.2), 0.0);
        assert_eq!(clock.tick(f64::NAN), 0.0);
        assert!((clock.elapsed() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn failure_budget_resets_on_success() {
        let mut budget = FailureBudget::new(3);
        assert!(!budget.failure());
        assert!(!budget.failure());
        budget.success();
        assert!(!budget.failure());
        assert!(!budget.failure());
        assert!(budget.failure());
    }

    #[test]
    fn retry_waits_for_interval() {
        let mut retry = AcquireRetry::new(2, 0.1);
        retry.arm(1.0);
        assert!(!retry.due(1.05));
        assert!(retry.due(1.1));
        assert!(!retry.due(1.2));
        retry.arm(1.2);
        assert!(retry.due(1.4));
        assert!(retry.exhausted());
        retry.arm(1.4);
        assert!(!retry.due(9.0));
    }
}
