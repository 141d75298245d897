//! # Dispatch Throttle Module
//!
//! Enforces the minimum pause between commands sent to the robot.
//!
//! The robot's servos and serial buffer cannot absorb back-to-back commands,
//! so after every dispatch the control loop stalls until the cool-down has
//! elapsed. Commands are never dropped; the caller simply waits.
//!
//! The throttle records the next eligible instant using
//! [`tokio::time::Instant`], which lets tests run it on a paused clock.
//!
//! ## Usage
//!
//! ```
//! use bittle_bridge::bridge::throttle::DispatchThrottle;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut throttle = DispatchThrottle::new(Duration::from_millis(500));
//! assert!(throttle.is_ready());
//!
//! // ... send a command ...
//! throttle.record_dispatch();
//! assert!(!throttle.is_ready());
//! throttle.wait_ready().await;
//! assert!(throttle.is_ready());
//! # }
//! ```

use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Cool-down gate between consecutive dispatches
#[derive(Debug, Clone)]
pub struct DispatchThrottle {
    cooldown: Duration,
    next_eligible: Option<Instant>,
}

impl DispatchThrottle {
    /// Creates a throttle with the given cool-down
    #[must_use]
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            next_eligible: None,
        }
    }

    /// Configured cool-down
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Instant from which the next dispatch is allowed, if one is pending
    #[must_use]
    pub fn next_eligible(&self) -> Option<Instant> {
        self.next_eligible
    }

    /// Returns true when a dispatch may happen now
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.next_eligible.map_or(true, |at| Instant::now() >= at)
    }

    /// Starts the cool-down from now
    pub fn record_dispatch(&mut self) {
        self.next_eligible = Some(Instant::now() + self.cooldown);
    }

    /// Sleeps until the cool-down has elapsed
    pub async fn wait_ready(&self) {
        if let Some(at) = self.next_eligible {
            sleep_until(at).await;
        }
    }

    /// Records a dispatch and blocks for the full cool-down
    pub async fn cool_down(&mut self) {
        self.record_dispatch();
        self.wait_ready().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COOLDOWN: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn test_fresh_throttle_is_ready() {
        let throttle = DispatchThrottle::new(COOLDOWN);
        assert!(throttle.is_ready());
        assert_eq!(throttle.next_eligible(), None);

        let start = Instant::now();
        throttle.wait_ready().await;
        assert_eq!(Instant::now(), start);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cool_down_blocks_for_full_duration() {
        let mut throttle = DispatchThrottle::new(COOLDOWN);
        let start = Instant::now();

        throttle.cool_down().await;

        assert!(Instant::now() - start >= COOLDOWN);
        assert!(throttle.is_ready());
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_ready_during_cooldown() {
        let mut throttle = DispatchThrottle::new(COOLDOWN);
        throttle.record_dispatch();

        tokio::time::advance(Duration::from_millis(499)).await;
        assert!(!throttle.is_ready());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(throttle.is_ready());
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_to_back_dispatches_are_spaced() {
        let mut throttle = DispatchThrottle::new(COOLDOWN);
        let mut sent_at = Vec::new();

        for _ in 0..3 {
            throttle.wait_ready().await;
            sent_at.push(Instant::now());
            throttle.record_dispatch();
        }

        for pair in sent_at.windows(2) {
            assert!(pair[1] - pair[0] >= COOLDOWN);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_after_cooldown_elapsed_returns_immediately() {
        let mut throttle = DispatchThrottle::new(COOLDOWN);
        throttle.record_dispatch();
        tokio::time::advance(Duration::from_secs(2)).await;

        let before = Instant::now();
        throttle.wait_ready().await;
        assert_eq!(Instant::now(), before);
    }
}
