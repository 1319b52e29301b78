//! Cancellable deferred action driven by caller-supplied instants
//!
//! Nothing here reads the system clock. The owner passes `now` in and asks
//! whether the action has come due, which keeps every transition testable
//! without sleeping.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct DeferredAction<T> {
    pending: Option<(Instant, T)>,
}

impl<T> DeferredAction<T> {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Schedule `value` to come due `delay` after `now`, replacing anything
    /// already pending
    pub fn schedule(&mut self, value: T, now: Instant, delay: Duration) {
        self.pending = Some((now + delay, value));
    }

    /// Drop the pending action, returning its payload
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, value)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(due, _)| *due)
    }

    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref().map(|(_, value)| value)
    }

    /// Take the payload if its deadline is at or before `now`
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((due, _)) if *due <= now => self.cancel(),
            _ => None,
        }
    }
}

impl<T> Default for DeferredAction<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reschedule_pushes_deadline() {
        let t0 = Instant::now();
        let mut action = DeferredAction::new();

        action.schedule("a", t0, Duration::from_millis(100));
        action.schedule("b", t0 + Duration::from_millis(50), Duration::from_millis(100));

        assert!(action.take_due(t0 + Duration::from_millis(100)).is_none());
        assert_eq!(action.take_due(t0 + Duration::from_millis(150)), Some("b"));
        assert!(!action.is_pending());
    }

    #[test]
    fn test_cancel() {
        let t0 = Instant::now();
        let mut action = DeferredAction::new();
        action.schedule(1, t0, Duration::ZERO);

        assert_eq!(action.cancel(), Some(1));
        assert!(action.take_due(t0 + Duration::from_secs(1)).is_none());
    }
}
