use std::time::{Duration, Instant};

/// Single-slot trailing-edge timer.
///
/// Scheduling always replaces whatever was pending, so at most one deadline
/// exists at a time. The owner polls it from its event loop with `take_due`.
#[derive(Debug)]
pub struct PendingTimer<T> {
    slot: Option<Scheduled<T>>,
}

#[derive(Debug)]
struct Scheduled<T> {
    fires_at: Instant,
    payload: T,
}

impl<T> Default for PendingTimer<T> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<T> PendingTimer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any pending deadline and start a fresh one.
    pub fn schedule(&mut self, now: Instant, delay: Duration, payload: T) {
        self.cancel();
        self.slot = Some(Scheduled {
            fires_at: now + delay,
            payload,
        });
    }

    /// Drop the pending deadline. Returns the payload that will no longer fire.
    pub fn cancel(&mut self) -> Option<T> {
        self.slot.take().map(|s| s.payload)
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    pub fn payload(&self) -> Option<&T> {
        self.slot.as_ref().map(|s| &s.payload)
    }

    /// Change what fires without moving the deadline.
    pub fn payload_mut(&mut self) -> Option<&mut T> {
        self.slot.as_mut().map(|s| &mut s.payload)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.slot.as_ref().map(|s| s.fires_at)
    }

    /// Fire the timer if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        let due = self.slot.as_ref().is_some_and(|s| now >= s.fires_at);
        if due { self.cancel() } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn test_not_due_before_deadline() {
        let t0 = Instant::now();
        let mut timer = PendingTimer::new();
        timer.schedule(t0, DELAY, 3usize);
        assert_eq!(timer.take_due(t0 + Duration::from_millis(299)), None);
        assert!(timer.is_pending());
        assert_eq!(timer.take_due(t0 + DELAY), Some(3));
        assert!(!timer.is_pending());
    }

    #[test]
    fn test_reschedule_restarts_window() {
        let t0 = Instant::now();
        let mut timer = PendingTimer::new();
        timer.schedule(t0, DELAY, 2usize);
        let t1 = t0 + Duration::from_millis(200);
        timer.schedule(t1, DELAY, 5usize);

        // The first deadline has passed but was replaced.
        assert_eq!(timer.take_due(t0 + DELAY), None);
        assert_eq!(timer.payload(), Some(&5));
        assert_eq!(timer.take_due(t1 + DELAY), Some(5));
        assert_eq!(timer.take_due(t1 + DELAY * 2), None);
    }

    #[test]
    fn test_cancel_returns_payload() {
        let t0 = Instant::now();
        let mut timer = PendingTimer::new();
        timer.schedule(t0, DELAY, "x");
        assert_eq!(timer.cancel(), Some("x"));
        assert_eq!(timer.cancel(), None);
        assert_eq!(timer.deadline(), None);
    }
}
