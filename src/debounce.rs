//! Single-slot debouncing of provisional edits.
//!
//! A [`Debouncer`] holds at most one pending payload. Every new request
//! cancels the pending one and restarts the quiet period, so only the last
//! request of a rapid burst is ever released.
//!
//! The debouncer never reads a clock itself: callers pass the current
//! [`Instant`] and drive it by calling [`Debouncer::poll`] from their event
//! loop.

use std::time::{Duration, Instant};
use tracing::debug;

/// Quiet period after which a pending edit is committed.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(100);

#[derive(Clone, Debug)]
struct Pending<P> {
    payload: P,
    deadline: Instant,
}

/// Coalesces rapid requests into the last one.
///
/// # Example
///
/// ```rust
/// use phonebook_editor::debounce::Debouncer;
/// use std::time::{Duration, Instant};
///
/// let start = Instant::now();
/// let mut debouncer = Debouncer::new(Duration::from_millis(100));
///
/// debouncer.request("H", start);
/// let cancelled = debouncer.request("Hi", start + Duration::from_millis(30));
/// assert_eq!(cancelled, Some("H"));
///
/// assert_eq!(debouncer.poll(start + Duration::from_millis(100)), None);
/// assert_eq!(debouncer.poll(start + Duration::from_millis(130)), Some("Hi"));
/// assert!(!debouncer.is_pending());
/// ```
#[derive(Clone, Debug)]
pub struct Debouncer<P> {
    quiet_period: Duration,
    pending: Option<Pending<P>>,
}

impl<P> Default for Debouncer<P> {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl<P> Debouncer<P> {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Schedule `payload` to be released once the quiet period has passed
    /// after `now`.
    ///
    /// Returns the payload that was pending before, which is cancelled and
    /// will never be released.
    pub fn request(&mut self, payload: P, now: Instant) -> Option<P> {
        let cancelled = self.cancel();
        let deadline = now + self.quiet_period;
        debug!(
            replaced = cancelled.is_some(),
            quiet_ms = self.quiet_period.as_millis() as u64,
            "Scheduling debounced request"
        );
        self.pending = Some(Pending { payload, deadline });
        cancelled
    }

    /// Release the pending payload if its quiet period has passed at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<P> {
        match &self.pending {
            Some(pending) if now >= pending.deadline => {
                debug!("Debounced request is due");
                self.pending.take().map(|pending| pending.payload)
            }
            _ => None,
        }
    }

    /// Drop the pending payload without releasing it.
    pub fn cancel(&mut self) -> Option<P> {
        self.pending.take().map(|pending| pending.payload)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&P> {
        self.pending.as_ref().map(|pending| &pending.payload)
    }

    /// When the pending payload becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn default_quiet_period_is_100ms() {
        let debouncer: Debouncer<()> = Debouncer::default();
        assert_eq!(debouncer.quiet_period(), ms(100));
    }

    #[test]
    fn nothing_is_released_before_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();
        debouncer.request(1, start);

        assert_eq!(debouncer.poll(start + ms(99)), None);
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.poll(start + ms(100)), Some(1));
        assert_eq!(debouncer.poll(start + ms(200)), None);
    }

    #[test]
    fn each_request_restarts_the_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();
        debouncer.request(1, start);
        debouncer.request(2, start + ms(60));
        debouncer.request(3, start + ms(120));

        assert_eq!(debouncer.deadline(), Some(start + ms(220)));
        assert_eq!(debouncer.poll(start + ms(200)), None);
        assert_eq!(debouncer.poll(start + ms(220)), Some(3));
    }

    #[test]
    fn replaced_requests_are_returned_and_never_released() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();
        assert_eq!(debouncer.request("a", start), None);
        assert_eq!(debouncer.request("b", start + ms(10)), Some("a"));

        let mut released = Vec::new();
        for step in 0..50 {
            released.extend(debouncer.poll(start + ms(step * 10)));
        }
        assert_eq!(released, vec!["b"]);
    }

    #[test]
    fn cancel_drops_pending_payload() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();
        debouncer.request("a", start);

        assert_eq!(debouncer.cancel(), Some("a"));
        assert_eq!(debouncer.pending(), None);
        assert_eq!(debouncer.poll(start + ms(500)), None);
    }
}
