use std::time::{Duration, Instant};

/// Tracks request timing for one host
///
/// The fetcher keeps one of these per host to space requests by the
/// configured politeness delay.
#[derive(Debug, Clone, Default)]
pub struct DomainState {
    /// Number of requests made to this host in the current crawl
    pub request_count: u32,

    /// Time of the last request to this host (may be in the future once reserved)
    pub last_request_time: Option<Instant>,
}

impl DomainState {
    /// Creates a new DomainState with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculates the time until the next request can be made
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    pub fn time_until_next_request(&self, delay: Duration, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let ready_at = last + delay;
        if ready_at > now {
            Some(ready_at - now)
        } else {
            None
        }
    }

    /// Records that a request was made to this host
    pub fn record_request(&mut self, now: Instant) {
        self.request_count += 1;
        self.last_request_time = Some(now);
    }

    /// Claims the next request slot and returns how long to wait for it
    ///
    /// The slot is recorded immediately, so concurrent callers for the same
    /// host queue up one delay apart instead of all firing when it expires.
    pub fn reserve_slot(&mut self, delay: Duration, now: Instant) -> Duration {
        let wait = self.time_until_next_request(delay, now).unwrap_or_default();
        self.record_request(now + wait);
        wait
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(1000);

    #[test]
    fn test_new_domain_state() {
        let state = DomainState::new();
        assert_eq!(state.request_count, 0);
        assert!(state.last_request_time.is_none());
    }

    #[test]
    fn test_no_wait_initially() {
        let state = DomainState::new();
        assert!(state.time_until_next_request(DELAY, Instant::now()).is_none());
    }

    #[test]
    fn test_wait_within_delay() {
        let mut state = DomainState::new();
        let now = Instant::now();
        state.record_request(now);

        assert!(state
            .time_until_next_request(DELAY, now + Duration::from_millis(500))
            .is_some());
        assert!(state
            .time_until_next_request(DELAY, now + Duration::from_millis(1000))
            .is_none());
    }

    #[test]
    fn test_time_until_next_request() {
        let mut state = DomainState::new();
        let now = Instant::now();
        state.record_request(now);

        let wait = state
            .time_until_next_request(DELAY, now + Duration::from_millis(300))
            .unwrap();
        assert_eq!(wait, Duration::from_millis(700));
        assert!(state
            .time_until_next_request(DELAY, now + Duration::from_millis(1500))
            .is_none());
    }

    #[test]
    fn test_zero_delay_never_waits() {
        let mut state = DomainState::new();
        let now = Instant::now();
        state.record_request(now);
        assert!(state.time_until_next_request(Duration::ZERO, now).is_none());
    }

    #[test]
    fn test_reserve_slot_spaces_requests() {
        let mut state = DomainState::new();
        let now = Instant::now();

        assert_eq!(state.reserve_slot(DELAY, now), Duration::ZERO);
        assert_eq!(state.reserve_slot(DELAY, now), DELAY);
        assert_eq!(state.reserve_slot(DELAY, now), DELAY * 2);
        assert_eq!(state.request_count, 3);
    }
}
