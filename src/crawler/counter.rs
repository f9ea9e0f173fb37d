//! Completion counter shared by all in-flight chains

use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts emitted records against a target
///
/// The count only ever grows. Checking `at_limit` and later calling
/// `increment` is not atomic as a pair, so concurrent chains can finish
/// after the target is reached; callers bound that overshoot by how much
/// work they let into flight.
#[derive(Debug)]
pub struct CompletionCounter {
    count: AtomicUsize,
    limit: usize,
}

impl CompletionCounter {
    pub fn new(limit: usize) -> Self {
        Self {
            count: AtomicUsize::new(0),
            limit,
        }
    }

    /// Records one emitted record and returns the new count
    pub fn increment(&self) -> usize {
        self.count.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Returns true once the target has been reached
    pub fn at_limit(&self) -> bool {
        self.count() >= self.limit
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_increment_returns_new_value() {
        let counter = CompletionCounter::new(2);
        assert!(!counter.at_limit());
        assert_eq!(counter.increment(), 1);
        assert!(!counter.at_limit());
        assert_eq!(counter.increment(), 2);
        assert!(counter.at_limit());
        assert_eq!(counter.increment(), 3);
        assert!(counter.at_limit());
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let counter = Arc::new(CompletionCounter::new(1000));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..250 {
                        counter.increment();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.count(), 2000);
        assert!(counter.at_limit());
    }

    #[test]
    fn test_zero_limit_starts_at_limit() {
        assert!(CompletionCounter::new(0).at_limit());
    }
}
