//! Consecutive failure counter

/// Counts consecutive failed cycles against a fixed maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCounter {
    count: u32,
    max: u32,
}

impl ErrorCounter {
    pub fn new(max: u32) -> Self {
        Self { count: 0, max: max.max(1) }
    }

    /// Record a failure, returning the new count
    pub fn record_failure(&mut self) -> u32 {
        self.count = self.count.saturating_add(1);
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// True once the maximum has been reached
    pub fn exhausted(&self) -> bool {
        self.count >= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_after_success() {
        let mut counter = ErrorCounter::new(3);
        counter.record_failure();
        counter.record_failure();
        counter.reset();
        assert_eq!(counter.count(), 0);
        counter.record_failure();
        assert!(!counter.exhausted());
    }

    #[test]
    fn test_exhausted_at_max() {
        let mut counter = ErrorCounter::new(3);
        assert_eq!(counter.record_failure(), 1);
        assert_eq!(counter.record_failure(), 2);
        assert!(!counter.exhausted());
        assert_eq!(counter.record_failure(), 3);
        assert!(counter.exhausted());
    }

    #[test]
    fn test_zero_max_is_clamped() {
        let mut counter = ErrorCounter::new(0);
        assert_eq!(counter.max(), 1);
        counter.record_failure();
        assert!(counter.exhausted());
    }
}
