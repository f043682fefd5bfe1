/// Minimum-interval gate: last-fired timestamp plus a required gap.
///
/// Calls that arrive before the gap has elapsed are refused and leave no
/// trace. The clock starts at zero, so nothing fires until one full interval
/// after boot.
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
    last_fired_ms: u64,
    min_interval_ms: u64,
}

impl RateLimiter {
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            last_fired_ms: 0,
            min_interval_ms,
        }
    }

    pub fn ready(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_fired_ms) >= self.min_interval_ms
    }

    /// Record a firing at `now_ms` if the interval has elapsed.
    pub fn try_fire(&mut self, now_ms: u64) -> bool {
        if !self.ready(now_ms) {
            return false;
        }
        self.last_fired_ms = now_ms;
        true
    }

    pub fn last_fired_ms(&self) -> u64 {
        self.last_fired_ms
    }

    pub fn min_interval_ms(&self) -> u64 {
        self.min_interval_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_inside_interval() {
        let mut limiter = RateLimiter::new(250);
        assert!(!limiter.try_fire(0));
        assert!(!limiter.try_fire(249));
        assert!(limiter.try_fire(250));
        assert!(!limiter.try_fire(499));
        assert_eq!(limiter.last_fired_ms(), 250);
        assert!(limiter.try_fire(500));
    }

    #[test]
    fn zero_interval_always_fires() {
        let mut limiter = RateLimiter::new(0);
        assert!(limiter.try_fire(0));
        assert!(limiter.try_fire(0));
    }
}
