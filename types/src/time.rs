//! Timestamp type used by the delay gate and proposal expiry.
//!
//! Timestamps are seconds as reported by the host in the current block
//! header. The engine never reads a wall clock.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Block timestamp in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// This timestamp plus `secs`, or `None` on overflow.
    pub fn checked_add_secs(&self, secs: u64) -> Option<Self> {
        self.0.checked_add(secs).map(Self)
    }

    /// Seconds elapsed since this timestamp (relative to `now`), zero if `now` is earlier.
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// Whether `now` is at or past this timestamp.
    pub fn has_arrived(&self, now: Timestamp) -> bool {
        now.0 >= self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrival_is_inclusive() {
        let ready = Timestamp::new(100);
        assert!(!ready.has_arrived(Timestamp::new(99)));
        assert!(ready.has_arrived(Timestamp::new(100)));
        assert!(ready.has_arrived(Timestamp::new(101)));
    }

    #[test]
    fn checked_add_overflows_to_none() {
        assert_eq!(Timestamp::new(u64::MAX).checked_add_secs(1), None);
        assert_eq!(Timestamp::new(5).checked_add_secs(5), Some(Timestamp::new(10)));
    }

    #[test]
    fn elapsed_saturates() {
        assert_eq!(Timestamp::new(10).elapsed_since(Timestamp::new(4)), 0);
        assert_eq!(Timestamp::new(4).elapsed_since(Timestamp::new(10)), 6);
    }
}
