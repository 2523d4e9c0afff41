/// A leading-edge rate limiter driven by adapter-supplied timestamps.
///
/// The first call passes; later calls pass only once `interval_ms` has elapsed since the last
/// call that passed. Calls rejected inside the window are dropped, not deferred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Throttle {
    pub interval_ms: u64,
    last_ms: Option<u64>,
}

impl Throttle {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    /// Returns `true` (and starts a new window) when a call is allowed at `now_ms`.
    pub fn try_acquire(&mut self, now_ms: u64) -> bool {
        if self.remaining_ms(now_ms) > 0 {
            return false;
        }
        self.last_ms = Some(now_ms);
        true
    }

    /// Time left in the current window (0 when a call would pass).
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        match self.last_ms {
            Some(last) => self.interval_ms.saturating_sub(now_ms.saturating_sub(last)),
            None => 0,
        }
    }

    pub fn last_ms(&self) -> Option<u64> {
        self.last_ms
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
