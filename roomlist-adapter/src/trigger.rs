use roomlist::{FetchTicket, Paginator};

use crate::Throttle;

/// Turns "the load-more sentinel is visible" into at most one `page + 1` request per interval.
///
/// The paginator guard (`!loading && has_more`) is read at poll time, before the throttle: a poll
/// the guard refuses leaves the interval untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadMoreTrigger {
    throttle: Throttle,
}

impl LoadMoreTrigger {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            throttle: Throttle::new(interval_ms),
        }
    }

    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    /// Call whenever visibility is (re)evaluated, e.g. on every tick while visible.
    ///
    /// Returns the ticket of the fetch that was started, if any.
    pub fn poll<T>(
        &mut self,
        visible: bool,
        now_ms: u64,
        paginator: &mut Paginator<T>,
    ) -> Option<FetchTicket> {
        if !visible || !paginator.state().can_load_more() || !self.throttle.try_acquire(now_ms) {
            return None;
        }
        let ticket = paginator.begin_next();
        rtrace!(now_ms, started = ticket.is_some(), "LoadMoreTrigger::poll");
        ticket
    }

    pub fn reset(&mut self) {
        self.throttle.reset();
    }
}
