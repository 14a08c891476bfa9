//
// ─── TIMER ─────────────────────────────────────────────────────────────────────
//

/// Lifecycle of the countdown clock for one quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Created but not counting; the learner has not started the attempt.
    Idle,
    /// Counting down one second per tick.
    Running,
    /// Reached zero. Reported exactly once via [`TimerTick::Expired`].
    Expired,
    /// Stopped before expiry (manual submit or teardown).
    Cancelled,
}

/// Result of advancing the timer by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// The timer was not running; nothing happened.
    Inert,
    /// One second elapsed; time remains.
    Ticked { remaining: u32 },
    /// The clock just hit zero. The caller must trigger auto-submission.
    Expired,
}

/// The countdown clock owned by a quiz session.
///
/// Pure state: something else (a 1 Hz loop in the UI, a plain loop in
/// tests) calls [`SessionTimer::tick`] once per elapsed second. At most one
/// timer exists per session, and cancellation is a first-class transition
/// taken on every session exit, not just teardown. Once `Expired` or
/// `Cancelled`, every further tick is [`TimerTick::Inert`], so a stale tick
/// arriving after the session has moved on cannot re-trigger anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTimer {
    state: TimerState,
    remaining: u32,
    total: u32,
}

impl SessionTimer {
    /// A timer that has not been started.
    #[must_use]
    pub fn idle() -> Self {
        Self {
            state: TimerState::Idle,
            remaining: 0,
            total: 0,
        }
    }

    /// A timer counting down from `total_seconds`.
    ///
    /// A zero total expires on the first tick.
    #[must_use]
    pub fn running(total_seconds: u32) -> Self {
        Self {
            state: TimerState::Running,
            remaining: total_seconds,
            total: total_seconds,
        }
    }

    #[must_use]
    pub fn state(&self) -> TimerState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Seconds left on the clock. Zero once expired.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// The starting total, for progress rendering.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Advances the clock by one second.
    pub fn tick(&mut self) -> TimerTick {
        if self.state != TimerState::Running {
            return TimerTick::Inert;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = TimerState::Expired;
            return TimerTick::Expired;
        }
        TimerTick::Ticked {
            remaining: self.remaining,
        }
    }

    /// Stops a running clock. No-op in any other state, so callers can
    /// cancel unconditionally on session exit.
    pub fn cancel(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Cancelled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_and_expires_exactly_once() {
        let mut timer = SessionTimer::running(1800);

        let mut expired = 0;
        for _ in 0..1800 {
            if timer.tick() == TimerTick::Expired {
                expired += 1;
            }
        }

        assert_eq!(expired, 1);
        assert_eq!(timer.state(), TimerState::Expired);
        assert_eq!(timer.remaining(), 0);

        // A stale tick after expiry does nothing.
        assert_eq!(timer.tick(), TimerTick::Inert);
    }

    #[test]
    fn reports_remaining_while_running() {
        let mut timer = SessionTimer::running(3);
        assert_eq!(timer.tick(), TimerTick::Ticked { remaining: 2 });
        assert_eq!(timer.tick(), TimerTick::Ticked { remaining: 1 });
        assert_eq!(timer.tick(), TimerTick::Expired);
    }

    #[test]
    fn zero_total_expires_on_first_tick() {
        let mut timer = SessionTimer::running(0);
        assert_eq!(timer.tick(), TimerTick::Expired);
    }

    #[test]
    fn cancel_stops_the_clock() {
        let mut timer = SessionTimer::running(10);
        timer.tick();
        timer.cancel();

        assert_eq!(timer.state(), TimerState::Cancelled);
        assert_eq!(timer.tick(), TimerTick::Inert);
        assert_eq!(timer.remaining(), 9);
    }

    #[test]
    fn cancel_outside_running_is_a_no_op() {
        let mut idle = SessionTimer::idle();
        idle.cancel();
        assert_eq!(idle.state(), TimerState::Idle);

        let mut expired = SessionTimer::running(0);
        expired.tick();
        expired.cancel();
        assert_eq!(expired.state(), TimerState::Expired);
    }
}
