//! Timer sources for auto-play
//!
//! A [`Scheduler`] hands out one-shot timers and reports the ones that have
//! come due. It never calls back into the controller itself; whoever drives
//! the loop collects [`Scheduler::fired`] timers and passes them to
//! [`Playback::on_timer`](super::Playback::on_timer).

use std::time::{Duration, Instant};

/// Handle for one scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

pub trait Scheduler {
    /// Arm a one-shot timer that fires after `delay`
    fn schedule(&mut self, delay: Duration) -> TimerId;

    /// Disarm a timer; unknown or already fired ids are ignored
    fn cancel(&mut self, id: TimerId);

    /// Remove and return every timer that has come due, earliest first
    fn fired(&mut self) -> Vec<TimerId>;
}

#[derive(Debug)]
struct Pending<T> {
    next_id: u64,
    timers: Vec<(TimerId, T)>,
}

impl<T> Default for Pending<T> {
    fn default() -> Self {
        Pending {
            next_id: 0,
            timers: Vec::new(),
        }
    }
}

impl<T: Copy + Ord> Pending<T> {
    fn arm(&mut self, deadline: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push((id, deadline));
        id
    }

    fn disarm(&mut self, id: TimerId) {
        self.timers.retain(|(timer, _)| *timer != id);
    }

    fn due(&mut self, now: T) -> Vec<TimerId> {
        let mut due: Vec<(TimerId, T)> = Vec::new();
        self.timers.retain(|&(id, deadline)| {
            if deadline <= now {
                due.push((id, deadline));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(id, deadline)| (deadline, id));
        due.into_iter().map(|(id, _)| id).collect()
    }
}

/// Virtual clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    pending: Pending<Duration>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Timers armed and not yet fired or cancelled
    pub fn pending(&self) -> usize {
        self.pending.timers.len()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.pending.arm(self.now + delay)
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.disarm(id);
    }

    fn fired(&mut self) -> Vec<TimerId> {
        self.pending.due(self.now)
    }
}

/// Wall-clock timers, checked whenever the event loop polls
#[derive(Debug, Default)]
pub struct PollScheduler {
    pending: Pending<Instant>,
}

impl PollScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time until the earliest armed timer, if any
    pub fn time_until_next(&self) -> Option<Duration> {
        let now = Instant::now();
        self.pending
            .timers
            .iter()
            .map(|&(_, deadline)| deadline.saturating_duration_since(now))
            .min()
    }
}

impl Scheduler for PollScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.pending.arm(Instant::now() + delay)
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.disarm(id);
    }

    fn fired(&mut self) -> Vec<TimerId> {
        self.pending.due(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_timers_fire_in_deadline_order() {
        let mut scheduler = ManualScheduler::new();
        let late = scheduler.schedule(Duration::from_millis(300));
        let early = scheduler.schedule(Duration::from_millis(100));
        let cancelled = scheduler.schedule(Duration::from_millis(50));
        scheduler.cancel(cancelled);

        scheduler.advance(Duration::from_millis(99));
        assert!(scheduler.fired().is_empty());
        scheduler.advance(Duration::from_millis(300));
        assert_eq!(scheduler.fired(), vec![early, late]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn poll_timers_report_remaining_time() {
        let mut scheduler = PollScheduler::new();
        assert_eq!(scheduler.time_until_next(), None);
        let id = scheduler.schedule(Duration::ZERO);
        assert_eq!(scheduler.fired(), vec![id]);
        scheduler.schedule(Duration::from_secs(60));
        assert!(scheduler.time_until_next().unwrap() > Duration::from_secs(1));
        assert!(scheduler.fired().is_empty());
    }
}
