//! Cancellable one-shot timers.
//!
//! The host owns the clock and the run loop: the engine asks it to schedule a
//! [`TimerId`] and the host hands the id back when it fires. Each state
//! machine keeps a [`TimerSlot`] so that at most one id of its kind is ever
//! outstanding, and late firings of cancelled ids are recognised by their
//! generation and ignored.

use std::time::{Duration, Instant};

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKind {
    PendingSpace,
    LongPress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId {
    pub kind: TimerKind,
    pub generation: u64,
}

const LONG_PRESS_BIT: u64 = 1 << 63;

impl TimerId {
    /// Pack into a single integer for hosts that only pass numbers around.
    /// The top bit carries the kind.
    pub fn to_bits(self) -> u64 {
        let kind = match self.kind {
            TimerKind::PendingSpace => 0,
            TimerKind::LongPress => LONG_PRESS_BIT,
        };
        kind | (self.generation & !LONG_PRESS_BIT)
    }

    pub fn from_bits(bits: u64) -> Self {
        let kind = if bits & LONG_PRESS_BIT != 0 {
            TimerKind::LongPress
        } else {
            TimerKind::PendingSpace
        };
        Self {
            kind,
            generation: bits & !LONG_PRESS_BIT,
        }
    }
}

/// Host timer capability.
pub trait Scheduler {
    /// Monotonic now.
    fn now(&self) -> Instant;
    /// Deliver `id` back to the engine after `delay`.
    fn schedule(&mut self, id: TimerId, delay: Duration);
    /// Drop `id` if it has not fired yet.
    fn cancel(&mut self, id: TimerId);
}

/// The single outstanding timer of one kind.
#[derive(Debug, Clone)]
pub struct TimerSlot {
    kind: TimerKind,
    generation: u64,
    outstanding: Option<TimerId>,
}

impl TimerSlot {
    pub fn new(kind: TimerKind) -> Self {
        Self {
            kind,
            generation: 0,
            outstanding: None,
        }
    }

    /// Cancel whatever is outstanding and schedule a fresh id.
    pub fn arm<T: Scheduler + ?Sized>(&mut self, scheduler: &mut T, delay: Duration) -> TimerId {
        self.disarm(scheduler);
        self.generation += 1;
        let id = TimerId {
            kind: self.kind,
            generation: self.generation,
        };
        scheduler.schedule(id, delay);
        self.outstanding = Some(id);
        id
    }

    pub fn disarm<T: Scheduler + ?Sized>(&mut self, scheduler: &mut T) {
        if let Some(id) = self.outstanding.take() {
            scheduler.cancel(id);
        }
    }

    /// Accept a firing. Only the outstanding id is accepted, and only once.
    pub fn claim(&mut self, id: TimerId) -> bool {
        if self.outstanding == Some(id) {
            self.outstanding = None;
            true
        } else {
            debug!(?id, outstanding = ?self.outstanding, "stale timer ignored");
            false
        }
    }

    pub fn outstanding(&self) -> Option<TimerId> {
        self.outstanding
    }

    pub fn is_armed(&self) -> bool {
        self.outstanding.is_some()
    }
}

/// Virtual-clock scheduler: time only moves when the caller advances it.
#[derive(Debug, Clone)]
pub struct ManualScheduler {
    origin: Instant,
    elapsed: Duration,
    // (due, sequence, id); sequence keeps equal deadlines in scheduling order.
    pending: Vec<(Duration, u64, TimerId)>,
    sequence: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Duration::ZERO,
            pending: Vec::new(),
            sequence: 0,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Ids scheduled and not yet fired or cancelled, earliest first.
    pub fn outstanding(&self) -> Vec<TimerId> {
        self.pending.iter().map(|(_, _, id)| *id).collect()
    }

    pub fn outstanding_of(&self, kind: TimerKind) -> usize {
        self.pending.iter().filter(|(_, _, id)| id.kind == kind).count()
    }

    /// Fire the earliest timer due at or before `target`, moving the clock to
    /// its deadline. Returns `None` once nothing more is due.
    pub fn step(&mut self, target: Duration) -> Option<TimerId> {
        let first = self.pending.first().copied()?;
        if first.0 > target {
            return None;
        }
        self.pending.remove(0);
        self.elapsed = self.elapsed.max(first.0);
        Some(first.2)
    }

    /// Move the clock forward without firing anything.
    pub fn settle(&mut self, target: Duration) {
        self.elapsed = self.elapsed.max(target);
    }

    /// Move the clock by `by` and return every id that came due, in order.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerId> {
        let target = self.elapsed + by;
        let mut fired = Vec::new();
        while let Some(id) = self.step(target) {
            fired.push(id);
        }
        self.settle(target);
        fired
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Instant {
        self.origin + self.elapsed
    }

    fn schedule(&mut self, id: TimerId, delay: Duration) {
        self.sequence += 1;
        let entry = (self.elapsed + delay, self.sequence, id);
        let pos = self.pending.partition_point(|e| (e.0, e.1) <= (entry.0, entry.1));
        self.pending.insert(pos, entry);
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.retain(|(_, _, pending)| *pending != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn arm_replaces_outstanding() {
        let mut sched = ManualScheduler::new();
        let mut slot = TimerSlot::new(TimerKind::PendingSpace);
        let first = slot.arm(&mut sched, ms(250));
        let second = slot.arm(&mut sched, ms(250));
        assert_ne!(first, second);
        assert_eq!(sched.outstanding(), vec![second]);
        assert!(!slot.claim(first));
        assert!(slot.claim(second));
        assert!(!slot.claim(second));
    }

    #[test]
    fn disarm_cancels() {
        let mut sched = ManualScheduler::new();
        let mut slot = TimerSlot::new(TimerKind::LongPress);
        slot.arm(&mut sched, ms(300));
        slot.disarm(&mut sched);
        assert!(sched.outstanding().is_empty());
        assert!(!slot.is_armed());
        assert!(sched.advance(ms(1000)).is_empty());
    }

    #[test]
    fn advance_fires_in_deadline_order() {
        let mut sched = ManualScheduler::new();
        let a = TimerId {
            kind: TimerKind::LongPress,
            generation: 1,
        };
        let b = TimerId {
            kind: TimerKind::PendingSpace,
            generation: 1,
        };
        sched.schedule(a, ms(300));
        sched.schedule(b, ms(250));
        assert!(sched.advance(ms(200)).is_empty());
        assert_eq!(sched.advance(ms(60)), vec![b]);
        assert_eq!(sched.elapsed(), ms(260));
        assert_eq!(sched.advance(ms(40)), vec![a]);
    }

    #[test]
    fn now_follows_virtual_clock() {
        let mut sched = ManualScheduler::new();
        let start = sched.now();
        sched.advance(ms(75));
        assert_eq!(sched.now() - start, ms(75));
    }

    #[test]
    fn bits_round_trip_kind() {
        let id = TimerId {
            kind: TimerKind::LongPress,
            generation: 42,
        };
        assert_eq!(TimerId::from_bits(id.to_bits()), id);
        let id = TimerId {
            kind: TimerKind::PendingSpace,
            generation: 7,
        };
        assert_eq!(TimerId::from_bits(id.to_bits()), id);
    }
}
