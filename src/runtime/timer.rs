use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use crate::foundation::core::TimeMs;

/// Handle of a recurring host timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

/// Recurring timers provided by the host (`setInterval` / `clearInterval` on the web).
pub trait TimerHost {
    /// Arm a timer that fires every `period_ms` until cleared.
    fn set_interval(&mut self, period_ms: u64) -> TimerId;
    /// Disarm `id`. Unknown or already-cleared ids are ignored.
    fn clear_interval(&mut self, id: TimerId);
}

/// Deterministic virtual-time [`TimerHost`].
///
/// Determinism rule: timers due at the same instant fire in arming order. Cleared timers
/// are dropped lazily when they reach the top of the heap.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: TimeMs,
    next_id: u64,
    next_seq: u64,
    periods: BTreeMap<TimerId, u64>,
    due: BinaryHeap<Reverse<(TimeMs, u64, TimerId)>>,
}

impl TimerQueue {
    /// Queue starting at `now`.
    pub fn new(now: TimeMs) -> Self {
        Self {
            now,
            ..Self::default()
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> TimeMs {
        self.now
    }

    /// Number of armed timers.
    pub fn active_count(&self) -> usize {
        self.periods.len()
    }

    /// Whether `id` is still armed.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.periods.contains_key(&id)
    }

    /// Move the clock to `now` and return every firing up to and including it, in order.
    /// A timer that elapsed several periods appears once per period.
    pub fn advance_to(&mut self, now: TimeMs) -> Vec<TimerId> {
        let mut fired = Vec::new();
        while let Some(Reverse((at, _, id))) = self.due.peek().copied() {
            if at > now {
                break;
            }
            self.due.pop();
            let Some(&period) = self.periods.get(&id) else {
                continue;
            };
            fired.push(id);
            self.push(at.saturating_add_ms(period), id);
        }
        self.now = self.now.max(now);
        fired
    }

    fn push(&mut self, at: TimeMs, id: TimerId) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.due.push(Reverse((at, seq, id)));
    }
}

impl TimerHost for TimerQueue {
    fn set_interval(&mut self, period_ms: u64) -> TimerId {
        let period = period_ms.max(1);
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.periods.insert(id, period);
        self.push(self.now.saturating_add_ms(period), id);
        id
    }

    fn clear_interval(&mut self, id: TimerId) {
        self.periods.remove(&id);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/timer.rs"]
mod tests;
