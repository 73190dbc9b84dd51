//! Playback scheduler: delayed, cancelable steps on a virtual clock.
//!
//! Entries are plain data (`A`), not closures. The owner pops them with
//! [`Scheduler::pop_due`] and dispatches them itself, so the scheduler never
//! mutates game state.
//!
//! # Invariants
//!
//! 1. Entries come out in (due time, insertion order).
//! 2. After [`Scheduler::cancel_all`] no earlier entry is ever returned, even
//!    one already overdue. Every entry carries the epoch it was issued in and
//!    is dropped on pop if that epoch is stale.
//! 3. A cancelled [`CancelHandle`] suppresses every entry of its batch.
//! 4. `now()` never goes backwards.

use std::cell::Cell;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::rc::Rc;

use tracing::trace;

use crate::signal::Signal;

/// Milliseconds on the scheduler's clock.
pub type Millis = u64;

/// Cancels one scheduled batch. Clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    cancelled: Rc<Cell<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

struct Entry<A> {
    due: Millis,
    seq: u64,
    epoch: u64,
    batch: CancelHandle,
    action: A,
}

// Heap order only looks at (due, seq); seq is unique.
impl<A> PartialEq for Entry<A> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<A> Eq for Entry<A> {}

impl<A> PartialOrd for Entry<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A> Ord for Entry<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

pub struct Scheduler<A> {
    queue: BinaryHeap<Reverse<Entry<A>>>,
    now: Millis,
    epoch: u64,
    next_seq: u64,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> std::fmt::Debug for Scheduler<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("now", &self.now)
            .field("epoch", &self.epoch)
            .field("queued", &self.queue.len())
            .finish()
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            now: 0,
            epoch: 0,
            next_seq: 0,
        }
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Move the clock forward without dispatching anything.
    pub fn advance(&mut self, now: Millis) {
        self.now = self.now.max(now);
    }

    /// Run `action` once, `delay` after now.
    pub fn schedule_once(&mut self, delay: Millis, action: A) -> CancelHandle {
        let batch = CancelHandle::default();
        self.push(delay, &batch, action);
        batch
    }

    /// Step `i` fires at `i * interval`; `complete` fires at
    /// `len * interval + settle`. All share one handle.
    pub fn schedule_playback<F>(
        &mut self,
        sequence: &[Signal],
        interval: Millis,
        settle: Millis,
        mut on_step: F,
        on_complete: A,
    ) -> CancelHandle
    where
        F: FnMut(Signal) -> A,
    {
        let batch = CancelHandle::default();
        for (i, &sig) in sequence.iter().enumerate() {
            self.push(i as Millis * interval, &batch, on_step(sig));
        }
        let done_at = sequence.len() as Millis * interval + settle;
        self.push(done_at, &batch, on_complete);
        batch
    }

    /// Invalidate everything scheduled so far.
    pub fn cancel_all(&mut self) {
        self.epoch += 1;
        self.queue.clear();
        trace!(epoch = self.epoch, "scheduler epoch bumped");
    }

    /// Pop the earliest live entry due at or before `until`, moving the clock
    /// to its due time. When nothing is due the clock moves to `until`.
    pub fn pop_due(&mut self, until: Millis) -> Option<A> {
        while let Some(Reverse(head)) = self.queue.peek() {
            if head.due > until {
                break;
            }
            let Some(Reverse(entry)) = self.queue.pop() else {
                break;
            };
            if entry.epoch != self.epoch || entry.batch.is_cancelled() {
                trace!(due = entry.due, epoch = entry.epoch, "dropping stale step");
                continue;
            }
            self.now = self.now.max(entry.due);
            return Some(entry.action);
        }
        self.advance(until);
        None
    }

    /// Live entries still waiting.
    pub fn pending(&self) -> usize {
        self.queue
            .iter()
            .filter(|Reverse(e)| e.epoch == self.epoch && !e.batch.is_cancelled())
            .count()
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.queue
            .iter()
            .filter(|Reverse(e)| e.epoch == self.epoch && !e.batch.is_cancelled())
            .map(|Reverse(e)| e.due)
            .min()
    }

    fn push(&mut self, delay: Millis, batch: &CancelHandle, action: A) {
        let entry = Entry {
            due: self.now + delay,
            seq: self.next_seq,
            epoch: self.epoch,
            batch: batch.clone(),
            action,
        };
        self.next_seq += 1;
        self.queue.push(Reverse(entry));
    }
}
