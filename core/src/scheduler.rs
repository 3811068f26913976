//! Virtual-time task queue
//!
//! The engine never sleeps. Hosts move the clock forward with
//! [`Scheduler::pop_due`] / [`Scheduler::settle`] and every continuation
//! (flip phase end, mismatch close, event delivery) is a queued task.
//! Tasks due at the same instant run in the order they were scheduled.

use std::collections::BTreeMap;

/// Handle to a queued task, used for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: u64,
    next_seq: u64,
    queue: BTreeMap<(u64, u64), T>,
    /// seq -> due time, for cancellation by handle
    due_times: BTreeMap<u64, u64>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            queue: BTreeMap::new(),
            due_times: BTreeMap::new(),
        }
    }

    /// Current virtual time in milliseconds
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Run `task` once `delay` milliseconds have passed
    pub fn schedule_after(&mut self, delay: u64, task: T) -> TaskHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        let due = self.now.saturating_add(delay);
        self.queue.insert((due, seq), task);
        self.due_times.insert(seq, due);
        TaskHandle(seq)
    }

    /// Run `task` after everything already due at the current instant
    pub fn next_tick(&mut self, task: T) -> TaskHandle {
        self.schedule_after(0, task)
    }

    /// Cancel a pending task, returning it if it had not run yet
    pub fn cancel(&mut self, handle: TaskHandle) -> Option<T> {
        let due = self.due_times.remove(&handle.0)?;
        self.queue.remove(&(due, handle.0))
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.due_times.contains_key(&handle.0)
    }

    /// Pop the earliest task due at or before `until`, moving the clock to it
    pub fn pop_due(&mut self, until: u64) -> Option<T> {
        let (&(due, seq), _) = self.queue.first_key_value()?;
        if due > until {
            return None;
        }
        let task = self.queue.remove(&(due, seq))?;
        self.due_times.remove(&seq);
        self.now = self.now.max(due);
        Some(task)
    }

    /// Move the clock to `until` once every due task has been popped
    pub fn settle(&mut self, until: u64) {
        self.now = self.now.max(until);
    }

    /// Drop every pending task; the clock keeps its value
    pub fn clear(&mut self) {
        self.queue.clear();
        self.due_times.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Time at which the next task becomes due
    pub fn next_due(&self) -> Option<u64> {
        self.queue.keys().next().map(|&(due, _)| due)
    }
}
