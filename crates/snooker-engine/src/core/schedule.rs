//! Deferred actions on a logical tick clock.
//!
//! Tests advance the clock one tick at a time, so anything scheduled here is
//! fully deterministic. A [`TaskId`] doubles as the cancellation token.

/// Token returned by [`Scheduler::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug)]
struct Pending<A> {
    id: TaskId,
    due: u64,
    action: A,
}

/// Queue of actions that fire a number of ticks after being scheduled.
#[derive(Debug)]
pub struct Scheduler<A> {
    now: u64,
    next_id: u64,
    pending: Vec<Pending<A>>,
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Run `action` once `delay` more ticks have elapsed (at least one).
    pub fn schedule(&mut self, delay: u32, action: A) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due: self.now + delay.max(1) as u64,
            action,
        });
        id
    }

    /// Drop a pending task. Returns whether it was still pending.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    /// Advance the clock by one tick and return the actions now due,
    /// in the order they were scheduled.
    pub fn advance(&mut self) -> Vec<A> {
        self.now += 1;
        let now = self.now;
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due <= now {
                due.push(self.pending.remove(i).action);
            } else {
                i += 1;
            }
        }
        due
    }

    /// Drop every pending task. The clock keeps running.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}
