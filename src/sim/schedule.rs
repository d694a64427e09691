//! Deferred events keyed on simulated time
//!
//! The host clock is advanced explicitly, so anything scheduled here fires
//! deterministically in tests.

/// Events the session defers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledEvent {
    /// Draw and reveal the pending reward
    RevealReward,
}

/// Queue of events waiting for their deadline
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    queue: Vec<(f64, E)>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self { queue: Vec::new() }
    }
}

impl<E> Scheduler<E> {
    pub fn schedule(&mut self, at_ms: f64, event: E) {
        // Keep sorted by deadline; equal deadlines keep insertion order
        let idx = self.queue.partition_point(|(t, _)| *t <= at_ms);
        self.queue.insert(idx, (at_ms, event));
    }

    /// Remove and return every event whose deadline is at or before `now_ms`
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<E> {
        let due = self.queue.partition_point(|(t, _)| *t <= now_ms);
        self.queue.drain(..due).map(|(_, e)| e).collect()
    }

    /// Drop everything (full reset)
    pub fn cancel_all(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_only_after_deadline() {
        let mut sched = Scheduler::default();
        sched.schedule(750.0, ScheduledEvent::RevealReward);
        assert!(sched.drain_due(749.9).is_empty());
        assert_eq!(sched.drain_due(750.0), vec![ScheduledEvent::RevealReward]);
        assert!(sched.is_empty());
    }

    #[test]
    fn test_drains_in_deadline_order() {
        let mut sched = Scheduler::default();
        sched.schedule(30.0, 3);
        sched.schedule(10.0, 1);
        sched.schedule(20.0, 2);
        sched.schedule(10.0, 4);
        assert_eq!(sched.drain_due(25.0), vec![1, 4, 2]);
        assert_eq!(sched.len(), 1);
    }

    #[test]
    fn test_cancel_clears_pending() {
        let mut sched = Scheduler::default();
        sched.schedule(5.0, ScheduledEvent::RevealReward);
        sched.cancel_all();
        assert!(sched.drain_due(100.0).is_empty());
    }
}
