// core/timer.rs
//
// Frame-driven timer service. Delayed tasks are identified by TimerId and can be
// cancelled before they fire. Time only moves when the owner calls `advance`,
// so everything stays on the thread that drives the frame loop.
//
// Usage:
//   let mut timers = Scheduler::new();
//   let id = timers.schedule(2000.0, Stage::StopSpin);
//   for fired in timers.advance(frame_ms) { /* handle fired.payload */ }

/// Handle to a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u32);

/// A task whose deadline has passed, returned by `Scheduler::advance`.
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<T> {
    pub id: TimerId,
    /// Deadline the task was scheduled for, in scheduler milliseconds.
    pub due_ms: f64,
    pub payload: T,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    id: TimerId,
    due_ms: f64,
    payload: T,
}

/// Monotonic millisecond clock plus the set of pending delayed tasks.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now_ms: f64,
    pending: Vec<Pending<T>>,
    next_id: u32,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            pending: Vec::new(),
            next_id: 1,
        }
    }

    /// Current scheduler time in milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Schedule `payload` to fire `delay_ms` from now. Negative delays fire on the next advance.
    pub fn schedule(&mut self, delay_ms: f64, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due_ms: self.now_ms + delay_ms.max(0.0),
            payload,
        });
        id
    }

    /// Schedule `payload` for an absolute deadline. A deadline in the past fires on the next advance.
    pub fn schedule_at(&mut self, due_ms: f64, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending { id, due_ms, payload });
        id
    }

    /// Cancel a pending task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Cancel every pending task. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    /// Move the clock forward and return every task that is now due.
    /// Order: earliest deadline first, ties in scheduling order.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<Fired<T>> {
        self.now_ms += dt_ms.max(0.0);
        let now = self.now_ms;

        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.due_ms <= now);
        self.pending = rest;

        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.id.cmp(&b.id)));
        due.into_iter()
            .map(|p| Fired {
                id: p.id,
                due_ms: p.due_ms,
                payload: p.payload,
            })
            .collect()
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_after_delay() {
        let mut timers = Scheduler::new();
        timers.schedule(100.0, "a");
        assert!(timers.advance(99.0).is_empty());
        let fired = timers.advance(1.0);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].payload, "a");
        assert!(timers.is_empty());
    }

    #[test]
    fn fires_in_deadline_then_schedule_order() {
        let mut timers = Scheduler::new();
        timers.schedule(300.0, 3);
        timers.schedule(100.0, 1);
        timers.schedule(300.0, 4);
        timers.schedule(200.0, 2);
        let order: Vec<_> = timers.advance(1000.0).into_iter().map(|f| f.payload).collect();
        assert_eq!(order, vec![1, 2, 3, 4]);
    }

    #[test]
    fn cancelled_task_never_fires() {
        let mut timers = Scheduler::new();
        let keep = timers.schedule(50.0, "keep");
        let dropped = timers.schedule(50.0, "drop");
        assert!(timers.cancel(dropped));
        assert!(!timers.cancel(dropped));
        assert!(timers.is_pending(keep));
        let fired = timers.advance(50.0);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].id, keep);
    }

    #[test]
    fn cancel_all_clears_pending() {
        let mut timers = Scheduler::new();
        timers.schedule(10.0, ());
        timers.schedule(20.0, ());
        assert_eq!(timers.cancel_all(), 2);
        assert!(timers.advance(100.0).is_empty());
    }

    #[test]
    fn delay_is_relative_to_current_time() {
        let mut timers = Scheduler::new();
        timers.advance(1000.0);
        timers.schedule(500.0, ());
        assert!(timers.advance(499.0).is_empty());
        let fired = timers.advance(1.0);
        assert_eq!(fired[0].due_ms, 1500.0);
        assert_eq!(timers.now_ms(), 1500.0);
    }

    #[test]
    fn absolute_deadline_ignores_frame_lateness() {
        let mut timers = Scheduler::new();
        timers.schedule(100.0, "first");
        let fired = timers.advance(116.0);
        // Chain off the deadline, not the late frame time
        timers.schedule_at(fired[0].due_ms + 100.0, "second");
        assert!(timers.advance(83.0).is_empty());
        assert_eq!(timers.advance(1.0)[0].payload, "second");
    }

    #[test]
    fn ids_are_unique() {
        let mut timers = Scheduler::new();
        let a = timers.schedule(1.0, ());
        let b = timers.schedule(1.0, ());
        assert_ne!(a, b);
    }
}
