//! Single-shot, cancellable timers on a millisecond clock.
//!
//! Nothing here sleeps: the owner advances the clock and collects the timers
//! that became due, in deadline order (ties keep scheduling order).

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

#[derive(Debug)]
struct Entry<T> {
    token: TimerToken,
    due_ms: u64,
    payload: T,
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    next_token: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            next_token: 0,
            entries: Vec::new(),
        }
    }

    pub fn schedule(&mut self, due_ms: u64, payload: T) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        self.entries.push(Entry {
            token,
            due_ms,
            payload,
        });
        token
    }

    /// Returns true when the timer was still pending.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.token != token);
        self.entries.len() != before
    }

    /// Removes and returns every timer due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Vec<(TimerToken, T)> {
        let mut due = Vec::new();
        let mut idx = 0;
        while idx < self.entries.len() {
            if self.entries[idx].due_ms <= now_ms {
                due.push(self.entries.remove(idx));
            } else {
                idx += 1;
            }
        }
        due.sort_by_key(|entry| (entry.due_ms, entry.token.0));
        due.into_iter()
            .map(|entry| (entry.token, entry.payload))
            .collect()
    }

    /// Removes the single earliest timer due at or before `now_ms`, along with
    /// its deadline.
    pub fn pop_next_due(&mut self, now_ms: u64) -> Option<(TimerToken, u64, T)> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due_ms <= now_ms)
            .min_by_key(|(_, entry)| (entry.due_ms, entry.token.0))
            .map(|(idx, _)| idx)?;
        let entry = self.entries.remove(idx);
        Some((entry.token, entry.due_ms, entry.payload))
    }

    /// Earliest pending deadline.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.entries.iter().map(|entry| entry.due_ms).min()
    }

    pub fn clear(&mut self) -> usize {
        let cancelled = self.entries.len();
        self.entries.clear();
        cancelled
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_due_timers_in_deadline_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(300, "late");
        timers.schedule(100, "early");
        timers.schedule(100, "early-second");
        timers.schedule(900, "pending");

        let due: Vec<&str> = timers.pop_due(300).into_iter().map(|(_, p)| p).collect();
        assert_eq!(due, vec!["early", "early-second", "late"]);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.next_due_ms(), Some(900));
    }

    #[test]
    fn pop_next_due_sees_timers_scheduled_while_draining() {
        let mut timers = TimerQueue::new();
        timers.schedule(100, "first");

        let (_, due_ms, payload) = timers.pop_next_due(500).expect("first timer due");
        assert_eq!((due_ms, payload), (100, "first"));
        timers.schedule(due_ms + 50, "follow-up");

        let (_, due_ms, payload) = timers.pop_next_due(500).expect("follow-up due");
        assert_eq!((due_ms, payload), (150, "follow-up"));
        assert!(timers.pop_next_due(500).is_none());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timers = TimerQueue::new();
        let token = timers.schedule(50, 1u8);
        assert!(timers.cancel(token));
        assert!(!timers.cancel(token));
        assert!(timers.pop_due(1_000).is_empty());
    }

    #[test]
    fn clear_reports_cancelled_count() {
        let mut timers = TimerQueue::new();
        timers.schedule(1, ());
        timers.schedule(2, ());
        assert_eq!(timers.clear(), 2);
        assert!(timers.is_empty());
    }
}
