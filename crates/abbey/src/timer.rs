//! Scheduled simulation events with cancellation tokens
//!
//! Deadlines are on the simulation clock, so timers advance with `tick(dt)`
//! rather than wall time. A cancelled token never fires.

/// Handle for one scheduled event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

#[derive(Debug, Clone)]
struct Scheduled<E> {
    token: TimerToken,
    deadline: f64,
    event: E,
}

/// Pending deferred events
#[derive(Debug, Clone)]
pub struct Timers<E> {
    next_token: u64,
    pending: Vec<Scheduled<E>>,
}

impl<E> Default for Timers<E> {
    fn default() -> Self {
        Self {
            next_token: 0,
            pending: Vec::new(),
        }
    }
}

impl<E> Timers<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` to fire once the clock reaches `now + delay`
    pub fn schedule(&mut self, now: f64, delay: f64, event: E) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        let deadline = now + delay.max(0.0);
        tracing::trace!("Timer {:?} scheduled for t={:.3}", token, deadline);
        self.pending.push(Scheduled {
            token,
            deadline,
            event,
        });
        token
    }

    /// Cancel a pending event; returns false if it already fired or was cancelled
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.token != token);
        let cancelled = self.pending.len() != before;
        if cancelled {
            tracing::trace!("Timer {:?} cancelled", token);
        }
        cancelled
    }

    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.pending.iter().any(|s| s.token == token)
    }

    pub fn deadline(&self, token: TimerToken) -> Option<f64> {
        self.pending
            .iter()
            .find(|s| s.token == token)
            .map(|s| s.deadline)
    }

    /// Remove and return every event due at `now`, earliest first
    pub fn fire_due(&mut self, now: f64) -> Vec<(TimerToken, E)> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pending)
                .into_iter()
                .partition(|s| s.deadline <= now);
        self.pending = rest;
        due.sort_by(|a, b| a.deadline.total_cmp(&b.deadline).then(a.token.cmp(&b.token)));
        due.into_iter().map(|s| (s.token, s.event)).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
