use std::time::Duration;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// A scheduled callback that came due. Both variants carry the generation of
/// the session that scheduled them so stale callbacks can be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fired {
    Tick { generation: u64 },
    Advance { generation: u64, index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Countdown {
    generation: u64,
    until_tick: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingAdvance {
    generation: u64,
    index: usize,
    until_due: Duration,
}

/// Callbacks set aside while the session is paused, with whatever time was
/// left on them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Suspended {
    countdown: Option<Countdown>,
    pending: Option<PendingAdvance>,
}

/// Owns the one-second countdown and the delayed auto-advance.
///
/// The scheduler never reads a clock: the host reports elapsed time through
/// [`Scheduler::poll`], which hands back due callbacks one at a time in the
/// order they fell due.
#[derive(Debug, Clone)]
pub struct Scheduler {
    tick_interval: Duration,
    advance_delay: Duration,
    countdown: Option<Countdown>,
    pending: Option<PendingAdvance>,
    suspended: Option<Suspended>,
}

impl Scheduler {
    pub fn new(advance_delay: Duration) -> Self {
        Self {
            tick_interval: TICK_INTERVAL,
            advance_delay,
            countdown: None,
            pending: None,
            suspended: None,
        }
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn set_advance_delay(&mut self, delay: Duration) {
        self.advance_delay = delay;
    }

    pub fn advance_delay(&self) -> Duration {
        self.advance_delay
    }

    /// Start ticking for `generation`. A countdown already running for the
    /// same generation keeps its phase.
    pub fn start(&mut self, generation: u64) {
        match self.countdown {
            Some(c) if c.generation == generation => {}
            _ => {
                self.countdown = Some(Countdown {
                    generation,
                    until_tick: self.tick_interval,
                })
            }
        }
    }

    pub fn stop(&mut self) {
        self.countdown = None;
    }

    pub fn is_running(&self) -> bool {
        self.countdown.is_some()
    }

    /// Arm the auto-advance for question `index`. Re-arming the same target
    /// keeps the original deadline.
    pub fn schedule_advance(&mut self, generation: u64, index: usize) {
        match self.pending {
            Some(p) if p.generation == generation && p.index == index => {}
            _ => {
                self.pending = Some(PendingAdvance {
                    generation,
                    index,
                    until_due: self.advance_delay,
                })
            }
        }
    }

    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel_all(&mut self) {
        self.stop();
        self.cancel_pending();
        self.suspended = None;
    }

    /// Set both callbacks aside, remaining time intact. Nothing fires until
    /// [`Scheduler::resume`]. Suspending twice keeps the first snapshot.
    pub fn suspend(&mut self) {
        if self.suspended.is_none() {
            self.suspended = Some(Suspended {
                countdown: self.countdown.take(),
                pending: self.pending.take(),
            });
        }
    }

    /// Put suspended callbacks back. Ones belonging to another generation
    /// are dropped.
    pub fn resume(&mut self, generation: u64) {
        if let Some(s) = self.suspended.take() {
            self.countdown = s.countdown.filter(|c| c.generation == generation);
            self.pending = s.pending.filter(|p| p.generation == generation);
        }
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended.is_some()
    }

    /// Time until the next callback falls due, if any is scheduled
    pub fn time_until_next(&self) -> Option<Duration> {
        let tick = self.countdown.map(|c| c.until_tick);
        let advance = self.pending.map(|p| p.until_due);
        match (tick, advance) {
            (Some(t), Some(a)) => Some(t.min(a)),
            (t, a) => t.or(a),
        }
    }

    /// Consume up to `budget` of elapsed time. Returns the first callback
    /// that falls due within it (deducting the time spent reaching it), or
    /// `None` once the budget is exhausted without anything firing.
    pub fn poll(&mut self, budget: &mut Duration) -> Option<Fired> {
        let Some(next) = self.time_until_next() else {
            *budget = Duration::ZERO;
            return None;
        };

        if next > *budget {
            self.elapse(*budget);
            *budget = Duration::ZERO;
            return None;
        }

        self.elapse(next);
        *budget -= next;

        if let Some(p) = self.pending.filter(|p| p.until_due.is_zero()) {
            self.pending = None;
            return Some(Fired::Advance {
                generation: p.generation,
                index: p.index,
            });
        }

        if let Some(c) = self.countdown.as_mut().filter(|c| c.until_tick.is_zero()) {
            c.until_tick = self.tick_interval;
            return Some(Fired::Tick {
                generation: c.generation,
            });
        }

        None
    }

    fn elapse(&mut self, elapsed: Duration) {
        if let Some(c) = self.countdown.as_mut() {
            c.until_tick = c.until_tick.saturating_sub(elapsed);
        }
        if let Some(p) = self.pending.as_mut() {
            p.until_due = p.until_due.saturating_sub(elapsed);
        }
    }
}
