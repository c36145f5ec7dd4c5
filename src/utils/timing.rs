//! Rate-limiting and delay wrappers.
//!
//! Time is a monotonic [`Duration`] measured from the page's time origin and is
//! always supplied by the caller, so the wrappers never own a clock or a timer.
//! Hosts call `poll`/`take_due` when a deadline reported by `deadline()` passes.

use std::time::Duration;

/// A single pending value released once its deadline is reached.
/// Scheduling again replaces whatever was pending.
#[derive(Debug, Clone)]
pub struct Deferred<A> {
    delay: Duration,
    pending: Option<(Duration, A)>,
}

impl<A> Deferred<A> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn schedule(&mut self, now: Duration, value: A) {
        self.pending = Some((now.saturating_add(self.delay), value));
    }

    pub fn cancel(&mut self) -> Option<A> {
        self.pending.take().map(|(_, value)| value)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|(at, _)| *at)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn take_due(&mut self, now: Duration) -> Option<A> {
        match self.pending {
            Some((at, _)) if now >= at => self.pending.take().map(|(_, value)| value),
            _ => None,
        }
    }
}

/// Runs `action` once the triggers have been quiet for `wait`, with the
/// argument of the most recent trigger.
pub struct Debounced<A, F> {
    timer: Deferred<A>,
    action: F,
}

impl<A, F> Debounced<A, F> {
    pub fn new(action: F, wait: Duration) -> Self {
        Self {
            timer: Deferred::new(wait),
            action,
        }
    }

    pub fn trigger(&mut self, now: Duration, arg: A) {
        self.timer.schedule(now, arg);
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.timer.deadline()
    }

    /// Returns true when the action ran.
    pub fn poll<C: ?Sized>(&mut self, ctx: &mut C, now: Duration) -> bool
    where
        F: FnMut(&mut C, A),
    {
        match self.timer.take_due(now) {
            Some(arg) => {
                (self.action)(ctx, arg);
                true
            }
            None => false,
        }
    }
}

/// Runs `action` at most once per `limit`. The first call in a window runs
/// immediately; the rest of the window's calls are dropped.
pub struct Throttled<F> {
    limit: Duration,
    open_at: Option<Duration>,
    action: F,
}

impl<F> Throttled<F> {
    pub fn new(action: F, limit: Duration) -> Self {
        Self {
            limit,
            open_at: None,
            action,
        }
    }

    pub fn is_open(&self, now: Duration) -> bool {
        self.open_at.map_or(true, |at| now >= at)
    }

    /// Returns true when the action ran.
    pub fn call<C: ?Sized, A>(&mut self, ctx: &mut C, now: Duration, arg: A) -> bool
    where
        F: FnMut(&mut C, A),
    {
        if !self.is_open(now) {
            return false;
        }
        self.open_at = Some(now.saturating_add(self.limit));
        (self.action)(ctx, arg);
        true
    }
}

/// What a host should do with its one wake-up timer for a new deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rearm<H> {
    /// The armed timer fires at or before the deadline.
    Keep,
    /// Nothing is armed.
    Arm,
    /// Clear this earlier-armed, later-firing timer and arm a new one.
    Replace(H),
}

/// Tracks the single host timer (e.g. a `setTimeout` handle) that wakes
/// the runtime, so bursts of events never queue more than one.
#[derive(Debug, Clone)]
pub struct TimerSlot<H> {
    armed: Option<(H, Duration)>,
}

impl<H> Default for TimerSlot<H> {
    fn default() -> Self {
        Self { armed: None }
    }
}

impl<H: Copy> TimerSlot<H> {
    pub fn plan(&self, deadline: Duration) -> Rearm<H> {
        match self.armed {
            Some((_, at)) if at <= deadline => Rearm::Keep,
            Some((handle, _)) => Rearm::Replace(handle),
            None => Rearm::Arm,
        }
    }

    pub fn arm(&mut self, handle: H, deadline: Duration) {
        self.armed = Some((handle, deadline));
    }

    /// Forgets the armed timer once it has fired.
    pub fn fired(&mut self) {
        self.armed = None;
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.armed.map(|(_, at)| at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_deferred_releases_after_delay() {
        let mut deferred = Deferred::new(ms(50));
        deferred.schedule(ms(1_000), "research");

        assert_eq!(deferred.deadline(), Some(ms(1_050)));
        assert_eq!(deferred.take_due(ms(1_049)), None);
        assert_eq!(deferred.take_due(ms(1_050)), Some("research"));
        assert!(!deferred.is_pending());
        assert_eq!(deferred.take_due(ms(2_000)), None);
    }

    #[test]
    fn test_deferred_schedule_replaces_pending() {
        let mut deferred = Deferred::new(ms(50));
        deferred.schedule(ms(0), 1);
        deferred.schedule(ms(30), 2);

        assert_eq!(deferred.take_due(ms(60)), None);
        assert_eq!(deferred.take_due(ms(80)), Some(2));
    }

    #[test]
    fn test_debounce_waits_for_quiet_period() {
        let mut fired: Vec<u32> = Vec::new();
        let mut debounced = Debounced::new(|log: &mut Vec<u32>, width: u32| log.push(width), ms(150));

        debounced.trigger(ms(0), 1200);
        debounced.trigger(ms(100), 900);
        debounced.trigger(ms(200), 600);

        assert!(!debounced.poll(&mut fired, ms(300)));
        assert!(fired.is_empty());

        assert!(debounced.poll(&mut fired, ms(350)));
        assert_eq!(fired, vec![600]);

        // 已觸發後不會重複執行
        assert!(!debounced.poll(&mut fired, ms(1_000)));
        assert_eq!(fired.len(), 1);
    }

    #[test]
    fn test_throttle_drops_calls_inside_window() {
        let mut count = 0u32;
        let mut throttled = Throttled::new(|count: &mut u32, _: ()| *count += 1, ms(100));

        assert!(throttled.call(&mut count, ms(0), ()));
        assert!(!throttled.call(&mut count, ms(40), ()));
        assert!(!throttled.call(&mut count, ms(99), ()));
        assert!(throttled.call(&mut count, ms(100), ()));
        assert!(throttled.call(&mut count, ms(250), ()));

        assert_eq!(count, 3);
    }

    #[test]
    fn test_timer_slot_keeps_single_timer_for_bursts() {
        let mut slot = TimerSlot::default();
        assert_eq!(slot.plan(ms(150)), Rearm::Arm);
        slot.arm(1, ms(150));

        // resize burst: each event pushes the debounce deadline later
        for deadline in [ms(170), ms(190), ms(210)] {
            assert_eq!(slot.plan(deadline), Rearm::Keep);
        }
        assert_eq!(slot.deadline(), Some(ms(150)));

        assert_eq!(slot.plan(ms(150)), Rearm::Keep);
    }

    #[test]
    fn test_timer_slot_replaces_later_timer() {
        let mut slot = TimerSlot::default();
        slot.arm(7, ms(300));

        assert_eq!(slot.plan(ms(60)), Rearm::Replace(7));
        slot.arm(8, ms(60));
        assert_eq!(slot.deadline(), Some(ms(60)));

        slot.fired();
        assert_eq!(slot.deadline(), None);
        assert_eq!(slot.plan(ms(300)), Rearm::Arm);
    }
}
