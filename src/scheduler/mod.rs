//! Idle-commit scheduling between typed text and indexed text.
//!
//! Two clocks drive the policy:
//! - the **edit clock**: every raw text change stamps `last_edit_ms` and marks
//!   the state dirty;
//! - the **tick clock**: a fixed-period timer raises `pending_tick`.
//!
//! When a pending tick is evaluated and the last edit is older than the lazy
//! window, the current raw text becomes the stable text. A typing burst is
//! never committed midway, and once typing stops the stable text catches up
//! within one tick period plus the lazy window.
//!
//! Timestamps are caller-supplied milliseconds from any monotonic origin.

use std::time::Duration;

/// Default quiet period after the last edit before a commit is allowed.
pub const DEFAULT_LAZY_WINDOW: Duration = Duration::from_millis(500);
/// Default period of the tick clock.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub lazy_window: Duration,
    pub tick_period: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            lazy_window: DEFAULT_LAZY_WINDOW,
            tick_period: DEFAULT_TICK_PERIOD,
        }
    }
}

/// Synchronization state between raw and stable text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateState {
    /// Text last handed to the indexer
    pub stable_text: String,
    /// Raw text changed since the last commit
    pub dirty: bool,
    /// A tick is waiting to be evaluated
    pub pending_tick: bool,
    /// Time of the most recent raw text change
    pub last_edit_ms: u64,
}

/// Fixed-period timer that reports when a tick is due.
///
/// Missed periods collapse into a single tick; the next deadline is always
/// scheduled from the current time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickTimer {
    period_ms: u64,
    next_due_ms: u64,
}

impl TickTimer {
    pub const fn new(period_ms: u64, now_ms: u64) -> Self {
        Self {
            period_ms,
            next_due_ms: now_ms.saturating_add(period_ms),
        }
    }

    /// Returns true (once) when the current period has elapsed.
    pub const fn take_due(&mut self, now_ms: u64) -> bool {
        if now_ms < self.next_due_ms {
            return false;
        }
        self.next_due_ms = now_ms.saturating_add(self.period_ms);
        true
    }

    /// Milliseconds until the next tick.
    pub const fn remaining(&self, now_ms: u64) -> u64 {
        self.next_due_ms.saturating_sub(now_ms)
    }
}

/// The update scheduler state machine.
#[derive(Debug, Clone)]
pub struct UpdateScheduler {
    state: UpdateState,
    lazy_window_ms: u64,
    timer: TickTimer,
}

impl UpdateScheduler {
    /// Create a scheduler whose tick clock starts at `now_ms`.
    pub fn new(config: SchedulerConfig, now_ms: u64) -> Self {
        let lazy_window_ms = u64::try_from(config.lazy_window.as_millis()).unwrap_or(u64::MAX);
        let period_ms = u64::try_from(config.tick_period.as_millis()).unwrap_or(u64::MAX);
        Self {
            state: UpdateState {
                last_edit_ms: now_ms,
                ..UpdateState::default()
            },
            lazy_window_ms,
            timer: TickTimer::new(period_ms.max(1), now_ms),
        }
    }

    pub const fn state(&self) -> &UpdateState {
        &self.state
    }

    pub fn stable_text(&self) -> &str {
        &self.state.stable_text
    }

    pub const fn is_dirty(&self) -> bool {
        self.state.dirty
    }

    /// Edit clock: a raw text change happened at `now_ms`.
    pub const fn record_edit(&mut self, now_ms: u64) {
        self.state.last_edit_ms = now_ms;
        self.state.dirty = true;
    }

    /// Tick clock: request an evaluation on the next [`Self::evaluate`].
    pub const fn tick(&mut self) {
        self.state.pending_tick = true;
    }

    /// Advance the tick clock, raising `pending_tick` when a period elapsed.
    pub const fn poll_timer(&mut self, now_ms: u64) -> bool {
        if self.timer.take_due(now_ms) {
            self.tick();
            return true;
        }
        false
    }

    /// Milliseconds until the tick clock fires again.
    pub const fn next_tick_in(&self, now_ms: u64) -> u64 {
        self.timer.remaining(now_ms)
    }

    /// Whether the last edit is older than the lazy window.
    pub const fn is_idle(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.state.last_edit_ms) > self.lazy_window_ms
    }

    /// Apply the commit rule if a tick is pending.
    ///
    /// `raw_text` is read only at this point, so the commit always reflects
    /// the latest typed text. Returns the new stable text when a commit
    /// happened.
    pub fn evaluate(&mut self, now_ms: u64, raw_text: &str) -> Option<&str> {
        if !self.state.pending_tick {
            return None;
        }
        self.state.pending_tick = false;

        if !(self.state.dirty && self.is_idle(now_ms)) {
            return None;
        }
        raw_text.clone_into(&mut self.state.stable_text);
        self.state.dirty = false;
        Some(&self.state.stable_text)
    }

    /// Commit `raw_text` immediately, bypassing both clocks.
    pub fn flush(&mut self, raw_text: &str) -> &str {
        raw_text.clone_into(&mut self.state.stable_text);
        self.state.dirty = false;
        self.state.pending_tick = false;
        &self.state.stable_text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> UpdateScheduler {
        UpdateScheduler::new(SchedulerConfig::default(), 0)
    }

    /// Drive the timer from `from` to `to` in 10ms steps, collecting commits.
    fn run(sched: &mut UpdateScheduler, raw: &str, from: u64, to: u64) -> Vec<(u64, String)> {
        let mut commits = Vec::new();
        let mut now = from;
        while now <= to {
            sched.poll_timer(now);
            if let Some(text) = sched.evaluate(now, raw) {
                commits.push((now, text.to_string()));
            }
            now += 10;
        }
        commits
    }

    #[test]
    fn test_new_state_is_clean_and_empty() {
        let sched = scheduler();
        assert_eq!(sched.stable_text(), "");
        assert!(!sched.is_dirty());
        assert!(!sched.state().pending_tick);
    }

    #[test]
    fn test_no_evaluation_without_tick() {
        let mut sched = scheduler();
        sched.record_edit(0);
        assert_eq!(sched.evaluate(5_000, "abc"), None);
        assert!(sched.is_dirty());
    }

    #[test]
    fn test_tick_without_edits_does_not_commit() {
        let mut sched = scheduler();
        sched.tick();
        assert_eq!(sched.evaluate(5_000, "ignored"), None);
        assert!(!sched.state().pending_tick);
        assert_eq!(sched.stable_text(), "");
    }

    #[test]
    fn test_tick_during_typing_is_consumed_without_commit() {
        let mut sched = scheduler();
        sched.record_edit(900);
        sched.tick();
        assert_eq!(sched.evaluate(1_000, "abc"), None);
        assert!(!sched.state().pending_tick);
        assert!(sched.is_dirty());
    }

    #[test]
    fn test_idle_window_is_strict() {
        let mut sched = scheduler();
        sched.record_edit(1_000);
        sched.tick();
        assert_eq!(sched.evaluate(1_500, "x"), None);
        sched.tick();
        assert_eq!(sched.evaluate(1_501, "x"), Some("x"));
    }

    #[test]
    fn test_rapid_burst_commits_once() {
        let mut sched = scheduler();
        let mut commits = Vec::new();
        for (now, raw) in [(0_u64, "a"), (100, "ab"), (200, "abc")] {
            sched.record_edit(now);
            sched.poll_timer(now);
            if let Some(text) = sched.evaluate(now, raw) {
                commits.push(text.to_string());
            }
        }
        let later = run(&mut sched, "abc", 210, 3_000);
        commits.extend(later.into_iter().map(|(_, text)| text));
        assert_eq!(commits, vec!["abc".to_string()]);
    }

    #[test]
    fn test_converges_at_first_tick_after_idle_window() {
        let mut sched = scheduler();
        // Burst ends at T = 1_700; first tick after T + 500 is at 3_000.
        for now in (1_000..=1_700).step_by(100) {
            sched.record_edit(now);
            run(&mut sched, "partial", now, now);
        }
        let commits = run(&mut sched, "final", 1_710, 4_000);
        assert_eq!(commits, vec![(3_000, "final".to_string())]);
    }

    #[test]
    fn test_commit_reads_latest_raw_text() {
        let mut sched = scheduler();
        sched.record_edit(0);
        sched.tick();
        // The tick was raised before the last keystroke landed.
        sched.record_edit(100);
        assert_eq!(sched.evaluate(700, "newest"), Some("newest"));
    }

    #[test]
    fn test_flush_commits_immediately() {
        let mut sched = scheduler();
        sched.record_edit(10);
        sched.tick();
        assert_eq!(sched.flush("now"), "now");
        assert!(!sched.is_dirty());
        assert!(!sched.state().pending_tick);
    }

    #[test]
    fn test_tick_timer_collapses_missed_periods() {
        let mut timer = TickTimer::new(1_000, 0);
        assert!(!timer.take_due(999));
        assert!(timer.take_due(3_500));
        assert!(!timer.take_due(4_000));
        assert_eq!(timer.remaining(4_000), 500);
        assert!(timer.take_due(4_500));
    }
}
