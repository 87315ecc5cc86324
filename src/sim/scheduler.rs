//! Timed tasks on a shared simulation clock
//!
//! Spawners, fuel decay, countdowns, the typewriter and the orbit cooldown are
//! all tasks here. Tasks are cancellable and pausable; a paused task keeps its
//! remaining time. Firing order is deterministic: earliest due time first,
//! ties broken by creation order.

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u32);

/// What a task does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    MeteorSpawn,
    MineralSpawn,
    FuelStarSpawn,
    FuelDecay,
    OrbitCooldown,
    PhaseCountdown,
    TutorialStart,
    TutorialTypewriter { step: usize },
    TutorialAutoAdvance { step: usize },
    TutorialItemSpawn { step: usize },
    TutorialHide { step: usize },
    TutorialShow { step: usize },
    GameStartCountdown,
    GameStartGo,
}

impl TimerKind {
    /// Tasks owned by the tutorial script
    pub fn is_tutorial(self) -> bool {
        matches!(
            self,
            TimerKind::TutorialStart
                | TimerKind::TutorialTypewriter { .. }
                | TimerKind::TutorialAutoAdvance { .. }
                | TimerKind::TutorialItemSpawn { .. }
                | TimerKind::TutorialHide { .. }
                | TimerKind::TutorialShow { .. }
        )
    }
}

#[derive(Debug, Clone)]
struct Task {
    id: TimerId,
    kind: TimerKind,
    /// Repeat interval (None = one-shot)
    interval_us: Option<u64>,
    due_us: u64,
    /// Time left when paused
    paused_remaining: Option<u64>,
}

/// Cooperative single-threaded timer wheel
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_us: u64,
    tasks: Vec<Task>,
    next_id: u32,
}

fn ms_to_us(ms: u32) -> u64 {
    ms as u64 * 1000
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock (microseconds since the run started)
    pub fn now_us(&self) -> u64 {
        self.now_us
    }

    pub fn now_ms(&self) -> u64 {
        self.now_us / 1000
    }

    /// Fire once after `delay_ms`
    pub fn after(&mut self, delay_ms: u32, kind: TimerKind) -> TimerId {
        self.insert(kind, ms_to_us(delay_ms), None)
    }

    /// Fire every `interval_ms`, first time one interval from now
    pub fn every(&mut self, interval_ms: u32, kind: TimerKind) -> TimerId {
        // A zero interval would fire forever within one window
        let interval_us = ms_to_us(interval_ms.max(1));
        self.insert(kind, interval_us, Some(interval_us))
    }

    fn insert(&mut self, kind: TimerKind, delay_us: u64, interval_us: Option<u64>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            kind,
            interval_us,
            due_us: self.now_us + delay_us,
            paused_remaining: None,
        });
        id
    }

    /// Remove a task; returns false if it already fired or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Remove every task whose kind matches; returns how many were removed
    pub fn cancel_where(&mut self, pred: impl Fn(TimerKind) -> bool) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !pred(t.kind));
        before - self.tasks.len()
    }

    /// Freeze a task, keeping its remaining time
    pub fn pause(&mut self, id: TimerId) -> bool {
        let now = self.now_us;
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                if task.paused_remaining.is_none() {
                    task.paused_remaining = Some(task.due_us.saturating_sub(now));
                }
                true
            }
            None => false,
        }
    }

    pub fn resume(&mut self, id: TimerId) -> bool {
        let now = self.now_us;
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                if let Some(remaining) = task.paused_remaining.take() {
                    task.due_us = now + remaining;
                }
                true
            }
            None => false,
        }
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    pub fn is_paused(&self, id: TimerId) -> bool {
        self.tasks
            .iter()
            .any(|t| t.id == id && t.paused_remaining.is_some())
    }

    /// Interval of a repeating task, in ms
    pub fn interval_ms(&self, id: TimerId) -> Option<u64> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .and_then(|t| t.interval_us)
            .map(|us| us / 1000)
    }

    /// Number of live tasks of a kind
    pub fn count(&self, kind: TimerKind) -> usize {
        self.tasks.iter().filter(|t| t.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Pop the next task due at or before `until_us`, moving the clock to its
    /// due time. Repeating tasks are rescheduled, one-shots removed.
    ///
    /// Callers handle one task at a time so a handler can cancel or create
    /// tasks before the next one is considered.
    pub fn pop_due(&mut self, until_us: u64) -> Option<(TimerId, TimerKind)> {
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.paused_remaining.is_none() && t.due_us <= until_us)
            .min_by_key(|(_, t)| (t.due_us, t.id))
            .map(|(i, _)| i)?;

        let task = &mut self.tasks[index];
        self.now_us = self.now_us.max(task.due_us);
        let fired = (task.id, task.kind);

        match task.interval_us {
            Some(interval) => task.due_us += interval,
            None => {
                self.tasks.remove(index);
            }
        }
        Some(fired)
    }

    /// Move the clock forward once everything due has been handled
    pub fn advance_to(&mut self, until_us: u64) {
        self.now_us = self.now_us.max(until_us);
    }

    /// Drop every task; returns how many were pending
    pub fn clear(&mut self) -> usize {
        let pending = self.tasks.len();
        self.tasks.clear();
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn drain(s: &mut Scheduler, until_us: u64) -> Vec<TimerKind> {
        let mut fired = Vec::new();
        while let Some((_, kind)) = s.pop_due(until_us) {
            fired.push(kind);
        }
        s.advance_to(until_us);
        fired
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut s = Scheduler::new();
        s.after(100, TimerKind::OrbitCooldown);
        assert!(drain(&mut s, 99_999).is_empty());
        assert_eq!(drain(&mut s, 100_000), vec![TimerKind::OrbitCooldown]);
        assert!(drain(&mut s, 1_000_000).is_empty());
        assert!(s.is_empty());
    }

    #[test]
    fn test_repeating_catches_up_within_window() {
        let mut s = Scheduler::new();
        s.every(100, TimerKind::FuelDecay);
        assert_eq!(drain(&mut s, 350_000).len(), 3);
        assert_eq!(drain(&mut s, 400_000).len(), 1);
    }

    #[test]
    fn test_order_by_due_then_creation() {
        let mut s = Scheduler::new();
        s.after(200, TimerKind::MineralSpawn);
        s.after(100, TimerKind::MeteorSpawn);
        s.after(200, TimerKind::FuelStarSpawn);
        assert_eq!(
            drain(&mut s, 500_000),
            vec![
                TimerKind::MeteorSpawn,
                TimerKind::MineralSpawn,
                TimerKind::FuelStarSpawn
            ]
        );
    }

    #[test]
    fn test_cancel_during_drain() {
        let mut s = Scheduler::new();
        s.after(100, TimerKind::MeteorSpawn);
        let victim = s.after(100, TimerKind::MineralSpawn);

        let (_, first) = s.pop_due(100_000).unwrap();
        assert_eq!(first, TimerKind::MeteorSpawn);
        assert!(s.cancel(victim));
        assert!(s.pop_due(100_000).is_none());
        assert!(!s.cancel(victim));
    }

    #[test]
    fn test_pause_preserves_remaining_time() {
        let mut s = Scheduler::new();
        let id = s.every(1000, TimerKind::MeteorSpawn);
        drain(&mut s, 400_000);
        assert!(s.pause(id));
        assert!(s.is_paused(id));

        // Time passes while paused: nothing fires
        assert!(drain(&mut s, 5_000_000).is_empty());

        s.resume(id);
        assert!(!s.is_paused(id));
        assert!(drain(&mut s, 5_599_999).is_empty());
        assert_eq!(drain(&mut s, 5_600_000), vec![TimerKind::MeteorSpawn]);
    }

    #[test]
    fn test_cancel_where_and_clear() {
        let mut s = Scheduler::new();
        s.after(10, TimerKind::TutorialStart);
        s.every(45, TimerKind::TutorialTypewriter { step: 0 });
        s.every(100, TimerKind::FuelDecay);
        assert_eq!(s.cancel_where(TimerKind::is_tutorial), 2);
        assert_eq!(s.len(), 1);
        assert_eq!(s.clear(), 1);
        assert!(s.is_empty());
    }

    proptest! {
        #[test]
        fn prop_fire_times_never_go_backwards(
            delays in proptest::collection::vec(1u32..5000, 1..20),
            step in 1_000u64..50_000,
        ) {
            let mut s = Scheduler::new();
            for d in &delays {
                s.after(*d, TimerKind::MineralSpawn);
            }
            let mut last = 0;
            let mut fired = 0;
            let mut until = 0;
            while fired < delays.len() {
                until += step;
                while s.pop_due(until).is_some() {
                    prop_assert!(s.now_us() >= last);
                    prop_assert!(s.now_us() <= until);
                    last = s.now_us();
                    fired += 1;
                }
                s.advance_to(until);
            }
            prop_assert!(s.is_empty());
        }
    }
}
