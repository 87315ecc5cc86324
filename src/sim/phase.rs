//! Quota-based phase progression
//!
//! `Active(i)` -> `Transitioning(i)` -> `Active(i + 1)` ... -> `Complete`.
//! Phases are visited strictly in order; only a restart goes back to 0.

use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::scheduler::TimerKind;
use super::spawner;
use super::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PhaseState {
    /// Before the first phase (tutorial or not yet initialized)
    Inactive,
    Active { index: usize },
    /// Countdown toward `index + 1`
    Transitioning { index: usize, remaining: u8 },
    /// Every phase cleared (terminal)
    Complete { index: usize },
}

impl PhaseState {
    pub fn index(self) -> usize {
        match self {
            PhaseState::Inactive => 0,
            PhaseState::Active { index }
            | PhaseState::Transitioning { index, .. }
            | PhaseState::Complete { index } => index,
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, PhaseState::Active { .. })
    }

    pub fn countdown(self) -> Option<u8> {
        match self {
            PhaseState::Transitioning { remaining, .. } => Some(remaining),
            _ => None,
        }
    }
}

/// Enter a phase: fresh quota, full tank, spawners running
pub fn start_phase(state: &mut GameState, index: usize) {
    let Some(descriptor) = state.tuning.phase(index).copied() else {
        log::warn!("Phase {index} does not exist");
        return;
    };

    state.phase = PhaseState::Active { index };
    state.mineral = 0;
    state.mineral_target = descriptor.mineral_target;
    state.fuel = state.max_fuel;

    spawner::rearm_meteor(state, descriptor.meteor_spawn_interval_ms);
    spawner::resume_spawners(state);

    log::info!(
        "Phase {} started: {} minerals, meteor every {}ms",
        index + 1,
        descriptor.mineral_target,
        descriptor.meteor_spawn_interval_ms
    );
    state.emit(GameEvent::PhaseStarted { phase_index: index });
}

/// Quota met: clear the field and either count down or finish
pub fn complete_phase(state: &mut GameState) {
    let PhaseState::Active { index } = state.phase else {
        return;
    };

    spawner::pause_spawners(state);
    state.clear_entities();

    let is_final = index + 1 >= state.tuning.phases.len();
    log::info!("Phase {} complete (score {})", index + 1, state.score);
    state.emit(GameEvent::PhaseCompleted {
        phase_index: index,
        is_final,
    });

    if is_final {
        state.phase = PhaseState::Complete { index };
        log::info!("All phases complete");
        return;
    }

    if let Some(previous) = state.timers.phase_countdown.take() {
        state.scheduler.cancel(previous);
    }
    let transition = state.tuning.transition;
    if transition.countdown_secs == 0 {
        start_phase(state, index + 1);
        return;
    }

    state.phase = PhaseState::Transitioning {
        index,
        remaining: transition.countdown_secs,
    };
    state.timers.phase_countdown = Some(
        state
            .scheduler
            .every(transition.countdown_step_ms, TimerKind::PhaseCountdown),
    );
    state.emit(GameEvent::PhaseCountdown {
        remaining: transition.countdown_secs,
    });
}

/// One countdown step elapsed
pub fn on_countdown(state: &mut GameState) {
    let PhaseState::Transitioning { index, remaining } = state.phase else {
        if let Some(stray) = state.timers.phase_countdown.take() {
            state.scheduler.cancel(stray);
        }
        return;
    };

    let remaining = remaining.saturating_sub(1);
    if remaining > 0 {
        state.phase = PhaseState::Transitioning { index, remaining };
        state.emit(GameEvent::PhaseCountdown { remaining });
        return;
    }

    if let Some(countdown) = state.timers.phase_countdown.take() {
        state.scheduler.cancel(countdown);
    }
    start_phase(state, index + 1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pilot::PilotConfig;
    use crate::sim::tick;
    use crate::tuning::Tuning;

    fn running_state(tuning: Tuning) -> GameState {
        let mut state = GameState::new(5, tuning);
        tick::initialize(&mut state, PilotConfig::find("cesar").unwrap(), true);
        state.drain_events();
        state
    }

    #[test]
    fn test_start_phase_resets_economy() {
        let mut state = running_state(Tuning::default());
        state.mineral = 3;
        state.fuel = 10.0;
        start_phase(&mut state, 2);
        assert_eq!(state.phase, PhaseState::Active { index: 2 });
        assert_eq!(state.mineral, 0);
        assert_eq!(state.mineral_target, 10);
        assert_eq!(state.fuel, 100.0);
        let meteor = state.timers.meteor.unwrap();
        assert_eq!(state.scheduler.interval_ms(meteor), Some(4400));
        assert!(!state.scheduler.is_paused(meteor));
    }

    #[test]
    fn test_countdown_advances_to_next_phase() {
        let mut state = running_state(Tuning::default());
        complete_phase(&mut state);
        assert_eq!(state.phase, PhaseState::Transitioning { index: 0, remaining: 3 });
        assert!(state.scheduler.is_paused(state.timers.mineral.unwrap()));

        on_countdown(&mut state);
        on_countdown(&mut state);
        assert_eq!(state.phase.countdown(), Some(1));
        on_countdown(&mut state);
        assert_eq!(state.phase, PhaseState::Active { index: 1 });
        assert!(state.timers.phase_countdown.is_none());
        assert_eq!(state.scheduler.count(TimerKind::PhaseCountdown), 0);

        let events = state.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::PhaseCompleted {
                    phase_index: 0,
                    is_final: false
                },
                GameEvent::PhaseCountdown { remaining: 3 },
                GameEvent::PhaseCountdown { remaining: 2 },
                GameEvent::PhaseCountdown { remaining: 1 },
                GameEvent::PhaseStarted { phase_index: 1 },
            ]
        );
    }

    #[test]
    fn test_last_phase_is_terminal() {
        let mut state = running_state(Tuning::default());
        start_phase(&mut state, 3);
        complete_phase(&mut state);
        assert_eq!(state.phase, PhaseState::Complete { index: 3 });
        assert!(state.timers.phase_countdown.is_none());

        // Never re-triggers
        complete_phase(&mut state);
        on_countdown(&mut state);
        assert_eq!(state.phase, PhaseState::Complete { index: 3 });
        let completions = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::PhaseCompleted { .. }))
            .count();
        assert_eq!(completions, 1);
    }

    #[test]
    fn test_zero_countdown_skips_transition() {
        let mut tuning = Tuning::default();
        tuning.transition.countdown_secs = 0;
        let mut state = running_state(tuning);
        complete_phase(&mut state);
        assert_eq!(state.phase, PhaseState::Active { index: 1 });
    }
}
