//! Scripted tutorial
//!
//! A fixed list of steps shown one at a time. Each step either waits for a
//! gameplay action or advances on its own once its message has been typed
//! out and its delay has elapsed. All timing runs through the scheduler, so
//! tearing the scheduler down stops the script dead.

use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::phase;
use super::scheduler::TimerKind;
use super::spawner;
use super::state::{GameState, PickupKind};

/// Gameplay actions a step can wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TutorialAction {
    OrbitChange,
    CollectFuel,
    CollectMineral,
}

/// HUD element the host should draw attention to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    Buttons,
    Fuel,
    Mineral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEffect {
    /// Drain the tank to `fuel.tutorial_fraction` of max
    LowFuel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TutorialStep {
    pub id: &'static str,
    pub message: &'static str,
    /// Action that completes the step (None = time-gated)
    pub action: Option<TutorialAction>,
    pub highlight: Option<Highlight>,
    pub spawn_item: Option<PickupKind>,
    pub effect: Option<StepEffect>,
    /// Delay after the message is fully shown, before the multiplier
    pub auto_advance_ms: Option<u32>,
    pub thumbs_up: bool,
    pub is_final: bool,
}

impl TutorialStep {
    const fn timed(id: &'static str, message: &'static str, delay_ms: u32) -> Self {
        Self {
            id,
            message,
            action: None,
            highlight: None,
            spawn_item: None,
            effect: None,
            auto_advance_ms: Some(delay_ms),
            thumbs_up: false,
            is_final: false,
        }
    }

    const fn gated(
        id: &'static str,
        message: &'static str,
        action: TutorialAction,
        highlight: Highlight,
    ) -> Self {
        Self {
            id,
            message,
            action: Some(action),
            highlight: Some(highlight),
            spawn_item: None,
            effect: None,
            auto_advance_ms: None,
            thumbs_up: false,
            is_final: false,
        }
    }

    const fn with_item(mut self, kind: PickupKind) -> Self {
        self.spawn_item = Some(kind);
        self
    }

    const fn with_effect(mut self, effect: StepEffect) -> Self {
        self.effect = Some(effect);
        self
    }

    const fn with_thumbs_up(mut self) -> Self {
        self.thumbs_up = true;
        self
    }

    const fn final_step(mut self) -> Self {
        self.is_final = true;
        self
    }

    pub fn waits_for_action(&self) -> bool {
        self.action.is_some()
    }

    pub fn message_len(&self) -> usize {
        self.message.chars().count()
    }
}

pub static TUTORIAL_SCRIPT: [TutorialStep; 9] = [
    TutorialStep::timed(
        "welcome",
        "Welcome, pilot! I'm your mission commander. I'll guide you through this first training orbit.",
        3000,
    ),
    TutorialStep::gated(
        "orbit_explain",
        "Fire the side thrusters to change orbit! Press INNER or OUTER to move.",
        TutorialAction::OrbitChange,
        Highlight::Buttons,
    ),
    TutorialStep::timed(
        "orbit_success",
        "Perfect! You've got the hang of orbit hopping!",
        2500,
    )
    .with_thumbs_up(),
    TutorialStep::timed(
        "safe_orbit",
        "The INNER orbit is a SAFE zone - meteors never appear there! Use it to take cover.",
        4000,
    ),
    TutorialStep::gated(
        "fuel_explain",
        "See the ORANGE bar? That's your fuel - and it's running low! Grab the YELLOW STAR to refuel!",
        TutorialAction::CollectFuel,
        Highlight::Fuel,
    )
    .with_item(PickupKind::Fuel)
    .with_effect(StepEffect::LowFuel),
    TutorialStep::timed(
        "fuel_success",
        "Excellent! Tank refilled! Without fuel your ship stops.",
        2500,
    )
    .with_thumbs_up(),
    TutorialStep::gated(
        "mineral_explain",
        "Now collect the BLUE MINERAL! Fill the blue bar to clear each phase.",
        TutorialAction::CollectMineral,
        Highlight::Mineral,
    )
    .with_item(PickupKind::Mineral),
    TutorialStep::timed(
        "mineral_success",
        "Well done! Collect enough minerals to reach the next phase!",
        2500,
    )
    .with_thumbs_up(),
    TutorialStep::timed(
        "game_start",
        "Training complete! Good luck, pilot! The real mission starts now!",
        3000,
    )
    .final_step(),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum TutorialStage {
    #[default]
    Inactive,
    /// Waiting out the start delay
    Starting,
    Showing { step: usize },
    /// Hide animation and the gap before the next step
    Hiding { step: usize },
    /// Game-start countdown (0 = "GO!")
    Completing { remaining: u8 },
    Finished,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tutorial {
    pub stage: TutorialStage,
    /// Current step still needs its action
    pub waiting_for_action: bool,
    /// Typewriter progress of the current message
    pub visible_chars: usize,
}

impl Tutorial {
    /// True from the start delay until the first phase begins
    pub fn is_active(&self) -> bool {
        !matches!(self.stage, TutorialStage::Inactive | TutorialStage::Finished)
    }

    pub fn is_completing(&self) -> bool {
        matches!(self.stage, TutorialStage::Completing { .. })
    }

    /// Step on screen (including while it hides)
    pub fn current_step(&self) -> Option<(usize, &'static TutorialStep)> {
        match self.stage {
            TutorialStage::Showing { step } | TutorialStage::Hiding { step } => {
                TUTORIAL_SCRIPT.get(step).map(|s| (step, s))
            }
            _ => None,
        }
    }

    pub fn countdown(&self) -> Option<u8> {
        match self.stage {
            TutorialStage::Completing { remaining } => Some(remaining),
            _ => None,
        }
    }
}

/// Stage the tutorial behind its start delay
pub fn start(state: &mut GameState) {
    state.tutorial = Tutorial {
        stage: TutorialStage::Starting,
        ..Tutorial::default()
    };
    let delay = state.tuning.tutorial.start_delay_ms;
    state.scheduler.after(delay, TimerKind::TutorialStart);
    log::info!("Tutorial starting");
}

pub fn on_start(state: &mut GameState) {
    if state.tutorial.stage == TutorialStage::Starting {
        show_step(state, 0);
    }
}

fn show_step(state: &mut GameState, step: usize) {
    let Some(def) = TUTORIAL_SCRIPT.get(step) else {
        complete(state, false);
        return;
    };

    state.tutorial.stage = TutorialStage::Showing { step };
    state.tutorial.waiting_for_action = def.waits_for_action();
    state.tutorial.visible_chars = 0;

    if def.effect == Some(StepEffect::LowFuel) {
        state.fuel = state.max_fuel * state.tuning.fuel.tutorial_fraction;
    }
    if def.spawn_item.is_some() {
        let delay = state.tuning.spawn.tutorial_item_ms;
        state
            .scheduler
            .after(delay, TimerKind::TutorialItemSpawn { step });
    }

    log::debug!("Tutorial step {step}: {}", def.id);
    state.emit(GameEvent::TutorialStepChanged {
        step_id: def.id.to_string(),
    });

    if def.message_len() == 0 {
        message_shown(state, step);
    } else {
        let speed = state.tuning.tutorial.type_speed_ms;
        state.timers.typewriter = Some(
            state
                .scheduler
                .every(speed, TimerKind::TutorialTypewriter { step }),
        );
    }
}

fn stop_typewriter(state: &mut GameState) {
    if let Some(id) = state.timers.typewriter.take() {
        state.scheduler.cancel(id);
    }
}

/// One more character typed
pub fn on_typewriter(state: &mut GameState, step: usize) {
    if state.tutorial.stage != (TutorialStage::Showing { step }) {
        stop_typewriter(state);
        return;
    }
    let total = TUTORIAL_SCRIPT[step].message_len();
    state.tutorial.visible_chars = (state.tutorial.visible_chars + 1).min(total);
    if state.tutorial.visible_chars >= total {
        stop_typewriter(state);
        message_shown(state, step);
    }
}

/// The full message is on screen: start the auto-advance clock
fn message_shown(state: &mut GameState, step: usize) {
    let def = &TUTORIAL_SCRIPT[step];
    state.tutorial.visible_chars = def.message_len();
    if state.tutorial.waiting_for_action {
        return;
    }
    if let Some(delay) = def.auto_advance_ms {
        let scaled = (delay as f32 * state.tuning.tutorial.delay_multiplier).round() as u32;
        state
            .scheduler
            .after(scaled, TimerKind::TutorialAutoAdvance { step });
    }
}

pub fn on_auto_advance(state: &mut GameState, step: usize) {
    if state.tutorial.stage == (TutorialStage::Showing { step }) && !state.tutorial.waiting_for_action {
        advance(state, step);
    }
}

fn advance(state: &mut GameState, step: usize) {
    stop_typewriter(state);
    state.tutorial.stage = TutorialStage::Hiding { step };
    state.tutorial.waiting_for_action = false;
    let hide = state.tuning.tutorial.hide_ms;
    state.scheduler.after(hide, TimerKind::TutorialHide { step });
}

pub fn on_hide(state: &mut GameState, step: usize) {
    if state.tutorial.stage != (TutorialStage::Hiding { step }) {
        return;
    }
    if TUTORIAL_SCRIPT[step].is_final {
        complete(state, false);
    } else {
        let gap = state.tuning.tutorial.gap_ms;
        state
            .scheduler
            .after(gap, TimerKind::TutorialShow { step: step + 1 });
    }
}

pub fn on_show(state: &mut GameState, step: usize) {
    if step > 0 && state.tutorial.stage == (TutorialStage::Hiding { step: step - 1 }) {
        show_step(state, step);
    }
}

pub fn on_item_spawn(state: &mut GameState, step: usize) {
    if state.tutorial.stage != (TutorialStage::Showing { step }) || state.is_game_over() {
        return;
    }
    if let Some(kind) = TUTORIAL_SCRIPT[step].spawn_item {
        spawner::spawn_tutorial_item(state, kind, step);
    }
}

/// Report a gameplay action. Only the active, waiting step whose action
/// matches is advanced; `origin_step` ties item pickups to the step that
/// spawned them.
pub fn signal_action(state: &mut GameState, action: TutorialAction, origin_step: Option<usize>) -> bool {
    let TutorialStage::Showing { step } = state.tutorial.stage else {
        return false;
    };
    if !state.tutorial.waiting_for_action || TUTORIAL_SCRIPT[step].action != Some(action) {
        return false;
    }
    if origin_step.is_some_and(|origin| origin != step) {
        log::debug!("Stale {action:?} from step {origin_step:?} ignored at step {step}");
        return false;
    }
    state.tutorial.waiting_for_action = false;
    advance(state, step);
    true
}

/// Wrap up: clean field, fresh economy, game-start countdown
fn complete(state: &mut GameState, skipped: bool) {
    state.scheduler.cancel_where(TimerKind::is_tutorial);
    state.timers.typewriter = None;
    state.clear_entities();
    state.mineral = 0;
    // Practice pickups don't count toward the run
    state.score = 0;
    state.fuel = state.max_fuel;
    state.tutorial.waiting_for_action = false;

    if skipped {
        log::info!("Tutorial skipped");
    } else {
        log::info!("Tutorial complete");
    }
    state.emit(GameEvent::TutorialCompleted { skipped });

    let transition = state.tuning.transition;
    state.tutorial.stage = TutorialStage::Completing {
        remaining: transition.countdown_secs,
    };
    state.emit(GameEvent::TutorialCountdown {
        remaining: transition.countdown_secs,
    });
    if transition.countdown_secs == 0 {
        state
            .scheduler
            .after(transition.go_hold_ms, TimerKind::GameStartGo);
    } else {
        state.timers.game_start_countdown = Some(
            state
                .scheduler
                .every(transition.countdown_step_ms, TimerKind::GameStartCountdown),
        );
    }
}

/// One game-start countdown step elapsed
pub fn on_countdown(state: &mut GameState) {
    let TutorialStage::Completing { remaining } = state.tutorial.stage else {
        return;
    };
    let remaining = remaining.saturating_sub(1);
    state.tutorial.stage = TutorialStage::Completing { remaining };
    state.emit(GameEvent::TutorialCountdown { remaining });
    if remaining == 0 {
        if let Some(id) = state.timers.game_start_countdown.take() {
            state.scheduler.cancel(id);
        }
        let hold = state.tuning.transition.go_hold_ms;
        state.scheduler.after(hold, TimerKind::GameStartGo);
    }
}

/// "GO!" has been shown long enough
pub fn on_go(state: &mut GameState) {
    if !state.tutorial.is_completing() {
        return;
    }
    state.tutorial.stage = TutorialStage::Finished;
    phase::start_phase(state, 0);
}

/// Host asked to skip; ignored once the tutorial is wrapping up or over
pub fn skip(state: &mut GameState) -> bool {
    match state.tutorial.stage {
        TutorialStage::Starting | TutorialStage::Showing { .. } | TutorialStage::Hiding { .. } => {
            complete(state, true);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pilot::PilotConfig;
    use crate::sim::{economy, tick};
    use crate::tuning::Tuning;

    fn tutorial_state() -> GameState {
        let mut state = GameState::new(21, Tuning::default());
        tick::initialize(&mut state, PilotConfig::find("cesar").unwrap(), false);
        state
    }

    #[test]
    fn test_script_shape() {
        let ids: Vec<&str> = TUTORIAL_SCRIPT.iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            [
                "welcome",
                "orbit_explain",
                "orbit_success",
                "safe_orbit",
                "fuel_explain",
                "fuel_success",
                "mineral_explain",
                "mineral_success",
                "game_start"
            ]
        );
        assert_eq!(TUTORIAL_SCRIPT.iter().filter(|s| s.is_final).count(), 1);
        assert!(TUTORIAL_SCRIPT[8].is_final);
        for step in &TUTORIAL_SCRIPT {
            // Exactly one gating mode per step
            assert_ne!(step.waits_for_action(), step.auto_advance_ms.is_some());
        }
    }

    #[test]
    fn test_stale_and_mismatched_signals_are_ignored() {
        let mut state = tutorial_state();
        state.tutorial.stage = TutorialStage::Showing { step: 6 };
        state.tutorial.waiting_for_action = true;

        assert!(!signal_action(&mut state, TutorialAction::OrbitChange, None));
        assert!(!signal_action(&mut state, TutorialAction::CollectFuel, Some(4)));
        assert!(!signal_action(&mut state, TutorialAction::CollectMineral, Some(4)));
        assert_eq!(state.tutorial.stage, TutorialStage::Showing { step: 6 });

        assert!(signal_action(&mut state, TutorialAction::CollectMineral, Some(6)));
        assert_eq!(state.tutorial.stage, TutorialStage::Hiding { step: 6 });
    }

    #[test]
    fn test_time_gated_step_ignores_actions() {
        let mut state = tutorial_state();
        state.tutorial.stage = TutorialStage::Showing { step: 2 };
        state.tutorial.waiting_for_action = false;
        assert!(!signal_action(&mut state, TutorialAction::OrbitChange, None));
        assert_eq!(state.tutorial.stage, TutorialStage::Showing { step: 2 });
    }

    #[test]
    fn test_low_fuel_effect() {
        let mut state = tutorial_state();
        state.tutorial.stage = TutorialStage::Hiding { step: 3 };
        on_show(&mut state, 4);
        assert_eq!(state.tutorial.stage, TutorialStage::Showing { step: 4 });
        assert!((state.fuel - 30.0).abs() < 1e-4);
        assert!(state.tutorial.waiting_for_action);
        assert_eq!(state.scheduler.count(TimerKind::TutorialItemSpawn { step: 4 }), 1);
    }

    #[test]
    fn test_skip_cleans_up() {
        let mut state = tutorial_state();
        state.tutorial.stage = TutorialStage::Hiding { step: 3 };
        on_show(&mut state, 4);
        on_item_spawn(&mut state, 4);
        assert_eq!(state.pickups.len(), 1);

        assert!(skip(&mut state));
        assert!(state.pickups.is_empty());
        assert_eq!(state.fuel, state.max_fuel);
        assert_eq!(state.mineral, 0);
        assert_eq!(state.tutorial.stage, TutorialStage::Completing { remaining: 3 });
        assert_eq!(state.scheduler.count(TimerKind::TutorialItemSpawn { step: 4 }), 0);
        assert!(state.timers.typewriter.is_none());

        // Second skip is a no-op
        assert!(!skip(&mut state));
    }

    #[test]
    fn test_practice_score_does_not_carry_into_the_run() {
        let mut state = tutorial_state();
        state.tutorial.stage = TutorialStage::Showing { step: 6 };
        state.tutorial.waiting_for_action = true;
        economy::credit_mineral(&mut state, 1);
        assert_eq!(state.score, 100);
        assert!(signal_action(&mut state, TutorialAction::CollectMineral, Some(6)));

        state.tutorial.stage = TutorialStage::Hiding { step: 8 };
        on_hide(&mut state, 8);
        assert!(state.tutorial.is_completing());
        assert_eq!(state.score, 0);
        assert_eq!(state.mineral, 0);
    }

    #[test]
    fn test_countdown_then_go_starts_first_phase() {
        let mut state = tutorial_state();
        assert!(skip(&mut state));
        state.drain_events();

        on_countdown(&mut state);
        on_countdown(&mut state);
        on_countdown(&mut state);
        assert_eq!(state.tutorial.countdown(), Some(0));
        assert_eq!(state.scheduler.count(TimerKind::GameStartGo), 1);
        assert_eq!(state.scheduler.count(TimerKind::GameStartCountdown), 0);

        on_go(&mut state);
        assert_eq!(state.tutorial.stage, TutorialStage::Finished);
        assert!(state.phase.is_active());

        let events = state.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::TutorialCountdown { remaining: 2 },
                GameEvent::TutorialCountdown { remaining: 1 },
                GameEvent::TutorialCountdown { remaining: 0 },
                GameEvent::PhaseStarted { phase_index: 0 },
            ]
        );
    }
}
