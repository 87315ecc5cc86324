//! Fixed timestep simulation tick
//!
//! One tick: intents, motion, collisions, then every timer due within the
//! tick's window, then expiry. Anything a timer spawns is first checked for
//! collisions on the following tick.

use super::autopilot;
use super::economy;
use super::orbit::{self, OrbitDirection, OrbitTier, ShipMotion};
use super::phase;
use super::scheduler::{TimerId, TimerKind};
use super::spawner;
use super::state::GameState;
use super::tutorial::{self, TutorialStage};
use crate::consts::SIM_DT_US;
use crate::pilot::PilotConfig;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Orbit change requests, applied in order
    pub orbit_changes: Vec<OrbitDirection>,
    /// Skip the tutorial
    pub skip_tutorial: bool,
    /// Idle/demo mode - the autopilot flies the ship
    pub idle_mode: bool,
}

/// Hand the pilot to a fresh state and start either the tutorial or phase 0.
/// Returns false if the state already has a pilot.
pub fn initialize(state: &mut GameState, pilot: PilotConfig, skip_tutorial: bool) -> bool {
    if state.pilot.is_some() {
        log::warn!("Run already initialized, ignoring pilot {}", pilot.id);
        return false;
    }

    log::info!(
        "Pilot {} ({}) ready: fuel {}, orbit speed {}",
        pilot.name,
        pilot.ship,
        pilot.fuel_max,
        pilot.orbit_speed
    );
    state.fuel = pilot.fuel_max;
    state.max_fuel = pilot.fuel_max;
    state.ship = ShipMotion::new(&state.layout, OrbitTier::Middle);
    state.pilot = Some(pilot);

    spawner::arm_spawners(state);
    if skip_tutorial {
        state.tutorial.stage = TutorialStage::Finished;
        phase::start_phase(state, 0);
    } else {
        tutorial::start(state);
    }
    true
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Nothing to simulate before a pilot or after leaving
    if state.pilot.is_none() || state.exited {
        return;
    }
    let window_end = state.scheduler.now_us() + SIM_DT_US;

    if input.skip_tutorial {
        tutorial::skip(state);
    }
    for &direction in &input.orbit_changes {
        orbit::request_orbit_change(state, direction);
    }
    if input.idle_mode
        && let Some(direction) = autopilot::choose(state)
    {
        orbit::request_orbit_change(state, direction);
    }

    advance_motion(state);
    super::collision::check_collisions(state);

    while let Some((id, kind)) = state.scheduler.pop_due(window_end) {
        dispatch(state, id, kind);
    }
    state.scheduler.advance_to(window_end);

    spawner::sweep_expired(state);
    state.normalize_order();
    state.time_ticks += 1;
}

fn advance_motion(state: &mut GameState) {
    let mechanics = state.tuning.orbit_mechanics;
    state
        .ship
        .ease_radius(mechanics.transition_factor, mechanics.settle_epsilon);

    // The ship stops where it died; meteors keep drifting
    if !state.is_game_over()
        && let Some(speed) = state.pilot.as_ref().map(|p| p.orbit_speed)
    {
        let reference = state.layout.reference_radius();
        state.ship.advance(speed, reference);
    }
    for meteor in &mut state.meteors {
        meteor.advance();
    }
}

/// Run the handler for a fired timer
pub fn dispatch(state: &mut GameState, id: TimerId, kind: TimerKind) {
    match kind {
        TimerKind::MeteorSpawn => {
            if spawner::can_spawn(state) {
                spawner::spawn_meteor(state);
            }
        }
        TimerKind::MineralSpawn => {
            if spawner::can_spawn(state) {
                spawner::spawn_mineral(state);
            }
        }
        TimerKind::FuelStarSpawn => {
            if spawner::can_spawn(state) {
                spawner::spawn_fuel_star(state);
            }
        }
        TimerKind::FuelDecay => economy::on_fuel_decay(state),
        TimerKind::OrbitCooldown => {
            if state.timers.orbit_cooldown == Some(id) {
                state.timers.orbit_cooldown = None;
            }
        }
        TimerKind::PhaseCountdown => phase::on_countdown(state),
        TimerKind::TutorialStart => tutorial::on_start(state),
        TimerKind::TutorialTypewriter { step } => tutorial::on_typewriter(state, step),
        TimerKind::TutorialAutoAdvance { step } => tutorial::on_auto_advance(state, step),
        TimerKind::TutorialItemSpawn { step } => tutorial::on_item_spawn(state, step),
        TimerKind::TutorialHide { step } => tutorial::on_hide(state, step),
        TimerKind::TutorialShow { step } => tutorial::on_show(state, step),
        TimerKind::GameStartCountdown => tutorial::on_countdown(state),
        TimerKind::GameStartGo => tutorial::on_go(state),
    }
}
