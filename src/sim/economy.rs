//! Fuel, minerals and score
//!
//! Fuel and mineral stay inside their bounds whatever order pickups and decay
//! ticks arrive in. Running the tank dry ends the run on the spot.

use super::events::{GameEvent, GameOverReason};
use super::scheduler::TimerKind;
use super::spawner;
use super::state::GameState;

/// Credit mineral units (clamped to the phase quota) and their score.
/// Returns the units actually added to the counter.
pub fn credit_mineral(state: &mut GameState, value: u32) -> u32 {
    let before = state.mineral;
    state.mineral = state.mineral.saturating_add(value).min(state.mineral_target);
    state.score += u64::from(value) * state.tuning.items.mineral_score;
    state.mineral - before
}

/// Add fuel, clamped to the tank
pub fn credit_fuel(state: &mut GameState, amount: f32) {
    state.fuel = (state.fuel + amount).clamp(0.0, state.max_fuel);
}

/// Whether the tank drains right now
pub fn fuel_decays(state: &GameState) -> bool {
    state.is_running() && state.phase.is_active() && !state.tutorial.is_active()
}

/// One fuel decay interval elapsed
pub fn on_fuel_decay(state: &mut GameState) {
    if !fuel_decays(state) {
        return;
    }
    let rate = state.tuning.fuel.consumption_rate;
    state.fuel = (state.fuel - rate).clamp(0.0, state.max_fuel);
    if state.fuel <= 0.0 {
        game_over(state, GameOverReason::OutOfFuel);
    }
}

/// End the run. Only the first reason sticks.
pub fn game_over(state: &mut GameState, reason: GameOverReason) {
    if state.is_game_over() {
        return;
    }
    state.game_over = Some(reason);
    spawner::pause_spawners(state);
    state.scheduler.cancel_where(TimerKind::is_tutorial);
    log::info!(
        "Game over ({reason}) at {:.1}s, score {}",
        state.scheduler.now_ms() as f64 / 1000.0,
        state.score
    );
    state.emit(GameEvent::GameOver { reason });
}
