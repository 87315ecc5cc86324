//! Read-only view of the simulation for the host
//!
//! Captured after every tick. Everything the HUD and renderer need, nothing
//! they could use to mutate the run.

use glam::Vec2;
use serde::Serialize;

use super::events::GameOverReason;
use super::orbit::OrbitTier;
use super::phase::PhaseState;
use super::state::{GameState, PickupKind, PickupLife};
use super::tutorial::Highlight;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeteorView {
    pub id: u32,
    pub position: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickupView {
    pub id: u32,
    pub kind: PickupKind,
    pub position: Vec2,
    pub collected: bool,
    pub fading: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub orbit_tier: OrbitTier,
    pub fuel: f32,
    pub max_fuel: f32,
    pub fuel_percent: f32,
    pub mineral_count: u32,
    pub mineral_target: u32,
    pub score: u64,
    pub phase_index: usize,
    pub phase_count: usize,
    pub is_phase_transition: bool,
    pub phase_complete: bool,
    /// Phase or game-start countdown currently shown
    pub countdown: Option<u8>,
    pub is_game_over: bool,
    pub game_over_reason: Option<GameOverReason>,
    pub is_tutorial_active: bool,
    pub tutorial_step_id: Option<String>,
    pub tutorial_message: Option<String>,
    pub tutorial_visible_chars: usize,
    pub tutorial_waiting_for_action: bool,
    pub tutorial_highlight: Option<Highlight>,
    pub tutorial_thumbs_up: bool,
    pub pilot_id: Option<String>,
    pub ship_position: Vec2,
    pub ship_radius: f32,
    pub meteors: Vec<MeteorView>,
    pub pickups: Vec<PickupView>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let step = state.tutorial.current_step().map(|(_, step)| step);
        Self {
            orbit_tier: state.ship.tier,
            fuel: state.fuel,
            max_fuel: state.max_fuel,
            fuel_percent: state.fuel_percent(),
            mineral_count: state.mineral,
            mineral_target: state.mineral_target,
            score: state.score,
            phase_index: state.phase.index(),
            phase_count: state.tuning.phases.len(),
            is_phase_transition: matches!(state.phase, PhaseState::Transitioning { .. }),
            phase_complete: matches!(state.phase, PhaseState::Complete { .. }),
            countdown: state.phase.countdown().or(state.tutorial.countdown()),
            is_game_over: state.is_game_over(),
            game_over_reason: state.game_over,
            is_tutorial_active: state.tutorial.is_active(),
            tutorial_step_id: step.map(|s| s.id.to_string()),
            tutorial_message: step.map(|s| s.message.to_string()),
            tutorial_visible_chars: state.tutorial.visible_chars,
            tutorial_waiting_for_action: state.tutorial.waiting_for_action,
            tutorial_highlight: step.and_then(|s| s.highlight),
            tutorial_thumbs_up: step.is_some_and(|s| s.thumbs_up),
            pilot_id: state.pilot.as_ref().map(|p| p.id.clone()),
            ship_position: state.ship.position(),
            ship_radius: state.ship.radius,
            meteors: state
                .meteors
                .iter()
                .map(|m| MeteorView {
                    id: m.id,
                    position: m.position(),
                })
                .collect(),
            pickups: state
                .pickups
                .iter()
                .map(|p| PickupView {
                    id: p.id,
                    kind: p.kind,
                    position: p.position(),
                    collected: p.collected,
                    fading: matches!(p.life, PickupLife::Fading { .. }),
                })
                .collect(),
        }
    }
}
