//! Ship proximity checks
//!
//! Everything is a circle-vs-point test against the ship position. Meteors
//! are checked first; a hit ends the run and nothing else is resolved that
//! tick.

use glam::Vec2;

use super::economy;
use super::events::{GameEvent, GameOverReason};
use super::phase::{self, PhaseState};
use super::state::{GameState, PickupKind};
use super::tutorial::{self, TutorialAction};

/// Strict "closer than radius" test
#[inline]
pub fn within_reach(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

/// Collisions are only evaluated during live play
pub fn collisions_enabled(state: &GameState) -> bool {
    state.is_running()
        && !matches!(
            state.phase,
            PhaseState::Transitioning { .. } | PhaseState::Complete { .. }
        )
        && !state.tutorial.is_completing()
}

/// Resolve this tick's ship collisions
pub fn check_collisions(state: &mut GameState) {
    if !collisions_enabled(state) {
        return;
    }
    let ship = state.ship.position();

    let meteor_radius = state.tuning.collision.meteor;
    let hit = state
        .meteors
        .iter()
        .find(|m| within_reach(ship, m.position(), meteor_radius))
        .map(|m| m.id);
    if let Some(id) = hit {
        log::debug!("Meteor {id} hit the ship");
        economy::game_over(state, GameOverReason::MeteorCollision);
        return;
    }

    let now = state.scheduler.now_us();
    let linger_us = u64::from(state.tuning.collectibles.collect_ms) * 1000;
    let radii = state.tuning.collision;

    for i in 0..state.pickups.len() {
        let pickup = &mut state.pickups[i];
        let radius = match pickup.kind {
            PickupKind::Mineral => radii.mineral,
            PickupKind::Fuel => radii.fuel,
        };
        if pickup.collected || !within_reach(ship, pickup.position(), radius) {
            continue;
        }
        if !pickup.collect(now, linger_us) {
            continue;
        }
        let (kind, value, step) = (pickup.kind, pickup.value, pickup.tutorial_step);
        state.emit(GameEvent::PickupCollected { kind, value });

        match kind {
            PickupKind::Mineral => {
                economy::credit_mineral(state, value.round() as u32);
                if step.is_some() {
                    tutorial::signal_action(state, TutorialAction::CollectMineral, step);
                } else if state.phase.is_active()
                    && !state.tutorial.is_active()
                    && state.mineral >= state.mineral_target
                {
                    // Completion clears every entity
                    phase::complete_phase(state);
                    break;
                }
            }
            PickupKind::Fuel => {
                economy::credit_fuel(state, value);
                if step.is_some() {
                    tutorial::signal_action(state, TutorialAction::CollectFuel, step);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pilot::PilotConfig;
    use crate::sim::orbit::OrbitTier;
    use crate::sim::state::{Meteor, Pickup, PickupLife};
    use crate::sim::tick;
    use crate::tuning::Tuning;

    fn running_state() -> GameState {
        let mut state = GameState::new(11, Tuning::default());
        tick::initialize(&mut state, PilotConfig::find("cesar").unwrap(), true);
        state
    }

    fn pickup_on_ship(state: &mut GameState, kind: PickupKind, value: f32) {
        let id = state.next_entity_id();
        state.pickups.push(Pickup {
            id,
            kind,
            tier: state.ship.tier,
            orbit_radius: state.ship.radius,
            angle: state.ship.angle,
            value,
            collected: false,
            tutorial_step: None,
            expires_at_us: None,
            life: PickupLife::Live,
        });
    }

    #[test]
    fn test_reach_is_strict() {
        assert!(within_reach(Vec2::ZERO, Vec2::new(19.9, 0.0), 20.0));
        assert!(!within_reach(Vec2::ZERO, Vec2::new(20.0, 0.0), 20.0));
    }

    #[test]
    fn test_pickup_is_credited_once() {
        let mut state = running_state();
        pickup_on_ship(&mut state, PickupKind::Mineral, 1.0);

        check_collisions(&mut state);
        check_collisions(&mut state);
        check_collisions(&mut state);

        assert_eq!(state.mineral, 1);
        assert_eq!(state.score, 100);
        assert!(state.pickups[0].collected);
    }

    #[test]
    fn test_overlapping_fuel_is_clamped() {
        let mut state = running_state();
        state.fuel = 90.0;
        pickup_on_ship(&mut state, PickupKind::Fuel, 8.0);
        pickup_on_ship(&mut state, PickupKind::Fuel, 8.0);
        check_collisions(&mut state);
        assert_eq!(state.fuel, 100.0);
    }

    #[test]
    fn test_quota_overflow_in_one_tick_is_clamped() {
        let mut state = running_state();
        for _ in 0..7 {
            pickup_on_ship(&mut state, PickupKind::Mineral, 1.0);
        }
        check_collisions(&mut state);
        assert_eq!(state.mineral, 5);
        assert!(matches!(state.phase, PhaseState::Transitioning { index: 0, .. }));
        assert!(state.pickups.is_empty());
    }

    #[test]
    fn test_meteor_hit_skips_pickups() {
        let mut state = running_state();
        pickup_on_ship(&mut state, PickupKind::Mineral, 1.0);
        let id = state.next_entity_id();
        state.meteors.push(Meteor {
            id,
            tier: OrbitTier::Middle,
            orbit_radius: state.ship.radius,
            angle: state.ship.angle,
            angular_speed: 0.0,
            direction: 1.0,
            spawned_at_us: 0,
            ttl_us: 15_000_000,
        });

        check_collisions(&mut state);
        assert_eq!(state.game_over, Some(GameOverReason::MeteorCollision));
        assert_eq!(state.mineral, 0);

        // Later ticks short-circuit
        check_collisions(&mut state);
        assert!(!state.pickups[0].collected);
    }
}
