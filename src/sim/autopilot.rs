//! Demo mode pilot
//!
//! Picks orbit intents the way a cautious player would. Its output goes
//! through the normal orbit-change path, so cooldowns still apply.

use std::f32::consts::TAU;

use super::orbit::{OrbitDirection, OrbitTier};
use super::state::{GameState, PickupKind};
use super::tutorial::TutorialAction;

/// Meteors closer than this (radians) on a tier make it unsafe
const THREAT_ARC: f32 = 0.6;
/// Below this fuel percentage fuel stars take priority
const LOW_FUEL_PERCENT: f32 = 50.0;

/// Shortest angular distance between two angles
fn angle_gap(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(TAU);
    d.min(TAU - d)
}

fn tier_threatened(state: &GameState, tier: OrbitTier) -> bool {
    state
        .meteors
        .iter()
        .any(|m| m.tier == tier && angle_gap(m.angle, state.ship.angle) < THREAT_ARC)
}

/// Tier of the pickup worth chasing, if any
fn target_tier(state: &GameState) -> Option<OrbitTier> {
    let low_fuel = state.fuel_percent() < LOW_FUEL_PERCENT;
    let ahead = |angle: f32| (angle - state.ship.angle).rem_euclid(TAU);

    state
        .pickups
        .iter()
        .filter(|p| !p.collected)
        .min_by(|a, b| {
            let rank = |kind: PickupKind| u8::from(!(low_fuel && kind == PickupKind::Fuel));
            rank(a.kind)
                .cmp(&rank(b.kind))
                .then(ahead(a.angle).total_cmp(&ahead(b.angle)))
        })
        .map(|p| p.tier)
}

/// Next orbit intent, or None to hold
pub fn choose(state: &GameState) -> Option<OrbitDirection> {
    if !state.is_running() || state.timers.orbit_cooldown.is_some() {
        return None;
    }
    let tier = state.ship.tier;

    if let Some((_, step)) = state.tutorial.current_step()
        && state.tutorial.waiting_for_action
        && step.action == Some(TutorialAction::OrbitChange)
    {
        return Some(if tier == OrbitTier::Inner {
            OrbitDirection::Outer
        } else {
            OrbitDirection::Inner
        });
    }

    if tier_threatened(state, tier) {
        return tier.direction_to(OrbitTier::Inner);
    }

    if let Some(target) = target_tier(state) {
        let direction = tier.direction_to(target)?;
        let next = tier.step(direction)?;
        return (!tier_threatened(state, next)).then_some(direction);
    }

    tier.direction_to(OrbitTier::Inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pilot::PilotConfig;
    use crate::sim::state::{Meteor, Pickup, PickupLife};
    use crate::sim::tick;
    use crate::tuning::Tuning;

    fn running_state() -> GameState {
        let mut state = GameState::new(8, Tuning::default());
        tick::initialize(&mut state, PilotConfig::find("cesar").unwrap(), true);
        state
    }

    fn meteor(state: &mut GameState, tier: OrbitTier, angle: f32) {
        let id = state.next_entity_id();
        state.meteors.push(Meteor {
            id,
            tier,
            orbit_radius: state.layout.radius(tier),
            angle,
            angular_speed: 0.01,
            direction: 1.0,
            spawned_at_us: 0,
            ttl_us: 15_000_000,
        });
    }

    fn pickup(state: &mut GameState, kind: PickupKind, tier: OrbitTier, angle: f32) {
        let id = state.next_entity_id();
        state.pickups.push(Pickup {
            id,
            kind,
            tier,
            orbit_radius: state.layout.radius(tier),
            angle,
            value: 1.0,
            collected: false,
            tutorial_step: None,
            expires_at_us: None,
            life: PickupLife::Live,
        });
    }

    #[test]
    fn test_angle_gap_wraps() {
        assert!((angle_gap(0.1, TAU - 0.1) - 0.2).abs() < 1e-5);
        assert!((angle_gap(3.0, 1.0) - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_flees_inward_from_close_meteor() {
        let mut state = running_state();
        meteor(&mut state, OrbitTier::Middle, 0.3);
        pickup(&mut state, PickupKind::Mineral, OrbitTier::Outer, 0.5);
        assert_eq!(choose(&state), Some(OrbitDirection::Inner));
    }

    #[test]
    fn test_chases_pickup_unless_tier_is_hot() {
        let mut state = running_state();
        pickup(&mut state, PickupKind::Mineral, OrbitTier::Outer, 1.0);
        assert_eq!(choose(&state), Some(OrbitDirection::Outer));

        meteor(&mut state, OrbitTier::Outer, 0.2);
        assert_eq!(choose(&state), None);
    }

    #[test]
    fn test_low_fuel_prefers_fuel() {
        let mut state = running_state();
        state.fuel = 20.0;
        pickup(&mut state, PickupKind::Mineral, OrbitTier::Outer, 0.2);
        pickup(&mut state, PickupKind::Fuel, OrbitTier::Inner, 2.0);
        assert_eq!(choose(&state), Some(OrbitDirection::Inner));
    }

    #[test]
    fn test_idles_in_safe_zone() {
        let mut state = running_state();
        assert_eq!(choose(&state), Some(OrbitDirection::Inner));
        state.ship.set_tier(OrbitTier::Inner, &state.layout);
        assert_eq!(choose(&state), None);
    }
}
