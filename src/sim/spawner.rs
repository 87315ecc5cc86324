//! Entity spawning and expiry
//!
//! Meteor, mineral and fuel-star spawners are repeating scheduler tasks that
//! live for the whole run. They are created paused and toggled by phase
//! flow; the meteor task is re-created whenever its interval changes.

use std::f32::consts::TAU;

use rand::Rng;

use super::orbit::OrbitTier;
use super::scheduler::{TimerId, TimerKind};
use super::state::{GameState, Meteor, Pickup, PickupKind, PickupLife};

fn ms_to_us(ms: u32) -> u64 {
    u64::from(ms) * 1000
}

/// Create every run-long timer, paused
pub fn arm_spawners(state: &mut GameState) {
    let meteor_ms = state
        .tuning
        .phase(0)
        .map_or(u32::MAX, |p| p.meteor_spawn_interval_ms);
    let spawn = state.tuning.spawn;

    let ids = [
        state.scheduler.every(meteor_ms, TimerKind::MeteorSpawn),
        state.scheduler.every(spawn.mineral_ms, TimerKind::MineralSpawn),
        state.scheduler.every(spawn.fuel_star_ms, TimerKind::FuelStarSpawn),
        state.scheduler.every(spawn.fuel_decay_ms, TimerKind::FuelDecay),
    ];
    for id in ids {
        state.scheduler.pause(id);
    }
    let [meteor, mineral, fuel_star, fuel_decay] = ids;
    state.timers.meteor = Some(meteor);
    state.timers.mineral = Some(mineral);
    state.timers.fuel_star = Some(fuel_star);
    state.timers.fuel_decay = Some(fuel_decay);
}

fn run_timers(state: &GameState) -> impl Iterator<Item = TimerId> {
    [
        state.timers.meteor,
        state.timers.mineral,
        state.timers.fuel_star,
        state.timers.fuel_decay,
    ]
    .into_iter()
    .flatten()
}

/// Freeze spawners and fuel decay
pub fn pause_spawners(state: &mut GameState) {
    let ids: Vec<TimerId> = run_timers(state).collect();
    for id in ids {
        state.scheduler.pause(id);
    }
}

/// Unfreeze spawners and fuel decay
pub fn resume_spawners(state: &mut GameState) {
    let ids: Vec<TimerId> = run_timers(state).collect();
    for id in ids {
        state.scheduler.resume(id);
    }
}

/// Replace the meteor task with one at a new interval
pub fn rearm_meteor(state: &mut GameState, interval_ms: u32) {
    if let Some(old) = state.timers.meteor.take() {
        state.scheduler.cancel(old);
    }
    state.timers.meteor = Some(state.scheduler.every(interval_ms, TimerKind::MeteorSpawn));
}

/// Shared spawn guard
pub fn can_spawn(state: &GameState) -> bool {
    state.is_running() && state.phase.is_active() && !state.tutorial.is_active()
}

fn random_angle(state: &mut GameState) -> f32 {
    state.rng().random_range(0.0..TAU)
}

pub fn spawn_meteor(state: &mut GameState) {
    let id = state.next_entity_id();
    let tuning = state.tuning.meteors;
    let rng = state.rng();
    let tier = OrbitTier::DANGER[rng.random_range(0..OrbitTier::DANGER.len())];
    let angular_speed = rng.random_range(tuning.speed_min..=tuning.speed_max);
    let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let angle = random_angle(state);

    log::debug!("Meteor {id} on {} (speed {angular_speed:.3})", tier.label());
    state.meteors.push(Meteor {
        id,
        tier,
        orbit_radius: state.layout.radius(tier),
        angle,
        angular_speed,
        direction,
        spawned_at_us: state.scheduler.now_us(),
        ttl_us: ms_to_us(tuning.lifetime_ms),
    });
}

fn spawn_pickup(
    state: &mut GameState,
    kind: PickupKind,
    tier: OrbitTier,
    angle: f32,
    value: f32,
    tutorial_step: Option<usize>,
    lifetime_ms: Option<u32>,
) {
    let id = state.next_entity_id();
    let expires_at_us = lifetime_ms.map(|ms| state.scheduler.now_us() + ms_to_us(ms));
    log::debug!("{kind:?} {id} on {} (value {value})", tier.label());
    state.pickups.push(Pickup {
        id,
        kind,
        tier,
        orbit_radius: state.layout.radius(tier),
        angle,
        value,
        collected: false,
        tutorial_step,
        expires_at_us,
        life: PickupLife::Live,
    });
}

pub fn spawn_mineral(state: &mut GameState) {
    let tier = OrbitTier::ALL[state.rng().random_range(0..OrbitTier::ALL.len())];
    let angle = random_angle(state);
    let value = state.tuning.items.mineral as f32;
    let lifetime = state.tuning.collectibles.mineral_lifetime_ms;
    spawn_pickup(state, PickupKind::Mineral, tier, angle, value, None, Some(lifetime));
}

pub fn spawn_fuel_star(state: &mut GameState) {
    let tier = OrbitTier::ALL[state.rng().random_range(0..OrbitTier::ALL.len())];
    let angle = random_angle(state);
    let value = state.tuning.items.fuel_star;
    let lifetime = state.tuning.collectibles.fuel_star_lifetime_ms;
    spawn_pickup(state, PickupKind::Fuel, tier, angle, value, None, Some(lifetime));
}

/// Tutorial pickup: off the ship's tier, a little ahead of it, no lifetime
pub fn spawn_tutorial_item(state: &mut GameState, kind: PickupKind, step: usize) {
    let ship_tier = state.ship.tier;
    let others: Vec<OrbitTier> = OrbitTier::ALL
        .into_iter()
        .filter(|&t| t != ship_tier)
        .collect();
    let tier = others[state.rng().random_range(0..others.len())];
    let angle = state.ship.angle + state.tuning.tutorial.item_lead_angle;
    let value = match kind {
        PickupKind::Fuel => state.tuning.items.fuel_star_tutorial,
        PickupKind::Mineral => state.tuning.items.mineral as f32,
    };
    spawn_pickup(state, kind, tier, angle, value, Some(step), None);
}

/// Drop expired meteors, fade out stale pickups and remove finished ones
pub fn sweep_expired(state: &mut GameState) {
    let now = state.scheduler.now_us();
    let fade_us = ms_to_us(state.tuning.collectibles.fade_ms);

    state.meteors.retain(|m| !m.is_expired(now));

    for pickup in &mut state.pickups {
        if let (PickupLife::Live, Some(expires)) = (pickup.life, pickup.expires_at_us)
            && now >= expires
        {
            pickup.life = PickupLife::Fading {
                until_us: expires + fade_us,
            };
        }
    }
    state.pickups.retain(|p| match p.life {
        PickupLife::Live => true,
        PickupLife::Fading { until_us } | PickupLife::Collecting { until_us } => now < until_us,
    });
}
