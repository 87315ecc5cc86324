//! Game state and core simulation types
//!
//! Everything one run mutates lives in [`GameState`]. A restart throws the
//! whole value away after tearing down its scheduler.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::{GameEvent, GameOverReason};
use super::orbit::{OrbitLayout, OrbitTier, ShipMotion};
use super::phase::PhaseState;
use super::scheduler::{Scheduler, TimerId};
use super::tutorial::Tutorial;
use crate::pilot::PilotConfig;
use crate::polar_to_cartesian;
use crate::tuning::Tuning;

/// Collectible types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    Mineral,
    Fuel,
}

/// A meteor circling on a danger tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meteor {
    pub id: u32,
    pub tier: OrbitTier,
    pub orbit_radius: f32,
    pub angle: f32,
    /// Radians per tick
    pub angular_speed: f32,
    /// +1 or -1
    pub direction: f32,
    pub spawned_at_us: u64,
    pub ttl_us: u64,
}

impl Meteor {
    pub fn advance(&mut self) {
        self.angle += self.angular_speed * self.direction;
    }

    pub fn position(&self) -> Vec2 {
        polar_to_cartesian(self.orbit_radius, self.angle)
    }

    pub fn is_expired(&self, now_us: u64) -> bool {
        now_us >= self.spawned_at_us + self.ttl_us
    }
}

/// Where a pickup is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupLife {
    Live,
    /// Lifetime elapsed, removed at `until_us`
    Fading { until_us: u64 },
    /// Collected, removed at `until_us`
    Collecting { until_us: u64 },
}

/// A mineral or fuel star sitting on an orbit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub tier: OrbitTier,
    pub orbit_radius: f32,
    pub angle: f32,
    /// Mineral units or fuel amount
    pub value: f32,
    /// Set at most once
    pub collected: bool,
    /// Step index of the tutorial that spawned it
    pub tutorial_step: Option<usize>,
    /// Lifetime end (None = stays until cleared)
    pub expires_at_us: Option<u64>,
    pub life: PickupLife,
}

impl Pickup {
    pub fn position(&self) -> Vec2 {
        polar_to_cartesian(self.orbit_radius, self.angle)
    }

    pub fn is_tutorial_item(&self) -> bool {
        self.tutorial_step.is_some()
    }

    /// Mark collected; false if it already was
    pub fn collect(&mut self, now_us: u64, linger_us: u64) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        self.life = PickupLife::Collecting {
            until_us: now_us + linger_us,
        };
        true
    }
}

/// Handles of the long-lived timers
#[derive(Debug, Clone, Default)]
pub struct RunTimers {
    pub meteor: Option<TimerId>,
    pub mineral: Option<TimerId>,
    pub fuel_star: Option<TimerId>,
    pub fuel_decay: Option<TimerId>,
    pub orbit_cooldown: Option<TimerId>,
    pub phase_countdown: Option<TimerId>,
    pub typewriter: Option<TimerId>,
    pub game_start_countdown: Option<TimerId>,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub tuning: Tuning,
    pub layout: OrbitLayout,
    /// Set once by initialization
    pub pilot: Option<PilotConfig>,
    pub ship: ShipMotion,
    pub fuel: f32,
    pub max_fuel: f32,
    pub mineral: u32,
    /// Quota of the current phase
    pub mineral_target: u32,
    pub score: u64,
    pub phase: PhaseState,
    pub tutorial: Tutorial,
    pub game_over: Option<GameOverReason>,
    /// Set after the host asked to return to the menu
    pub exited: bool,
    /// Active meteors (sorted by id for determinism)
    pub meteors: Vec<Meteor>,
    /// Active pickups (sorted by id for determinism)
    pub pickups: Vec<Pickup>,
    pub scheduler: Scheduler,
    pub timers: RunTimers,
    /// Simulation tick counter
    pub time_ticks: u64,
    events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh, pilot-less state
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let layout = OrbitLayout::from_radii(&tuning.orbits);
        let mineral_target = tuning.phases.first().map_or(0, |p| p.mineral_target);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            ship: ShipMotion::new(&layout, OrbitTier::Middle),
            layout,
            tuning,
            pilot: None,
            fuel: 0.0,
            max_fuel: 0.0,
            mineral: 0,
            mineral_target,
            score: 0,
            phase: PhaseState::Inactive,
            tutorial: Tutorial::default(),
            game_over: None,
            exited: false,
            meteors: Vec::new(),
            pickups: Vec::new(),
            scheduler: Scheduler::new(),
            timers: RunTimers::default(),
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over.is_some()
    }

    /// True while a run is being played or taught (not over, not exited)
    pub fn is_running(&self) -> bool {
        self.pilot.is_some() && !self.is_game_over() && !self.exited
    }

    pub fn fuel_percent(&self) -> f32 {
        if self.max_fuel > 0.0 {
            (self.fuel / self.max_fuel * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        log::debug!("event: {event}");
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Switch to a new orbit layout (viewport resize)
    pub fn apply_layout(&mut self, layout: OrbitLayout) {
        self.layout = layout;
        self.ship.target_radius = layout.radius(self.ship.tier);
        for meteor in &mut self.meteors {
            meteor.orbit_radius = layout.radius(meteor.tier);
        }
        for pickup in &mut self.pickups {
            pickup.orbit_radius = layout.radius(pickup.tier);
        }
    }

    /// Remove every meteor and pickup immediately
    pub fn clear_entities(&mut self) {
        self.meteors.clear();
        self.pickups.clear();
    }

    /// Cancel every pending timer; returns how many were cancelled
    pub fn teardown(&mut self) -> usize {
        self.timers = RunTimers::default();
        self.scheduler.clear()
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.meteors.sort_by_key(|m| m.id);
        self.pickups.sort_by_key(|p| p.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pickup(kind: PickupKind) -> Pickup {
        Pickup {
            id: 1,
            kind,
            tier: OrbitTier::Middle,
            orbit_radius: 140.0,
            angle: 0.0,
            value: 1.0,
            collected: false,
            tutorial_step: None,
            expires_at_us: None,
            life: PickupLife::Live,
        }
    }

    #[test]
    fn test_collect_only_once() {
        let mut p = pickup(PickupKind::Mineral);
        assert!(p.collect(1_000, 200_000));
        assert!(!p.collect(2_000, 200_000));
        assert_eq!(p.life, PickupLife::Collecting { until_us: 201_000 });
    }

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(7, Tuning::default());
        assert!(state.pilot.is_none());
        assert!(!state.is_running());
        assert_eq!(state.ship.tier, OrbitTier::Middle);
        assert_eq!(state.ship.radius, 140.0);
        assert_eq!(state.mineral_target, 5);
        assert_eq!(state.phase, PhaseState::Inactive);
    }

    #[test]
    fn test_apply_layout_moves_everything_by_tier() {
        let mut state = GameState::new(7, Tuning::default());
        let mut p = pickup(PickupKind::Fuel);
        p.tier = OrbitTier::Outer;
        p.orbit_radius = 200.0;
        state.pickups.push(p);

        state.apply_layout(OrbitLayout {
            inner: 40.0,
            middle: 70.0,
            outer: 100.0,
        });
        assert_eq!(state.ship.target_radius, 70.0);
        assert_eq!(state.pickups[0].orbit_radius, 100.0);
    }

    #[test]
    fn test_meteor_motion_and_expiry() {
        let mut m = Meteor {
            id: 1,
            tier: OrbitTier::Outer,
            orbit_radius: 200.0,
            angle: 1.0,
            angular_speed: 0.02,
            direction: -1.0,
            spawned_at_us: 1_000_000,
            ttl_us: 15_000_000,
        };
        m.advance();
        assert!((m.angle - 0.98).abs() < 1e-6);
        assert!(!m.is_expired(15_999_999));
        assert!(m.is_expired(16_000_000));
    }
}
