//! Orbit motion model
//!
//! The ship sits on one of three discrete tiers. Changing tier moves the
//! target radius; the actual radius eases toward it every tick. Angular speed
//! is scaled by `reference / radius` so the ship's linear speed is the same on
//! every orbit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::scheduler::TimerKind;
use super::state::GameState;
use super::tutorial::{self, TutorialAction};
use crate::tuning::{OrbitRadii, ScreenTuning};
use crate::{cartesian_to_polar, polar_to_cartesian};

/// One of the three discrete orbits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrbitTier {
    Inner,
    Middle,
    Outer,
}

/// Tier change request from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrbitDirection {
    Inner,
    Outer,
}

impl OrbitTier {
    pub const ALL: [OrbitTier; 3] = [OrbitTier::Inner, OrbitTier::Middle, OrbitTier::Outer];
    /// Tiers meteors may spawn on (the inner orbit is the safe zone)
    pub const DANGER: [OrbitTier; 2] = [OrbitTier::Middle, OrbitTier::Outer];

    pub fn label(self) -> &'static str {
        match self {
            OrbitTier::Inner => "INNER",
            OrbitTier::Middle => "MIDDLE",
            OrbitTier::Outer => "OUTER",
        }
    }

    /// Neighbouring tier in a direction, None at the edge
    pub fn step(self, direction: OrbitDirection) -> Option<OrbitTier> {
        match (self, direction) {
            (OrbitTier::Outer, OrbitDirection::Inner) => Some(OrbitTier::Middle),
            (OrbitTier::Middle, OrbitDirection::Inner) => Some(OrbitTier::Inner),
            (OrbitTier::Inner, OrbitDirection::Outer) => Some(OrbitTier::Middle),
            (OrbitTier::Middle, OrbitDirection::Outer) => Some(OrbitTier::Outer),
            _ => None,
        }
    }

    /// Direction that moves one step toward `target`
    pub fn direction_to(self, target: OrbitTier) -> Option<OrbitDirection> {
        match self.cmp(&target) {
            std::cmp::Ordering::Less => Some(OrbitDirection::Outer),
            std::cmp::Ordering::Greater => Some(OrbitDirection::Inner),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn is_safe_zone(self) -> bool {
        self == OrbitTier::Inner
    }
}

/// Radii of the three tiers for the current viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitLayout {
    pub inner: f32,
    pub middle: f32,
    pub outer: f32,
}

impl OrbitLayout {
    pub fn from_radii(radii: &OrbitRadii) -> Self {
        Self {
            inner: radii.inner,
            middle: radii.middle,
            outer: radii.outer,
        }
    }

    /// Radii scaled to fit a viewport, relative to the reference screen
    pub fn for_viewport(radii: &OrbitRadii, screen: &ScreenTuning, width: f32, height: f32) -> Self {
        let scale = (width / screen.reference_width).min(height / screen.reference_height);
        // Degenerate viewports (minimized window) keep the authored radii
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        Self {
            inner: radii.inner * scale,
            middle: radii.middle * scale,
            outer: radii.outer * scale,
        }
    }

    pub fn radius(&self, tier: OrbitTier) -> f32 {
        match tier {
            OrbitTier::Inner => self.inner,
            OrbitTier::Middle => self.middle,
            OrbitTier::Outer => self.outer,
        }
    }

    /// Radius at which angular speed equals the pilot's base speed
    pub fn reference_radius(&self) -> f32 {
        self.inner
    }

    /// Tier closest to a distance from the planet (midpoint thresholds)
    pub fn tier_at_distance(&self, distance: f32) -> OrbitTier {
        if distance < (self.inner + self.middle) / 2.0 {
            OrbitTier::Inner
        } else if distance < (self.middle + self.outer) / 2.0 {
            OrbitTier::Middle
        } else {
            OrbitTier::Outer
        }
    }

    /// Tier under a point relative to the planet center
    pub fn tier_at(&self, point: Vec2) -> OrbitTier {
        let (distance, _) = cartesian_to_polar(point);
        self.tier_at_distance(distance)
    }
}

/// Continuous ship orbit state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipMotion {
    /// Current (target) tier
    pub tier: OrbitTier,
    /// Radians, only ever increases
    pub angle: f32,
    /// Interpolated radius
    pub radius: f32,
    pub target_radius: f32,
}

impl ShipMotion {
    pub fn new(layout: &OrbitLayout, tier: OrbitTier) -> Self {
        let radius = layout.radius(tier);
        Self {
            tier,
            angle: 0.0,
            radius,
            target_radius: radius,
        }
    }

    pub fn set_tier(&mut self, tier: OrbitTier, layout: &OrbitLayout) {
        self.tier = tier;
        self.target_radius = layout.radius(tier);
    }

    /// Angular speed that keeps linear speed constant across orbits
    pub fn angular_speed(&self, base_speed: f32, reference_radius: f32) -> f32 {
        base_speed * (reference_radius / self.radius)
    }

    /// Ease the radius toward its target (exponential approach)
    pub fn ease_radius(&mut self, factor: f32, epsilon: f32) {
        let gap = self.target_radius - self.radius;
        if gap.abs() < epsilon {
            self.radius = self.target_radius;
        } else {
            self.radius += gap * factor;
        }
    }

    /// Advance one tick along the orbit
    pub fn advance(&mut self, base_speed: f32, reference_radius: f32) {
        self.angle += self.angular_speed(base_speed, reference_radius);
    }

    pub fn position(&self) -> Vec2 {
        polar_to_cartesian(self.radius, self.angle)
    }

    pub fn is_settled(&self) -> bool {
        self.radius == self.target_radius
    }
}

/// Handle a tier change request.
///
/// Rejected (returns false, no state change) during the cooldown, at the edge
/// tier, before a pilot exists and after game over.
pub fn request_orbit_change(state: &mut GameState, direction: OrbitDirection) -> bool {
    if state.pilot.is_none() || state.is_game_over() {
        log::debug!("Orbit change {direction:?} ignored: no active run");
        return false;
    }
    if state.timers.orbit_cooldown.is_some() {
        log::debug!("Orbit change {direction:?} rejected: cooldown");
        return false;
    }
    let Some(next) = state.ship.tier.step(direction) else {
        return false;
    };

    state.ship.set_tier(next, &state.layout);
    let cooldown = state.tuning.spawn.orbit_cooldown_ms;
    state.timers.orbit_cooldown = Some(state.scheduler.after(cooldown, TimerKind::OrbitCooldown));
    state.emit(GameEvent::OrbitChanged { tier: next });
    tutorial::signal_action(state, TutorialAction::OrbitChange, None);
    true
}
