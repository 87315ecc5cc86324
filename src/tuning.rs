//! Data-driven game balance
//!
//! Every gameplay constant lives here so balance can be adjusted from JSON
//! without touching simulation code. Sections use `#[serde(default)]`, so a
//! partial override only needs the fields it changes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a tuning document is rejected
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("at least one phase is required")]
    NoPhases,
    #[error("phase {index} has a mineral target of zero")]
    ZeroMineralTarget { index: usize },
    #[error("phase {index} has a meteor spawn interval of zero")]
    ZeroMeteorInterval { index: usize },
    #[error("orbit radii must strictly increase (inner {inner}, middle {middle}, outer {outer})")]
    OrbitOrder { inner: f32, middle: f32, outer: f32 },
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("meteor speed range is inverted ({min} > {max})")]
    MeteorSpeedRange { min: f32, max: f32 },
}

/// One quota-based difficulty stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDescriptor {
    /// Minerals needed to clear the phase
    pub mineral_target: u32,
    /// Milliseconds between meteor spawns
    pub meteor_spawn_interval_ms: u32,
}

/// Orbit radii at the reference viewport (pixels from the planet center)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitRadii {
    pub inner: f32,
    pub middle: f32,
    pub outer: f32,
}

impl Default for OrbitRadii {
    fn default() -> Self {
        Self {
            inner: 80.0,
            middle: 140.0,
            outer: 200.0,
        }
    }
}

/// Spawner and intent timing (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTiming {
    pub mineral_ms: u32,
    pub fuel_star_ms: u32,
    pub fuel_decay_ms: u32,
    pub tutorial_item_ms: u32,
    pub orbit_cooldown_ms: u32,
}

impl Default for SpawnTiming {
    fn default() -> Self {
        Self {
            mineral_ms: 2500,
            fuel_star_ms: 3000,
            fuel_decay_ms: 100,
            tutorial_item_ms: 800,
            orbit_cooldown_ms: 300,
        }
    }
}

/// Ship-to-entity reach (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionRadii {
    pub meteor: f32,
    pub mineral: f32,
    pub fuel: f32,
}

impl Default for CollisionRadii {
    fn default() -> Self {
        Self {
            meteor: 25.0,
            mineral: 20.0,
            fuel: 18.0,
        }
    }
}

/// What each pickup is worth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemValues {
    pub fuel_star: f32,
    pub fuel_star_tutorial: f32,
    pub mineral: u32,
    /// Score awarded per mineral unit
    pub mineral_score: u64,
}

impl Default for ItemValues {
    fn default() -> Self {
        Self {
            fuel_star: 8.0,
            fuel_star_tutorial: 20.0,
            mineral: 1,
            mineral_score: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelTuning {
    /// Fuel burned per decay interval
    pub consumption_rate: f32,
    /// Fraction of the tank left when the tutorial teaches refuelling
    pub tutorial_fraction: f32,
}

impl Default for FuelTuning {
    fn default() -> Self {
        Self {
            consumption_rate: 0.5,
            tutorial_fraction: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeteorTuning {
    /// Angular speed range (radians per tick)
    pub speed_min: f32,
    pub speed_max: f32,
    pub lifetime_ms: u32,
}

impl Default for MeteorTuning {
    fn default() -> Self {
        Self {
            speed_min: 0.01,
            speed_max: 0.025,
            lifetime_ms: 15_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectibleTuning {
    pub mineral_lifetime_ms: u32,
    pub fuel_star_lifetime_ms: u32,
    /// Fade-out after the lifetime elapses
    pub fade_ms: u32,
    /// Collected pickups linger this long for the collect animation
    pub collect_ms: u32,
}

impl Default for CollectibleTuning {
    fn default() -> Self {
        Self {
            mineral_lifetime_ms: 5000,
            fuel_star_lifetime_ms: 5000,
            fade_ms: 300,
            collect_ms: 200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorialTuning {
    /// Typewriter speed (ms per character)
    pub type_speed_ms: u32,
    /// Scales every step's auto-advance delay
    pub delay_multiplier: f32,
    /// Pause between pilot setup and the first step
    pub start_delay_ms: u32,
    /// Hide animation before a step is left
    pub hide_ms: u32,
    /// Gap between a hidden step and the next one
    pub gap_ms: u32,
    /// How far ahead of the ship tutorial items appear (radians)
    pub item_lead_angle: f32,
}

impl Default for TutorialTuning {
    fn default() -> Self {
        Self {
            type_speed_ms: 45,
            delay_multiplier: 1.5,
            start_delay_ms: 500,
            hide_ms: 200,
            gap_ms: 300,
            item_lead_angle: 0.8,
        }
    }
}

/// Countdowns between phases and before the first phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionTuning {
    pub countdown_secs: u8,
    pub countdown_step_ms: u32,
    /// "GO!" hold after the game-start countdown
    pub go_hold_ms: u32,
}

impl Default for TransitionTuning {
    fn default() -> Self {
        Self {
            countdown_secs: 3,
            countdown_step_ms: 1000,
            go_hold_ms: 1300,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitMechanics {
    /// Fraction of the remaining radius gap closed each tick
    pub transition_factor: f32,
    /// Gap below which the radius snaps onto its target
    pub settle_epsilon: f32,
}

impl Default for OrbitMechanics {
    fn default() -> Self {
        Self {
            transition_factor: 0.1,
            settle_epsilon: 0.001,
        }
    }
}

/// Viewport the orbit radii are authored for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenTuning {
    pub reference_width: f32,
    pub reference_height: f32,
}

impl Default for ScreenTuning {
    fn default() -> Self {
        Self {
            reference_width: 1024.0,
            reference_height: 768.0,
        }
    }
}

fn default_phases() -> Vec<PhaseDescriptor> {
    [(5, 5000), (8, 4700), (10, 4400), (15, 4000)]
        .into_iter()
        .map(|(mineral_target, meteor_spawn_interval_ms)| PhaseDescriptor {
            mineral_target,
            meteor_spawn_interval_ms,
        })
        .collect()
}

/// Complete balance sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub orbits: OrbitRadii,
    pub phases: Vec<PhaseDescriptor>,
    pub spawn: SpawnTiming,
    pub collision: CollisionRadii,
    pub items: ItemValues,
    pub fuel: FuelTuning,
    pub meteors: MeteorTuning,
    pub collectibles: CollectibleTuning,
    pub tutorial: TutorialTuning,
    pub transition: TransitionTuning,
    pub orbit_mechanics: OrbitMechanics,
    pub screen: ScreenTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            orbits: OrbitRadii::default(),
            phases: default_phases(),
            spawn: SpawnTiming::default(),
            collision: CollisionRadii::default(),
            items: ItemValues::default(),
            fuel: FuelTuning::default(),
            meteors: MeteorTuning::default(),
            collectibles: CollectibleTuning::default(),
            tutorial: TutorialTuning::default(),
            transition: TransitionTuning::default(),
            orbit_mechanics: OrbitMechanics::default(),
            screen: ScreenTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json_pretty(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Phase descriptor by index (None past the last phase)
    pub fn phase(&self, index: usize) -> Option<&PhaseDescriptor> {
        self.phases.get(index)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.phases.is_empty() {
            return Err(TuningError::NoPhases);
        }
        for (index, phase) in self.phases.iter().enumerate() {
            if phase.mineral_target == 0 {
                return Err(TuningError::ZeroMineralTarget { index });
            }
            if phase.meteor_spawn_interval_ms == 0 {
                return Err(TuningError::ZeroMeteorInterval { index });
            }
        }

        let OrbitRadii {
            inner,
            middle,
            outer,
        } = self.orbits;
        positive("orbits.inner", inner)?;
        if !(inner < middle && middle < outer) {
            return Err(TuningError::OrbitOrder {
                inner,
                middle,
                outer,
            });
        }

        positive("collision.meteor", self.collision.meteor)?;
        positive("collision.mineral", self.collision.mineral)?;
        positive("collision.fuel", self.collision.fuel)?;
        positive("fuel.consumption_rate", self.fuel.consumption_rate)?;
        positive("tutorial.delay_multiplier", self.tutorial.delay_multiplier)?;
        positive("screen.reference_width", self.screen.reference_width)?;
        positive("screen.reference_height", self.screen.reference_height)?;
        positive("meteors.speed_min", self.meteors.speed_min)?;
        positive("meteors.speed_max", self.meteors.speed_max)?;

        for (field, ms) in [
            ("spawn.mineral_ms", self.spawn.mineral_ms),
            ("spawn.fuel_star_ms", self.spawn.fuel_star_ms),
            ("spawn.fuel_decay_ms", self.spawn.fuel_decay_ms),
            ("transition.countdown_step_ms", self.transition.countdown_step_ms),
            ("tutorial.type_speed_ms", self.tutorial.type_speed_ms),
        ] {
            positive(field, ms as f32)?;
        }

        if self.meteors.speed_min > self.meteors.speed_max {
            return Err(TuningError::MeteorSpeedRange {
                min: self.meteors.speed_min,
                max: self.meteors.speed_max,
            });
        }

        within("fuel.tutorial_fraction", self.fuel.tutorial_fraction, 0.0, 1.0)?;
        within(
            "orbit_mechanics.transition_factor",
            self.orbit_mechanics.transition_factor,
            f32::EPSILON,
            1.0,
        )?;

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::NonPositive { field, value })
    }
}

fn within(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), TuningError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
