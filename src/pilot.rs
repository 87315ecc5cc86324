//! Pilot roster
//!
//! The host picks a pilot on the character-select screen and hands its
//! config to the core once, at initialization.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a host-built pilot is rejected
#[derive(Debug, Error, PartialEq)]
pub enum PilotError {
    #[error("pilot id is empty")]
    MissingId,
    #[error("pilot {id}: {field} must be a positive finite number, got {value}")]
    NonPositive {
        id: String,
        field: &'static str,
        value: f32,
    },
}

/// Immutable pilot/ship configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PilotConfig {
    pub id: String,
    /// Display name
    pub name: String,
    /// Ship identifier
    pub ship: String,
    /// CSS hex color, e.g. "#ff6a00"
    pub color: String,
    /// Tank capacity
    pub fuel_max: f32,
    /// Angular speed at the reference (inner) orbit, radians per tick
    pub orbit_speed: f32,
    /// Flavor stat, not used by the simulation
    #[serde(default)]
    pub acceleration: f32,
}

impl PilotConfig {
    fn entry(
        id: &str,
        name: &str,
        ship: &str,
        color: &str,
        fuel_max: f32,
        orbit_speed: f32,
        acceleration: f32,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            ship: ship.to_string(),
            color: color.to_string(),
            fuel_max,
            orbit_speed,
            acceleration,
        }
    }

    /// The three shipped pilots, in selection order
    pub fn roster() -> Vec<PilotConfig> {
        vec![
            Self::entry("kaio", "Commander Kaio", "SKYRIUM", "#ff6a00", 150.0, 0.03, 0.08),
            Self::entry("cesar", "César", "TILUZ", "#00ff88", 100.0, 0.05, 0.15),
            Self::entry("kyra", "Kyra", "KUM KUM", "#ff00ff", 80.0, 0.08, 0.25),
        ]
    }

    /// Reject stats the simulation can't run with
    pub fn validate(&self) -> Result<(), PilotError> {
        if self.id.trim().is_empty() {
            return Err(PilotError::MissingId);
        }
        for (field, value) in [("fuel_max", self.fuel_max), ("orbit_speed", self.orbit_speed)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(PilotError::NonPositive {
                    id: self.id.clone(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }

    /// Look up a roster pilot by id
    pub fn find(id: &str) -> Option<PilotConfig> {
        Self::roster().into_iter().find(|p| p.id == id)
    }

    /// Look up a roster pilot by ship name ("kum_kum" matches "KUM KUM")
    pub fn find_by_ship(ship: &str) -> Option<PilotConfig> {
        let key = ship_key(ship);
        Self::roster().into_iter().find(|p| ship_key(&p.ship) == key)
    }

    /// Parse the hex color into 0xRRGGBB
    pub fn color_rgb(&self) -> Option<u32> {
        let hex = self.color.strip_prefix('#').unwrap_or(&self.color);
        if hex.len() != 6 {
            return None;
        }
        u32::from_str_radix(hex, 16).ok()
    }
}

fn ship_key(name: &str) -> String {
    name.trim().replace(' ', "_").to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_lookup() {
        let cesar = PilotConfig::find("cesar").unwrap();
        assert_eq!(cesar.ship, "TILUZ");
        assert_eq!(cesar.fuel_max, 100.0);
        assert!(PilotConfig::find("nobody").is_none());
    }

    #[test]
    fn test_ship_lookup_ignores_case_and_separator() {
        let kyra = PilotConfig::find_by_ship("kum_kum").unwrap();
        assert_eq!(kyra.id, "kyra");
        assert_eq!(PilotConfig::find_by_ship("Skyrium").unwrap().id, "kaio");
    }

    #[test]
    fn test_color_parse() {
        let kaio = PilotConfig::find("kaio").unwrap();
        assert_eq!(kaio.color_rgb(), Some(0xff6a00));

        let mut bad = kaio.clone();
        bad.color = "orange".into();
        assert_eq!(bad.color_rgb(), None);
    }

    #[test]
    fn test_roster_is_valid() {
        for pilot in PilotConfig::roster() {
            assert_eq!(pilot.validate(), Ok(()));
        }
    }

    #[test]
    fn test_rejects_unusable_stats() {
        let json = r##"{"id":"x","name":"X","ship":"X-1","color":"#112233","fuel_max":-10,"orbit_speed":0.04}"##;
        let pilot: PilotConfig = serde_json::from_str(json).unwrap();
        assert!(matches!(
            pilot.validate(),
            Err(PilotError::NonPositive { field: "fuel_max", .. })
        ));

        let mut pilot = PilotConfig::find("kyra").unwrap();
        pilot.orbit_speed = f32::NAN;
        assert!(matches!(
            pilot.validate(),
            Err(PilotError::NonPositive { field: "orbit_speed", .. })
        ));

        pilot.id = " ".into();
        assert_eq!(pilot.validate(), Err(PilotError::MissingId));
    }

    #[test]
    fn test_host_json_without_acceleration() {
        let json = r##"{"id":"x","name":"X","ship":"X-1","color":"#112233","fuel_max":60,"orbit_speed":0.04}"##;
        let pilot: PilotConfig = serde_json::from_str(json).unwrap();
        assert_eq!(pilot.acceleration, 0.0);
        assert_eq!(pilot.fuel_max, 60.0);
    }
}
