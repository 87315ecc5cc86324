//! wasm-bindgen wrapper around [`Game`]

use std::fmt::Display;

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::game::Game;
use crate::pilot::PilotConfig;
use crate::sim::{OrbitDirection, OrbitTier};
use crate::tuning::Tuning;

fn to_js(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Install the panic hook and console logger once per page
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Ignored if the page already installed a logger
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Orbit Survival core loaded");
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game,
}

#[wasm_bindgen]
impl WebGame {
    /// `tuning_json` may be omitted for the default balance
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: Option<String>) -> Result<WebGame, JsValue> {
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json).map_err(to_js)?,
            None => Tuning::default(),
        };
        let seed = js_sys::Date::now() as u64;
        Ok(Self {
            game: Game::new(seed, tuning).map_err(to_js)?,
        })
    }

    /// Shipped pilots as a JSON array
    pub fn roster_json() -> Result<String, JsValue> {
        serde_json::to_string(&PilotConfig::roster()).map_err(to_js)
    }

    /// Initialize with a host-built pilot (JSON `PilotConfig`)
    pub fn initialize(&mut self, pilot_json: &str) -> Result<bool, JsValue> {
        let pilot: PilotConfig = serde_json::from_str(pilot_json).map_err(to_js)?;
        self.game.initialize(pilot).map_err(to_js)
    }

    /// Initialize with a roster pilot by id
    pub fn initialize_roster_pilot(&mut self, id: &str) -> Result<bool, JsValue> {
        let pilot = PilotConfig::find(id).ok_or_else(|| to_js(format!("unknown pilot {id}")))?;
        self.game.initialize(pilot).map_err(to_js)
    }

    /// Roster pilot flying `ship` as JSON ("kum_kum" matches "KUM KUM")
    pub fn roster_pilot_for_ship(ship: &str) -> Result<String, JsValue> {
        let pilot =
            PilotConfig::find_by_ship(ship).ok_or_else(|| to_js(format!("unknown ship {ship}")))?;
        serde_json::to_string(&pilot).map_err(to_js)
    }

    /// Active pilot's color as 0xRRGGBB, for tinting the ship
    pub fn pilot_color(&self) -> Option<u32> {
        self.game.state().pilot.as_ref().and_then(PilotConfig::color_rgb)
    }

    /// `direction` is "inner" or "outer"
    pub fn request_orbit_change(&mut self, direction: &str) -> Result<(), JsValue> {
        let direction = match direction {
            "inner" => OrbitDirection::Inner,
            "outer" => OrbitDirection::Outer,
            other => return Err(to_js(format!("unknown orbit direction {other}"))),
        };
        self.game.request_orbit_change(direction);
        Ok(())
    }

    /// `tier` is "INNER", "MIDDLE" or "OUTER"
    pub fn request_orbit_toward(&mut self, tier: &str) -> Result<(), JsValue> {
        let tier: OrbitTier = serde_json::from_value(serde_json::Value::from(tier)).map_err(to_js)?;
        self.game.request_orbit_toward(tier);
        Ok(())
    }

    /// Pointer position relative to the planet center
    pub fn request_orbit_at(&mut self, x: f32, y: f32) {
        self.game.request_orbit_at(Vec2::new(x, y));
    }

    pub fn request_restart(&mut self) {
        self.game.request_restart();
    }

    pub fn request_skip_tutorial(&mut self) {
        self.game.request_skip_tutorial();
    }

    pub fn request_exit_to_menu(&mut self) {
        self.game.request_exit_to_menu();
    }

    pub fn set_idle_mode(&mut self, idle: bool) {
        self.game.set_idle_mode(idle);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.game.resize(width, height);
    }

    /// Feed frame time (ms); returns ticks run
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        self.game.advance(elapsed_ms)
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.game.snapshot()).map_err(to_js)
    }

    /// Events since the last call, as a JSON array
    pub fn drain_events_json(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.game.drain_events()).map_err(to_js)
    }

    pub fn skip_tutorial_flag(&self) -> bool {
        self.game.session().skip_tutorial
    }

    pub fn best_score(&self) -> f64 {
        self.game.session().best_score as f64
    }
}
