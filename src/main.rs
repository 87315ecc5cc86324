//! Orbit Survival headless runner
//!
//! Plays one autopiloted run natively and logs what happens. The browser
//! build drives the library through `platform::web` instead.
//!
//! Usage: `orbit-survival [pilot-id | ship] [seed] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use orbit_survival::sim::GameEvent;
    use orbit_survival::{Game, PilotConfig, Tuning};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let pilot_id = args.next().unwrap_or_else(|| "cesar".to_string());
    let seed = match args.next() {
        Some(raw) => raw.parse::<u64>()?,
        None => 0x0B17_5EED,
    };
    let tuning = match args.next() {
        Some(path) => Tuning::from_json(&std::fs::read_to_string(&path)?)?,
        None => Tuning::default(),
    };

    let pilot = PilotConfig::find(&pilot_id)
        .or_else(|| PilotConfig::find_by_ship(&pilot_id))
        .ok_or_else(|| format!("unknown pilot or ship '{pilot_id}'"))?;
    log::info!("Orbit Survival (native) starting: pilot {pilot_id}, seed {seed}");

    let mut game = Game::new(seed, tuning)?;
    game.set_idle_mode(true);
    game.initialize(pilot)?;

    // Ten simulated minutes at most
    let mut finished = false;
    for _ in 0..(orbit_survival::consts::TICK_RATE_HZ * 600) {
        game.step();
        let seconds = game.state().scheduler.now_ms() as f64 / 1000.0;
        for event in game.drain_events() {
            log::info!("[{seconds:>7.2}s] {event}");
            finished |= matches!(
                event,
                GameEvent::GameOver { .. } | GameEvent::PhaseCompleted { is_final: true, .. }
            );
        }
        if finished {
            break;
        }
    }

    let snapshot = game.snapshot();
    log::info!(
        "Run over: phase {}/{}, score {}, reason {}",
        snapshot.phase_index + 1,
        snapshot.phase_count,
        snapshot.score,
        snapshot
            .game_over_reason
            .map_or("-".to_string(), |r| r.to_string())
    );
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
