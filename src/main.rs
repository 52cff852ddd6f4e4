//! Drift Runner entry point
//!
//! Native builds run a headless demo: an autopilot plays one run at 60 fps
//! of simulated time and the result is printed. The optional second
//! argument is a quality preset name or a settings JSON path. The browser
//! build drives the library from JS and has no entry point of its own.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::Cell;
    use std::rc::Rc;

    use drift_runner::audio::LogAudio;
    use drift_runner::consts::*;
    use drift_runner::sim::{Direction, GameState, InputEvent, Lane};
    use drift_runner::{Engine, FrameStatus, RunResult, Settings};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after ten simulated minutes
    const MAX_FRAMES: u32 = 60 * 60 * 10;
    /// How far above the car the autopilot looks for hazards
    const LOOKAHEAD: f32 = 320.0;
    const BOOST_EVERY_MS: f64 = 8000.0;

    /// True if a hazard in `lane` is inside the danger band above the car
    fn lane_blocked(state: &GameState, lane: Lane) -> bool {
        let car_y = state.field.car_y();
        state.entities.iter().any(|e| {
            e.lane == lane
                && e.kind.is_hazard()
                && e.y + ENTITY_SIZE > car_y - LOOKAHEAD
                && e.y < car_y + CAR_HITBOX_HEIGHT
        })
    }

    /// Pick a move away from the nearest threat, preferring the closest free lane
    fn steer(state: &GameState) -> Option<Direction> {
        let lane = state.player.lane;
        if !lane_blocked(state, lane) {
            return None;
        }
        let left = lane.left().filter(|&l| !lane_blocked(state, l));
        let right = lane.right().filter(|&l| !lane_blocked(state, l));
        match (left, right) {
            (Some(_), _) => Some(Direction::Left),
            (None, Some(_)) => Some(Direction::Right),
            // Boxed in; try crossing toward the middle anyway
            (None, None) if lane == Lane::LEFT => Some(Direction::Right),
            (None, None) => Some(Direction::Left),
        }
    }

    pub fn run() {
        env_logger::init();

        let mut args = std::env::args().skip(1);
        let seed = args
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or_else(|| {
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_millis() as u64)
                    .unwrap_or(0)
            });
        let settings = match args.next() {
            Some(arg) => Settings::from_arg(&arg),
            None => Settings::default(),
        };

        log::info!("Drift Runner (native) starting with seed {}", seed);

        let outcome: Rc<Cell<Option<RunResult>>> = Rc::new(Cell::new(None));
        let sink = outcome.clone();
        let mut engine = Engine::new(&settings, seed, 0.0, LogAudio::default())
            .on_game_over(move |result| sink.set(Some(result)));
        let input = engine.input_handle();

        let mut now = 0.0;
        let mut last_boost = 0.0;
        let mut frames = 0;
        while frames < MAX_FRAMES {
            let state = engine.state();
            // One move per frame; the car needs a few frames to settle
            let settled = (state.player.x - state.player.target_x(&state.field)).abs() < 5.0;
            if settled {
                if let Some(direction) = steer(state) {
                    input.push(InputEvent::Move(direction));
                }
            }
            if now - last_boost > BOOST_EVERY_MS && !state.run.nitro_active() {
                input.push(InputEvent::Boost);
                last_boost = now;
            }

            now += FRAME_MS;
            frames += 1;
            if engine.frame(now) != FrameStatus::Running {
                break;
            }
        }
        engine.stop();

        let hud = engine.hud();
        match outcome.get() {
            Some(result) => println!(
                "Crashed after {} frames: distance {} KM, {} gifts",
                frames, result.distance, result.pickups
            ),
            None => println!(
                "Survived {} frames: distance {} KM, {} gifts",
                frames, hud.distance, hud.pickups
            ),
        }
        let powerups = hud.active_powerups();
        println!(
            "{} KM/H, multiplier {}, power-ups: {}",
            hud.speed_kmh,
            hud.multiplier_label(),
            if powerups.is_empty() { "none".to_string() } else { powerups.join(", ") }
        );
        match serde_json::to_string(hud) {
            Ok(json) => println!("{json}"),
            Err(err) => log::warn!("Failed to serialize HUD: {err}"),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM hosts call into the library directly
}
