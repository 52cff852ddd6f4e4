//! Drift Runner - three-lane runner simulation engine
//!
//! Core modules:
//! - `sim`: Simulation (lanes, spawning, collisions, scoring, particles)
//! - `engine`: Frame scheduler driving `sim` from host frame callbacks
//! - `audio`: Audio cue capability and its backends
//! - `hud`: Observable per-frame summary
//! - `settings`: Host-supplied configuration

pub mod audio;
pub mod engine;
pub mod hud;
pub mod settings;
pub mod sim;

pub use audio::{AudioCue, AudioSink};
pub use engine::{Engine, FrameStatus, InputHandle, RunResult};
pub use hud::Hud;
pub use settings::{QualityPreset, Settings, SettingsError};

/// Gameplay constants
pub mod consts {
    pub const LANE_COUNT: u8 = 3;

    /// Starting speed in pixels per tick
    pub const START_SPEED: f32 = 5.0;
    pub const SPEED_RAMP_PER_TICK: f32 = 0.001;
    /// Odometer gains speed / DISTANCE_DIVISOR per tick
    pub const DISTANCE_DIVISOR: f32 = 60.0;

    pub const MULTIPLIER_MIN: f32 = 1.0;
    pub const MULTIPLIER_MAX: f32 = 3.0;
    pub const MULTIPLIER_DECAY_PER_SEC: f32 = 0.05;

    /// Perfect switch: next switch strictly inside (MIN, MAX) ms
    pub const PERFECT_SWITCH_MIN_MS: f64 = 100.0;
    pub const PERFECT_SWITCH_MAX_MS: f64 = 1000.0;
    pub const PERFECT_SWITCH_FACTOR: f32 = 1.05;

    pub const DRIFT_WINDOW_MS: f64 = 200.0;
    /// Vehicle tilt while drifting (radians)
    pub const DRIFT_TILT: f32 = 0.05;
    /// Fraction of the remaining gap closed per tick
    pub const LANE_EASING: f32 = 0.2;

    pub const NITRO_DURATION_MS: f64 = 3000.0;
    pub const NITRO_SPEED_FACTOR: f32 = 1.5;

    pub const SPAWN_INTERVAL_MS: f64 = 1500.0;
    pub const SPAWN_Y: f32 = -100.0;
    /// Entities are dropped this far below the bottom edge
    pub const DESPAWN_MARGIN: f32 = 100.0;
    pub const ENTITY_SIZE: f32 = 60.0;
    pub const PICKUP_BASE_VALUE: f32 = 10.0;
    pub const PICKUP_SPIN_PER_TICK: f32 = 0.05;

    /// Car row sits this far above the bottom edge
    pub const CAR_ROW_OFFSET: f32 = 200.0;
    pub const CAR_HITBOX_WIDTH: f32 = 80.0;
    pub const CAR_HITBOX_HEIGHT: f32 = 120.0;

    pub const PARTICLE_GRAVITY: f32 = 0.2;
    pub const SNOW_WRAP_Y: f32 = -10.0;

    pub const ENGINE_HUM_INTERVAL_MS: f64 = 1000.0;
    /// Displayed km/h per pixel-per-tick
    pub const HUD_SPEED_SCALE: f32 = 20.0;
}

/// Route `log` output to the browser console and install the panic hook
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(js_name = initLogging)]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Failed to init logger: {err}").into());
    }
}
