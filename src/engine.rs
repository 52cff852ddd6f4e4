//! Frame scheduler
//!
//! The host calls [`Engine::frame`] once per display refresh with its frame
//! timestamp. Input arrives through [`InputHandle`]s at any time between
//! frames and is applied at the start of the next one.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::audio::{AudioCue, AudioSink};
use crate::hud::Hud;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, InputEvent, TickInput, tick};

/// Terminal report handed to the game-over callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub distance: u32,
    pub pickups: u32,
}

/// Where the engine is after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Running,
    /// Crashed; the callback has fired
    Finished,
    /// Torn down by the host
    Stopped,
}

type GameOverCallback = Box<dyn FnOnce(RunResult)>;

/// Host-side handle for queuing input between frames
#[derive(Debug, Clone)]
pub struct InputHandle {
    queue: Rc<RefCell<VecDeque<InputEvent>>>,
    attached: Rc<Cell<bool>>,
}

impl InputHandle {
    fn new() -> Self {
        Self {
            queue: Rc::new(RefCell::new(VecDeque::new())),
            attached: Rc::new(Cell::new(true)),
        }
    }

    /// Queue an event. Returns false once the engine has detached input.
    pub fn push(&self, event: InputEvent) -> bool {
        if !self.attached.get() {
            return false;
        }
        self.queue.borrow_mut().push_back(event);
        true
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    fn drain(&self) -> Vec<InputEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }

    fn detach(&self) {
        self.attached.set(false);
        self.queue.borrow_mut().clear();
    }
}

/// Drives one run from start to game over
pub struct Engine<A: AudioSink> {
    state: GameState,
    audio: A,
    input: InputHandle,
    on_game_over: Option<GameOverCallback>,
    last_frame_ms: f64,
    status: FrameStatus,
    balance: f64,
    hud: Hud,
    result: Option<RunResult>,
}

impl<A: AudioSink> Engine<A> {
    /// Start a run at host time `start_ms`. Background audio starts now.
    pub fn new(settings: &Settings, seed: u64, start_ms: f64, mut audio: A) -> Self {
        let state = GameState::new(
            seed,
            settings.field(),
            settings.max_particles(),
            settings.snow_count(),
            start_ms,
        );
        audio.start_background();
        log::info!(
            "Run started: seed {} field {}x{}",
            seed,
            settings.field_width,
            settings.field_height
        );

        let hud = Hud::from_run(&state.run, 0.0);
        Self {
            state,
            audio,
            input: InputHandle::new(),
            on_game_over: None,
            last_frame_ms: start_ms,
            status: FrameStatus::Running,
            balance: 0.0,
            hud,
            result: None,
        }
    }

    /// Starting balance shown in the HUD; never read by the simulation
    pub fn with_starting_balance(mut self, balance: f64) -> Self {
        self.balance = balance;
        self.hud.balance = balance;
        self
    }

    /// Callback fired exactly once when the run crashes
    pub fn on_game_over(mut self, callback: impl FnOnce(RunResult) + 'static) -> Self {
        self.on_game_over = Some(Box::new(callback));
        self
    }

    pub fn input_handle(&self) -> InputHandle {
        self.input.clone()
    }

    /// Run one tick for the frame at `now_ms`
    pub fn frame(&mut self, now_ms: f64) -> FrameStatus {
        if self.status != FrameStatus::Running {
            return self.status;
        }

        let dt = ((now_ms - self.last_frame_ms) / 1000.0).max(0.0) as f32;
        self.last_frame_ms = now_ms;

        let input = TickInput::new(self.input.drain());
        let report = tick(&mut self.state, &input, now_ms, dt);
        self.dispatch_audio(&report.events);
        self.hud = Hud::from_run(&self.state.run, self.balance);

        if report.crashed {
            self.finish();
        }
        self.status
    }

    /// Tear the run down. Safe to call any number of times; after the first
    /// call no tick runs and the callback can no longer fire.
    pub fn stop(&mut self) {
        if self.status != FrameStatus::Running {
            return;
        }
        self.status = FrameStatus::Stopped;
        self.on_game_over = None;
        self.input.detach();
        self.audio.stop_background();
        log::info!("Run stopped by host");
    }

    pub fn status(&self) -> FrameStatus {
        self.status
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Final result once the run has crashed
    pub fn result(&self) -> Option<RunResult> {
        self.result
    }

    fn finish(&mut self) {
        self.status = FrameStatus::Finished;
        self.input.detach();
        self.audio.stop_background();

        let result = RunResult {
            distance: self.state.run.distance.floor() as u32,
            pickups: self.state.run.pickups,
        };
        self.result = Some(result);
        if let Some(callback) = self.on_game_over.take() {
            callback(result);
        }
    }

    fn dispatch_audio(&mut self, events: &[GameEvent]) {
        for event in events {
            let cue = match *event {
                GameEvent::LaneChanged { .. } => AudioCue::Whoosh,
                GameEvent::PickupCollected { .. } => AudioCue::Chime,
                GameEvent::Crashed { .. } => AudioCue::Crash,
                GameEvent::NitroActivated => AudioCue::Nitro,
                GameEvent::EngineHum { speed_kmh } => AudioCue::EngineHum { speed: speed_kmh },
                GameEvent::NitroExpired | GameEvent::Spawned { .. } => continue,
            };
            self.audio.play(cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingAudio;
    use crate::sim::{Direction, EntityKind, Lane};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn engine() -> Engine<RecordingAudio> {
        Engine::new(&Settings::default(), 2024, 0.0, RecordingAudio::default())
    }

    /// Park an entity right on top of the car
    fn plant_entity(engine: &mut Engine<RecordingAudio>, lane: Lane, kind: EntityKind) {
        let state = &mut engine.state;
        state.player.lane = lane;
        state.player.target_lane = lane;
        state.player.x = lane.center_x(state.field.lane_width());
        state.add_entity(lane, kind);
        let car_y = state.field.car_y();
        if let Some(entity) = state.entities.last_mut() {
            entity.y = car_y;
        }
    }

    #[test]
    fn test_background_starts_with_run() {
        let engine = engine();
        assert_eq!(engine.audio().background_starts, 1);
        assert!(engine.audio().background_playing);
    }

    #[test]
    fn test_crash_reports_once_and_freezes() {
        let results = Rc::new(RefCell::new(Vec::new()));
        let sink = results.clone();
        let mut engine = engine().on_game_over(move |r| sink.borrow_mut().push(r));

        let mut now = 0.0;
        for _ in 0..30 {
            now += FRAME_MS;
            assert_eq!(engine.frame(now), FrameStatus::Running);
        }
        plant_entity(&mut engine, Lane::MIDDLE, EntityKind::Gift);
        now += FRAME_MS;
        assert_eq!(engine.frame(now), FrameStatus::Running);
        let pickups = engine.hud().pickups;
        assert!(pickups >= 10);

        plant_entity(&mut engine, Lane::LEFT, EntityKind::Coal);
        now += FRAME_MS;
        assert_eq!(engine.frame(now), FrameStatus::Finished);

        let expected = RunResult {
            distance: engine.state().run.distance.floor() as u32,
            pickups,
        };
        assert_eq!(results.borrow().as_slice(), &[expected]);
        assert_eq!(engine.result(), Some(expected));
        assert_eq!(engine.audio().count(AudioCue::Crash), 1);
        assert!(!engine.audio().background_playing);

        let distance = engine.state().run.distance;
        for _ in 0..10 {
            now += FRAME_MS;
            assert_eq!(engine.frame(now), FrameStatus::Finished);
        }
        assert_eq!(engine.state().run.distance, distance);
        assert_eq!(engine.state().run.pickups, pickups);
        assert_eq!(engine.hud().pickups, pickups);
        assert_eq!(results.borrow().len(), 1);
    }

    #[test]
    fn test_inputs_apply_on_next_frame() {
        let mut engine = engine();
        let input = engine.input_handle();
        assert!(input.push(InputEvent::Move(Direction::Left)));
        assert_eq!(engine.state().player.lane, Lane::MIDDLE);

        engine.frame(100.0);
        assert_eq!(engine.state().player.lane, Lane::LEFT);
        assert_eq!(engine.audio().count(AudioCue::Whoosh), 1);
    }

    #[test]
    fn test_switches_300ms_apart_multiply() {
        let mut engine = engine();
        let input = engine.input_handle();
        input.push(InputEvent::Move(Direction::Left));
        engine.frame(1000.0);
        assert_eq!(engine.state().run.multiplier, 1.0);

        input.push(InputEvent::Move(Direction::Right));
        engine.frame(1300.0);
        assert_eq!(engine.state().player.perfect_switches, 1);
        // Boosted to 1.05, then 0.3 s of decay in the same tick
        let expected = 1.05f32 - 0.3 * crate::consts::MULTIPLIER_DECAY_PER_SEC;
        assert!((engine.hud().multiplier - expected).abs() < 1e-5);
    }

    #[test]
    fn test_boost_cue_and_no_stacking() {
        let mut engine = engine();
        let input = engine.input_handle();
        input.push(InputEvent::Boost);
        input.push(InputEvent::Boost);
        engine.frame(10.0);
        assert_eq!(engine.audio().count(AudioCue::Nitro), 1);
        assert!(engine.hud().nitro_active);
        assert_eq!(engine.hud().speed_kmh, 150);
    }

    #[test]
    fn test_stop_is_idempotent_and_silences_callback() {
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        let mut engine = engine().on_game_over(move |_| flag.set(true));
        let input = engine.input_handle();

        engine.frame(FRAME_MS);
        engine.stop();
        engine.stop();
        assert_eq!(engine.status(), FrameStatus::Stopped);
        assert_eq!(engine.audio().background_stops, 1);
        assert!(!input.push(InputEvent::Boost));
        assert!(!input.is_attached());

        plant_entity(&mut engine, Lane::MIDDLE, EntityKind::Coal);
        assert_eq!(engine.frame(2.0 * FRAME_MS), FrameStatus::Stopped);
        assert!(!fired.get());
        assert!(engine.result().is_none());
    }

    #[test]
    fn test_balance_passes_through() {
        let mut engine = engine().with_starting_balance(123.45);
        assert_eq!(engine.hud().balance, 123.45);
        engine.frame(FRAME_MS);
        assert_eq!(engine.hud().balance, 123.45);
    }

    #[test]
    fn test_backwards_clock_is_zero_dt() {
        let mut engine = engine();
        engine.frame(1000.0);
        let particles = engine.state().particles.effect_count();
        engine.frame(500.0);
        assert_eq!(engine.status(), FrameStatus::Running);
        // Nothing aged, one more trail puff
        assert_eq!(engine.state().particles.effect_count(), particles + 1);
    }
}
