//! Audio cues
//!
//! The engine only knows the [`AudioSink`] capability. Native hosts get a
//! logging sink; the browser build synthesises every cue procedurally with
//! the Web Audio API, so no sound files are shipped.

/// Named sound cues the engine can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Short engine rev pitched by the displayed speed
    EngineHum { speed: u32 },
    /// Lane switch
    Whoosh,
    /// Gift collected
    Chime,
    Crash,
    Nitro,
}

/// Sound output used by the engine
pub trait AudioSink {
    /// Fire a one-shot cue
    fn play(&mut self, cue: AudioCue);
    /// Start the looping background track
    fn start_background(&mut self);
    /// Stop the background track. Must tolerate being called when stopped.
    fn stop_background(&mut self);
}

/// Writes cues to the log. Default sink for headless runs.
#[derive(Debug, Default)]
pub struct LogAudio {
    background: bool,
}

impl AudioSink for LogAudio {
    fn play(&mut self, cue: AudioCue) {
        log::trace!("audio cue {:?}", cue);
    }

    fn start_background(&mut self) {
        if !self.background {
            self.background = true;
            log::debug!("background audio started");
        }
    }

    fn stop_background(&mut self) {
        if self.background {
            self.background = false;
            log::debug!("background audio stopped");
        }
    }
}

/// Keeps every call for later inspection
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    pub cues: Vec<AudioCue>,
    pub background_starts: u32,
    pub background_stops: u32,
    pub background_playing: bool,
}

impl RecordingAudio {
    pub fn count(&self, cue: AudioCue) -> usize {
        self.cues.iter().filter(|&&c| c == cue).count()
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, cue: AudioCue) {
        self.cues.push(cue);
    }

    fn start_background(&mut self) {
        self.background_starts += 1;
        self.background_playing = true;
    }

    fn stop_background(&mut self) {
        self.background_stops += 1;
        self.background_playing = false;
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioCue, AudioSink};
    use crate::settings::Settings;

    /// Web Audio backend
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        music_volume: f32,
        muted: bool,
        /// Running background drone, if any
        drone: Option<(OscillatorNode, GainNode)>,
    }

    impl WebAudio {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: settings.master_volume,
                sfx_volume: settings.sfx_volume,
                music_volume: settings.music_volume,
                muted: settings.muted,
                drone: None,
            }
        }

        /// Mute/unmute all audio
        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
            if muted {
                self.stop_background();
            }
        }

        fn sfx_gain(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        fn music_gain(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.music_volume
            }
        }

        /// Live context, resumed if the browser suspended it
        fn context(&self) -> Option<&AudioContext> {
            let ctx = self.ctx.as_ref()?;
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            Some(ctx)
        }

        /// Create an oscillator with gain envelope
        fn create_osc(ctx: &AudioContext, freq: f32, osc_type: OscillatorType) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Single oscillator sweeping from `from` to `to` Hz
        fn sweep(ctx: &AudioContext, osc_type: OscillatorType, from: f32, to: f32, vol: f32, secs: f64) {
            let Some((osc, gain)) = Self::create_osc(ctx, from, osc_type) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, t + secs).ok();
            osc.frequency().set_value_at_time(from, t).ok();
            osc.frequency().exponential_ramp_to_value_at_time(to, t + secs).ok();

            osc.start().ok();
            osc.stop_with_when(t + secs).ok();
        }

        /// C5-E5-G5 arpeggio
        fn chime(ctx: &AudioContext, vol: f32) {
            for (i, freq) in [523.25, 659.25, 783.99].iter().enumerate() {
                let delay = i as f64 * 0.05;
                if let Some((osc, gain)) = Self::create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.2, t).ok();
                    gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.5).ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.5).ok();
                }
            }
        }

        /// Low rumble with a detuned crunch on top
        fn crash(ctx: &AudioContext, vol: f32) {
            Self::sweep(ctx, OscillatorType::Sawtooth, 180.0, 30.0, vol * 0.5, 0.5);
            Self::sweep(ctx, OscillatorType::Square, 90.0, 20.0, vol * 0.3, 0.4);
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, cue: AudioCue) {
            let vol = self.sfx_gain();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = self.context() else { return };

            match cue {
                AudioCue::EngineHum { speed } => {
                    let freq = 80.0 + speed as f32 * 2.0;
                    Self::sweep(ctx, OscillatorType::Sawtooth, freq, freq, vol * 0.05, 0.1);
                }
                AudioCue::Whoosh => Self::sweep(ctx, OscillatorType::Sine, 400.0, 200.0, vol * 0.3, 0.15),
                AudioCue::Chime => Self::chime(ctx, vol),
                AudioCue::Crash => Self::crash(ctx, vol),
                AudioCue::Nitro => Self::sweep(ctx, OscillatorType::Sawtooth, 100.0, 300.0, vol * 0.2, 0.3),
            }
        }

        fn start_background(&mut self) {
            if self.drone.is_some() {
                return;
            }
            let vol = self.music_gain();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = self.context() else { return };
            let Some((osc, gain)) = Self::create_osc(ctx, 130.81, OscillatorType::Triangle) else {
                return;
            };
            gain.gain().set_value(vol * 0.2);
            if osc.start().is_ok() {
                self.drone = Some((osc, gain));
            }
        }

        fn stop_background(&mut self) {
            if let Some((osc, _gain)) = self.drone.take() {
                // Already stopped is fine
                let _ = osc.stop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_counts_cues() {
        let mut audio = RecordingAudio::default();
        audio.play(AudioCue::Whoosh);
        audio.play(AudioCue::Whoosh);
        audio.play(AudioCue::Chime);
        assert_eq!(audio.count(AudioCue::Whoosh), 2);
        assert_eq!(audio.count(AudioCue::Crash), 0);
    }

    #[test]
    fn test_log_audio_background_is_idempotent() {
        let mut audio = LogAudio::default();
        audio.start_background();
        audio.stop_background();
        audio.stop_background();
        assert!(!audio.background);
    }
}
