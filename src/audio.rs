//! Audio collaborator
//!
//! The game only decides *when* a sound plays. Each [`SoundEffect`] expands to
//! a short list of oscillator [`Tone`]s; the Web Audio sink on wasm32 plays
//! them, other hosts can plug in any [`AudioSink`].

use crate::content::Rarity;
use crate::settings::Settings;

/// Sound cues raised by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Gem collected; pitch climbs with the combo
    Pickup { combo: u32 },
    PowerUp,
    QuizCorrect,
    QuizWrong,
    /// Reward draw started
    RewardDrawStart,
    RewardReveal(Rarity),
    Ending,
}

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// A single enveloped oscillator note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq: f32,
    pub wave: Wave,
    /// Start offset from the trigger, seconds
    pub delay: f64,
    pub duration: f64,
    /// Peak gain before master/sfx scaling
    pub volume: f32,
}

const fn tone(freq: f32, wave: Wave, delay: f64, duration: f64, volume: f32) -> Tone {
    Tone {
        freq,
        wave,
        delay,
        duration,
        volume,
    }
}

/// Two semitones per combo step, wrapping every 12
pub fn pickup_frequency(combo: u32) -> f32 {
    440.0 * 1.05946_f32.powi(((combo % 12) * 2) as i32)
}

impl SoundEffect {
    /// Notes that make up this cue
    pub fn tones(self) -> Vec<Tone> {
        use Wave::*;
        match self {
            SoundEffect::Pickup { combo } => {
                vec![tone(pickup_frequency(combo), Triangle, 0.0, 0.2, 0.08)]
            }
            SoundEffect::PowerUp => vec![
                tone(300.0, Square, 0.0, 0.1, 0.1),
                tone(600.0, Square, 0.1, 0.3, 0.1),
            ],
            SoundEffect::QuizCorrect => vec![
                tone(523.25, Sine, 0.0, 0.2, 0.1),
                tone(659.25, Sine, 0.1, 0.2, 0.1),
                tone(783.99, Sine, 0.2, 0.4, 0.1),
            ],
            SoundEffect::QuizWrong => vec![tone(180.0, Sawtooth, 0.0, 0.6, 0.1)],
            SoundEffect::RewardDrawStart => vec![tone(110.0, Square, 0.0, 1.0, 0.05)],
            SoundEffect::RewardReveal(rarity) => {
                let mut notes: Vec<Tone> = [523.25, 659.25, 783.99, 1046.5]
                    .iter()
                    .enumerate()
                    .map(|(i, &f)| tone(f, Sine, i as f64 * 0.05, 0.8, 0.15))
                    .collect();
                if rarity == Rarity::SSR {
                    notes.push(tone(1318.51, Sine, 0.4, 1.5, 0.2));
                }
                notes
            }
            SoundEffect::Ending => [523.0, 587.0, 659.0, 698.0, 783.0, 880.0, 987.0, 1046.0]
                .iter()
                .enumerate()
                .map(|(i, &f)| tone(f, Sine, i as f64 * 0.2, 1.0, 0.1))
                .collect(),
        }
    }
}

/// Something that can play sound cues
pub trait AudioSink {
    /// Called once when a game starts (user gesture available)
    fn init(&mut self) {}

    fn play(&mut self, effect: SoundEffect);

    /// Volume settings changed
    fn apply_settings(&mut self, _settings: &Settings) {}
}

/// Drops every cue. Used headless and when no audio device exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, effect: SoundEffect) {
        log::trace!("(silent) {:?}", effect);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundEffect, Tone, Wave};
    use crate::settings::Settings;

    /// Procedural oscillator playback through the Web Audio API
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        gain: f32,
    }

    impl WebAudio {
        pub fn new(settings: &Settings) -> Self {
            Self {
                ctx: None,
                gain: settings.effective_volume(),
            }
        }

        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            wave: Wave,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(match wave {
                Wave::Sine => OscillatorType::Sine,
                Wave::Square => OscillatorType::Square,
                Wave::Sawtooth => OscillatorType::Sawtooth,
                Wave::Triangle => OscillatorType::Triangle,
            });
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        fn play_tone(&self, ctx: &AudioContext, tone: &Tone) {
            let Some((osc, gain)) = Self::create_osc(ctx, tone.freq, tone.wave) else {
                return;
            };
            let t = ctx.current_time() + tone.delay;

            gain.gain().set_value_at_time(tone.volume * self.gain, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.0001, t + tone.duration)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + tone.duration).ok();
        }
    }

    impl AudioSink for WebAudio {
        fn init(&mut self) {
            if self.ctx.is_none() {
                self.ctx = AudioContext::new().ok();
                if self.ctx.is_none() {
                    log::warn!("Failed to create AudioContext - audio disabled");
                }
            }
            if let Some(ctx) = &self.ctx {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }
        }

        fn play(&mut self, effect: SoundEffect) {
            if self.gain <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            for tone in effect.tones() {
                self.play_tone(ctx, &tone);
            }
        }

        fn apply_settings(&mut self, settings: &Settings) {
            self.gain = settings.effective_volume();
        }
    }
}
