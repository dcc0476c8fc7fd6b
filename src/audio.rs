//! Sound effects
//!
//! Each effect is a small table of oscillator voices. The tables are plain
//! data so they can be checked natively; `AudioManager` plays them through
//! WebAudio in the browser.

use crate::sim::GameEvent;

#[cfg(target_arch = "wasm32")]
use crate::settings::Settings;
#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, OscillatorType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Bubble popped
    Pop,
    /// Time ran out
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Triangle,
}

/// One oscillator voice: a frequency sweep under a decaying envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub wave: Wave,
    pub start_hz: f32,
    /// Equal to `start_hz` for a steady pitch
    pub end_hz: f32,
    /// Seconds after the trigger
    pub delay: f64,
    /// Seconds until the voice stops
    pub duration: f64,
    /// Peak gain before volume scaling
    pub level: f32,
}

const POP: [Tone; 2] = [
    // Upward chirp
    Tone {
        wave: Wave::Sine,
        start_hz: 400.0,
        end_hz: 1200.0,
        delay: 0.0,
        duration: 0.1,
        level: 0.5,
    },
    // Click
    Tone {
        wave: Wave::Square,
        start_hz: 2500.0,
        end_hz: 2500.0,
        delay: 0.0,
        duration: 0.03,
        level: 0.08,
    },
];

const fn note(hz: f32, index: u32) -> Tone {
    Tone {
        wave: Wave::Triangle,
        start_hz: hz,
        end_hz: hz,
        delay: index as f64 * 0.15,
        duration: 0.35,
        level: 0.3,
    }
}

const GAME_OVER: [Tone; 3] = [note(500.0, 0), note(400.0, 1), note(300.0, 2)];

impl SoundEffect {
    /// Sound triggered by a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::BubblePopped { .. } => Some(SoundEffect::Pop),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            _ => None,
        }
    }

    pub fn tones(self) -> &'static [Tone] {
        match self {
            SoundEffect::Pop => &POP,
            SoundEffect::GameOver => &GAME_OVER,
        }
    }

    /// Seconds from trigger until the last voice stops
    pub fn length(self) -> f64 {
        self.tones()
            .iter()
            .map(|t| t.delay + t.duration)
            .fold(0.0, f64::max)
    }
}

/// WebAudio playback; silent when the context cannot be created
#[cfg(target_arch = "wasm32")]
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

#[cfg(target_arch = "wasm32")]
impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("No AudioContext, sound disabled");
        }
        Self {
            ctx,
            volume: settings.effective_sfx_volume(),
        }
    }

    /// Browsers keep the context suspended until a user gesture
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn play_event(&self, event: &GameEvent) {
        let Some(effect) = SoundEffect::for_event(event) else { return };
        if self.volume <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        let now = ctx.current_time();
        for tone in effect.tones() {
            if voice(ctx, tone, now, self.volume).is_none() {
                log::debug!("Dropped a voice of {:?}", effect);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn voice(ctx: &AudioContext, tone: &Tone, now: f64, volume: f32) -> Option<()> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;
    osc.set_type(match tone.wave {
        Wave::Sine => OscillatorType::Sine,
        Wave::Square => OscillatorType::Square,
        Wave::Triangle => OscillatorType::Triangle,
    });
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;

    let start = now + tone.delay;
    let stop = start + tone.duration;
    osc.frequency().set_value_at_time(tone.start_hz, start).ok()?;
    if tone.end_hz != tone.start_hz {
        osc.frequency()
            .exponential_ramp_to_value_at_time(tone.end_hz, start + tone.duration * 0.5)
            .ok()?;
    }
    gain.gain().set_value_at_time(tone.level * volume, start).ok()?;
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, stop - 0.02)
        .ok()?;
    osc.start_with_when(start).ok()?;
    osc.stop_with_when(stop).ok()
}
